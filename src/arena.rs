// SPDX-License-Identifier: Apache-2.0

//! Single-release arena backing every node and duplicated string of a
//! decoded document.
//!
//! Allocation is monotonic: container regions and byte runs are handed out
//! until the budget runs dry, and nothing is freed individually. Discarding
//! (or [`Arena::clear`]ing) the arena releases the whole document at once.
//! Containers hold [`ArrayId`]/[`ObjectId`] handles and `Copy` values, never
//! owning pointers, so there is no per-node destruction.

use alloc::vec::Vec;
use core::mem::size_of;

use crate::error::DecodeError;
use crate::value::{Str, Value};

/// Handle to an array node owned by an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayId(u32);

/// Handle to an object node owned by an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectId(u32);

/// Range of arena-owned bytes holding a duplicated string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    start: u32,
    len: u32,
}

/// Backing region of one container: `cap` cells starting at `start`, of
/// which the first `len` are live. Growth abandons the old region and
/// re-allocates at the end of the pool; the arena never reclaims it.
#[derive(Debug)]
struct Region {
    start: u32,
    len: u32,
    cap: u32,
}

#[derive(Debug, Clone, Copy)]
struct Entry<'a> {
    key: Str<'a>,
    value: Value<'a>,
}

const FIRST_REGION_CAP: u32 = 4;

/// Bump/pool allocator owning one decoded document.
///
/// The lifetime `'a` is the lifetime of the source buffer that borrowed
/// strings point into; an arena populated from a non-borrowing source is
/// free to pick any lifetime.
#[derive(Debug, Default)]
pub struct Arena<'a> {
    /// Array element storage. Regions are reserved at full capacity and
    /// padded with `Null` so cells can be written by index.
    slots: Vec<Value<'a>>,
    /// Object entry storage, same region scheme as `slots`.
    entries: Vec<Entry<'a>>,
    /// Duplicated string bytes.
    bytes: Vec<u8>,
    arrays: Vec<Region>,
    objects: Vec<Region>,
    used: usize,
    limit: usize,
}

impl<'a> Arena<'a> {
    /// Creates a growable arena with no practical budget.
    pub fn new() -> Self {
        Self::with_capacity(usize::MAX)
    }

    /// Creates an arena with a fixed budget of `capacity` bytes.
    ///
    /// Every allocation is charged against the budget; the allocation that
    /// would overflow it fails with [`DecodeError::NoMemory`], leaving all
    /// prior allocations intact.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            entries: Vec::new(),
            bytes: Vec::new(),
            arrays: Vec::new(),
            objects: Vec::new(),
            used: 0,
            limit: capacity,
        }
    }

    /// Bytes charged so far.
    pub fn used(&self) -> usize {
        self.used
    }

    /// The configured budget.
    pub fn capacity(&self) -> usize {
        self.limit
    }

    /// Releases the whole document at once. Handles and owned strings from
    /// earlier parses are invalidated.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.entries.clear();
        self.bytes.clear();
        self.arrays.clear();
        self.objects.clear();
        self.used = 0;
    }

    fn charge(&mut self, n: usize) -> Result<(), DecodeError> {
        let used = self.used.checked_add(n).ok_or(DecodeError::NoMemory)?;
        if used > self.limit {
            return Err(DecodeError::NoMemory);
        }
        self.used = used;
        Ok(())
    }

    // ---- container construction (decoder-facing) ----

    pub(crate) fn new_array(&mut self) -> Result<ArrayId, DecodeError> {
        self.charge(size_of::<Region>())?;
        let id = u32::try_from(self.arrays.len()).map_err(|_| DecodeError::NoMemory)?;
        self.arrays.push(Region {
            start: 0,
            len: 0,
            cap: 0,
        });
        Ok(ArrayId(id))
    }

    pub(crate) fn new_object(&mut self) -> Result<ObjectId, DecodeError> {
        self.charge(size_of::<Region>())?;
        let id = u32::try_from(self.objects.len()).map_err(|_| DecodeError::NoMemory)?;
        self.objects.push(Region {
            start: 0,
            len: 0,
            cap: 0,
        });
        Ok(ObjectId(id))
    }

    /// Appends `value` to the array, growing its backing region if full.
    pub(crate) fn array_push(&mut self, id: ArrayId, value: Value<'a>) -> Result<(), DecodeError> {
        let (start, len, cap) = {
            let r = self
                .arrays
                .get(id.0 as usize)
                .ok_or(DecodeError::InvalidInput)?;
            (r.start, r.len, r.cap)
        };
        let (start, cap) = if len == cap {
            let new_cap = grown_cap(cap)?;
            self.charge((new_cap as usize).saturating_mul(size_of::<Value>()))?;
            let new_start = u32::try_from(self.slots.len()).map_err(|_| DecodeError::NoMemory)?;
            // Move live cells over, then pad the region to capacity.
            for i in 0..len {
                let v = self
                    .slots
                    .get((start.wrapping_add(i)) as usize)
                    .copied()
                    .unwrap_or(Value::Null);
                self.slots.push(v);
            }
            for _ in len..new_cap {
                self.slots.push(Value::Null);
            }
            (new_start, new_cap)
        } else {
            (start, cap)
        };
        let cell = (start.wrapping_add(len)) as usize;
        *self
            .slots
            .get_mut(cell)
            .ok_or(DecodeError::InvalidInput)? = value;
        if let Some(r) = self.arrays.get_mut(id.0 as usize) {
            r.start = start;
            r.cap = cap;
            r.len = len.wrapping_add(1);
        }
        Ok(())
    }

    /// Sets `key` to `value` in the object. A key that already exists
    /// (byte-wise equal) has its value replaced; otherwise the pair is
    /// appended, preserving insertion order.
    pub(crate) fn object_set(
        &mut self,
        id: ObjectId,
        key: Str<'a>,
        value: Value<'a>,
    ) -> Result<(), DecodeError> {
        if let Some(cell) = self.object_find(id, key) {
            if let Some(e) = self.entries.get_mut(cell) {
                e.value = value;
            }
            return Ok(());
        }
        let (start, len, cap) = {
            let r = self
                .objects
                .get(id.0 as usize)
                .ok_or(DecodeError::InvalidInput)?;
            (r.start, r.len, r.cap)
        };
        let (start, cap) = if len == cap {
            let new_cap = grown_cap(cap)?;
            self.charge((new_cap as usize).saturating_mul(size_of::<Entry>()))?;
            let new_start = u32::try_from(self.entries.len()).map_err(|_| DecodeError::NoMemory)?;
            for i in 0..len {
                let e = self
                    .entries
                    .get((start.wrapping_add(i)) as usize)
                    .copied()
                    .unwrap_or(EMPTY_ENTRY);
                self.entries.push(e);
            }
            for _ in len..new_cap {
                self.entries.push(EMPTY_ENTRY);
            }
            (new_start, new_cap)
        } else {
            (start, cap)
        };
        let cell = (start.wrapping_add(len)) as usize;
        *self
            .entries
            .get_mut(cell)
            .ok_or(DecodeError::InvalidInput)? = Entry { key, value };
        if let Some(r) = self.objects.get_mut(id.0 as usize) {
            r.start = start;
            r.cap = cap;
            r.len = len.wrapping_add(1);
        }
        Ok(())
    }

    fn object_find(&self, id: ObjectId, key: Str<'a>) -> Option<usize> {
        let r = self.objects.get(id.0 as usize)?;
        let key_bytes = self.str_bytes(key);
        (r.start..r.start.wrapping_add(r.len))
            .map(|i| i as usize)
            .find(|&i| {
                self.entries
                    .get(i)
                    .is_some_and(|e| self.str_bytes(e.key) == key_bytes)
            })
    }

    // ---- string bytes (sink-facing) ----

    /// Marks the current end of the byte pool; the start of a string about
    /// to be accumulated.
    pub(crate) fn bytes_mark(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn push_byte(&mut self, b: u8) -> Result<(), DecodeError> {
        self.charge(1)?;
        self.bytes.push(b);
        Ok(())
    }

    pub(crate) fn push_slice(&mut self, s: &[u8]) -> Result<(), DecodeError> {
        self.charge(s.len())?;
        self.bytes.extend_from_slice(s);
        Ok(())
    }

    /// Seals the bytes accumulated since `mark` into a [`Span`].
    pub(crate) fn finish_bytes(&mut self, mark: usize) -> Result<Span, DecodeError> {
        let start = u32::try_from(mark).map_err(|_| DecodeError::NoMemory)?;
        let len = u32::try_from(self.bytes.len().saturating_sub(mark))
            .map_err(|_| DecodeError::NoMemory)?;
        Ok(Span { start, len })
    }

    // ---- document access ----

    /// Resolves a string to its bytes, borrowed from the source buffer or
    /// from the arena's own storage.
    pub fn str_bytes(&self, s: Str<'a>) -> &[u8] {
        match s {
            Str::Borrowed(b) => b,
            Str::Owned(span) => {
                let start = span.start as usize;
                let end = start.saturating_add(span.len as usize);
                self.bytes.get(start..end).unwrap_or(&[])
            }
        }
    }

    /// Number of elements in an array. A foreign handle reads as empty.
    pub fn array_len(&self, id: ArrayId) -> usize {
        self.arrays.get(id.0 as usize).map_or(0, |r| r.len as usize)
    }

    /// Element at `index`, copied out.
    pub fn array_get(&self, id: ArrayId, index: usize) -> Option<Value<'a>> {
        let r = self.arrays.get(id.0 as usize)?;
        if index >= r.len as usize {
            return None;
        }
        self.slots
            .get((r.start as usize).checked_add(index)?)
            .copied()
    }

    /// Iterates the array in insertion order.
    pub fn array_iter(&self, id: ArrayId) -> impl Iterator<Item = Value<'a>> + '_ {
        let (start, len) = self
            .arrays
            .get(id.0 as usize)
            .map_or((0, 0), |r| (r.start as usize, r.len as usize));
        self.slots.iter().skip(start).take(len).copied()
    }

    /// Number of entries in an object.
    pub fn object_len(&self, id: ObjectId) -> usize {
        self.objects
            .get(id.0 as usize)
            .map_or(0, |r| r.len as usize)
    }

    /// Looks up a key by its bytes.
    pub fn object_get(&self, id: ObjectId, key: &[u8]) -> Option<Value<'a>> {
        self.object_iter(id)
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Iterates `(key bytes, value)` pairs in insertion order.
    pub fn object_iter(&self, id: ObjectId) -> impl Iterator<Item = (&[u8], Value<'a>)> + '_ {
        let (start, len) = self
            .objects
            .get(id.0 as usize)
            .map_or((0, 0), |r| (r.start as usize, r.len as usize));
        self.entries
            .iter()
            .skip(start)
            .take(len)
            .map(|e| (self.str_bytes(e.key), e.value))
    }
}

const EMPTY_ENTRY: Entry<'static> = Entry {
    key: Str::Borrowed(&[]),
    value: Value::Null,
};

fn grown_cap(cap: u32) -> Result<u32, DecodeError> {
    if cap == 0 {
        Ok(FIRST_REGION_CAP)
    } else {
        cap.checked_mul(2).ok_or(DecodeError::NoMemory)
    }
}
