// SPDX-License-Identifier: Apache-2.0

//! Arena-backed document decoding for memory-constrained targets.
//!
//! Two input encodings share one data model: a relaxed textual grammar
//! (JSON plus comments, single quotes, and unquoted scalars) and a
//! MessagePack-compatible binary encoding. A single pass over the input
//! produces a tree of [`Value`] nodes whose containers and owned string
//! bytes live in one caller-provided [`Arena`], so the worst-case memory
//! footprint is a constructor argument rather than a surprise.
//!
//! Strings borrow from the input whenever it is a stable slice and the
//! content needed no unescaping; everything else is copied into the arena
//! exactly once. Scalars decoded from bare text stay raw until a typed
//! accessor asks for them.
//!
//! ```
//! use arenadoc::{json, Arena};
//!
//! let mut arena = Arena::new();
//! let root = json::from_slice(&mut arena, b"{ pin : 13 , on : true } ").unwrap();
//! let obj = root.as_object().unwrap();
//! assert_eq!(arena.object_get(obj, b"pin").unwrap().as_i64(&arena), Some(13));
//! assert_eq!(arena.object_get(obj, b"on").unwrap().as_bool(&arena), Some(true));
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

mod arena;
mod error;
mod escape;
pub mod json;
pub mod msgpack;
mod reader;
mod scan;
mod sink;
mod token;
mod value;

pub use arena::{Arena, ArrayId, ObjectId, Span};
pub use error::DecodeError;
pub use json::DEFAULT_NESTING_LIMIT;
#[cfg(feature = "std")]
pub use reader::IoReader;
pub use reader::{CStrReader, IterReader, Reader, SliceReader};
pub use token::{classify, Scalar};
pub use value::{Str, Value};
