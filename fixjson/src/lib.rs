//! A template-driven JSON parser for fixed-extent storage.
//!
//! `fixjson` parses a restricted dialect of JSON directly into
//! caller-provided storage, guided by a caller-declared template that
//! describes the expected shape of the document. No heap allocation is
//! performed during parsing, making it suitable for embedded devices,
//! telemetry daemons and other long-running, memory-constrained hosts
//! where heap growth is unacceptable.
//!
//! ## Main Types
//!
//! - [`JsonAttr`] / [`AttrSpec`] - One attribute of an object template:
//!   name, kind, destination and default, declared together
//! - [`JsonArray`] / [`ElementTarget`] - Template for a homogeneous array
//!   and the storage bank its elements land in
//! - [`read_object`] / [`read_array`] - The two parse entry points
//!
//! Destinations are interior-mutable borrows of caller storage
//! (`&Cell<T>`, `&[Cell<T>]`), so a template is immutable for the
//! duration of a parse and the borrow checker rules out two parses
//! writing the same destination.
//!
//! ## Quick Start
//!
//! ```rust
//! use core::cell::Cell;
//! use fixjson::{read_object, AttrSpec, Dest, JsonAttr};
//!
//! let count = Cell::new(0i32);
//! let flag = Cell::new(false);
//! let attrs = [
//!     JsonAttr::new(
//!         "count",
//!         AttrSpec::Integer { dest: Dest::scalar(&count), default: 0, map: None },
//!     ),
//!     JsonAttr::new(
//!         "flag",
//!         AttrSpec::Boolean { dest: Dest::scalar(&flag), default: false },
//!     ),
//! ];
//!
//! let rest = read_object(r#"{"count": 42, "flag": true}"#, &attrs)?;
//! assert_eq!(count.get(), 42);
//! assert!(flag.get());
//! assert!(rest.is_empty());
//! # Ok::<(), fixjson::ParseError>(())
//! ```
//!
//! ## Dialect
//!
//! Objects with quoted attribute names; string, number and boolean
//! scalars; homogeneous arrays whose element kind the template declares.
//! The `null` literal is not recognized. Attributes may arrive in any
//! order; omitted attributes keep their declared defaults. An attribute
//! name may carry several consecutive template entries of different
//! kinds, and the syntactic kind of the incoming value selects among
//! them.
//!
//! ## Tracing
//!
//! The parser emits `log` records (`debug!` for events, `trace!` per
//! state transition). Install any `log` backend to see them; with no
//! backend the calls compile to nothing.

// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), no_std)]

mod error;
pub use error::ParseError;

mod template;
pub use template::{AttrSpec, ElementTarget, JsonArray, JsonAttr, JsonEnum};

mod target;
pub use target::{bank, struct_bank, terminated, Dest, StrDest};

mod number;

#[cfg(feature = "time")]
mod time;

mod object;
pub use object::read_object;

mod array;
pub use array::read_array;
