//! Wire formats for TerraME observer state messages.
//!
//! A simulation-side subject serializes its state into one of two formats:
//!
//! - a flat **token stream**: ASCII tokens joined by a single-character
//!   protocol separator, consumed in grammar order by a cursor
//!   ([`TokenCursor`]);
//! - a **protobuf message** tree (`proto` feature): a recursive
//!   [`proto::SubjectAttribute`] message.
//!
//! The two formats are a compile-time alternative: a deployment speaks one
//! or the other, never both. This crate only knows how to scan and type the
//! bytes; applying a message to the state cache lives in `terraobs`.

pub mod cursor;
pub mod error;
pub mod kinds;

#[cfg(feature = "proto")]
pub mod proto;

pub use cursor::TokenCursor;
pub use error::WireError;
pub use kinds::{DataKind, SubjectKind};

/// Separator used between tokens when a producer does not override it.
pub const DEFAULT_SEPARATOR: char = ';';
