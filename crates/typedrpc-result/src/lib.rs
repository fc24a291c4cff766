//! Result combinators and the `{ok, val|err}` wire envelope.
//!
//! Outcomes are plain [`std::result::Result`] values. This crate adds the
//! few combinators the standard library lacks on stable (error-widening
//! bind, nested flattening, total fold) and the [`Envelope`] type that
//! carries a result over the wire.
//!
//! # Crate Structure
//!
//! - [`ext`]: `ResultExt` and `FlattenExt` combinators
//! - [`envelope`]: serde wire form of a result

pub mod envelope;
pub mod ext;

pub use envelope::Envelope;
pub use ext::{flatten, FlattenExt, ResultExt};
