//! Wrapline: wrap each line (or NUL-terminated record) of a stream with a
//! delimiter.
//!
//! The crate provides:
//! - Delimiter token resolution, including `0x` code points (`delimiter`)
//! - The streaming record processor (`wrap`)
//! - Byte-level record helpers (`record`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use wrapline::wrap::{self, WrapOptions};
//!
//! let opts = WrapOptions {
//!     skip_empty: true,
//!     ..WrapOptions::from_token("0x27").unwrap()
//! };
//! let out = wrap::wrap_bytes(b"hello\n\nworld\n", &opts).unwrap();
//! assert_eq!(out, b"'hello'\n'world'\n");
//! ```

pub mod delimiter;
pub mod error;
pub mod io;
pub mod record;
pub mod wrap;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::WrapError;
pub use record::Separator;
pub use wrap::{WrapOptions, WrapStats, wrap_stream};
