//! Machine declarations for Kerf CNC firmware
//!
//! Reads a board and machine declaration written in a small TOML subset,
//! assembles it with `kerf-core`, and moves resolved configurations in and
//! out of postcard blobs.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

// Must come first so the logging macros are visible to later modules
#[macro_use]
mod fmt;

pub mod blob;
pub mod loader;
pub mod toml;

pub use blob::{decode, encode, BlobError};
pub use loader::{load, load_declaration, LoadError};
pub use toml::{parse_declaration, Declaration, ParseError};
