//! `#[derive(Seekable)]`: field path constants and the path accessor.

mod attrs;
mod derive;

pub use derive::seekable_derive_impl;
