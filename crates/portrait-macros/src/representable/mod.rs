//! Implementation of the `#[derive(Representable)]` macro.
//!
//! Generates the field accessor used by Portrait templates, plus field name
//! constants, from a struct's named fields.

mod attrs;
mod derive;

pub use derive::representable_derive_impl;
