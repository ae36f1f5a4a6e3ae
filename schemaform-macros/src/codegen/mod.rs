//! Rust code generation module.
//!
//! This module generates the impl blocks for the ValidationSchema trait.

pub mod impl_block;

pub use impl_block::ImplBlockGenerator;
