//! Parser module for turning derive input into IR.
//!
//! This module contains:
//! - Attribute definitions (darling)
//! - The struct parser
//! - Type inspection helpers

pub mod attributes;
pub mod struct_parser;
pub mod type_parser;
