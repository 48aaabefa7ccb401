//! Foundation module - Core utilities and types
//!
//! - Math types and operations

pub mod math;
