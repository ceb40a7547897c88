//! Core types for Marché.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod catalog;
pub mod id;
pub mod price;

pub use catalog::{NamedRef, PLACEHOLDER_IMAGE, Product, ProductImage, Variant, VariantAttribute};
pub use id::*;
pub use price::{Priced, discount_percentage, format_fcfa};
