//! # Tawsil Support
//!
//! Shared utilities for the Tawsil DI framework.
//!
//! This crate provides:
//! - Type-name helpers used to derive resolver kinds
//! - "Did you mean?" suggestions for error messages

pub mod rendering;
