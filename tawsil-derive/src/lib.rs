//! Attribute macros for Tawsil, re-exported from `tawsil-macros`.

pub use tawsil_macros::injectable;
