//! Numeric helpers shared by the mapping and smoothing stages.

pub mod safe_cast;
