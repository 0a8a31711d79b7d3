//! `vose`: O(1) sampling from a fixed discrete distribution.
//!
//! A small crate built around one structure, [`AliasTable`], which uses Vose's
//! alias method. Build it once from a weight vector (O(n)), then draw category
//! indices in constant time with any `rand::Rng`.
//!
//! Exposed modules:
//! - `alias`: table construction, sampling, inspection, and construction errors.

#![forbid(unsafe_code)]

pub mod alias;

pub use alias::{AliasTable, BuildOptions, Column, InvalidDistribution, DEFAULT_TOLERANCE};
