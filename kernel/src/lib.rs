//! Gridwalk Kernel: grid coordinates and the deterministic proof surface.
//!
//! # API Surface
//!
//! - [`grid::cell::Cell`] -- the coordinate identity key used by every search structure
//! - [`grid::cell::Direction`] -- reduced step direction between two cells
//! - [`proof::canon::canonical_json_bytes`] -- the single canonical JSON writer
//! - [`proof::hash::canonical_hash`] -- domain-separated SHA-256 content hashing
//!
//! # Module Dependency Direction
//!
//! `grid` and `proof` are independent. Neither imports the other; callers
//! (the search and harness crates) combine them.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod grid;
pub mod proof;
