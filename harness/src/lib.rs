//! Gridwalk Harness: scenario-level orchestration for the search engine.
//!
//! The harness runs a [`Scenario`](scenarios::Scenario) through
//! `PathSearchEngine` and the compressor and packages the result as a
//! self-contained route bundle.
//!
//! The harness does NOT implement search logic; it delegates to
//! `gridwalk_search`. Grids provide walkability only; the harness owns
//! orchestration and artifact integrity.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bundle;
pub mod bundle_dir;
pub mod config;
pub mod runner;
pub mod scenarios;
pub mod worlds;
