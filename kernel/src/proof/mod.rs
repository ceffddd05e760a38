//! Proof module: canonical JSON bytes and domain-separated content hashing.
//!
//! Everything that needs a stable digest (search reports, waypoint lists,
//! scenario fixtures, bundles) routes through this module.

pub mod canon;
pub mod hash;
pub mod hash_domain;
