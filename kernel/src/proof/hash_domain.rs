//! Hash domains: which artifact a digest was computed over.
//!
//! A digest is only meaningful together with its domain. The same canonical
//! bytes hashed as a [`HashDomain::SearchReport`] and as a
//! [`HashDomain::BundleArtifact`] give different digests, so a report digest
//! can never be passed off as an artifact hash or vice versa.
//!
//! Prefix bytes are derived from each domain's label as
//! `GRIDWALK::<label>::V1\0`; the label table below is the only place a
//! prefix is spelled out.

macro_rules! hash_domains {
    ($( $(#[$doc:meta])* $variant:ident = $label:literal ),+ $(,)?) => {
        /// Digest domain passed to [`super::hash::canonical_hash`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HashDomain {
            $( $(#[$doc])* $variant, )+
        }

        impl HashDomain {
            /// Every domain, in table order.
            pub const ALL: &[HashDomain] = &[ $( Self::$variant, )+ ];

            /// Upper-case label embedded in the prefix.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )+
                }
            }

            /// Null-terminated prefix fed to SHA-256 ahead of the data.
            #[must_use]
            pub const fn as_bytes(&self) -> &'static [u8] {
                match self {
                    $( Self::$variant => concat!("GRIDWALK::", $label, "::V1\0").as_bytes(), )+
                }
            }
        }

        impl core::fmt::Display for HashDomain {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(match self {
                    $( Self::$variant => stringify!($variant), )+
                })
            }
        }
    };
}

hash_domains! {
    /// `search_report.json`: path, counters and termination of one search.
    /// Declared as `report_digest` in `waypoints.json`.
    SearchReport = "SEARCH_REPORT",
    /// The `compressed` list of `waypoints.json` (`waypoints_digest`).
    Waypoints = "WAYPOINTS",
    /// Policy echo inside `scenario.json` (`policy_digest`).
    SearchPolicy = "SEARCH_POLICY",
    /// `scenario.json`: grid rows, endpoints, policy (`scenario_digest`).
    Scenario = "SCENARIO",
    /// Per-artifact `content_hash` in a bundle manifest.
    BundleArtifact = "BUNDLE_ARTIFACT",
    /// Bundle digest over the normative digest basis.
    BundleDigest = "BUNDLE_DIGEST",
    /// Benchmark guard over a benchmarked search report.
    BenchGuard = "BENCH_GUARD",
}
