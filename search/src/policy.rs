//! Search policy: movement rules and the expansion ceiling.

/// Default iteration ceiling for one search.
pub const DEFAULT_MAX_EXPANSIONS: u64 = 1000;

/// Movement rules and work bound for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Allow the four diagonal steps (cost √2). When `false` only the four
    /// orthogonal steps are generated and the heuristic is Manhattan.
    pub allow_diagonal_movement: bool,
    /// Allow a diagonal step whose flanking orthogonal cells are not both
    /// walkable. Ignored when diagonal movement is off.
    pub allow_corner_cutting: bool,
    /// Hard cap on node expansions.
    pub max_expansions: u64,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            allow_diagonal_movement: true,
            allow_corner_cutting: false,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
        }
    }
}

impl SearchPolicy {
    /// Orthogonal-only movement with the default ceiling.
    #[must_use]
    pub fn orthogonal() -> Self {
        Self {
            allow_diagonal_movement: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_diagonal_movement(mut self, allow: bool) -> Self {
        self.allow_diagonal_movement = allow;
        self
    }

    #[must_use]
    pub fn with_corner_cutting(mut self, allow: bool) -> Self {
        self.allow_corner_cutting = allow;
        self
    }

    #[must_use]
    pub fn with_max_expansions(mut self, max_expansions: u64) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Whether the corner-cutting check applies to diagonal steps.
    #[must_use]
    pub fn blocks_corner_cutting(&self) -> bool {
        self.allow_diagonal_movement && !self.allow_corner_cutting
    }

    /// Name of the heuristic this policy implies.
    #[must_use]
    pub fn heuristic_name(&self) -> &'static str {
        if self.allow_diagonal_movement {
            "euclidean"
        } else {
            "manhattan"
        }
    }

    /// JSON echo of the policy for reports.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "allow_corner_cutting": self.allow_corner_cutting,
            "allow_diagonal_movement": self.allow_diagonal_movement,
            "heuristic": self.heuristic_name(),
            "max_expansions": self.max_expansions,
        })
    }
}
