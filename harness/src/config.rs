//! Scenario configuration loaded from JSON.
//!
//! ```json
//! {
//!   "id": "corridor",
//!   "rows": ["S...#", "###.#", "....D"],
//!   "policy": { "allow_diagonal_movement": false, "max_expansions": 5000 }
//! }
//! ```
//!
//! `policy` and each of its fields are optional; absent fields take the
//! [`SearchPolicy`] defaults. Unknown top-level or policy keys are rejected.

use std::path::Path;

use gridwalk_search::policy::SearchPolicy;

use crate::scenarios::Scenario;
use crate::worlds::tile_grid::GridParseError;

const TOP_LEVEL_KEYS: &[&str] = &["id", "policy", "rows"];
const POLICY_KEYS: &[&str] = &[
    "allow_corner_cutting",
    "allow_diagonal_movement",
    "max_expansions",
];

/// Error loading a scenario configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// File could not be read.
    Io { detail: String },
    /// Not valid JSON.
    Parse { detail: String },
    /// A required field is absent.
    MissingField { field: String },
    /// A field has the wrong JSON type.
    InvalidField { field: String, expected: &'static str },
    /// A key that is not part of the format.
    UnknownField { field: String },
    /// The rows do not form a valid grid.
    Grid(GridParseError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
            Self::Parse { detail } => write!(f, "config parse error: {detail}"),
            Self::MissingField { field } => write!(f, "missing field: {field}"),
            Self::InvalidField { field, expected } => {
                write!(f, "field {field} must be {expected}")
            }
            Self::UnknownField { field } => write!(f, "unknown field: {field}"),
            Self::Grid(e) => write!(f, "invalid grid: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridParseError> for ConfigError {
    fn from(e: GridParseError) -> Self {
        Self::Grid(e)
    }
}

/// Parsed, not yet validated, scenario configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioConfig {
    pub id: String,
    pub rows: Vec<String>,
    /// `None` uses the [`SearchPolicy`] default.
    pub allow_diagonal_movement: Option<bool>,
    /// `None` uses the [`SearchPolicy`] default.
    pub allow_corner_cutting: Option<bool>,
    /// `None` uses the [`SearchPolicy`] default.
    pub max_expansions: Option<u64>,
}

impl ScenarioConfig {
    /// Parse from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed JSON or a field of the wrong shape.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| ConfigError::Parse {
                detail: format!("{e}"),
            })?;
        Self::from_json_value(&value)
    }

    /// Read and parse a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_json_slice`](Self::from_json_slice).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path).map_err(|e| ConfigError::Io {
            detail: format!("{}: {e}", path.display()),
        })?;
        Self::from_json_slice(&bytes)
    }

    /// Extract fields from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// See [`from_json_slice`](Self::from_json_slice).
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, ConfigError> {
        let object = value.as_object().ok_or(ConfigError::InvalidField {
            field: "<root>".into(),
            expected: "an object",
        })?;
        reject_unknown(object, TOP_LEVEL_KEYS, "")?;

        let id = object
            .get("id")
            .ok_or_else(|| missing("id"))?
            .as_str()
            .ok_or_else(|| invalid("id", "a string"))?
            .to_string();

        let rows = object
            .get("rows")
            .ok_or_else(|| missing("rows"))?
            .as_array()
            .ok_or_else(|| invalid("rows", "an array of strings"))?
            .iter()
            .map(|row| {
                row.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid("rows", "an array of strings"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut config = Self {
            id,
            rows,
            ..Self::default()
        };

        if let Some(policy) = object.get("policy") {
            let policy = policy
                .as_object()
                .ok_or_else(|| invalid("policy", "an object"))?;
            reject_unknown(policy, POLICY_KEYS, "policy.")?;
            config.allow_diagonal_movement = optional_bool(policy, "allow_diagonal_movement")?;
            config.allow_corner_cutting = optional_bool(policy, "allow_corner_cutting")?;
            config.max_expansions = match policy.get("max_expansions") {
                None => None,
                Some(v) => Some(
                    v.as_u64()
                        .ok_or_else(|| invalid("policy.max_expansions", "a non-negative integer"))?,
                ),
            };
        }

        Ok(config)
    }

    /// The search policy this configuration describes.
    #[must_use]
    pub fn policy(&self) -> SearchPolicy {
        let defaults = SearchPolicy::default();
        SearchPolicy {
            allow_diagonal_movement: self
                .allow_diagonal_movement
                .unwrap_or(defaults.allow_diagonal_movement),
            allow_corner_cutting: self
                .allow_corner_cutting
                .unwrap_or(defaults.allow_corner_cutting),
            max_expansions: self.max_expansions.unwrap_or(defaults.max_expansions),
        }
    }

    /// Parse the grid and build the scenario.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Grid`] if the rows are malformed or lack a marker.
    pub fn into_scenario(self) -> Result<Scenario, ConfigError> {
        let policy = self.policy();
        Ok(Scenario::from_rows(self.id, &self.rows, policy)?)
    }
}

fn missing(field: &str) -> ConfigError {
    ConfigError::MissingField {
        field: field.to_string(),
    }
}

fn invalid(field: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidField {
        field: field.to_string(),
        expected,
    }
}

fn optional_bool(
    object: &serde_json::Map<String, serde_json::Value>,
    key: &'static str,
) -> Result<Option<bool>, ConfigError> {
    match object.get(key) {
        None => Ok(None),
        Some(v) => v
            .as_bool()
            .map(Some)
            .ok_or_else(|| invalid(&format!("policy.{key}"), "a boolean")),
    }
}

fn reject_unknown(
    object: &serde_json::Map<String, serde_json::Value>,
    allowed: &[&str],
    prefix: &str,
) -> Result<(), ConfigError> {
    match object.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => Err(ConfigError::UnknownField {
            field: format!("{prefix}{key}"),
        }),
        None => Ok(()),
    }
}
