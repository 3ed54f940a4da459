//! Project manifest (`package.json`) loading.

use crate::error::{CheckError, Result};
use crate::requirements::Tool;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Default manifest file name, relative to the project root.
pub const MANIFEST_FILE: &str = "package.json";

/// The parts of `package.json` this tool reads.
///
/// Only `engines` is interpreted; every other top-level key is kept as-is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Raw `engines` value, if present.
    #[serde(default)]
    engines: Option<Value>,

    /// All other top-level keys.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Manifest {
    /// Load and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns `ManifestUnreadable` if the file can't be read.
    /// Returns `ManifestParse` if the content isn't a JSON object.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!("Loading manifest from {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| {
            tracing::debug!("Failed to read {}: {}", path.display(), source);
            CheckError::ManifestUnreadable {
                path: path.to_path_buf(),
                source,
            }
        })?;

        content.parse::<Manifest>().map_err(|e| match e {
            CheckError::ManifestParse { message, .. } => {
                tracing::debug!("Failed to parse {}: {}", path.display(), message);
                CheckError::ManifestParse {
                    path: path.to_path_buf(),
                    message,
                }
            }
            other => other,
        })
    }

    /// Whether an `engines` value is present and truthy.
    ///
    /// Any non-empty value counts, even one that is not an object; such a
    /// section simply declares no tool constraints.
    pub fn has_engines(&self) -> bool {
        self.engines.as_ref().is_some_and(is_truthy)
    }

    /// Fail with `MissingEngines` unless `engines` is present.
    pub fn require_engines(&self) -> Result<()> {
        if self.has_engines() {
            Ok(())
        } else {
            Err(CheckError::MissingEngines)
        }
    }

    /// The declared constraint for a tool.
    ///
    /// Falsy values (`""`, `0`, `false`, `null`) count as undeclared.
    pub fn engine_constraint(&self, tool: Tool) -> Option<EngineConstraint<'_>> {
        let value = self
            .engines
            .as_ref()
            .and_then(Value::as_object)?
            .get(tool.engine_key())
            .filter(|v| is_truthy(v))?;

        Some(match value {
            Value::String(range) => EngineConstraint::Range(range.as_str()),
            other => EngineConstraint::NotARange(other.to_string()),
        })
    }
}

/// A tool constraint as declared under `engines`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineConstraint<'a> {
    /// A range string such as `>=18.0.0`.
    Range(&'a str),
    /// A non-string value such as `18` or `true`, rendered as JSON.
    /// It is declared but no version can satisfy it.
    NotARange(String),
}

impl EngineConstraint<'_> {
    /// The constraint as written.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Range(range) => range,
            Self::NotARange(rendered) => rendered,
        }
    }
}

impl fmt::Display for EngineConstraint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl FromStr for Manifest {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| CheckError::ManifestParse {
            path: MANIFEST_FILE.into(),
            message: e.to_string(),
        })
    }
}
