//! TOML loading of the resource-file field schema.
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::schema::{FieldRule, MergePolicy, RcSchema, RewriteLayout};
use crate::error::ConfigError;

/// Merge policy as spelled in TOML.
#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
enum RawMerge {
    #[default]
    Replace,
    Append,
}

/// Layout kind as spelled in TOML.
#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
enum RawLayout {
    #[default]
    Single,
    PerToken,
    Anchored,
}

/// One `[fields.<name>]` table.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    #[serde(default)]
    merge: RawMerge,
    #[serde(default)]
    layout: RawLayout,
    sentinel: Option<String>,
}

/// Root of the schema file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawSchema {
    #[serde(default)]
    fields: BTreeMap<String, RawRule>,
}

impl RawRule {
    fn validate(self, field: &str) -> Result<FieldRule, ConfigError> {
        let merge = match self.merge {
            RawMerge::Replace => MergePolicy::Replace,
            RawMerge::Append => MergePolicy::Append,
        };
        let layout = match (self.layout, self.sentinel) {
            (RawLayout::Anchored, Some(sentinel)) if !sentinel.trim().is_empty() => {
                RewriteLayout::Anchored { sentinel }
            }
            (RawLayout::Anchored, _) => {
                return Err(invalid(field, "anchored layout requires a non-empty sentinel"));
            }
            (_, Some(_)) => {
                return Err(invalid(field, "sentinel is only valid with the anchored layout"));
            }
            (RawLayout::Single, None) => RewriteLayout::Single,
            (RawLayout::PerToken, None) => RewriteLayout::PerToken,
        };
        Ok(FieldRule { merge, layout })
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidRule {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse a schema from TOML content.
///
/// `label` names the content in error messages (usually the file path).
///
/// # Examples
///
/// ```
/// use installer_utils::config::{parse_schema, MergePolicy, RewriteLayout};
///
/// let schema = parse_schema(
///     "[fields.host]\nmerge = \"append\"\nlayout = \"per_token\"\n",
///     "inline",
/// ).unwrap();
/// assert_eq!(schema.rule("host").merge, MergePolicy::Append);
/// assert_eq!(schema.rule("host").layout, RewriteLayout::PerToken);
/// ```
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
/// [`ConfigError::InvalidRule`] for inconsistent rules.
pub fn parse_schema(content: &str, label: &str) -> Result<RcSchema, ConfigError> {
    let raw: RawSchema = toml::from_str(content).map_err(|source| ConfigError::Parse {
        file: label.to_string(),
        source,
    })?;
    raw.fields
        .into_iter()
        .try_fold(RcSchema::empty(), |schema, (field, rule)| {
            let rule = rule.validate(&field)?;
            Ok(schema.with_rule(field, rule))
        })
}

/// Load a schema file.
///
/// A missing file yields [`RcSchema::default`], the installer's built-in
/// table.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, parsed, or
/// validated.
pub fn load_schema(path: &Path) -> Result<RcSchema, ConfigError> {
    if !path.exists() {
        return Ok(RcSchema::default());
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_schema(&content, &path.display().to_string())
}
