//! Per-field behaviour of a resource file: how repeated keys merge when read
//! and how new values are laid out when rewritten.
use std::collections::BTreeMap;

/// Sentinel line that anchors the version list in installer resource files.
pub const VERSION_SENTINEL: &str = "#?vers : VVV?";

/// How a repeated occurrence of a key is merged when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// The last occurrence wins.
    #[default]
    Replace,
    /// Occurrences are joined with a single space, in file order.
    Append,
}

/// How a field's value is written back into the file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RewriteLayout {
    /// One `field : value` line replaces each live occurrence.
    #[default]
    Single,
    /// One `field : token` line per whitespace-separated token of the value,
    /// emitted where the first live occurrence was.
    PerToken,
    /// Like [`PerToken`](Self::PerToken), but the lines are emitted right
    /// after a disabled placeholder line that stays in the file.
    Anchored {
        /// The placeholder line, matched literally.
        sentinel: String,
    },
}

/// Merge policy and rewrite layout for one field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldRule {
    /// Merge policy used when reading.
    pub merge: MergePolicy,
    /// Layout used when rewriting.
    pub layout: RewriteLayout,
}

impl FieldRule {
    /// A repeatable field written one token per line.
    #[must_use]
    pub const fn repeatable() -> Self {
        Self {
            merge: MergePolicy::Append,
            layout: RewriteLayout::PerToken,
        }
    }

    /// A repeatable field written after `sentinel`.
    #[must_use]
    pub fn anchored(sentinel: impl Into<String>) -> Self {
        Self {
            merge: MergePolicy::Append,
            layout: RewriteLayout::Anchored {
                sentinel: sentinel.into(),
            },
        }
    }
}

/// Field name → [`FieldRule`] table. Fields without an entry use
/// [`FieldRule::default`] (replace on read, single line on write).
///
/// # Examples
///
/// ```
/// use installer_utils::config::{MergePolicy, RcSchema};
///
/// let schema = RcSchema::default();
/// assert_eq!(schema.rule("vers").merge, MergePolicy::Append);
/// assert_eq!(schema.rule("noeud").merge, MergePolicy::Append);
/// assert_eq!(schema.rule("mpi_nbcpu").merge, MergePolicy::Replace);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcSchema {
    rules: BTreeMap<String, FieldRule>,
}

impl Default for RcSchema {
    /// The installer's table: `vers` anchored on [`VERSION_SENTINEL`],
    /// `noeud` written one node per line.
    fn default() -> Self {
        Self::empty()
            .with_rule("vers", FieldRule::anchored(VERSION_SENTINEL))
            .with_rule("noeud", FieldRule::repeatable())
    }
}

impl RcSchema {
    /// A schema with no special fields.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Add (or replace) the rule for `field`.
    #[must_use]
    pub fn with_rule(mut self, field: impl Into<String>, rule: FieldRule) -> Self {
        self.rules.insert(field.into(), rule);
        self
    }

    /// Return the rule for `field`, or the default rule.
    #[must_use]
    pub fn rule(&self, field: &str) -> FieldRule {
        self.rules.get(field).cloned().unwrap_or_default()
    }

    /// Return the merge policy for `field`.
    #[must_use]
    pub fn merge_policy(&self, field: &str) -> MergePolicy {
        self.rules.get(field).map_or(MergePolicy::Replace, |r| r.merge)
    }

    /// Iterate over the explicitly configured fields.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schema_has_version_and_node_rules() {
        let schema = RcSchema::default();
        assert_eq!(
            schema.rule("vers").layout,
            RewriteLayout::Anchored {
                sentinel: VERSION_SENTINEL.to_string()
            }
        );
        assert_eq!(schema.rule("noeud").layout, RewriteLayout::PerToken);
        assert_eq!(schema.fields().count(), 2);
    }

    #[test]
    fn unknown_field_uses_default_rule() {
        let schema = RcSchema::default();
        assert_eq!(schema.rule("protocol_exec"), FieldRule::default());
        assert_eq!(schema.merge_policy("protocol_exec"), MergePolicy::Replace);
    }

    #[test]
    fn empty_schema_has_no_repeatable_fields() {
        let schema = RcSchema::empty();
        assert_eq!(schema.merge_policy("vers"), MergePolicy::Replace);
        assert_eq!(schema.fields().count(), 0);
    }

    #[test]
    fn with_rule_overrides_existing() {
        let schema = RcSchema::default().with_rule("vers", FieldRule::default());
        assert_eq!(schema.rule("vers"), FieldRule::default());
    }
}
