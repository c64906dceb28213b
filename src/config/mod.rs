//! Resource-file field schema and its TOML configuration.
//!
//! The schema says, per field, whether repeated keys are merged or replaced
//! when reading, and how values are laid out when rewriting. It is passed to
//! [`read_rcfile`](crate::rcfile::read_rcfile) and
//! [`replace_rcfile`](crate::rcfile::replace_rcfile) explicitly.
pub mod schema;
pub mod toml_loader;

pub use schema::{FieldRule, MergePolicy, RcSchema, RewriteLayout, VERSION_SENTINEL};
pub use toml_loader::{load_schema, parse_schema};
