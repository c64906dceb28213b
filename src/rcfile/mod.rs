//! Line-oriented `key : value` resource files.
//!
//! ```text
//! # comment
//! mem_max : 2048
//! #editor : vi          <- soft-disabled field
//! #?vers : VVV?         <- sentinel for the version list
//! vers : stable
//! vers : testing
//! ```
//!
//! Which fields repeat, and how they are written back, is decided by the
//! [`RcSchema`](crate::config::RcSchema) passed to each call.
mod read;
mod replace;
mod value;

pub use read::{parse_rcfile_into, parse_rcfile_str, read_rcfile, read_rcfile_into};
pub use replace::{FieldOutcome, FieldReport, replace_in_str, replace_rcfile};
pub use value::{RcRecord, RcValue};
