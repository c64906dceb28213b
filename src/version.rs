//! Dotted version strings: ordering keys and threshold dispatch.
//!
//! `"1.7.9alpha"` becomes `1.7.9.alpha`, `"1.8"` becomes `1.8.0.final`.
//! Numeric parts sort before text parts, so `1.8.0.alpha < 1.8.0.final` and
//! a release sorts after its pre-releases.
use std::cmp::Ordering;
use std::fmt;

/// Qualifier appended to versions whose last part is numeric.
pub const FINAL_QUALIFIER: &str = "final";

/// Minimum number of leading parts before the qualifier is appended.
const MIN_PARTS: usize = 3;

/// One component of a [`VersionKey`].
///
/// The derived ordering puts every `Num` before every `Text`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionPart {
    /// A numeric run.
    Num(u64),
    /// A qualifier or a component that does not start with a digit.
    Text(String),
}

impl fmt::Display for VersionPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Totally ordered key derived from a dotted version string.
///
/// Always holds at least four parts, the last of which is text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionKey {
    parts: Vec<VersionPart>,
}

impl VersionKey {
    /// Parse a dotted version string.
    ///
    /// Each component contributes its leading digits as a number and, if
    /// anything follows, that suffix (without `-` or `_`, trimmed) as text.
    /// Components not starting with a digit are kept whole as text. Digit
    /// runs beyond `u64::MAX` are clamped to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use installer_utils::version::VersionKey;
    ///
    /// assert_eq!(VersionKey::parse("1.7.9alpha").to_string(), "1.7.9.alpha");
    /// assert_eq!(VersionKey::parse("1.8").to_string(), "1.8.0.final");
    /// assert_eq!(VersionKey::parse("1.8"), VersionKey::parse("1.8.0"));
    /// ```
    #[must_use]
    pub fn parse(version: &str) -> Self {
        let mut parts = Vec::new();
        for component in version.split('.') {
            let digits = component.bytes().take_while(u8::is_ascii_digit).count();
            let (number, suffix) = component.split_at(digits);
            if number.is_empty() {
                parts.push(VersionPart::Text(component.to_string()));
                continue;
            }
            parts.push(VersionPart::Num(number.parse().unwrap_or(u64::MAX)));
            if !suffix.is_empty() {
                let cleaned: String = suffix.chars().filter(|c| !matches!(c, '-' | '_')).collect();
                parts.push(VersionPart::Text(cleaned.trim().to_string()));
            }
        }
        while parts.len() < MIN_PARTS {
            parts.push(VersionPart::Num(0));
        }
        if matches!(parts.last(), Some(VersionPart::Num(_))) {
            parts.push(VersionPart::Text(FINAL_QUALIFIER.to_string()));
        }
        while parts.len() <= MIN_PARTS {
            parts.insert(parts.len() - 1, VersionPart::Num(0));
        }
        Self { parts }
    }

    /// The parts of the key, qualifier last.
    #[must_use]
    pub fn parts(&self) -> &[VersionPart] {
        &self.parts
    }

    /// Number of parts (at least four).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.parts.len()
    }

    /// Always `false`; present for API symmetry with [`len`](Self::len).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The trailing qualifier (`"final"` for plain numeric versions).
    #[must_use]
    pub fn qualifier(&self) -> &str {
        match self.parts.last() {
            Some(VersionPart::Text(s)) => s,
            _ => FINAL_QUALIFIER,
        }
    }
}

impl PartialOrd for VersionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parts.cmp(&other.parts)
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for part in &self.parts {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
            first = false;
        }
        Ok(())
    }
}

/// Whether version `a` sorts strictly before version `b`.
///
/// # Examples
///
/// ```
/// use installer_utils::version::less_than_version;
///
/// assert!(less_than_version("1.7.4", "1.7.5"));
/// assert!(!less_than_version("1.8", "1.8.0"));
/// assert!(less_than_version("1.9", "1.10"));
/// ```
#[must_use]
pub fn less_than_version(a: &str, b: &str) -> bool {
    VersionKey::parse(a) < VersionKey::parse(b)
}

/// Select the handler for `version` from an ascending `(threshold, handler)`
/// table.
///
/// The first handler is the fallback; each later handler replaces it while
/// `version` is not below its threshold. Scanning stops at the first
/// threshold above `version`. The table is not checked for order. Returns
/// `None` only for an empty table.
///
/// # Examples
///
/// ```
/// use installer_utils::version::get_function;
///
/// let table = [("0.0.0", "legacy"), ("1.7.5", "v17"), ("1.8.0", "v18")];
/// assert_eq!(get_function(&table, "1.7.4"), Some(&"legacy"));
/// assert_eq!(get_function(&table, "1.7.5"), Some(&"v17"));
/// assert_eq!(get_function(&table, "1.10"), Some(&"v18"));
/// ```
#[must_use]
pub fn get_function<'a, S, T>(table: &'a [(S, T)], version: &str) -> Option<&'a T>
where
    S: AsRef<str>,
{
    let ((_, first), rest) = table.split_first()?;
    let key = VersionKey::parse(version);
    let mut selected = first;
    for (threshold, handler) in rest {
        if key < VersionKey::parse(threshold.as_ref()) {
            break;
        }
        selected = handler;
    }
    Some(selected)
}
