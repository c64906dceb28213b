//! Interpreting answers to installer questions.

/// Answers accepted as "yes".
pub const YES_VALUES: [&str; 4] = ["yes", "oui", "y", "o"];

/// Whether `answer` is affirmative, ignoring case and surrounding whitespace.
///
/// ```
/// use installer_utils::prompt::is_yes;
///
/// assert!(is_yes(" Oui\n"));
/// assert!(!is_yes("no"));
/// ```
#[must_use]
pub fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    YES_VALUES.iter().any(|v| v.eq_ignore_ascii_case(answer))
}
