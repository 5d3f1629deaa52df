//! # Input Sanitization & Validation
//!
//! Composable validation filters ([`Sanitize`]) for text typed at the
//! prompt. Filters run in order against the trimmed answer and short-circuit
//! on the first failure, returning a message that tells the user what to fix.
//!
//! This is the interactive numeric policy: a value that isn't an integer is
//! rejected and asked again, never coerced. Load-time parsing in
//! [`crate::storage`] follows the opposite rule and coerces to `0`.
//!
//! ## Examples
//!
//! ### Required integer
//! ```rust
//! use countrydesk::utils::{DesiredType, Sanitize};
//!
//! let filters = [Sanitize::NotEmpty, Sanitize::IsType(DesiredType::U64)];
//! assert_eq!(Sanitize::execute(" 42 ", &filters).unwrap(), "42");
//! assert!(Sanitize::execute("abc", &filters).is_err());
//! ```
//!
//! ### Menu choice
//! ```rust
//! use countrydesk::utils::Sanitize;
//!
//! assert!(Sanitize::execute("11", &[Sanitize::IsBetween(1, 11)]).is_ok());
//! assert!(Sanitize::execute("12", &[Sanitize::IsBetween(1, 11)]).is_err());
//! ```
//!
//! ### New unique name
//! ```rust
//! use countrydesk::utils::Sanitize;
//!
//! let taken = Sanitize::Unique(vec!["Japón".to_string()]);
//! assert!(Sanitize::execute("japón", &[taken]).is_err());
//! ```
use std::{error::Error, fmt::Display};

/// Represents a validation filter that can be applied to user input.
///
/// - `NotEmpty`: rejects blank input.
/// - `MatchStrings`: ensures that the input matches one of the given options.
/// - `IsType`: ensures that the input can be parsed into a certain [`DesiredType`].
/// - `IsBetween`: ensures that a numeric input is within an inclusive range `[min, max]`.
/// - `Unique`: rejects input equal, ignoring case, to any of the given values.
pub enum Sanitize {
    NotEmpty,
    MatchStrings(Vec<String>),
    IsType(DesiredType),
    IsBetween(isize, isize),
    Unique(Vec<String>),
}

/// Trait for input validation.
/// Any type that implements this can validate a string input and return
/// either `Ok(())` if the input is valid or a [`FilterErrorNot`] on failure.
trait Validate {
    fn validate(&self, input: &str) -> Result<(), FilterErrorNot>;
}

/// Represents an error that occurs when input validation fails.
///
/// Each variant describes why the input was rejected:
/// - [`Empty`]: nothing was typed.
/// - [`Number`]: could not parse as the expected numeric type.
/// - [`MatchStrings`]: did not match any of the given options.
/// - [`Between`]: did not match between the values given.
/// - [`Unique`]: collides with an existing value.
///
/// [`Empty`]: FilterErrorNot::Empty
/// [`Number`]: FilterErrorNot::Number
/// [`MatchStrings`]: FilterErrorNot::MatchStrings
/// [`Between`]: FilterErrorNot::Between
/// [`Unique`]: FilterErrorNot::Unique
#[derive(Debug, PartialEq, Eq)]
pub enum FilterErrorNot {
    Empty,
    Number(DesiredType),
    MatchStrings(Vec<String>),
    Between(isize, isize),
    Unique(String),
}

impl Display for FilterErrorNot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty values are not allowed, try again!"),
            Self::Number(t) => write!(f, "The value is not a {}, try again!", t),
            Self::MatchStrings(v) => write!(
                f,
                "The value doesn't match with the options: {}, try again!",
                v.join(", ")
            ),
            Self::Between(n1, n2) => {
                write!(f, "The value is not between {} and {}, try again!", n1, n2)
            }
            Self::Unique(s) => write!(f, "{} already exists, try again!", s),
        }
    }
}

impl Error for FilterErrorNot {}

/// Validates that an input string parses into the given Rust type.
/// Expands into a `Result<(), expr>`.
macro_rules! check_type {
    ($input:expr, $t:ty, $err:expr) => {
        match $input.parse::<$t>() {
            Ok(_) => Ok(()),
            Err(_) => $err,
        }
    };
}

impl Sanitize {
    /// Executes all provided filters against the given answer.
    ///
    /// - Trims whitespace before validation.
    /// - Stops and returns the first error encountered.
    /// - Returns the cleaned string if all filters pass.
    pub fn execute(answer: &str, filters: &[Sanitize]) -> Result<String, FilterErrorNot> {
        let clean_answer = answer.trim();

        for filter in filters {
            filter.validate(clean_answer)?;
        }
        Ok(clean_answer.to_string())
    }

    /// The options accepted by a yes/no question.
    pub fn yes_no() -> Sanitize {
        Sanitize::MatchStrings(vec![
            String::from("y"),
            String::from("n"),
            String::from("Y"),
            String::from("N"),
        ])
    }
}

impl Validate for Sanitize {
    fn validate(&self, input: &str) -> Result<(), FilterErrorNot> {
        match self {
            Sanitize::NotEmpty => {
                if input.is_empty() {
                    Err(FilterErrorNot::Empty)
                } else {
                    Ok(())
                }
            }
            Sanitize::IsType(ty) => ty.parse(input),
            Sanitize::MatchStrings(options) => {
                if options.iter().any(|o| o == input) {
                    Ok(())
                } else {
                    Err(FilterErrorNot::MatchStrings(options.clone()))
                }
            }
            Sanitize::IsBetween(n1, n2) => {
                DesiredType::Isize.parse(input)?;
                let input_parsed: isize = input.parse().unwrap_or_default();
                if input_parsed >= *n1 && input_parsed <= *n2 {
                    Ok(())
                } else {
                    Err(FilterErrorNot::Between(*n1, *n2))
                }
            }
            Sanitize::Unique(taken) => {
                let wanted = input.to_lowercase();
                if taken.iter().any(|t| t.trim().to_lowercase() == wanted) {
                    Err(FilterErrorNot::Unique(input.to_string()))
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Represents the desired type to which the input should be parsed.
///
/// Used together with [`Sanitize::IsType`] to validate primitive values.
///
/// Currently supports:
/// - `U64` for populations, areas and range bounds
/// - `Isize` for menu and list positions
#[derive(Debug, PartialEq, Eq)]
pub enum DesiredType {
    U64,
    Isize,
}

impl DesiredType {
    fn parse(&self, input: &str) -> Result<(), FilterErrorNot> {
        match self {
            DesiredType::U64 => {
                check_type!(input, u64, Err(FilterErrorNot::Number(DesiredType::U64)))
            }
            DesiredType::Isize => check_type!(
                input,
                isize,
                Err(FilterErrorNot::Number(DesiredType::Isize))
            ),
        }
    }
}

impl Display for DesiredType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::U64 => write!(f, "whole number"),
            Self::Isize => write!(f, "number"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_not_empty() {
        let filter = Sanitize::NotEmpty;
        assert!(filter.validate("x").is_ok());
        assert_eq!(filter.validate(""), Err(FilterErrorNot::Empty));
    }

    #[test]
    fn test_sanitize_execute_trims_before_not_empty() {
        let res = Sanitize::execute("   ", &[Sanitize::NotEmpty]);
        assert_eq!(res, Err(FilterErrorNot::Empty));
    }

    #[test]
    fn test_sanitize_match_strings_yes_no() {
        let filter = Sanitize::yes_no();
        assert!(filter.validate("y").is_ok());
        assert!(filter.validate("N").is_ok());
        let res = filter.validate("maybe");
        assert!(res.is_err());
        if let Err(e) = res {
            assert_eq!(
                format!("{}", e),
                "The value doesn't match with the options: y, n, Y, N, try again!"
            );
        }
    }

    #[test]
    fn test_sanitize_is_type_u64() {
        let filter = Sanitize::IsType(DesiredType::U64);
        assert!(filter.validate("213993437").is_ok());
        assert!(filter.validate("0").is_ok());
        assert!(filter.validate("-1").is_err());
        assert!(filter.validate("1.5").is_err());
        assert!(filter.validate("abc").is_err());
        if let Err(e) = filter.validate("abc") {
            assert_eq!(format!("{}", e), "The value is not a whole number, try again!");
        }
    }

    #[test]
    fn test_sanitize_is_between() {
        let filter = Sanitize::IsBetween(1, 11);
        assert!(filter.validate("1").is_ok());
        assert!(filter.validate("11").is_ok());
        assert_eq!(filter.validate("12"), Err(FilterErrorNot::Between(1, 11)));
        assert_eq!(filter.validate("0"), Err(FilterErrorNot::Between(1, 11)));
        assert_eq!(
            filter.validate("one"),
            Err(FilterErrorNot::Number(DesiredType::Isize))
        );
    }

    #[test]
    fn test_sanitize_unique_ignores_case() {
        let filter = Sanitize::Unique(vec!["Japón".to_string(), "Brasil".to_string()]);
        assert_eq!(
            filter.validate("japón"),
            Err(FilterErrorNot::Unique("japón".to_string()))
        );
        assert!(filter.validate("BRASIL").is_err());
        assert!(filter.validate("Chile").is_ok());
    }

    #[test]
    fn test_sanitize_execute_filters_success() {
        let filters = vec![Sanitize::NotEmpty, Sanitize::IsType(DesiredType::U64)];
        let res = Sanitize::execute("  125800000 ", &filters);
        assert_eq!(res.unwrap(), "125800000".to_string());
    }

    #[test]
    fn test_sanitize_execute_stops_at_first_failure() {
        let filters = vec![Sanitize::NotEmpty, Sanitize::IsType(DesiredType::U64)];
        let res = Sanitize::execute("", &filters);
        assert_eq!(res, Err(FilterErrorNot::Empty));
    }
}
