//! Postcode value type.

use std::fmt;

/// Error returned when parsing an invalid postcode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid postcode: {reason}")]
pub struct InvalidPostcode {
    reason: &'static str,
}

/// A normalized postcode, as submitted to the geocoding provider.
///
/// Stored uppercased with surrounding whitespace stripped and internal
/// runs of whitespace collapsed to single spaces. Any `Postcode` value
/// is non-empty by construction. Full format validation is the
/// provider's job; this type only guarantees there is something to
/// look up.
///
/// # Examples
///
/// ```
/// use removals_server::domain::Postcode;
///
/// let pc = Postcode::parse("  sw1a  1aa ").unwrap();
/// assert_eq!(pc.as_str(), "SW1A 1AA");
///
/// // Blank input is rejected
/// assert!(Postcode::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Postcode(String);

impl Postcode {
    /// Parse and normalize a postcode from user input.
    pub fn parse(s: &str) -> Result<Self, InvalidPostcode> {
        let normalized = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();

        if normalized.is_empty() {
            return Err(InvalidPostcode {
                reason: "must not be empty",
            });
        }

        Ok(Postcode(normalized))
    }

    /// Returns the normalized postcode as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Postcode({})", self.0)
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
