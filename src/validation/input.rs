//! Input validation for identifier fields.
//!
//! Field-level checks wired into form rules:
//! - Resident identity card numbers (GB 11643, ISO 7064 MOD 11-2 check digit)
//! - Unified social credit codes (GB 32100, weighted MOD 31 check character)

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Length of both identity card numbers and unified social credit codes
pub const IDENTIFIER_LENGTH: usize = 18;

const ID_CARD_WEIGHTS: [u32; 17] = [7, 9, 10, 5, 8, 4, 2, 1, 6, 3, 7, 9, 10, 5, 8, 4, 2];
const ID_CARD_CHECK_CODES: [char; 11] = ['1', '0', 'X', '9', '8', '7', '6', '5', '4', '3', '2'];

/// Characters allowed in a unified social credit code (no I, O, S, V, Z)
pub const CREDIT_CODE_CHARSET: &str = "0123456789ABCDEFGHJKLMNPQRTUWXY";
const CREDIT_CODE_WEIGHTS: [u32; 17] = [
    1, 3, 9, 27, 19, 26, 16, 17, 20, 29, 25, 13, 8, 24, 10, 30, 28,
];

/// Errors that can occur during input validation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ValidationError {
    /// Input is empty when a value is required
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("{field} must be {expected} characters long (got {actual})")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Input contains invalid characters
    #[error("{field} contains invalid characters: {reason}")]
    InvalidCharacters { field: &'static str, reason: String },

    #[error("{0} has an invalid birth date: {1}")]
    InvalidBirthDate(&'static str, String),

    #[error("{field} check character mismatch (expected {expected}, got {actual})")]
    ChecksumMismatch {
        field: &'static str,
        expected: char,
        actual: char,
    },
}

/// Validate an 18-character resident identity card number.
///
/// # Example
///
/// ```rust
/// use compliance_forms_sdk::validation::input::validate_id_card;
///
/// assert!(validate_id_card("11010519491231002X").is_ok());
/// assert!(validate_id_card("110105194912310021").is_err());
/// ```
pub fn validate_id_card(id: &str) -> Result<(), ValidationError> {
    const FIELD: &str = "ID card number";

    if id.is_empty() {
        return Err(ValidationError::Empty(FIELD));
    }
    let chars: Vec<char> = id.chars().collect();
    if chars.len() != IDENTIFIER_LENGTH {
        return Err(ValidationError::InvalidLength {
            field: FIELD,
            expected: IDENTIFIER_LENGTH,
            actual: chars.len(),
        });
    }
    if !chars[..17].iter().all(char::is_ascii_digit) {
        return Err(ValidationError::InvalidCharacters {
            field: FIELD,
            reason: "the first 17 characters must be digits".to_string(),
        });
    }
    let last = chars[17].to_ascii_uppercase();
    if !(last.is_ascii_digit() || last == 'X') {
        return Err(ValidationError::InvalidCharacters {
            field: FIELD,
            reason: "the last character must be a digit or X".to_string(),
        });
    }

    // All ASCII from here on, byte slicing is safe
    let birth = &id[6..14];
    let valid_birth = birth[0..4].parse::<i32>().ok().and_then(|year| {
        let month = birth[4..6].parse().ok()?;
        let day = birth[6..8].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    });
    if valid_birth.is_none() {
        return Err(ValidationError::InvalidBirthDate(FIELD, birth.to_string()));
    }

    let sum: u32 = chars[..17]
        .iter()
        .zip(ID_CARD_WEIGHTS)
        .filter_map(|(c, w)| c.to_digit(10).map(|d| d * w))
        .sum();
    let expected = ID_CARD_CHECK_CODES[(sum % 11) as usize];
    if last != expected {
        return Err(ValidationError::ChecksumMismatch {
            field: FIELD,
            expected,
            actual: last,
        });
    }

    Ok(())
}

/// Validate an 18-character unified social credit code (case-insensitive).
pub fn validate_unified_social_credit_code(code: &str) -> Result<(), ValidationError> {
    const FIELD: &str = "Unified social credit code";

    if code.is_empty() {
        return Err(ValidationError::Empty(FIELD));
    }
    let code = code.to_ascii_uppercase();
    let chars: Vec<char> = code.chars().collect();
    if chars.len() != IDENTIFIER_LENGTH {
        return Err(ValidationError::InvalidLength {
            field: FIELD,
            expected: IDENTIFIER_LENGTH,
            actual: chars.len(),
        });
    }

    let values: Vec<u32> = chars
        .iter()
        .map(|c| CREDIT_CODE_CHARSET.find(*c).map(|i| i as u32))
        .collect::<Option<_>>()
        .ok_or_else(|| ValidationError::InvalidCharacters {
            field: FIELD,
            reason: format!("only {} are allowed", CREDIT_CODE_CHARSET),
        })?;

    let sum: u32 = values[..17]
        .iter()
        .zip(CREDIT_CODE_WEIGHTS)
        .map(|(v, w)| v * w)
        .sum();
    let check = ((31 - sum % 31) % 31) as usize;
    let expected = CREDIT_CODE_CHARSET.as_bytes()[check] as char;
    if chars[17] != expected {
        return Err(ValidationError::ChecksumMismatch {
            field: FIELD,
            expected,
            actual: chars[17],
        });
    }

    Ok(())
}
