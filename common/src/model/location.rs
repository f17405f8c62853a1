//! # Server Location Model
//!
//! A location is a 2-letter country code plus its flag emoji, derived by
//! mapping each letter onto a Unicode regional-indicator symbol.

use std::fmt;

use thiserror::Error;

/// First regional indicator symbol, `REGIONAL INDICATOR SYMBOL LETTER A`.
const REGIONAL_INDICATOR_A: u32 = 0x1F1E6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid location code: {0:?} (expected two ASCII letters)")]
pub struct InvalidLocationCode(pub String);

/// Where a server is hosted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Uppercased 2-letter country code, e.g. `NL`.
    pub code: String,
    /// Flag emoji derived from `code`.
    pub flag: String,
}

impl Location {
    /// Builds a location from a 2-letter country code.
    ///
    /// Accepts any case; anything that is not exactly two ASCII letters
    /// is rejected.
    pub fn new(code: &str) -> Result<Self, InvalidLocationCode> {
        let flag = resolve_flag(code)?;
        Ok(Self {
            code: code.to_ascii_uppercase(),
            flag,
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.flag)
    }
}

/// Derives a flag emoji from a 2-letter country code.
///
/// Each letter maps to its regional-indicator symbol; the two symbols
/// concatenated render as the country flag. Pure and deterministic.
pub fn resolve_flag(code: &str) -> Result<String, InvalidLocationCode> {
    let letters: Vec<char> = code.chars().collect();
    if letters.len() != 2 || !letters.iter().all(|c| c.is_ascii_alphabetic()) {
        return Err(InvalidLocationCode(code.to_string()));
    }

    let flag = letters
        .iter()
        .map(|c| {
            let offset = c.to_ascii_uppercase() as u32 - 'A' as u32;
            // Offset is 0..26, so the addition always lands on a valid
            // regional indicator scalar.
            char::from_u32(REGIONAL_INDICATOR_A + offset).unwrap()
        })
        .collect();

    Ok(flag)
}
