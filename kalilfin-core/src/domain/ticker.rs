//! Ticker symbol normalization.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TickerError {
    #[error("ticker is empty")]
    Empty,

    #[error("ticker '{0}' contains characters other than A-Z, 0-9, '.' and '-'")]
    InvalidCharacters(String),

    #[error("ticker '{0}' must start with a letter or digit")]
    BadLeadingCharacter(String),
}

/// Trim and upper-case a user-supplied symbol, then validate it.
///
/// Accepts ASCII letters and digits plus `.`/`-` share-class separators
/// (`BRK.B`, `RDS-A`).
pub fn normalize_ticker(raw: &str) -> Result<String, TickerError> {
    let ticker = raw.trim().to_ascii_uppercase();
    if ticker.is_empty() {
        return Err(TickerError::Empty);
    }
    if !ticker
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(TickerError::InvalidCharacters(ticker));
    }
    if !ticker.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return Err(TickerError::BadLeadingCharacter(ticker));
    }
    Ok(ticker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_uppercases() {
        assert_eq!(normalize_ticker("  aapl ").unwrap(), "AAPL");
        assert_eq!(normalize_ticker("brk.b").unwrap(), "BRK.B");
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(normalize_ticker("   "), Err(TickerError::Empty));
    }

    #[test]
    fn rejects_url_metacharacters() {
        assert!(matches!(
            normalize_ticker("AAPL?apikey=x"),
            Err(TickerError::InvalidCharacters(_))
        ));
        assert!(matches!(
            normalize_ticker("../quote"),
            Err(TickerError::InvalidCharacters(_))
        ));
    }

    #[test]
    fn rejects_leading_separator() {
        assert!(matches!(
            normalize_ticker("-X"),
            Err(TickerError::BadLeadingCharacter(_))
        ));
    }
}
