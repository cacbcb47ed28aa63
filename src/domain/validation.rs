use crate::domain::error::DomainError;

/// Checks a fully assembled record before it reaches storage.
pub trait Validate {
    fn validate(&self) -> Result<(), DomainError>;
}

pub fn require_text(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

pub fn require_non_negative(field: &str, value: f64) -> Result<(), DomainError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::Validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(())
}

/// ISO 4217 style code: exactly three ASCII letters.
pub fn require_currency(field: &str, value: &str) -> Result<(), DomainError> {
    if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DomainError::Validation(format!(
            "{} must be a three-letter currency code",
            field
        )));
    }
    Ok(())
}

pub fn require_ordered<T: PartialOrd>(start: &T, end: &T) -> Result<(), DomainError> {
    if end < start {
        return Err(DomainError::Validation(
            "end must not be before start".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_rejects_blank() {
        assert!(require_text("name", "").is_err());
        assert!(require_text("name", "   ").is_err());
        assert!(require_text("name", "Louvre").is_ok());
    }

    #[test]
    fn test_require_non_negative() {
        assert!(require_non_negative("amount", 0.0).is_ok());
        assert!(require_non_negative("amount", 12.5).is_ok());
        assert!(require_non_negative("amount", -1.0).is_err());
        assert!(require_non_negative("amount", f64::NAN).is_err());
        assert!(require_non_negative("amount", f64::INFINITY).is_err());
    }

    #[test]
    fn test_require_currency() {
        assert!(require_currency("myCurrency", "EUR").is_ok());
        assert!(require_currency("myCurrency", "usd").is_ok());
        assert!(require_currency("myCurrency", "EURO").is_err());
        assert!(require_currency("myCurrency", "E1R").is_err());
        assert!(require_currency("myCurrency", "").is_err());
    }

    #[test]
    fn test_require_ordered_message() {
        let err = require_ordered(&5, &1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: end must not be before start"
        );
        assert!(require_ordered(&1, &1).is_ok());
    }
}
