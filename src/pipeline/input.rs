//! Validation of free-text numeric fields.

/// Outcome of a field that parsed cleanly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericInput {
    /// The field was left blank; the section it feeds is skipped.
    NotProvided,
    Value(f64),
}

impl NumericInput {
    pub fn value(self) -> Option<f64> {
        match self {
            NumericInput::NotProvided => None,
            NumericInput::Value(v) => Some(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("not a number: '{0}'")]
    NotANumber(String),
    #[error("must be non-negative: '{0}'")]
    Negative(String),
}

/// A rejected field with a message suitable for showing to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
    #[source]
    pub kind: InputError,
}

/// Parse `raw` as a non-negative finite number. Zero is accepted.
pub fn validate_numeric(raw: &str) -> Result<NumericInput, InputError> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(NumericInput::NotProvided);
    }
    let value: f64 = text
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| InputError::NotANumber(text.to_string()))?;
    if value < 0.0 {
        return Err(InputError::Negative(text.to_string()));
    }
    // "-0" passes the sign check; store it as +0.
    Ok(NumericInput::Value(value + 0.0))
}

/// [`validate_numeric`] with the failure phrased for a named field.
pub fn validate_field(raw: &str, field: &str) -> Result<NumericInput, FieldError> {
    validate_numeric(raw).map_err(|kind| {
        let message = match kind {
            InputError::NotANumber(_) => format!("{field} must be a valid number"),
            InputError::Negative(_) => format!("{field} must be a non-negative number"),
        };
        FieldError {
            field: field.to_string(),
            message,
            kind,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_is_not_provided() {
        assert_eq!(validate_numeric(""), Ok(NumericInput::NotProvided));
        assert_eq!(validate_numeric("   \t"), Ok(NumericInput::NotProvided));
    }

    #[test]
    fn numbers_and_zero_are_accepted() {
        assert_eq!(validate_numeric("0"), Ok(NumericInput::Value(0.0)));
        assert_eq!(validate_numeric(" 12.5 "), Ok(NumericInput::Value(12.5)));
        assert_eq!(validate_numeric("1e3"), Ok(NumericInput::Value(1000.0)));
    }

    #[test]
    fn negative_zero_becomes_zero() {
        match validate_numeric("-0") {
            Ok(NumericInput::Value(v)) => {
                assert_eq!(v, 0.0);
                assert!(v.is_sign_positive());
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(validate_numeric("-0.0"), Ok(NumericInput::Value(v)) if v.is_sign_positive()));
    }

    #[test]
    fn negatives_and_garbage_are_distinguished() {
        assert_eq!(validate_numeric("-3"), Err(InputError::Negative("-3".into())));
        assert_eq!(validate_numeric("abc"), Err(InputError::NotANumber("abc".into())));
        assert_eq!(validate_numeric("NaN"), Err(InputError::NotANumber("NaN".into())));
        assert_eq!(validate_numeric("inf"), Err(InputError::NotANumber("inf".into())));
    }

    #[test]
    fn field_messages_name_the_field() {
        let err = validate_field("-1", "Power consumption").unwrap_err();
        assert_eq!(err.message, "Power consumption must be a non-negative number");
        let err = validate_field("lots", "Water consumption").unwrap_err();
        assert_eq!(err.to_string(), "Water consumption must be a valid number");
        assert_eq!(validate_field("", "Power consumption"), Ok(NumericInput::NotProvided));
    }
}
