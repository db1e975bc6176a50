use thiserror::Error;

/// Validation failures shared by Term, Course and SyllabusItem
/// setters. Every check runs before any state is touched, so a
/// rejected mutation leaves entities and aggregates unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must not be only whitespace")]
    WhitespaceOnlyTitle,
    #[error("value must not be negative")]
    NegativeValue,
    #[error("date is outside the allowed range")]
    DateOutOfRange,
}

/// Failure of a mutation addressed at a syllabus item by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("no syllabus item with that id in this course")]
    UnknownItem,
}

pub(crate) fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if title.trim().is_empty() {
        return Err(ValidationError::WhitespaceOnlyTitle);
    }
    Ok(())
}

pub(crate) fn validate_non_negative(value: f64) -> Result<(), ValidationError> {
    if value < 0.0 {
        return Err(ValidationError::NegativeValue);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_title_is_distinguished_from_whitespace_title() {
        assert_eq!(validate_title(""), Err(ValidationError::EmptyTitle));
        assert_eq!(
            validate_title("   \t"),
            Err(ValidationError::WhitespaceOnlyTitle)
        );
        assert_eq!(validate_title(" Biology 201 "), Ok(()));
    }

    #[test]
    fn negative_values_are_rejected_and_zero_is_allowed() {
        assert_eq!(
            validate_non_negative(-0.01),
            Err(ValidationError::NegativeValue)
        );
        assert_eq!(validate_non_negative(0.0), Ok(()));
        assert_eq!(validate_non_negative(104.5), Ok(()));
    }
}
