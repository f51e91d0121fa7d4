//! Form validation helpers used with `validator` derives.

use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Rejects empty or whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::from("must not be empty"));
        return Err(err);
    }
    Ok(())
}

/// `validator` custom hook for `String` fields.
#[allow(clippy::ptr_arg)]
pub fn not_blank_field(value: &String) -> Result<(), ValidationError> {
    not_blank(value)
}

/// Flattens validator output into one operator-facing sentence, fields sorted
/// by name so messages are stable.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .errors()
        .iter()
        .map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(errs) => {
                let reason = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}: {}", field, reason)
            }
            _ => format!("{}: invalid", field),
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Form {
        #[validate(custom(function = "not_blank_field"))]
        title: String,
        #[validate(custom(function = "not_blank_field"))]
        body: String,
    }

    #[test]
    fn whitespace_only_is_blank() {
        assert!(not_blank("   \n").is_err());
        assert!(not_blank("").is_err());
        assert!(not_blank(" a ").is_ok());
    }

    #[test]
    fn describe_lists_every_failing_field() {
        let form = Form {
            title: " ".to_string(),
            body: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            describe(&errors),
            "body: must not be empty; title: must not be empty"
        );
    }
}
