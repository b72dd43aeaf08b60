use crate::error::{ErrorContext, KeycloakError};
use std::error::Error;

/// Render the error with its context and every underlying cause.
pub fn format_error_chain(error: &KeycloakError) -> String {
    let context = ErrorContext::new(error);
    let mut output = context.to_string();

    let mut source = error.source();
    let mut first = true;
    while let Some(cause) = source {
        if first {
            output.push_str("\n\nCaused by:");
            first = false;
        }
        output.push_str(&format!("\n  - {cause}"));
        source = cause.source();
    }

    output
}
