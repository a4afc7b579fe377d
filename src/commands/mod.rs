use crate::http::ApiError;

mod ask;
mod health;

pub use ask::ask;
pub use health::health;

/// Renders a command failure for the terminal.
///
/// Service failures show their message and hint; anything else is printed
/// with its context chain.
pub fn format_failure(error: &anyhow::Error) -> String {
    match error.downcast_ref::<ApiError>() {
        Some(api_error) => match &api_error.hint {
            Some(hint) => format!("Error: {}\nHint: {}", api_error.message, hint),
            None => format!("Error: {}", api_error.message),
        },
        None => format!("Error: {:#}", error),
    }
}
