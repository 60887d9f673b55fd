//! User-facing command failures.

use std::fmt;

/// A failure meant to be shown to the user who invoked a command.
///
/// Commands return it wrapped in an [`anyhow::Error`]; the dispatcher tells it
/// apart from infrastructure failures by downcasting. Only this type is ever
/// rendered in a room.
///
/// # Examples
///
/// ```ignore
/// # use wombot::commands::CommandError;
/// let error = CommandError::new("Player not found.").with_tip("Check the spelling.");
/// assert_eq!(error.message, "Player not found.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
    /// Human readable description of the failure
    pub message: String,
    /// Optional hint on how to fix it
    pub tip: Option<String>,
}

impl CommandError {
    pub fn new(message: &str) -> Self {
        CommandError {
            message: message.to_string(),
            tip: None,
        }
    }

    pub fn with_tip(mut self, tip: &str) -> Self {
        self.tip = Some(tip.to_string());
        self
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.tip {
            Some(tip) => write!(f, "{} ({})", self.message, tip),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for CommandError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_tip() {
        let error = CommandError::new("Invalid username.");
        assert_eq!(format!("{}", error), "Invalid username.");
    }

    #[test]
    fn test_display_with_tip() {
        let error = CommandError::new("Invalid username.").with_tip("Try !help");
        assert_eq!(format!("{}", error), "Invalid username. (Try !help)");
    }

    #[test]
    fn test_downcast_from_anyhow() {
        let error: anyhow::Error = CommandError::new("Nope").into();
        let command_error = error.downcast_ref::<CommandError>().unwrap();
        assert_eq!(command_error.message, "Nope");
        assert!(command_error.tip.is_none());
    }

    #[test]
    fn test_other_errors_do_not_downcast() {
        let error = anyhow::anyhow!("connection reset");
        assert!(error.downcast_ref::<CommandError>().is_none());
    }
}
