//! Base pixel device trait
//!
//! The matrix is built on a general pixel device that owns the rest of
//! the configuration document and its own actions. The matrix passes
//! those through untouched.

use alloc::string::String;

use super::pixels::PixelSink;
use crate::config::ConfigError;

/// Response body for a successful action
pub const SUCCESS_BODY: &str = r#"{"success":true}"#;

/// Result of an action, with a JSON body for the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the action was carried out
    pub success: bool,
    /// JSON response body
    pub body: String,
}

impl ActionResponse {
    /// Plain success response
    pub fn success() -> Self {
        Self {
            success: true,
            body: String::from(SUCCESS_BODY),
        }
    }

    /// Failure response carrying a message
    pub fn failure(message: &str) -> Self {
        let body = serde_json::to_string(message).unwrap_or_default();
        let mut text = String::from(r#"{"success":false,"message":"#);
        text.push_str(&body);
        text.push('}');
        Self {
            success: false,
            body: text,
        }
    }

    /// Keep this response if `step` succeeded, otherwise fail with `message`
    ///
    /// An earlier failure is kept as it is.
    pub fn require<E>(self, step: Result<(), E>, message: &str) -> Self {
        match step {
            Err(_) if self.success => Self::failure(message),
            _ => self,
        }
    }
}

/// Trait for the base pixel device
pub trait BaseDevice {
    /// Bring the device up; `false` aborts activation
    fn begin(&mut self) -> bool {
        true
    }

    /// Action names, indexed by action number
    fn actions(&self) -> &[&'static str];

    /// Accept the base device's fields from a configuration document
    ///
    /// Fields the base device does not know must be ignored.
    fn set_config(&mut self, config: &str) -> Result<(), ConfigError>;

    /// Serialize the base device's configuration as a JSON object
    fn get_config(&self) -> String;

    /// Carry out one of the base device's actions
    fn receive_action<P: PixelSink>(
        &mut self,
        action: u8,
        payload: &str,
        pixels: &mut P,
    ) -> ActionResponse;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_failed_step() {
        let response = ActionResponse::success().require(Err(()), "Configuration not saved");
        assert_eq!(response, ActionResponse::failure("Configuration not saved"));
        assert!(!response.success);
    }

    #[test]
    fn test_require_passed_step() {
        let response = ActionResponse::success().require(Ok::<(), ()>(()), "unused");
        assert_eq!(response, ActionResponse::success());
    }

    #[test]
    fn test_require_keeps_first_failure() {
        let response = ActionResponse::failure("Configuration rejected").require(Err(()), "later");
        assert_eq!(response, ActionResponse::failure("Configuration rejected"));
    }

    #[test]
    fn test_success_body() {
        let response = ActionResponse::success();
        assert!(response.success);
        assert_eq!(response.body, r#"{"success":true}"#);
    }

    #[test]
    fn test_failure_escapes_message() {
        let response = ActionResponse::failure("bad \"index\"");
        assert!(!response.success);
        assert_eq!(
            response.body,
            r#"{"success":false,"message":"bad \"index\""}"#
        );
    }
}
