//! Message types for the controller link
//!
//! Message types are divided into two categories:
//! - Controller → Matrix: events, configuration and action requests
//! - Matrix → Controller: configuration documents and action results

use crate::events::EventNotification;
use crate::frame::{Frame, FrameError};

// Message type IDs: Controller → Matrix
pub const MSG_EVENT: u8 = 0x01;
pub const MSG_SET_CONFIG: u8 = 0x02;
pub const MSG_GET_CONFIG: u8 = 0x03;
pub const MSG_ACTION: u8 = 0x04;
pub const MSG_SET_ADDRESS: u8 = 0x05;

// Message type IDs: Matrix → Controller
pub const MSG_CONFIG: u8 = 0x20;
pub const MSG_RESULT: u8 = 0x21;

/// Messages from the robot controller to the matrix
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerMessage<'a> {
    /// A game event; `None` when the payload could not be decoded
    Event(Option<EventNotification>),
    /// Replace the device configuration with a JSON document
    SetConfig { persist: bool, config: &'a str },
    /// Request the current configuration document
    GetConfig,
    /// Invoke a device action by index
    Action { action: u8, payload: &'a str },
    /// The robot's network address changed
    SetAddress(&'a str),
}

fn text(bytes: &[u8]) -> Result<&str, FrameError> {
    core::str::from_utf8(bytes).map_err(|_| FrameError::InvalidText)
}

impl<'a> ControllerMessage<'a> {
    /// Parse a message from a received frame
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        let payload = frame.payload.as_slice();
        match frame.msg_type {
            MSG_EVENT => Ok(ControllerMessage::Event(EventNotification::from_bytes(
                payload,
            ))),
            MSG_SET_CONFIG => {
                let (&persist, config) = payload.split_first().ok_or(FrameError::InvalidFrame)?;
                Ok(ControllerMessage::SetConfig {
                    persist: persist != 0,
                    config: text(config)?,
                })
            }
            MSG_GET_CONFIG => Ok(ControllerMessage::GetConfig),
            MSG_ACTION => {
                let (&action, rest) = payload.split_first().ok_or(FrameError::InvalidFrame)?;
                Ok(ControllerMessage::Action {
                    action,
                    payload: text(rest)?,
                })
            }
            MSG_SET_ADDRESS => Ok(ControllerMessage::SetAddress(text(payload)?)),
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Encode this message into a frame (controller side, tests and tools)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            ControllerMessage::Event(Some(event)) => Frame::new(MSG_EVENT, &event.to_bytes()),
            ControllerMessage::Event(None) => Ok(Frame::empty(MSG_EVENT)),
            ControllerMessage::SetConfig { persist, config } => {
                Frame::with_prefix(MSG_SET_CONFIG, u8::from(*persist), config.as_bytes())
            }
            ControllerMessage::GetConfig => Ok(Frame::empty(MSG_GET_CONFIG)),
            ControllerMessage::Action { action, payload } => {
                Frame::with_prefix(MSG_ACTION, *action, payload.as_bytes())
            }
            ControllerMessage::SetAddress(address) => Frame::new(MSG_SET_ADDRESS, address.as_bytes()),
        }
    }
}

/// Replies from the matrix to the robot controller
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceReply<'a> {
    /// Current configuration document
    Config(&'a str),
    /// Outcome of a configuration or action request, with a response body
    Result { success: bool, body: &'a str },
}

impl<'a> DeviceReply<'a> {
    /// Encode this reply into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            DeviceReply::Config(config) => Frame::new(MSG_CONFIG, config.as_bytes()),
            DeviceReply::Result { success, body } => {
                Frame::with_prefix(MSG_RESULT, u8::from(*success), body.as_bytes())
            }
        }
    }

    /// Encode this reply, or a failed result carrying `fallback` when the
    /// reply does not fit a frame
    ///
    /// The controller waits for a reply to every request, so an oversized
    /// one still has to produce a frame.
    pub fn to_frame_or(&self, fallback: &str) -> Result<Frame, FrameError> {
        match self.to_frame() {
            Err(FrameError::PayloadTooLarge) => DeviceReply::Result {
                success: false,
                body: fallback,
            }
            .to_frame(),
            other => other,
        }
    }

    /// Parse a reply from a frame (controller side, tests and tools)
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        let payload = frame.payload.as_slice();
        match frame.msg_type {
            MSG_CONFIG => Ok(DeviceReply::Config(text(payload)?)),
            MSG_RESULT => {
                let (&success, body) = payload.split_first().ok_or(FrameError::InvalidFrame)?;
                Ok(DeviceReply::Result {
                    success: success != 0,
                    body: text(body)?,
                })
            }
            _ => Err(FrameError::InvalidFrame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::frame::MAX_PAYLOAD_SIZE;

    #[test]
    fn test_event_message() {
        let frame = Frame::new(MSG_EVENT, &[0x05, 0, 7, 0]).unwrap();
        let msg = ControllerMessage::from_frame(&frame).unwrap();
        assert_eq!(
            msg,
            ControllerMessage::Event(Some(EventNotification::with_magnitude(
                EventKind::AssignPlayer,
                7
            )))
        );
    }

    #[test]
    fn test_truncated_event_is_absent() {
        let frame = Frame::new(MSG_EVENT, &[0x05]).unwrap();
        let msg = ControllerMessage::from_frame(&frame).unwrap();
        assert_eq!(msg, ControllerMessage::Event(None));
    }

    #[test]
    fn test_set_config_message() {
        let original = ControllerMessage::SetConfig {
            persist: true,
            config: r#"{"color":"255,0,0"}"#,
        };
        let frame = original.to_frame().unwrap();
        assert_eq!(frame.payload[0], 1);
        assert_eq!(ControllerMessage::from_frame(&frame).unwrap(), original);
    }

    #[test]
    fn test_set_config_requires_flag() {
        let frame = Frame::empty(MSG_SET_CONFIG);
        assert_eq!(
            ControllerMessage::from_frame(&frame),
            Err(FrameError::InvalidFrame)
        );
    }

    #[test]
    fn test_action_message() {
        let frame = Frame::with_prefix(MSG_ACTION, 2, b"").unwrap();
        let msg = ControllerMessage::from_frame(&frame).unwrap();
        assert_eq!(msg, ControllerMessage::Action { action: 2, payload: "" });
    }

    #[test]
    fn test_invalid_utf8() {
        let frame = Frame::new(MSG_SET_ADDRESS, &[0xC3, 0x28]).unwrap();
        assert_eq!(
            ControllerMessage::from_frame(&frame),
            Err(FrameError::InvalidText)
        );
    }

    #[test]
    fn test_unknown_message() {
        let frame = Frame::empty(0x7F);
        assert_eq!(
            ControllerMessage::from_frame(&frame),
            Err(FrameError::InvalidFrame)
        );
    }

    #[test]
    fn test_oversized_config_reply_fails() {
        let doc = "x".repeat(MAX_PAYLOAD_SIZE + 1);
        let fallback = r#"{"success":false,"message":"Configuration too large"}"#;
        let frame = DeviceReply::Config(&doc).to_frame_or(fallback).unwrap();
        assert_eq!(frame.msg_type, MSG_RESULT);
        assert_eq!(
            DeviceReply::from_frame(&frame).unwrap(),
            DeviceReply::Result {
                success: false,
                body: fallback,
            }
        );
    }

    #[test]
    fn test_fitting_config_reply_unchanged() {
        let frame = DeviceReply::Config(r#"{"color":"1,2,3"}"#)
            .to_frame_or("unused")
            .unwrap();
        assert_eq!(
            DeviceReply::from_frame(&frame).unwrap(),
            DeviceReply::Config(r#"{"color":"1,2,3"}"#)
        );
    }

    #[test]
    fn test_result_reply() {
        let reply = DeviceReply::Result {
            success: true,
            body: r#"{"success": true}"#,
        };
        let frame = reply.to_frame().unwrap();
        assert_eq!(frame.msg_type, MSG_RESULT);
        assert_eq!(DeviceReply::from_frame(&frame).unwrap(), reply);
    }
}
