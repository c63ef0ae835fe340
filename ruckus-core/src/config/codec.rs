//! Color text codec and configuration document handling
//!
//! The color travels as comma-separated decimal channel values inside the
//! `color` field of the device's JSON configuration document, for example
//! `{"color": "255,0,0,128"}`. Every other field belongs to the base
//! pixel device and is passed through untouched.

use alloc::string::String;
use core::fmt::Write;

use heapless::Vec;
use serde_json::{Map, Value};

use super::display::{Color, ConfigError, MAX_CHANNELS};

/// Name of the color field in the configuration document
pub const COLOR_FIELD: &str = "color";

/// Serialized color text ("255,255,255,255" at most)
pub type ColorText = heapless::String<16>;

/// Parse a channel token the way the robot's firmware always has: optional
/// leading whitespace and sign, then the longest run of digits. Anything
/// else reads as 0. The result is truncated to 8 bits.
fn channel_value(token: &str) -> u8 {
    let token = token.trim_start();
    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.wrapping_mul(10).wrapping_add(i64::from(d - b'0'))
        });
    let value = if negative { value.wrapping_neg() } else { value };
    value as u8
}

/// Parse comma-separated channel values into a color
///
/// The channel count is the number of comma-separated tokens and must be
/// 3 or 4.
pub fn parse_color(text: &str) -> Result<Color, ConfigError> {
    let count = text.split(',').count();
    if !(3..=MAX_CHANNELS).contains(&count) {
        return Err(ConfigError::ChannelCount(count));
    }

    let channels: Vec<u8, MAX_CHANNELS> = text.split(',').map(channel_value).collect();
    Color::new(&channels)
}

/// Serialize a color as comma-separated channel values
pub fn serialize_color(color: &Color) -> ColorText {
    let mut out = ColorText::new();
    for (i, channel) in color.channels().iter().enumerate() {
        if i > 0 {
            let _ = out.push(',');
        }
        // Fits: at most four 3-digit values and three commas
        let _ = write!(out, "{}", channel);
    }
    out
}

fn parse_object(text: &str) -> Result<Map<String, Value>, ConfigError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ConfigError::NotAnObject),
        Err(_) => Err(ConfigError::Malformed),
    }
}

/// Extract the color from a configuration document
///
/// Returns `Ok(None)` when the document carries no color, leaving the
/// active color as it is.
pub fn color_from_document(text: &str) -> Result<Option<Color>, ConfigError> {
    let doc = parse_object(text)?;
    match doc.get(COLOR_FIELD) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(color)) => parse_color(color).map(Some),
        Some(_) => Err(ConfigError::InvalidColor),
    }
}

/// Merge the active color into the base device's configuration document
pub fn merge_color(base: &str, color: &Color) -> String {
    let mut doc = parse_object(base).unwrap_or_else(|e| {
        warn!("Base configuration unreadable: {:?}", e);
        Map::new()
    });
    doc.insert(
        COLOR_FIELD.into(),
        Value::String(serialize_color(color).as_str().into()),
    );
    serde_json::to_string(&Value::Object(doc)).unwrap_or_else(|_| String::from("{}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_rgb_and_rgbw() {
        assert_eq!(parse_color("255,0,0").unwrap().channels(), &[255, 0, 0]);
        assert_eq!(
            parse_color("255,0,0,128").unwrap().channels(),
            &[255, 0, 0, 128]
        );
    }

    #[test]
    fn test_parse_lenient_tokens() {
        assert_eq!(parse_color("12abc, 7,x").unwrap().channels(), &[12, 7, 0]);
        assert_eq!(parse_color(",,").unwrap().channels(), &[0, 0, 0]);
    }

    #[test]
    fn test_parse_truncates_to_byte() {
        assert_eq!(parse_color("300,256,-1").unwrap().channels(), &[44, 0, 255]);
    }

    #[test]
    fn test_parse_rejects_channel_count() {
        assert_eq!(parse_color("5"), Err(ConfigError::ChannelCount(1)));
        assert_eq!(parse_color(""), Err(ConfigError::ChannelCount(1)));
        assert_eq!(parse_color("1,2"), Err(ConfigError::ChannelCount(2)));
        assert_eq!(parse_color("1,2,3,4,5"), Err(ConfigError::ChannelCount(5)));
    }

    #[test]
    fn test_serialize() {
        assert_eq!(serialize_color(&Color::rgb(127, 127, 127)).as_str(), "127,127,127");
        assert_eq!(
            serialize_color(&Color::rgbw(255, 255, 255, 255)).as_str(),
            "255,255,255,255"
        );
    }

    #[test]
    fn test_document_color() {
        let color = color_from_document(r#"{"name":"matrix","color":"0,64,0"}"#).unwrap();
        assert_eq!(color, Some(Color::rgb(0, 64, 0)));
    }

    #[test]
    fn test_document_without_color() {
        assert_eq!(color_from_document(r#"{"name":"matrix"}"#), Ok(None));
        assert_eq!(color_from_document(r#"{"color":null}"#), Ok(None));
    }

    #[test]
    fn test_document_errors() {
        assert_eq!(color_from_document("{\"color\":"), Err(ConfigError::Malformed));
        assert_eq!(color_from_document("[1,2,3]"), Err(ConfigError::NotAnObject));
        assert_eq!(
            color_from_document(r#"{"color":[1,2,3]}"#),
            Err(ConfigError::InvalidColor)
        );
        assert_eq!(
            color_from_document(r#"{"color":"9"}"#),
            Err(ConfigError::ChannelCount(1))
        );
    }

    #[test]
    fn test_merge_keeps_base_fields() {
        let merged = merge_color(r#"{"name":"matrix","brightness":40}"#, &Color::rgb(1, 2, 3));
        let doc = parse_object(&merged).unwrap();
        assert_eq!(doc.get("name"), Some(&Value::String("matrix".into())));
        assert_eq!(doc.get("brightness"), Some(&Value::from(40)));
        assert_eq!(doc.get("color"), Some(&Value::String("1,2,3".into())));
    }

    #[test]
    fn test_merge_replaces_stale_color() {
        let merged = merge_color(r#"{"color":"9,9,9"}"#, &Color::rgbw(1, 2, 3, 4));
        assert_eq!(color_from_document(&merged), Ok(Some(Color::rgbw(1, 2, 3, 4))));
    }

    #[test]
    fn test_merge_unreadable_base() {
        let merged = merge_color("not json", &Color::default());
        assert_eq!(merged, r#"{"color":"127,127,127"}"#);
    }

    proptest! {
        #[test]
        fn test_color_text_roundtrip(channels in proptest::collection::vec(any::<u8>(), 3..=4)) {
            let color = Color::new(&channels).unwrap();
            prop_assert_eq!(parse_color(&serialize_color(&color)).unwrap(), color);
        }
    }
}
