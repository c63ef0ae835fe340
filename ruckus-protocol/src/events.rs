//! Robot game events delivered to devices

/// Kinds of game events a robot device reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    /// Robot is not ready to play
    NotReady,
    /// Robot was reset
    Reset,
    /// Robot is ready to play
    Ready,
    /// Robot entered its configuration mode
    EnterConfig,
    /// Robot took damage
    TakeDamage,
    /// Robot was assigned a player number
    AssignPlayer,
    /// Robot left its configuration mode
    ExitConfig,
    /// Device-specific event, meaning carried by the selector
    Custom,
}

// Wire format values
const EVENT_NOT_READY: u8 = 0x00;
const EVENT_RESET: u8 = 0x01;
const EVENT_READY: u8 = 0x02;
const EVENT_ENTER_CONFIG: u8 = 0x03;
const EVENT_TAKE_DAMAGE: u8 = 0x04;
const EVENT_ASSIGN_PLAYER: u8 = 0x05;
const EVENT_EXIT_CONFIG: u8 = 0x06;
const EVENT_CUSTOM: u8 = 0x07;

impl EventKind {
    /// Parse an event kind from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            EVENT_NOT_READY => Some(EventKind::NotReady),
            EVENT_RESET => Some(EventKind::Reset),
            EVENT_READY => Some(EventKind::Ready),
            EVENT_ENTER_CONFIG => Some(EventKind::EnterConfig),
            EVENT_TAKE_DAMAGE => Some(EventKind::TakeDamage),
            EVENT_ASSIGN_PLAYER => Some(EventKind::AssignPlayer),
            EVENT_EXIT_CONFIG => Some(EventKind::ExitConfig),
            EVENT_CUSTOM => Some(EventKind::Custom),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            EventKind::NotReady => EVENT_NOT_READY,
            EventKind::Reset => EVENT_RESET,
            EventKind::Ready => EVENT_READY,
            EventKind::EnterConfig => EVENT_ENTER_CONFIG,
            EventKind::TakeDamage => EVENT_TAKE_DAMAGE,
            EventKind::AssignPlayer => EVENT_ASSIGN_PLAYER,
            EventKind::ExitConfig => EVENT_EXIT_CONFIG,
            EventKind::Custom => EVENT_CUSTOM,
        }
    }
}

/// Encoded size of an [`EventNotification`]: kind, selector, magnitude (LE u16)
pub const NOTIFICATION_LEN: usize = 4;

/// A single event as delivered by the robot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventNotification {
    /// What happened
    pub kind: EventKind,
    /// Auxiliary selector (device-specific, e.g. an image index for `Custom`)
    pub event_type: u8,
    /// Numeric value attached to the event (player number, damage amount)
    pub magnitude: u16,
}

impl EventNotification {
    /// Create a notification with no selector or magnitude
    pub const fn new(kind: EventKind) -> Self {
        Self {
            kind,
            event_type: 0,
            magnitude: 0,
        }
    }

    /// Create a `Custom` notification carrying a selector
    pub const fn custom(event_type: u8) -> Self {
        Self {
            kind: EventKind::Custom,
            event_type,
            magnitude: 0,
        }
    }

    /// Create a notification carrying a magnitude
    pub const fn with_magnitude(kind: EventKind, magnitude: u16) -> Self {
        Self {
            kind,
            event_type: 0,
            magnitude,
        }
    }

    /// Decode from wire bytes
    ///
    /// Returns `None` for short payloads or unknown kinds.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < NOTIFICATION_LEN {
            return None;
        }
        Some(Self {
            kind: EventKind::from_byte(bytes[0])?,
            event_type: bytes[1],
            magnitude: u16::from_le_bytes([bytes[2], bytes[3]]),
        })
    }

    /// Encode to wire bytes
    pub fn to_bytes(&self) -> [u8; NOTIFICATION_LEN] {
        let [lo, hi] = self.magnitude.to_le_bytes();
        [self.kind.to_byte(), self.event_type, lo, hi]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [EventKind; 8] = [
        EventKind::NotReady,
        EventKind::Reset,
        EventKind::Ready,
        EventKind::EnterConfig,
        EventKind::TakeDamage,
        EventKind::AssignPlayer,
        EventKind::ExitConfig,
        EventKind::Custom,
    ];

    #[test]
    fn test_kind_roundtrip() {
        for kind in ALL_KINDS {
            assert_eq!(EventKind::from_byte(kind.to_byte()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_kind() {
        assert!(EventKind::from_byte(0x08).is_none());
        assert!(EventKind::from_byte(0xFF).is_none());
    }

    #[test]
    fn test_notification_decode() {
        let n = EventNotification::from_bytes(&[0x05, 0x00, 0x03, 0x00]).unwrap();
        assert_eq!(n.kind, EventKind::AssignPlayer);
        assert_eq!(n.magnitude, 3);

        let n = EventNotification::from_bytes(&[0x04, 0x00, 0x2C, 0x01]).unwrap();
        assert_eq!(n.kind, EventKind::TakeDamage);
        assert_eq!(n.magnitude, 300);
    }

    #[test]
    fn test_notification_encode() {
        let n = EventNotification::custom(15);
        assert_eq!(n.to_bytes(), [0x07, 15, 0, 0]);
    }

    #[test]
    fn test_malformed_notification() {
        assert!(EventNotification::from_bytes(&[]).is_none());
        assert!(EventNotification::from_bytes(&[0x02, 0x00]).is_none());
        assert!(EventNotification::from_bytes(&[0x42, 0x00, 0x00, 0x00]).is_none());
    }
}
