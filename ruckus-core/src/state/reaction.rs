//! Event to display mapping

use ruckus_protocol::{EventKind, EventNotification};

use crate::glyph::Glyph;

/// Player numbers at or above this have no glyph
pub const MAX_PLAYER: u16 = 10;

/// How the matrix responds to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reaction {
    /// Show a glyph, replacing the persistent image when `replace` is set
    Show { glyph: Glyph, replace: bool },
    /// Show a glyph briefly, then restore the persistent image
    Flash(Glyph),
    /// Show the persistent image again
    Restore,
    /// Leave the display alone
    Ignore,
    /// Custom selector outside the catalog
    BadSelector(u8),
}

/// Map an event to its display reaction
pub fn reaction(event: &EventNotification) -> Reaction {
    use EventKind::*;

    match event.kind {
        NotReady => Reaction::Show {
            glyph: Glyph::Sad,
            replace: true,
        },
        Reset | Ready => Reaction::Show {
            glyph: Glyph::Happy,
            replace: true,
        },
        EnterConfig => Reaction::Show {
            glyph: Glyph::Duck,
            replace: false,
        },
        TakeDamage => Reaction::Flash(Glyph::Surprised),
        AssignPlayer if event.magnitude < MAX_PLAYER => {
            match Glyph::digit(event.magnitude as u8) {
                Some(glyph) => Reaction::Show {
                    glyph,
                    replace: true,
                },
                None => Reaction::Ignore,
            }
        }
        AssignPlayer => Reaction::Ignore,
        ExitConfig => Reaction::Restore,
        Custom => match Glyph::from_index(event.event_type) {
            Some(glyph) => Reaction::Show {
                glyph,
                replace: true,
            },
            None => Reaction::BadSelector(event.event_type),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(glyph: Glyph, replace: bool) -> Reaction {
        Reaction::Show { glyph, replace }
    }

    #[test]
    fn test_event_table() {
        let cases = [
            (EventNotification::new(EventKind::NotReady), show(Glyph::Sad, true)),
            (EventNotification::new(EventKind::Reset), show(Glyph::Happy, true)),
            (EventNotification::new(EventKind::Ready), show(Glyph::Happy, true)),
            (EventNotification::new(EventKind::EnterConfig), show(Glyph::Duck, false)),
            (
                EventNotification::new(EventKind::TakeDamage),
                Reaction::Flash(Glyph::Surprised),
            ),
            (EventNotification::new(EventKind::ExitConfig), Reaction::Restore),
            (EventNotification::custom(13), show(Glyph::Duck, true)),
            (EventNotification::custom(15), show(Glyph::Clear, true)),
        ];
        for (event, expected) in cases {
            assert_eq!(reaction(&event), expected);
        }
    }

    #[test]
    fn test_assign_player() {
        for n in 0..10u16 {
            let event = EventNotification::with_magnitude(EventKind::AssignPlayer, n);
            assert_eq!(
                reaction(&event),
                show(Glyph::digit(n as u8).unwrap(), true)
            );
        }
        for n in [10u16, 11, 255, 256, u16::MAX] {
            let event = EventNotification::with_magnitude(EventKind::AssignPlayer, n);
            assert_eq!(reaction(&event), Reaction::Ignore);
        }
    }

    #[test]
    fn test_custom_out_of_catalog() {
        assert_eq!(reaction(&EventNotification::custom(16)), Reaction::BadSelector(16));
        assert_eq!(reaction(&EventNotification::custom(255)), Reaction::BadSelector(255));
    }

    #[test]
    fn test_damage_magnitude_irrelevant() {
        let event = EventNotification::with_magnitude(EventKind::TakeDamage, 40);
        assert_eq!(reaction(&event), Reaction::Flash(Glyph::Surprised));
    }
}
