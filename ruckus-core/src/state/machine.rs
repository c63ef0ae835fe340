//! Persistent and displayed images

use crate::glyph::Glyph;

/// What the matrix shows and what it returns to
///
/// `persistent` only changes through replace-semantics updates; transient
/// images change `displayed` alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayState {
    displayed: Glyph,
    persistent: Glyph,
}

impl DisplayState {
    /// Blank matrix
    pub const fn new() -> Self {
        Self {
            displayed: Glyph::Clear,
            persistent: Glyph::Clear,
        }
    }

    /// Show `glyph`, making it the fallback image when `replace` is set
    pub fn show(&mut self, glyph: Glyph, replace: bool) {
        self.displayed = glyph;
        if replace {
            self.persistent = glyph;
        }
    }

    /// Return to the persistent image, which is then shown
    pub fn restore(&mut self) -> Glyph {
        self.displayed = self.persistent;
        self.persistent
    }

    /// Glyph currently on the matrix
    pub fn displayed(&self) -> Glyph {
        self.displayed
    }

    /// Glyph the matrix returns to after a transient image
    pub fn persistent(&self) -> Glyph {
        self.persistent
    }

    /// Whether a transient image is showing
    pub fn is_transient(&self) -> bool {
        self.displayed != self.persistent
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = DisplayState::new();
        assert_eq!(state.displayed(), Glyph::Clear);
        assert_eq!(state.persistent(), Glyph::Clear);
        assert!(!state.is_transient());
    }

    #[test]
    fn test_transient_then_restore() {
        let mut state = DisplayState::new();
        state.show(Glyph::Happy, true);
        state.show(Glyph::Duck, false);
        assert_eq!(state.displayed(), Glyph::Duck);
        assert_eq!(state.persistent(), Glyph::Happy);
        assert!(state.is_transient());

        assert_eq!(state.restore(), Glyph::Happy);
        assert_eq!(state.displayed(), Glyph::Happy);
    }

    #[test]
    fn test_replace_moves_both() {
        let mut state = DisplayState::new();
        state.show(Glyph::Three, true);
        assert_eq!(state.displayed(), Glyph::Three);
        assert_eq!(state.persistent(), Glyph::Three);
    }
}
