//! Sequence steps and the sequences the matrix plays

use heapless::Vec;

use crate::glyph::Glyph;

/// How long a damage flash stays up (ms)
pub const DAMAGE_FLASH_MS: u32 = 1500;

/// Blank pause before the first address digit (ms)
pub const SETTLE_MS: u32 = 500;

/// How long each address digit is shown (ms)
pub const DIGIT_MS: u32 = 1500;

/// Blank gap after each address digit (ms)
pub const GAP_MS: u32 = 1000;

/// Most digits an address octet can have
pub const MAX_ADDRESS_DIGITS: usize = 3;

/// Maximum steps in a sequence (leading clear, two per digit, restore)
pub const MAX_STEPS: usize = 2 + 2 * MAX_ADDRESS_DIGITS;

/// A single display change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Show a glyph without touching the persistent image
    Show(Glyph),
    /// Show the persistent image again
    Restore,
}

/// A step and its offset from the sequence start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimedStep {
    /// Offset from sequence start (ms)
    pub offset_ms: u32,
    /// Display change
    pub step: Step,
}

/// Ordered steps with non-decreasing offsets, always ending in a restore
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sequence {
    steps: Vec<TimedStep, MAX_STEPS>,
}

impl Sequence {
    fn push(&mut self, offset_ms: u32, step: Step) {
        // Constructors never exceed MAX_STEPS
        let _ = self.steps.push(TimedStep { offset_ms, step });
    }

    /// Show `glyph` now and restore after [`DAMAGE_FLASH_MS`]
    pub fn flash(glyph: Glyph) -> Self {
        let mut seq = Self { steps: Vec::new() };
        seq.push(0, Step::Show(glyph));
        seq.push(DAMAGE_FLASH_MS, Step::Restore);
        seq
    }

    /// Spell out the digits of an address octet one at a time
    ///
    /// Blank, settle, then each digit followed by a blank gap, then
    /// restore. Characters that are not decimal digits are skipped and
    /// at most [`MAX_ADDRESS_DIGITS`] digits are shown.
    pub fn address(digits: &str) -> Self {
        let mut seq = Self { steps: Vec::new() };
        seq.push(0, Step::Show(Glyph::Clear));
        let mut at = SETTLE_MS;

        let mut shown = 0;
        for ch in digits.chars() {
            let Some(glyph) = ch.to_digit(10).and_then(|d| Glyph::digit(d as u8)) else {
                warn!("Skipping non-digit address character");
                continue;
            };
            if shown == MAX_ADDRESS_DIGITS {
                warn!("Address octet longer than {} digits", MAX_ADDRESS_DIGITS);
                break;
            }
            seq.push(at, Step::Show(glyph));
            at += DIGIT_MS;
            seq.push(at, Step::Show(Glyph::Clear));
            at += GAP_MS;
            shown += 1;
        }

        seq.push(at, Step::Restore);
        seq
    }

    /// Steps in order
    pub fn steps(&self) -> &[TimedStep] {
        &self.steps
    }

    /// Offset of the final step (ms)
    pub fn duration_ms(&self) -> u32 {
        self.steps.last().map_or(0, |s| s.offset_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed(offset_ms: u32, step: Step) -> TimedStep {
        TimedStep { offset_ms, step }
    }

    #[test]
    fn test_flash() {
        let seq = Sequence::flash(Glyph::Surprised);
        assert_eq!(
            seq.steps(),
            &[
                timed(0, Step::Show(Glyph::Surprised)),
                timed(1500, Step::Restore),
            ]
        );
    }

    #[test]
    fn test_address_42() {
        let seq = Sequence::address("42");
        assert_eq!(
            seq.steps(),
            &[
                timed(0, Step::Show(Glyph::Clear)),
                timed(500, Step::Show(Glyph::Four)),
                timed(2000, Step::Show(Glyph::Clear)),
                timed(3000, Step::Show(Glyph::Two)),
                timed(4500, Step::Show(Glyph::Clear)),
                timed(5500, Step::Restore),
            ]
        );
    }

    #[test]
    fn test_address_empty() {
        let seq = Sequence::address("");
        assert_eq!(
            seq.steps(),
            &[timed(0, Step::Show(Glyph::Clear)), timed(500, Step::Restore)]
        );
    }

    #[test]
    fn test_address_skips_non_digits() {
        let seq = Sequence::address("1x0");
        let shown: std::vec::Vec<Step> = seq.steps().iter().map(|s| s.step).collect();
        assert_eq!(
            shown,
            [
                Step::Show(Glyph::Clear),
                Step::Show(Glyph::One),
                Step::Show(Glyph::Clear),
                Step::Show(Glyph::Zero),
                Step::Show(Glyph::Clear),
                Step::Restore,
            ]
        );
    }

    #[test]
    fn test_address_caps_digits() {
        let seq = Sequence::address("12345");
        assert_eq!(seq.steps().len(), MAX_STEPS);
        assert_eq!(seq.steps()[5].step, Step::Show(Glyph::Three));
        assert_eq!(seq.steps().last().map(|s| s.step), Some(Step::Restore));
        assert_eq!(seq.duration_ms(), 500 + 3 * 2500);
    }

    #[test]
    fn test_offsets_non_decreasing() {
        for text in ["", "7", "255", "a1b2c3"] {
            let seq = Sequence::address(text);
            assert!(seq.steps().windows(2).all(|w| w[0].offset_ms <= w[1].offset_ms));
        }
    }
}
