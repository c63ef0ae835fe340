//! PIO-driven WS2812/SK6812 pixel output
//!
//! One PIO state machine clocks pixel words out MSB first at 800 kHz.
//! RGB buffers go out as 24-bit GRB words, RGBW buffers as 32-bit GRBW
//! words; the shift threshold follows the buffer's channel count.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pio::{
    Common, Config, Direction, FifoJoin, Instance, LoadedProgram, Pin, PioPin, ShiftConfig,
    ShiftDirection, StateMachine,
};
use embassy_rp::Peri;
use embassy_time::{block_for, Duration};
use fixed::types::U24F8;
use ruckus_core::render::PixelBuffer;
use ruckus_core::traits::{PixelError, PixelSink};

// Bit timing in PIO cycles: T3 low, T1 high, then T2 high (one) or low (zero)
const T1: u8 = 2;
const T2: u8 = 5;
const T3: u8 = 3;
const CYCLES_PER_BIT: u32 = (T1 + T2 + T3) as u32;

/// Bit rate in kHz
const BIT_RATE_KHZ: u32 = 800;

/// Low time after a frame before the strip latches (us)
const LATCH_US: u64 = 100;

/// Load the WS2812 program into a PIO block
pub fn load_program<'d, PIO: Instance>(common: &mut Common<'d, PIO>) -> LoadedProgram<'d, PIO> {
    let prg = pio_proc::pio_asm!(
        ".side_set 1",
        ".wrap_target",
        "bitloop:",
        "    out x, 1        side 0 [2]",
        "    jmp !x do_zero  side 1 [1]",
        "    jmp bitloop     side 1 [4]",
        "do_zero:",
        "    nop             side 0 [4]",
        ".wrap",
    );
    common.load_program(&prg.program)
}

/// Pack RGB or RGBW channels into a left-aligned GRB(W) word
pub fn pack_pixel(channels: &[u8]) -> Option<u32> {
    match *channels {
        [r, g, b] => Some(u32::from_be_bytes([g, r, b, 0])),
        [r, g, b, w] => Some(u32::from_be_bytes([g, r, b, w])),
        _ => None,
    }
}

/// Pixel strip on one PIO state machine
pub struct PioPixels<'d, P: Instance, const S: usize> {
    sm: StateMachine<'d, P, S>,
    pin: Pin<'d, P>,
    program: &'d LoadedProgram<'d, P>,
    len: usize,
    word_bits: u8,
}

impl<'d, P: Instance, const S: usize> PioPixels<'d, P, S> {
    /// Set up `sm` to drive a strip of `len` pixels on `pin`
    pub fn new(
        common: &mut Common<'d, P>,
        sm: StateMachine<'d, P, S>,
        pin: Peri<'d, impl PioPin>,
        program: &'d LoadedProgram<'d, P>,
        len: usize,
    ) -> Self {
        let pin = common.make_pio_pin(pin);
        let mut pixels = Self {
            sm,
            pin,
            program,
            len,
            word_bits: 0,
        };
        pixels.configure(24);
        pixels
    }

    fn configure(&mut self, word_bits: u8) {
        let mut cfg = Config::default();
        cfg.use_program(self.program, &[&self.pin]);

        let clock_freq = U24F8::from_num(clk_sys_freq() / 1000);
        let bit_freq = U24F8::from_num(BIT_RATE_KHZ) * CYCLES_PER_BIT;
        cfg.clock_divider = clock_freq / bit_freq;

        cfg.fifo_join = FifoJoin::TxOnly;
        cfg.shift_out = ShiftConfig {
            auto_fill: true,
            threshold: word_bits,
            direction: ShiftDirection::Left,
        };

        self.sm.set_enable(false);
        self.sm.set_config(&cfg);
        self.sm.set_pin_dirs(Direction::Out, &[&self.pin]);
        self.sm.set_enable(true);
        self.word_bits = word_bits;
    }
}

impl<'d, P: Instance, const S: usize> PixelSink for PioPixels<'d, P, S> {
    fn write_pixels(&mut self, buffer: &PixelBuffer) -> Result<(), PixelError> {
        if buffer.len() > self.len {
            return Err(PixelError::TooManyPixels);
        }
        let word_bits = match buffer.channels() {
            3 => 24,
            4 => 32,
            n => return Err(PixelError::UnsupportedChannels(n)),
        };
        if word_bits != self.word_bits {
            self.configure(word_bits);
        }

        for px in buffer.iter() {
            let word =
                pack_pixel(px).ok_or(PixelError::UnsupportedChannels(buffer.channels()))?;
            while !self.sm.tx().try_push(word) {}
        }

        // Hold the line low once the FIFO drains so the frame latches
        while !self.sm.tx().empty() {}
        block_for(Duration::from_micros(LATCH_US));
        Ok(())
    }
}
