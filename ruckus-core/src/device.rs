//! The LED matrix device
//!
//! Composes the base pixel device and the pixel sink with the display
//! configuration, display state and pending sequence. Every call runs on
//! a single worker. Timed steps are applied by [`LedMatrix::poll`]; while
//! any are pending the device refuses new work with [`MatrixError::Busy`].

use alloc::string::String;

use heapless::Vec;
use ruckus_protocol::EventNotification;
use serde_json::{Map, Value};

use crate::config::{color_from_document, merge_color, ConfigError, DisplayConfig};
use crate::glyph::Glyph;
use crate::render::render;
use crate::sequence::{Sequence, Step, Timeline};
use crate::state::{reaction, DisplayState, Reaction};
use crate::traits::{ActionResponse, BaseDevice, PixelError, PixelSink};

/// Device type reported to the controller
pub const DEVICE_TYPE: &str = "display";

/// Device version reported to the controller
pub const DEVICE_VERSION: &str = "1.0.0";

/// Name of the address animation action
pub const SHOW_IP_ACTION: &str = "showIP";

/// Longest address text ("255.255.255.255")
pub const MAX_ADDRESS_LEN: usize = 15;

/// Maximum actions in a description
pub const MAX_ACTIONS: usize = 16;

/// Robot address text
pub type AddressText = heapless::String<MAX_ADDRESS_LEN>;

/// Errors from matrix operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MatrixError {
    /// Device not activated, or taken out of service
    Inactive,
    /// A timed sequence is still running
    Busy,
    /// Event notification absent or undecodable
    MalformedEvent,
    /// Custom event selector outside the catalog
    InvalidSelector(u8),
    /// Address text longer than a dotted quad
    AddressTooLong,
    /// Base device failed to start
    BaseRejected,
    /// Configuration document rejected
    Config(ConfigError),
    /// Pixel output failed
    Pixels(PixelError),
}

impl From<ConfigError> for MatrixError {
    fn from(e: ConfigError) -> Self {
        MatrixError::Config(e)
    }
}

impl From<PixelError> for MatrixError {
    fn from(e: PixelError) -> Self {
        MatrixError::Pixels(e)
    }
}

/// What the device tells the controller about itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub kind: &'static str,
    pub version: &'static str,
    /// Action names, indexed by action number
    pub actions: Vec<&'static str, MAX_ACTIONS>,
}

impl Description {
    /// Serialize as a JSON object
    pub fn to_json(&self) -> String {
        let mut doc = Map::new();
        doc.insert("type".into(), Value::from(self.kind));
        doc.insert("version".into(), Value::from(self.version));
        doc.insert(
            "actions".into(),
            Value::Array(self.actions.iter().map(|a| Value::from(*a)).collect()),
        );
        serde_json::to_string(&Value::Object(doc)).unwrap_or_default()
    }
}

/// Octet after the last `.` of a dotted address, or the whole text
pub fn last_octet(address: &str) -> &str {
    address.rsplit_once('.').map_or(address, |(_, octet)| octet)
}

/// LED matrix display device
pub struct LedMatrix<B, P> {
    base: B,
    pixels: P,
    config: DisplayConfig,
    state: DisplayState,
    timeline: Timeline,
    address: AddressText,
    active: bool,
}

impl<B: BaseDevice, P: PixelSink> LedMatrix<B, P> {
    /// Create a device for a `rows` x `columns` matrix
    ///
    /// Nothing is drawn until [`activate`](Self::activate).
    pub fn new(base: B, pixels: P, rows: u8, columns: u8) -> Result<Self, MatrixError> {
        Ok(Self {
            base,
            pixels,
            config: DisplayConfig::new(rows, columns)?,
            state: DisplayState::new(),
            timeline: Timeline::new(),
            address: AddressText::new(),
            active: false,
        })
    }

    /// Bring the device up
    ///
    /// Applies `stored` when a configuration was persisted. Otherwise the
    /// default document is applied and returned so the caller can persist
    /// it. Ends by blanking the matrix. Until this succeeds every other
    /// operation is refused with [`MatrixError::Inactive`].
    pub fn activate(
        &mut self,
        stored: Option<&str>,
        now_ms: u64,
    ) -> Result<Option<String>, MatrixError> {
        if !self.base.begin() {
            warn!("Base device failed to start");
            self.active = false;
            return Err(MatrixError::BaseRejected);
        }

        self.active = true;
        let result = self.establish(stored, now_ms);
        self.active = result.is_ok();
        result
    }

    /// Take the device out of service
    ///
    /// Pending steps are dropped; the device refuses work until it is
    /// activated again.
    pub fn deactivate(&mut self) {
        warn!("Matrix out of service");
        self.active = false;
        self.timeline.clear();
    }

    /// Whether the device has been activated
    pub fn is_active(&self) -> bool {
        self.active
    }

    fn establish(
        &mut self,
        stored: Option<&str>,
        now_ms: u64,
    ) -> Result<Option<String>, MatrixError> {
        let defaults = match stored {
            Some(doc) => {
                self.set_config(doc)?;
                None
            }
            None => {
                info!("No stored configuration, applying defaults");
                let doc = self.get_config();
                self.set_config(&doc)?;
                Some(doc)
            }
        };

        self.receive_event(Some(&EventNotification::custom(Glyph::Clear.index())), now_ms)?;
        info!("Matrix active, {}x{}", self.config.rows(), self.config.columns());
        Ok(defaults)
    }

    /// React to a game event
    ///
    /// `None` stands for a notification that was missing or could not be
    /// decoded; it is logged and leaves the display alone.
    pub fn receive_event(
        &mut self,
        event: Option<&EventNotification>,
        now_ms: u64,
    ) -> Result<(), MatrixError> {
        let Some(event) = event else {
            warn!("Event notification missing or malformed");
            return Err(MatrixError::MalformedEvent);
        };
        self.ensure_ready()?;
        debug!("Event {:?}", event.kind);

        match reaction(event) {
            Reaction::Show { glyph, replace } => self.show(glyph, replace),
            Reaction::Flash(glyph) => self.start(&Sequence::flash(glyph), now_ms),
            Reaction::Restore => {
                let glyph = self.state.restore();
                self.draw(glyph)
            }
            Reaction::Ignore => {
                debug!("Event needs no display change");
                Ok(())
            }
            Reaction::BadSelector(selector) => {
                warn!("Image selector {} out of range", selector);
                Err(MatrixError::InvalidSelector(selector))
            }
        }
    }

    /// Apply a configuration document
    ///
    /// The whole document is validated before anything changes. The base
    /// device then takes its fields, the color (if present) is replaced and
    /// the persistent image is redrawn with it.
    pub fn set_config(&mut self, text: &str) -> Result<(), MatrixError> {
        self.ensure_ready()?;

        let color = color_from_document(text).map_err(|e| {
            warn!("Configuration rejected: {:?}", e);
            e
        })?;
        self.base.set_config(text).map_err(|e| {
            warn!("Base device rejected configuration: {:?}", e);
            e
        })?;

        if let Some(color) = color {
            self.config.color = color;
        }
        let glyph = self.state.persistent();
        self.show(glyph, true)
    }

    /// Base device configuration merged with the current color
    pub fn get_config(&self) -> String {
        merge_color(&self.base.get_config(), &self.config.color)
    }

    /// Carry out an action by index
    ///
    /// The address animation sits right after the base device's actions;
    /// every other index goes to the base device.
    pub fn receive_action(
        &mut self,
        action: u8,
        payload: &str,
        now_ms: u64,
    ) -> Result<ActionResponse, MatrixError> {
        self.ensure_ready()?;
        if action == self.show_ip_action() {
            self.show_ip(now_ms)?;
            return Ok(ActionResponse::success());
        }
        Ok(self.base.receive_action(action, payload, &mut self.pixels))
    }

    /// Animate the last octet of the robot address
    pub fn show_ip(&mut self, now_ms: u64) -> Result<(), MatrixError> {
        let address = self.address.clone();
        let octet = last_octet(&address);
        info!("Last octet: {}", octet);
        self.show_address(octet, now_ms)
    }

    /// Animate `digits` one at a time, then restore the persistent image
    pub fn show_address(&mut self, digits: &str, now_ms: u64) -> Result<(), MatrixError> {
        self.ensure_ready()?;
        self.start(&Sequence::address(digits), now_ms)
    }

    /// Record the robot's address for [`show_ip`](Self::show_ip)
    pub fn set_address(&mut self, address: &str) -> Result<(), MatrixError> {
        let mut text = AddressText::new();
        text.push_str(address).map_err(|_| MatrixError::AddressTooLong)?;
        self.address = text;
        Ok(())
    }

    /// Apply every pending step whose deadline has passed
    pub fn poll(&mut self, now_ms: u64) -> Result<(), MatrixError> {
        while let Some(step) = self.timeline.pop_due(now_ms) {
            match step {
                Step::Show(glyph) => self.show(glyph, false)?,
                Step::Restore => {
                    let glyph = self.state.restore();
                    self.draw(glyph)?;
                }
            }
        }
        Ok(())
    }

    /// Deadline of the next pending step
    pub fn next_deadline(&self) -> Option<u64> {
        self.timeline.next_deadline()
    }

    /// Whether a timed sequence is running
    pub fn is_busy(&self) -> bool {
        !self.timeline.is_empty()
    }

    /// Action number of the address animation
    pub fn show_ip_action(&self) -> u8 {
        self.base.actions().len() as u8
    }

    /// Device type, version and action names
    pub fn description(&self) -> Description {
        let mut actions: Vec<&'static str, MAX_ACTIONS> = Vec::new();
        for name in self.base.actions().iter().copied().chain([SHOW_IP_ACTION]) {
            if actions.push(name).is_err() {
                warn!("Too many actions to describe");
                break;
            }
        }
        Description {
            kind: DEVICE_TYPE,
            version: DEVICE_VERSION,
            actions,
        }
    }

    /// Persistent image
    pub fn current_image(&self) -> Glyph {
        self.state.persistent()
    }

    /// Image on the matrix right now
    pub fn displayed_image(&self) -> Glyph {
        self.state.displayed()
    }

    /// Active display configuration
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Robot address text
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Base pixel device the matrix builds on
    pub fn base(&self) -> &B {
        &self.base
    }

    /// Pixel output the matrix draws into
    pub fn pixels(&self) -> &P {
        &self.pixels
    }

    fn ensure_ready(&self) -> Result<(), MatrixError> {
        if !self.active {
            warn!("Matrix not active, work refused");
            return Err(MatrixError::Inactive);
        }
        if self.is_busy() {
            warn!("Sequence running, work refused");
            return Err(MatrixError::Busy);
        }
        Ok(())
    }

    fn start(&mut self, sequence: &Sequence, now_ms: u64) -> Result<(), MatrixError> {
        self.timeline.start(sequence, now_ms);
        self.poll(now_ms)
    }

    fn show(&mut self, glyph: Glyph, replace: bool) -> Result<(), MatrixError> {
        self.state.show(glyph, replace);
        self.draw(glyph)
    }

    fn draw(&mut self, glyph: Glyph) -> Result<(), MatrixError> {
        let buffer = render(glyph, &self.config);
        self.pixels.write_pixels(&buffer)?;
        Ok(())
    }
}
