//! Configuration persistence
//!
//! Loads and saves the matrix configuration document in flash storage.
//! An absent document is not an error; the matrix then establishes and
//! saves its defaults.

use core::str;
use defmt::*;

use ruckus_hal_rp2040::flash::{FlashError, StorageKey};
use ruckus_hal_rp2040::FlashStorageTrait;
use ruckus_hal_rp2040::Rp2040FlashStorage;

/// Maximum stored document size
pub const MAX_CONFIG_SIZE: usize = 512;

/// Stored configuration document
pub type ConfigText = heapless::String<MAX_CONFIG_SIZE>;

/// Storage key for the matrix document
const CONFIG_KEY: StorageKey = StorageKey::MatrixConfig;

/// Configuration persistence errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    /// Flash operation failed
    Flash(FlashError),
    /// Stored document is not UTF-8
    InvalidUtf8,
    /// Document larger than the storage slot
    TooLarge,
}

impl From<FlashError> for PersistError {
    fn from(e: FlashError) -> Self {
        PersistError::Flash(e)
    }
}

/// Configuration persistence manager
pub struct ConfigPersistence<'d> {
    storage: Rp2040FlashStorage<'d>,
}

impl<'d> ConfigPersistence<'d> {
    /// Create a new config persistence manager
    pub fn new(storage: Rp2040FlashStorage<'d>) -> Self {
        Self { storage }
    }

    /// Load the stored document, `None` if nothing was saved yet
    pub async fn load(&mut self) -> Result<Option<ConfigText>, PersistError> {
        if !self.storage.exists(CONFIG_KEY).await {
            debug!("No {} in flash", CONFIG_KEY.file_name());
            return Ok(None);
        }

        let mut buffer = [0u8; MAX_CONFIG_SIZE];
        let len = self.storage.read(CONFIG_KEY, &mut buffer).await?;
        debug!("Read {} bytes of {} from flash", len, CONFIG_KEY.file_name());

        let text = str::from_utf8(&buffer[..len]).map_err(|_| PersistError::InvalidUtf8)?;
        let mut doc = ConfigText::new();
        doc.push_str(text).map_err(|_| PersistError::TooLarge)?;
        Ok(Some(doc))
    }

    /// Save `doc`, replacing any stored document
    pub async fn save(&mut self, doc: &str) -> Result<(), PersistError> {
        if doc.len() > MAX_CONFIG_SIZE {
            return Err(PersistError::TooLarge);
        }
        self.storage.write(CONFIG_KEY, doc.as_bytes()).await?;
        info!("Saved {} ({} bytes)", CONFIG_KEY.file_name(), doc.len());
        Ok(())
    }
}
