//! Matrix document store in RP2040 flash
//!
//! The top 64 KiB of the Pico's flash hold a sequential-storage map keyed
//! by [`StorageKey`]. The matrix keeps one entry there: its JSON
//! configuration document, rewritten whenever the controller asks for a
//! persisted update.

use core::ops::Range;

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

pub use ruckus_hal::flash::{FlashError, StorageKey};

/// Pico flash size
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Bytes reserved for stored documents, at the end of flash
pub const CONFIG_PARTITION_SIZE: usize = 64 * 1024;

/// Flash range of the document map
pub const CONFIG_RANGE: Range<u32> =
    (FLASH_SIZE - CONFIG_PARTITION_SIZE) as u32..FLASH_SIZE as u32;

/// Scratch space for one map item: key, length header and document
pub const ITEM_BUFFER_SIZE: usize = 1024;

/// Item header overhead kept free in the scratch buffer
const ITEM_OVERHEAD: usize = 8;

type ItemBuffer = [u8; ITEM_BUFFER_SIZE];

/// Document store over the RP2040's onboard flash
pub struct Rp2040FlashStorage<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> Rp2040FlashStorage<'d> {
    /// Take the flash peripheral, using `dma` for async transfers
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }

    /// Latest document stored under `key`, borrowed from `scratch`
    async fn fetch<'b>(
        &mut self,
        key: StorageKey,
        scratch: &'b mut ItemBuffer,
    ) -> Result<Option<&'b [u8]>, FlashError> {
        map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            CONFIG_RANGE,
            &mut NoCache::new(),
            scratch,
            &key,
        )
        .await
        .map_err(|_| FlashError::Storage)
    }
}

impl<'d> ruckus_hal::FlashStorage for Rp2040FlashStorage<'d> {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let mut scratch: ItemBuffer = [0; ITEM_BUFFER_SIZE];
        let doc = self.fetch(key, &mut scratch).await?.ok_or(FlashError::NotFound)?;

        buffer
            .get_mut(..doc.len())
            .ok_or(FlashError::BufferTooSmall)?
            .copy_from_slice(doc);
        Ok(doc.len())
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        if data.len() + ITEM_OVERHEAD > ITEM_BUFFER_SIZE {
            return Err(FlashError::BufferTooSmall);
        }

        let mut scratch: ItemBuffer = [0; ITEM_BUFFER_SIZE];
        map::store_item(
            &mut self.flash,
            CONFIG_RANGE,
            &mut NoCache::new(),
            &mut scratch,
            &key,
            &data,
        )
        .await
        .map_err(|_| FlashError::Storage)
    }

    async fn exists(&mut self, key: StorageKey) -> bool {
        let mut scratch: ItemBuffer = [0; ITEM_BUFFER_SIZE];
        matches!(self.fetch(key, &mut scratch).await, Ok(Some(_)))
    }
}
