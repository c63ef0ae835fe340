//! Ruckus Matrix - RoboRuckus LED Matrix Firmware
//!
//! Shows the robot's game state on a 5x5 NeoPixel matrix. The robot
//! controller talks to the matrix over UART0; the strip is driven from
//! PIO0.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{PIO0, UART0};
use embassy_rp::pio::{LoadedProgram, Pio};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use ruckus_core::LedMatrix;
use ruckus_hal_rp2040::ws2812::load_program;
use ruckus_hal_rp2040::{PioPixels, Rp2040FlashStorage};

use crate::base::{NeoPixels, PixelsConfig};
use crate::config::ConfigPersistence;
use crate::pixels::DimmedPixels;

// Heap allocator for configuration documents
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 16KB
const HEAP_SIZE: usize = 16 * 1024;

/// Embedded default strip settings (compiled into firmware)
/// Edit matrix.json and rebuild to customize
const EMBEDDED_DEFAULTS: &str = include_str!("../matrix.json");

/// Matrix geometry
const MATRIX_ROWS: u8 = 5;
const MATRIX_COLUMNS: u8 = 5;
const PIXEL_COUNT: usize = MATRIX_ROWS as usize * MATRIX_COLUMNS as usize;

mod base;
mod channels;
mod config;
mod pixels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// The strip driver borrows its PIO program for the life of the firmware
static WS2812_PROGRAM: StaticCell<LoadedProgram<'static, PIO0>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Ruckus Matrix firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let persistence = ConfigPersistence::new(Rp2040FlashStorage::new(p.FLASH, p.DMA_CH0));

    let pixels_config = match serde_json::from_str::<PixelsConfig>(EMBEDDED_DEFAULTS) {
        Ok(config) => config,
        Err(_) => {
            warn!("Embedded defaults unreadable, using built-in values");
            PixelsConfig::default()
        }
    };

    // Controller link: 115200 baud default
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized for controller link");

    // Pixel data on GPIO2
    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);
    let program = WS2812_PROGRAM.init(load_program(&mut common));
    let strip = PioPixels::new(&mut common, sm0, p.PIN_2, program, PIXEL_COUNT);
    info!("PIO pixel strip initialized: {} pixels", PIXEL_COUNT);

    let matrix: tasks::Matrix = match LedMatrix::new(
        NeoPixels::new(pixels_config, PIXEL_COUNT),
        DimmedPixels::new(strip),
        MATRIX_ROWS,
        MATRIX_COLUMNS,
    ) {
        Ok(matrix) => matrix,
        Err(e) => {
            error!("Matrix geometry rejected: {:?}", e);
            return;
        }
    };

    unwrap!(spawner.spawn(tasks::link_rx_task(rx)));
    unwrap!(spawner.spawn(tasks::link_tx_task(tx)));
    unwrap!(spawner.spawn(tasks::matrix_task(matrix, persistence)));

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
