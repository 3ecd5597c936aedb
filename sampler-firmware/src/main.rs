//! graycode-sampler-firmware
//!
//! Reads a 128-step Gray-code absolute encoder through two daisy-chained
//! 74HC165 shift registers on SPI0 of a Raspberry Pi Pico 2, once per
//! second, and logs the decoded position over defmt-RTT.
//!
//! # Wiring
//!
//! | Signal        | Pico 2 Pin | 74HC165 pin        | Notes                       |
//! |---------------|------------|--------------------|-----------------------------|
//! | SPI0 SCK      | GP18       | 2 (CLK), both      |                             |
//! | SPI0 MOSI     | GP19       | —                  | Not connected               |
//! | SPI0 MISO     | GP16       | 9 (QH), low chip   | High chip QH → low chip SER |
//! | LOAD          | GP20       | 1 (SH/LD), both    | Idle high                   |
//! | INHIBIT       | GP17       | 15 (CLK INH), both | Idle high, acts as CS       |
//! | STOP button   | GP15       | —                  | Active-low, pull-up enabled |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{self, Spi};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Delay;
use embedded_hal::spi::{Phase, Polarity};
use {defmt_rtt as _, panic_probe as _};

use graycode_sampler::config::SPI_MODE;
use graycode_sampler::{run_sampler, DefmtSink, SamplerConfig, ShiftRegisterSampler};

// ---------------------------------------------------------------------------
// Boot block
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Raised by the stop button; the sampler finishes its current cycle and
/// returns.
static STOP: Signal<CriticalSectionRawMutex, ()> = Signal::new();

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

type Sampler = ShiftRegisterSampler<
    Spi<'static, SPI0, spi::Async>,
    Output<'static>,
    Output<'static>,
    Delay,
>;

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Concrete wrapper around the generic `run_sampler` loop.
#[embassy_executor::task]
async fn sampler_task(mut sampler: Sampler) {
    let summary = run_sampler(&mut sampler, &mut DefmtSink::new(), &STOP).await;
    info!(
        "Sampler exited after {} cycles ({} faults, {} unknown codes)",
        summary.cycles, summary.faults, summary.invalid
    );
}

/// Raise `STOP` on the first press of the stop button.
#[embassy_executor::task]
async fn stop_button_task(mut button: Input<'static>) {
    button.wait_for_low().await;
    info!("Stop requested");
    STOP.signal(());
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("graycode-sampler-firmware starting");

    let sampler_config = SamplerConfig::default();

    let mut spi_config = spi::Config::default();
    spi_config.frequency = sampler_config.spi_frequency_hz;
    spi_config.polarity = match SPI_MODE.polarity {
        Polarity::IdleLow => spi::Polarity::IdleLow,
        Polarity::IdleHigh => spi::Polarity::IdleHigh,
    };
    spi_config.phase = match SPI_MODE.phase {
        Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
        Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
    };

    let spi = Spi::new(
        p.SPI0,
        p.PIN_18, // SCK
        p.PIN_19, // MOSI
        p.PIN_16, // MISO
        p.DMA_CH0,
        p.DMA_CH1,
        spi_config,
    );

    // Both control lines start high so the register stays idle until the
    // first cycle.
    let load = Output::new(p.PIN_20, Level::High);
    let inhibit = Output::new(p.PIN_17, Level::High);

    let stop_button = Input::new(p.PIN_15, Pull::Up);

    let sampler = ShiftRegisterSampler::new(spi, load, inhibit, Delay, sampler_config);

    spawner.spawn(sampler_task(sampler)).unwrap();
    spawner.spawn(stop_button_task(stop_button)).unwrap();

    info!("All tasks spawned");
}
