//! Sampler timing and bus configuration.

use embassy_time::Duration;
use embedded_hal::spi::{Mode, MODE_3};

/// SPI mode required by the 74HC165: clock idles high, data is sampled on
/// the rising edge. Words are 8 bits, one register's worth of inputs.
pub const SPI_MODE: Mode = MODE_3;

/// Configuration for [`ShiftRegisterSampler`](crate::ShiftRegisterSampler)
/// and the sampling loop.
///
/// [`SamplerConfig::default()`] reproduces the bench setup: 1 ms settle
/// time around every line transition, one sample per second, 1 MHz bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplerConfig {
    /// Wait after each control-line transition and after the transfer.
    /// Default: 1 ms.
    pub settle: Duration,
    /// Wait between the end of one cycle and the start of the next.
    /// Default: 1000 ms.
    pub repeat_interval: Duration,
    /// SPI clock rate. The firmware applies this when building the bus.
    /// Default: 1 MHz (the part is rated to 10 MHz at 3.3 V).
    pub spi_frequency_hz: u32,
    /// Byte clocked out on MOSI during the transfer. Not connected on the
    /// board. Default: `0xFF`.
    pub idle_byte: u8,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(1),
            repeat_interval: Duration::from_millis(1000),
            spi_frequency_hz: 1_000_000,
            idle_byte: 0xFF,
        }
    }
}

impl SamplerConfig {
    /// Settle time in microseconds, saturated to fit a `DelayNs` call.
    pub fn settle_us(&self) -> u32 {
        duration_to_us(self.settle)
    }

    /// Repeat interval in milliseconds, saturated to fit a `DelayNs` call
    /// (about 49 days).
    pub fn repeat_interval_ms(&self) -> u32 {
        u32::try_from(self.repeat_interval.as_millis()).unwrap_or(u32::MAX)
    }
}

fn duration_to_us(duration: Duration) -> u32 {
    u32::try_from(duration.as_micros()).unwrap_or(u32::MAX)
}
