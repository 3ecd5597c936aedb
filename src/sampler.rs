//! Load/inhibit/shift sequencing for the 74HC165 chain.
//!
//! [`ShiftRegisterSampler`] owns the SPI bus, both control lines and a
//! delay source. Each call to [`sample`](ShiftRegisterSampler::sample)
//! walks the register through one full latch-and-shift sequence and
//! returns the captured byte.
//!
//! ```text
//!            Idle   LatchLow   LatchHigh  EnableOutputs  Transfer  DisableOutputs
//! LOAD    ‾‾‾‾‾‾‾‾‾‾\________/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾
//! INHIBIT ‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾\____________________________/‾‾‾‾‾‾‾
//! SCK     ‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾\_/‾\_/‾ ... ‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾
//!                   |-settle-|               |-settle-|      |-settle-|
//! ```

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::SpiBus;

use crate::config::SamplerConfig;
use crate::error::{Line, SamplerError};
use crate::report::{Reading, ReportSink};

/// Step of the sampling sequence the sampler is in, or last failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CyclePhase {
    /// LOAD high, INHIBIT high. Waiting for the next cycle.
    Idle,
    /// LOAD low: parallel inputs are latched.
    LatchLow,
    /// LOAD high: register holds the latched value.
    LatchHigh,
    /// INHIBIT low: clock reaches the register.
    EnableOutputs,
    /// One SPI word is clocked in.
    Transfer,
    /// INHIBIT high again.
    DisableOutputs,
    /// Sample decoded and handed to the sink.
    Report,
}

/// Sampler for a 74HC165 shift register read over SPI.
///
/// INHIBIT acts as the chip select, so the SPI peripheral is taken as a
/// bare [`SpiBus`] and the sampler drives the line itself. The bus must be
/// configured for [`SPI_MODE`](crate::config::SPI_MODE), 8-bit words, at
/// [`SamplerConfig::spi_frequency_hz`].
///
/// # Example
///
/// ```no_run
/// use graycode_sampler::{SamplerConfig, ShiftRegisterSampler};
///
/// # async fn example(
/// #     spi: impl embedded_hal_async::spi::SpiBus,
/// #     load: impl embedded_hal::digital::OutputPin,
/// #     inhibit: impl embedded_hal::digital::OutputPin,
/// #     delay: impl embedded_hal_async::delay::DelayNs,
/// # ) {
/// let mut sampler = ShiftRegisterSampler::new(spi, load, inhibit, delay, SamplerConfig::default());
/// sampler.init().unwrap();
/// let sample = sampler.sample().await.unwrap();
/// # }
/// ```
pub struct ShiftRegisterSampler<SPI, LD, INH, D> {
    spi: SPI,
    load: LD,
    inhibit: INH,
    delay: D,
    config: SamplerConfig,
    phase: CyclePhase,
}

impl<SPI, LD, INH, D> ShiftRegisterSampler<SPI, LD, INH, D>
where
    SPI: SpiBus<u8>,
    LD: OutputPin,
    INH: OutputPin,
    D: DelayNs,
{
    /// Create a sampler. No lines are touched until [`init`](Self::init).
    ///
    /// # Arguments
    /// * `spi` — SPI bus wired to the last register's QH output (MISO)
    /// * `load` — output driving SH/LD on both registers
    /// * `inhibit` — output driving CLK INH on both registers
    /// * `delay` — delay source used for settle and repeat waits
    /// * `config` — timing configuration
    pub fn new(spi: SPI, load: LD, inhibit: INH, delay: D, config: SamplerConfig) -> Self {
        Self {
            spi,
            load,
            inhibit,
            delay,
            config,
            phase: CyclePhase::Idle,
        }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Phase of the current cycle. After a failed cycle this is the phase
    /// that failed.
    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Give back the bus, lines and delay source.
    pub fn release(self) -> (SPI, LD, INH, D) {
        (self.spi, self.load, self.inhibit, self.delay)
    }

    // -----------------------------------------------------------------------
    // Sequencing
    // -----------------------------------------------------------------------

    /// Drive both control lines to their idle (high) levels.
    ///
    /// # Errors
    /// * [`SamplerError::Line`] if either line cannot be set
    pub fn init(&mut self) -> Result<(), SamplerError> {
        self.enter(CyclePhase::Idle);
        self.set_load(true)?;
        self.set_inhibit(true)?;
        Ok(())
    }

    /// Latch the parallel inputs and shift one byte out of the register.
    ///
    /// Waits [`SamplerConfig::settle`] after pulling LOAD low, after
    /// enabling the clock and after the transfer.
    ///
    /// # Errors
    /// Any line or bus failure abandons the sequence. Both lines are then
    /// returned to their idle levels on a best-effort basis and the first
    /// error is returned; no partial sample is produced.
    pub async fn sample(&mut self) -> Result<u8, SamplerError> {
        match self.shift_in().await {
            Ok(sample) => Ok(sample),
            Err(error) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("sampling failed in {}: {}", self.phase, error);
                self.release_lines();
                Err(error)
            }
        }
    }

    /// Run one sampling cycle and hand the outcome to `sink`.
    ///
    /// Calls [`ReportSink::reading`] once on success, including when the
    /// sample is not a known code, or [`ReportSink::fault`] once on failure.
    pub async fn cycle<S>(&mut self, sink: &mut S) -> Result<Reading, SamplerError>
    where
        S: ReportSink + ?Sized,
    {
        match self.sample().await {
            Ok(sample) => {
                self.enter(CyclePhase::Report);
                let reading = Reading::new(sample);
                sink.reading(reading);
                Ok(reading)
            }
            Err(error) => {
                sink.fault(error);
                Err(error)
            }
        }
    }

    /// Wait out [`SamplerConfig::repeat_interval`] and return to Idle.
    pub async fn wait_next_cycle(&mut self) {
        self.delay.delay_ms(self.config.repeat_interval_ms()).await;
        self.enter(CyclePhase::Idle);
    }

    async fn shift_in(&mut self) -> Result<u8, SamplerError> {
        self.enter(CyclePhase::LatchLow);
        self.set_load(false)?;
        self.settle().await;

        self.enter(CyclePhase::LatchHigh);
        self.set_load(true)?;

        self.enter(CyclePhase::EnableOutputs);
        self.set_inhibit(false)?;
        self.settle().await;

        self.enter(CyclePhase::Transfer);
        let mut frame = [self.config.idle_byte];
        self.spi
            .transfer_in_place(&mut frame)
            .await
            .map_err(SamplerError::bus)?;
        // INHIBIT must not rise while the last bits are still on the wire.
        self.spi.flush().await.map_err(SamplerError::bus)?;
        self.settle().await;

        self.enter(CyclePhase::DisableOutputs);
        self.set_inhibit(true)?;

        Ok(frame[0])
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn enter(&mut self, phase: CyclePhase) {
        #[cfg(feature = "defmt")]
        defmt::trace!("{} -> {}", self.phase, phase);
        self.phase = phase;
    }

    async fn settle(&mut self) {
        self.delay.delay_us(self.config.settle_us()).await;
    }

    fn set_load(&mut self, high: bool) -> Result<(), SamplerError> {
        let result = if high { self.load.set_high() } else { self.load.set_low() };
        result.map_err(|e| SamplerError::line(Line::Load, e))
    }

    fn set_inhibit(&mut self, high: bool) -> Result<(), SamplerError> {
        let result = if high { self.inhibit.set_high() } else { self.inhibit.set_low() };
        result.map_err(|e| SamplerError::line(Line::Inhibit, e))
    }

    fn release_lines(&mut self) {
        // Already failing; a second error here adds nothing.
        let _ = self.load.set_high();
        let _ = self.inhibit.set_high();
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
