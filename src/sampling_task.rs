//! Fixed-cadence sampling loop.
//!
//! [`run_sampler`] is a regular `async fn`, not an Embassy `#[task]`.
//! Firmware wraps it in a thin concrete task, since Embassy tasks cannot be
//! generic:
//!
//! ```ignore
//! #[embassy_executor::task]
//! async fn sampler_task(mut sampler: Sampler, stop: &'static Signal<CriticalSectionRawMutex, ()>) {
//!     run_sampler(&mut sampler, &mut DefmtSink::new(), stop).await;
//! }
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::SpiBus;

use crate::error::SamplerError;
use crate::report::{Reading, ReportSink};
use crate::sampler::ShiftRegisterSampler;

/// Counters for a finished [`run_sampler`] call.
///
/// Counters saturate at `u32::MAX` rather than wrap or panic: the loop
/// may run long enough to exhaust them, and a pinned maximum still reads
/// as "at least this many".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunSummary {
    /// Cycles started, completed or not.
    pub cycles: u32,
    /// Cycles abandoned on a line or bus failure.
    pub faults: u32,
    /// Completed cycles whose sample was not a known code.
    pub invalid: u32,
}

impl RunSummary {
    /// Count one finished cycle.
    pub fn record(&mut self, outcome: &Result<Reading, SamplerError>) {
        self.cycles = self.cycles.saturating_add(1);
        match outcome {
            Ok(reading) if !reading.position.is_valid() => {
                self.invalid = self.invalid.saturating_add(1)
            }
            Ok(_) => {}
            Err(_) => self.faults = self.faults.saturating_add(1),
        }
    }
}

/// Sample forever at the configured cadence, until `stop` is signalled.
///
/// # Control flow
///
/// 1. Drive LOAD and INHIBIT idle. A failure is reported and the loop
///    starts anyway; the first cycle drives both lines from there, and
///    ends with them high whether it completes or is abandoned.
/// 2. Loop:
///    - **Idle** — if `stop` has been signalled, return. The signal is
///      only checked here, so a cycle in progress always completes with
///      its normal timing.
///    - **Cycle** — latch, shift and report one sample (see
///      [`ShiftRegisterSampler::cycle`]).
///    - **Wait** — sleep for the repeat interval, whatever the outcome.
///
/// `stop` is observed without being consumed.
pub async fn run_sampler<SPI, LD, INH, D, S, M>(
    sampler: &mut ShiftRegisterSampler<SPI, LD, INH, D>,
    sink: &mut S,
    stop: &Signal<M, ()>,
) -> RunSummary
where
    SPI: SpiBus<u8>,
    LD: OutputPin,
    INH: OutputPin,
    D: DelayNs,
    S: ReportSink + ?Sized,
    M: RawMutex,
{
    let mut summary = RunSummary::default();

    if let Err(error) = sampler.init() {
        #[cfg(feature = "defmt")]
        defmt::warn!("could not idle control lines: {}", error);
        sink.fault(error);
    }

    #[cfg(feature = "defmt")]
    defmt::info!("sampling every {} ms", sampler.config().repeat_interval.as_millis());

    loop {
        if stop.signaled() {
            break;
        }

        let outcome = sampler.cycle(&mut *sink).await;
        summary.record(&outcome);

        sampler.wait_next_cycle().await;
    }

    #[cfg(feature = "defmt")]
    defmt::info!("sampling stopped: {}", summary);

    summary
}
