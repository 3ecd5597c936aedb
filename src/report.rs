//! Reporting interface for sampling results.

#[cfg(feature = "defmt")]
use crate::decoder::step_between;
use crate::decoder::{decode, Position};
use crate::error::SamplerError;

/// One sampled byte and what it decoded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub sample: u8,
    pub position: Position,
}

impl Reading {
    pub fn new(sample: u8) -> Self {
        Self {
            sample,
            position: decode(sample),
        }
    }
}

/// Receives the outcome of every sampling cycle, in order.
///
/// A completed cycle produces exactly one [`reading`](Self::reading) call,
/// even when the sample decodes to [`Position::Invalid`]. An abandoned
/// cycle produces exactly one [`fault`](Self::fault) call instead.
pub trait ReportSink {
    fn reading(&mut self, reading: Reading);

    fn fault(&mut self, error: SamplerError);
}

/// Sink that logs every cycle through `defmt`.
///
/// Remembers the last valid position and logs the step to each new one.
#[cfg(feature = "defmt")]
#[derive(Debug, Default)]
pub struct DefmtSink {
    last: Option<Position>,
}

#[cfg(feature = "defmt")]
impl DefmtSink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "defmt")]
impl ReportSink for DefmtSink {
    fn reading(&mut self, reading: Reading) {
        match reading.position {
            Position::Valid(index) => {
                match self.last.and_then(|last| step_between(last, reading.position)) {
                    Some(step) if step != 0 => {
                        defmt::info!("sample {=u8:#x} -> position {} (step {})", reading.sample, index, step)
                    }
                    _ => defmt::info!("sample {=u8:#x} -> position {}", reading.sample, index),
                }
                self.last = Some(reading.position);
            }
            Position::Invalid => {
                defmt::warn!("sample {=u8:#x} is not a known Gray code", reading.sample);
            }
        }
    }

    fn fault(&mut self, error: SamplerError) {
        defmt::error!("sampling cycle abandoned: {}", error);
    }
}
