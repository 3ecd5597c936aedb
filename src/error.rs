//! Error types for the sampler.

use core::fmt;

use embedded_hal::digital;
use embedded_hal::spi;

/// Control line driven by the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// 74HC165 SH/LD (pin 1). Low latches the parallel inputs.
    Load,
    /// 74HC165 CLK INH (pin 15). Low lets the clock shift data out.
    Inhibit,
}

/// Hardware faults that abandon a sampling cycle.
///
/// An unrecognised code is not an error: it decodes to
/// [`Position::Invalid`](crate::Position::Invalid) and is reported as a
/// normal reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SamplerError {
    /// Setting a control line failed.
    Line {
        line: Line,
        kind: digital::ErrorKind,
    },
    /// The SPI transfer or flush failed.
    Bus(spi::ErrorKind),
}

impl SamplerError {
    pub(crate) fn line<E: digital::Error>(line: Line, error: E) -> Self {
        SamplerError::Line {
            line,
            kind: error.kind(),
        }
    }

    pub(crate) fn bus<E: spi::Error>(error: E) -> Self {
        SamplerError::Bus(error.kind())
    }
}

impl fmt::Display for SamplerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SamplerError::Line { line, kind } => write!(f, "{:?} line error: {}", line, kind),
            SamplerError::Bus(kind) => write!(f, "SPI error: {}", kind),
        }
    }
}
