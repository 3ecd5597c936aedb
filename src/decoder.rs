//! Gray code to position decoding.

use core::fmt;

use crate::gray_table::{DECODE_TABLE, GRAY_CODES, POSITION_COUNT, SENTINEL_POSITION};

/// Decoded encoder position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Position {
    /// A position on the disc, 0–127.
    Valid(u8),
    /// The sample is not one of the 128 codes on the disc.
    Invalid,
}

impl Position {
    /// Position index, or `None` for [`Position::Invalid`].
    pub fn index(self) -> Option<u8> {
        match self {
            Position::Valid(index) => Some(index),
            Position::Invalid => None,
        }
    }

    pub fn is_valid(self) -> bool {
        matches!(self, Position::Valid(_))
    }

    /// Flatten to the raw numeric format: the index, or
    /// [`SENTINEL_POSITION`] when invalid.
    pub fn to_raw(self) -> u8 {
        self.index().unwrap_or(SENTINEL_POSITION)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Position::Valid(index) => write!(f, "{}", index),
            Position::Invalid => write!(f, "invalid"),
        }
    }
}

/// Decode a sampled register byte.
///
/// Total over all 256 inputs: bytes that are not on the disc decode to
/// [`Position::Invalid`].
///
/// # Example
/// ```
/// use graycode_sampler::{decode, Position};
///
/// assert_eq!(decode(127), Position::Valid(0));
/// assert_eq!(decode(0), Position::Invalid);
/// ```
pub fn decode(sample: u8) -> Position {
    match DECODE_TABLE[sample as usize] {
        Some(index) => Position::Valid(index),
        None => Position::Invalid,
    }
}

/// Register byte expected at `position`, or `None` if `position >= 128`.
pub fn encode(position: u8) -> Option<u8> {
    GRAY_CODES.get(position as usize).copied()
}

/// Shortest signed movement from one position to another around the disc.
///
/// The result lies in `-64..=63`; a half-turn is reported as `-64`.
/// Returns `None` if either side is invalid.
pub fn step_between(from: Position, to: Position) -> Option<i8> {
    let (from, to) = (from.index()?, to.index()?);
    let count = POSITION_COUNT as i16;
    let half = count / 2;
    let forward = (to as i16 - from as i16).rem_euclid(count);
    let step = if forward >= half { forward - count } else { forward };
    Some(step as i8)
}

// ── Unit Tests ───────────────────────────────────────────────────────
