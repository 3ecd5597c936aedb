//! Compiled-in Gray code table for the 128-step absolute encoder disc.
//!
//! [`GRAY_CODES`] lists the byte read from the register for every
//! position, in position order. It captures the physical wiring and
//! mechanical phase of the disc, so it is kept as data rather than derived
//! from the reflected binary Gray code.
//!
//! [`DECODE_TABLE`] is the inverse: one entry per possible byte, `None` for
//! the 128 bytes that never appear on the disc.

// ---------------------------------------------------------------------------
// Sizes
// ---------------------------------------------------------------------------

/// Number of distinct positions on the encoder disc.
pub const POSITION_COUNT: usize = 128;

/// Number of possible sampled byte values.
pub const SAMPLE_SPACE: usize = 256;

/// Out-of-range value used for an unrecognised code in the raw numeric
/// reporting format. Never a valid position.
pub const SENTINEL_POSITION: u8 = 200;

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Register byte for each position. `GRAY_CODES[p]` is the code seen at
/// position `p`.
#[rustfmt::skip]
pub const GRAY_CODES: [u8; POSITION_COUNT] = [
    // 0..=15
    127,  63,  62,  58,  56, 184, 152,  24,   8,  72,  73,  77,  79,  15,  47, 175,
    // 16..=31
    191, 159,  31,  29,  28,  92,  76,  12,   4,  36, 164, 166, 167, 135, 151, 215,
    // 32..=47
    223, 207, 143, 142,  14,  46,  38,   6,   2,  18,  82,  83, 211, 195, 203, 235,
    // 48..=63
    239, 231, 199,  71,   7,  23,  19,   3,   1,   9,  41, 169, 233, 225, 229, 245,
    // 64..=79
    247, 243, 227, 163, 131, 139, 137, 129, 128, 132, 148, 212, 244, 240, 242, 250,
    // 80..=95
    251, 249, 241, 209, 193, 197, 196, 192,  64,  66,  74, 106, 122, 120, 121, 125,
    // 96..=111
    253, 252, 248, 232, 224, 226,  98,  96,  32,  33,  37,  53,  61,  60, 188, 190,
    // 112..=127
    254, 126, 124, 116, 112, 113,  49,  48,  16, 144, 146, 154, 158,  30,  94,  95,
];

/// Position for every possible byte. Indexed directly by the sample.
pub const DECODE_TABLE: [Option<u8>; SAMPLE_SPACE] = build_decode_table(&GRAY_CODES);

/// Invert a position-ordered code list into a byte-indexed lookup.
///
/// Evaluated at compile time; a code listed for two positions aborts the
/// build.
const fn build_decode_table(codes: &[u8; POSITION_COUNT]) -> [Option<u8>; SAMPLE_SPACE] {
    let mut table = [None; SAMPLE_SPACE];
    let mut position = 0;
    while position < POSITION_COUNT {
        let code = codes[position] as usize;
        if table[code].is_some() {
            panic!("Gray code assigned to more than one position");
        }
        table[code] = Some(position as u8);
        position += 1;
    }
    table
}

// ── Unit Tests ───────────────────────────────────────────────────────
