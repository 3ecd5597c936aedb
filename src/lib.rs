//! Async sampler for a 128-step Gray-code absolute encoder wired through a
//! pair of daisy-chained 74HC165 parallel-in/serial-out shift registers.
//!
//! # Architecture
//!
//! - **[`gray_table`]** — the compiled-in code table, in position order,
//!   plus the 256-entry lookup derived from it at compile time.
//! - **[`decoder`]** — [`decode`] maps a sampled byte to a [`Position`].
//! - **[`ShiftRegisterSampler`]** — drives the LOAD and INHIBIT lines and
//!   the SPI transfer for one sample.
//! - **[`run_sampler`]** — the fixed-cadence sampling loop, stoppable at
//!   cycle boundaries through an [`embassy_sync::signal::Signal`].
//!
//! # Quick start
//!
//! ```ignore
//! use graycode_sampler::{run_sampler, DefmtSink, SamplerConfig, ShiftRegisterSampler};
//!
//! let mut sampler = ShiftRegisterSampler::new(spi, load, inhibit, Delay, SamplerConfig::default());
//! let summary = run_sampler(&mut sampler, &mut DefmtSink::new(), &STOP).await;
//! ```
//!
//! # Features
//!
//! - **`defmt`** — structured logging via [`defmt`] and [`defmt::Format`]
//!   implementations on the public types.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod decoder;
pub mod error;
pub mod gray_table;
pub mod report;
pub mod sampler;
pub mod sampling_task;

#[cfg(test)]
mod test_support;

pub use config::SamplerConfig;
pub use decoder::{decode, encode, step_between, Position};
pub use error::{Line, SamplerError};
#[cfg(feature = "defmt")]
pub use report::DefmtSink;
pub use report::{Reading, ReportSink};
pub use sampler::{CyclePhase, ShiftRegisterSampler};
pub use sampling_task::{run_sampler, RunSummary};
