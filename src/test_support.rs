//! Recording mocks shared by the unit tests.
//!
//! Every mock appends to one [`Log`], so a test can assert the exact
//! interleaving of line changes, transfers and delays.

use std::cell::RefCell;
use std::collections::VecDeque;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, ErrorKind};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::SpiBus;

use crate::error::{Line, SamplerError};
use crate::report::{Reading, ReportSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Load(bool),
    Inhibit(bool),
    Transfer { sent: u8, received: u8 },
    Flush,
    DelayUs(u32),
    DelayMs(u32),
}

#[derive(Debug, Default)]
pub struct Log(RefCell<Vec<Event>>);

impl Log {
    fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<Event> {
        self.0.take()
    }

    pub fn transfers(&self) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|event| matches!(event, Event::Transfer { .. }))
            .count()
    }
}

// ---------------------------------------------------------------------------
// Pins
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct MockPinError;

impl digital::Error for MockPinError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

pub struct MockPin<'a> {
    line: Line,
    log: &'a Log,
    fail_on: Option<bool>,
}

impl<'a> MockPin<'a> {
    pub fn new(line: Line, log: &'a Log) -> Self {
        Self { line, log, fail_on: None }
    }

    /// Fail every attempt to drive the pin to `level`.
    pub fn failing_on(mut self, level: bool) -> Self {
        self.fail_on = Some(level);
        self
    }

    pub fn line(&self) -> Line {
        self.line
    }

    fn set(&mut self, level: bool) -> Result<(), MockPinError> {
        if self.fail_on == Some(level) {
            return Err(MockPinError);
        }
        self.log.push(match self.line {
            Line::Load => Event::Load(level),
            Line::Inhibit => Event::Inhibit(level),
        });
        Ok(())
    }
}

impl digital::ErrorType for MockPin<'_> {
    type Error = MockPinError;
}

impl OutputPin for MockPin<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }
}

// ---------------------------------------------------------------------------
// SPI
// ---------------------------------------------------------------------------

/// SPI bus answering from a script, then repeating the last scripted byte
/// (or `0xFF`, a floating MISO, if nothing was scripted).
pub struct MockSpi<'a> {
    log: &'a Log,
    responses: VecDeque<Result<u8, ErrorKind>>,
    fallback: u8,
}

impl<'a> MockSpi<'a> {
    pub fn new(log: &'a Log, responses: &[Result<u8, ErrorKind>]) -> Self {
        Self {
            log,
            responses: responses.iter().copied().collect(),
            fallback: 0xFF,
        }
    }

    fn next(&mut self) -> Result<u8, ErrorKind> {
        let response = self.responses.pop_front().unwrap_or(Ok(self.fallback));
        if let Ok(byte) = response {
            self.fallback = byte;
        }
        response
    }
}

impl spi::ErrorType for MockSpi<'_> {
    type Error = ErrorKind;
}

impl SpiBus<u8> for MockSpi<'_> {
    async fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        for word in words.iter_mut() {
            *word = self.next()?;
        }
        Ok(())
    }

    async fn write(&mut self, _words: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        for (word, &sent) in read.iter_mut().zip(write) {
            let received = self.next()?;
            self.log.push(Event::Transfer { sent, received });
            *word = received;
        }
        Ok(())
    }

    async fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        for word in words.iter_mut() {
            let received = self.next()?;
            self.log.push(Event::Transfer { sent: *word, received });
            *word = received;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.log.push(Event::Flush);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Delay
// ---------------------------------------------------------------------------

/// Delay that returns immediately and records the requested wait.
pub struct MockDelay<'a> {
    log: &'a Log,
}

impl<'a> MockDelay<'a> {
    pub fn new(log: &'a Log) -> Self {
        Self { log }
    }
}

impl DelayNs for MockDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::DelayUs(ns / 1_000));
    }

    async fn delay_us(&mut self, us: u32) {
        self.log.push(Event::DelayUs(us));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::DelayMs(ms));
    }
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Reading(Reading),
    Fault(SamplerError),
}

/// Sink collecting every outcome. Optionally raises `stop` once a given
/// number of outcomes has been seen.
#[derive(Default)]
pub struct RecordingSink<'a> {
    pub outcomes: Vec<Outcome>,
    stop: Option<(usize, &'a Signal<NoopRawMutex, ()>)>,
}

impl<'a> RecordingSink<'a> {
    pub fn stopping_after(count: usize, stop: &'a Signal<NoopRawMutex, ()>) -> Self {
        Self {
            outcomes: Vec::new(),
            stop: Some((count, stop)),
        }
    }

    fn record(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
        if let Some((count, stop)) = self.stop {
            if self.outcomes.len() == count {
                stop.signal(());
            }
        }
    }
}

impl ReportSink for RecordingSink<'_> {
    fn reading(&mut self, reading: Reading) {
        self.record(Outcome::Reading(reading));
    }

    fn fault(&mut self, error: SamplerError) {
        self.record(Outcome::Fault(error));
    }
}
