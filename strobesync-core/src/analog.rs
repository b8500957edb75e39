//! Round-robin analog sampler
//!
//! Two potentiometers share one converter. Every application tick the
//! sampler starts a conversion on the channel it did not sample last time,
//! unless a conversion is still in flight, in which case the tick is
//! skipped. The completed reading is tagged with the channel it came from
//! so the dispatch loop can route it to the right scaler.

use strobesync_hal::AnalogConverter;

use crate::config::MAX_10BIT_ADC;

/// Logical analog input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogChannel {
    /// Motor direction/speed potentiometer
    Direction,
    /// Strobe delay (phase position) potentiometer
    Position,
}

impl AnalogChannel {
    /// The channel sampled after this one
    pub const fn other(self) -> Self {
        match self {
            AnalogChannel::Direction => AnalogChannel::Position,
            AnalogChannel::Position => AnalogChannel::Direction,
        }
    }
}

/// Errors reported by the conversion completion path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionError {
    /// Converter finished without a valid result
    ConversionFailed,
}

/// A completed, routed conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Conversion {
    /// Channel the reading came from
    pub channel: AnalogChannel,
    /// 10-bit reading
    pub reading: u16,
}

/// Analog conversion slot
///
/// Owns the converter: at most one conversion is in flight, guarded by
/// the `busy` latch.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogSampler {
    /// Channel of the in-flight or most recent conversion
    channel: AnalogChannel,
    /// Conversion in flight
    busy: bool,
    /// Most recent valid reading (10-bit)
    reading: u16,
    /// Conversions that completed with an error
    failed: u16,
}

impl Default for AnalogSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalogSampler {
    /// Create an idle sampler
    ///
    /// Direction counts as the previous channel, so the first conversion
    /// samples Position.
    pub const fn new() -> Self {
        Self {
            channel: AnalogChannel::Direction,
            busy: false,
            reading: 0,
            failed: 0,
        }
    }

    /// Channel of the in-flight or most recent conversion
    pub const fn channel(&self) -> AnalogChannel {
        self.channel
    }

    /// Whether a conversion is in flight
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Most recent valid reading
    pub const fn last_reading(&self) -> u16 {
        self.reading
    }

    /// Number of failed conversions since start-up
    pub const fn failed_conversions(&self) -> u16 {
        self.failed
    }

    /// Application tick handler
    ///
    /// Returns the channel a conversion was started on, or `None` when the
    /// tick was skipped because the previous conversion is still running.
    pub fn on_tick<A>(&mut self, adc: &mut A) -> Option<AnalogChannel>
    where
        A: AnalogConverter<AnalogChannel>,
    {
        if self.busy {
            return None;
        }
        self.channel = self.channel.other();
        self.busy = true;
        adc.start_conversion(self.channel);
        Some(self.channel)
    }

    /// Conversion-complete handler
    ///
    /// Releases the busy latch. A valid reading is clamped to 10 bits and
    /// returned with its channel; a failed conversion is only counted.
    pub fn on_complete(&mut self, result: Result<u16, ConversionError>) -> Option<Conversion> {
        self.busy = false;
        match result {
            Ok(raw) => {
                self.reading = raw.min(MAX_10BIT_ADC);
                Some(Conversion {
                    channel: self.channel,
                    reading: self.reading,
                })
            }
            Err(ConversionError::ConversionFailed) => {
                self.failed = self.failed.saturating_add(1);
                None
            }
        }
    }
}
