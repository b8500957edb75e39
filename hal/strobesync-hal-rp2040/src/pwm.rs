//! PWM slice channel as a compare register

use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use strobesync_hal::PwmCompare;

/// Which output of the slice carries the signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmChannel {
    /// Channel A (even GPIO)
    A,
    /// Channel B (odd GPIO)
    B,
}

/// One channel of an RP2040 PWM slice
///
/// Keeps a copy of the slice configuration, since embassy-rp rewrites
/// the whole slice on every update.
pub struct RpPwm<'d> {
    pwm: Pwm<'d>,
    config: PwmConfig,
    channel: PwmChannel,
}

impl<'d> RpPwm<'d> {
    /// Configure the slice with the given counter top and compare value
    pub fn new(mut pwm: Pwm<'d>, channel: PwmChannel, top: u16, initial: u16) -> Self {
        let mut config = PwmConfig::default();
        config.top = top;
        match channel {
            PwmChannel::A => config.compare_a = initial,
            PwmChannel::B => config.compare_b = initial,
        }
        pwm.set_config(&config);
        Self {
            pwm,
            config,
            channel,
        }
    }
}

impl PwmCompare for RpPwm<'_> {
    fn set_compare_value(&mut self, value: u16) {
        match self.channel {
            PwmChannel::A => self.config.compare_a = value,
            PwmChannel::B => self.config.compare_b = value,
        }
        self.pwm.set_config(&self.config);
    }

    fn top(&self) -> u16 {
        self.config.top
    }
}
