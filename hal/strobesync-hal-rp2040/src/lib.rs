//! RP2040-specific HAL for the StrobeSync firmware
//!
//! Implements the shared `strobesync-hal` traits on top of `embassy-rp`:
//!
//! - GPIO outputs with optional active-low wiring
//! - PWM slice channel as a compare register
//! - ADC input map and 12-bit to 10-bit normalization
//!
//! The one-shot strobe timer and the conversion request path live in the
//! firmware, since they are wired to embassy tasks rather than registers.

#![no_std]

pub mod adc;
pub mod gpio;
pub mod pwm;

pub use adc::{normalize_to_10bit, AdcInput};
pub use gpio::RpOutput;
pub use pwm::{PwmChannel, RpPwm};
