//! Board pin assignments
//!
//! Raspberry Pi Pico wiring. Each assignment names both the pin peripheral
//! type and its GPIO number; `main` takes the peripherals through these
//! types, and the const checks at the bottom keep the numbers in step.

use embassy_rp::peripherals::{PIN_14, PIN_15, PIN_16, PIN_25, PIN_26, PIN_27};
use strobesync_hal_rp2040::AdcInput;

/// GPIO number of a pin peripheral
pub trait GpioNumber {
    /// Bank 0 GPIO number
    const GPIO: u8;
}

macro_rules! gpio_number {
    ($($pin:ident => $num:literal),* $(,)?) => {
        $(
            impl GpioNumber for $pin {
                const GPIO: u8 = $num;
            }
        )*
    };
}

gpio_number! {
    PIN_14 => 14,
    PIN_15 => 15,
    PIN_16 => 16,
    PIN_25 => 25,
    PIN_26 => 26,
    PIN_27 => 27,
}

/// Output pin assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// GPIO number
    pub pin: u8,
    /// Active-low wiring
    pub inverted: bool,
}

/// Edge of the trigger input that starts a pulse train
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerEdge {
    /// Low to high
    Rising,
    /// High to low
    Falling,
    /// Either transition
    Any,
}

/// Strobe light driver peripheral
pub type StrobePin = PIN_15;

/// Strobe light driver
pub const STROBE: PinConfig = PinConfig {
    pin: 15,
    inverted: false,
};

/// Heartbeat LED peripheral (on-board LED)
pub type HeartbeatPin = PIN_25;

/// Heartbeat LED
pub const HEARTBEAT: PinConfig = PinConfig {
    pin: 25,
    inverted: false,
};

/// Trigger input peripheral (pulled up, opto-isolator pulls low)
pub type TriggerPin = PIN_14;

/// Trigger input GPIO
pub const TRIGGER_PIN: u8 = 14;

/// Trigger polarity
pub const TRIGGER_EDGE: TriggerEdge = TriggerEdge::Falling;

/// Motor PWM peripheral (slice 0 channel A)
pub type MotorPwmPin = PIN_16;

/// Motor PWM output GPIO
pub const MOTOR_PWM_PIN: u8 = 16;

/// Direction potentiometer peripheral
pub type DirectionPin = PIN_26;

/// Direction potentiometer
pub const DIRECTION_INPUT: AdcInput = AdcInput::Adc0;

/// Position potentiometer peripheral
pub type PositionPin = PIN_27;

/// Position potentiometer
pub const POSITION_INPUT: AdcInput = AdcInput::Adc1;

const _: () = assert!(<StrobePin as GpioNumber>::GPIO == STROBE.pin);
const _: () = assert!(<HeartbeatPin as GpioNumber>::GPIO == HEARTBEAT.pin);
const _: () = assert!(<TriggerPin as GpioNumber>::GPIO == TRIGGER_PIN);
const _: () = assert!(<MotorPwmPin as GpioNumber>::GPIO == MOTOR_PWM_PIN);
const _: () = assert!(<DirectionPin as GpioNumber>::GPIO == DIRECTION_INPUT.gpio());
const _: () = assert!(<PositionPin as GpioNumber>::GPIO == POSITION_INPUT.gpio());
