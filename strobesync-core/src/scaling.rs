//! Sensor-to-actuator scaling
//!
//! Pure functions from a 10-bit reading to an actuator value. Every input
//! maps to a defined output; out-of-range readings are clamped first.

use crate::config::{
    DELAY_DEADBAND_US, MAX_10BIT_ADC, MOTOR_DEADBAND_COUNTS, MOTOR_SPEED_SHIFT,
    NO_MOTION_SPEED_COUNTS,
};

/// Signed motor speed offset around the neutral compare value
///
/// The reading is centred on [`NO_MOTION_SPEED_COUNTS`], attenuated by an
/// arithmetic shift of [`MOTOR_SPEED_SHIFT`], and offsets strictly inside
/// ±[`MOTOR_DEADBAND_COUNTS`] collapse to zero.
pub fn motor_offset(reading: u16) -> i16 {
    let centred = reading.min(MAX_10BIT_ADC) as i16 - NO_MOTION_SPEED_COUNTS as i16;
    let scaled = centred >> MOTOR_SPEED_SHIFT;
    if scaled > -MOTOR_DEADBAND_COUNTS && scaled < MOTOR_DEADBAND_COUNTS {
        0
    } else {
        scaled
    }
}

/// Motor PWM compare value for a Direction-channel reading
///
/// Range for 10-bit inputs: `0x1FF - 64 ..= 0x1FF + 64`.
pub fn motor_compare(reading: u16) -> u16 {
    (NO_MOTION_SPEED_COUNTS as i16 + motor_offset(reading)) as u16
}

/// Strobe delay in microseconds for a Position-channel reading
///
/// Full scale maps to `period_us`; results below [`DELAY_DEADBAND_US`]
/// collapse to zero ("no delay").
pub fn strobe_delay_us(reading: u16, period_us: u32) -> u32 {
    let reading = u64::from(reading.min(MAX_10BIT_ADC));
    let delay = (reading * u64::from(period_us) / u64::from(MAX_10BIT_ADC)) as u32;
    if delay < DELAY_DEADBAND_US {
        0
    } else {
        delay
    }
}
