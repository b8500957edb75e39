//! Compile-time configuration
//!
//! Every timing and scaling parameter of the controller is fixed at build
//! time. The structs group the constants for the components that consume
//! them.

/// One millisecond in timer units (microseconds)
pub const ONE_MILLISECOND_US: u32 = 1_000;

/// Inter-pulse wait between the end of one pulse and the start of the next
pub const STROBE_PERIOD_MS: u16 = 49;

/// Inter-pulse period in microseconds (full scale of the strobe delay)
pub const STROBE_PERIOD_US: u32 = STROBE_PERIOD_MS as u32 * ONE_MILLISECOND_US;

/// Time the strobe output stays active per pulse
pub const PULSE_ON_US: u32 = ONE_MILLISECOND_US;

/// Duration of one wait-phase countdown step
pub const WAIT_TICK_US: u32 = ONE_MILLISECOND_US;

/// Pulses emitted per trigger
pub const MAX_STROBES: u8 = 10;

/// Application tick period (drives analog sampling)
pub const APPLICATION_TICK_MS: u16 = 20;

/// Heartbeat tick period (toggles the heartbeat LED)
pub const HEARTBEAT_TICK_MS: u16 = 500;

/// Motor PWM compare value for "no motion"
pub const NO_MOTION_SPEED_COUNTS: u16 = 0x1FF;

/// Right shift applied to the centred reading to cap motor speed
pub const MOTOR_SPEED_SHIFT: u32 = 3;

/// Scaled motor offsets strictly inside ±this collapse to zero
pub const MOTOR_DEADBAND_COUNTS: i16 = 10;

/// Strobe delays below this many microseconds collapse to zero
pub const DELAY_DEADBAND_US: u32 = 10;

/// Full-scale reading of the 10-bit analog converter
pub const MAX_10BIT_ADC: u16 = 1023;

/// Motor PWM counter top (10-bit fast PWM)
pub const MOTOR_PWM_TOP: u16 = 1023;

const _: () = assert!(MAX_STROBES > 0);
const _: () = assert!(STROBE_PERIOD_MS > 0);
const _: () = assert!(APPLICATION_TICK_MS > 0 && HEARTBEAT_TICK_MS > 0);
const _: () = assert!(NO_MOTION_SPEED_COUNTS <= MOTOR_PWM_TOP);

/// Strobe pulse-train timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StrobeConfig {
    /// Inter-pulse wait, counted in wait ticks
    pub period_ms: u16,
    /// Active time of each pulse (µs)
    pub pulse_on_us: u32,
    /// Length of one wait tick (µs)
    pub wait_tick_us: u32,
    /// Pulses per trigger
    pub max_pulses: u8,
}

impl StrobeConfig {
    /// Board defaults
    pub const DEFAULT: Self = Self {
        period_ms: STROBE_PERIOD_MS,
        pulse_on_us: PULSE_ON_US,
        wait_tick_us: WAIT_TICK_US,
        max_pulses: MAX_STROBES,
    };

    /// Inter-pulse period in microseconds
    pub const fn period_us(&self) -> u32 {
        self.period_ms as u32 * ONE_MILLISECOND_US
    }
}

impl Default for StrobeConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Periodic tick reload values, in 1 ms base ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickConfig {
    /// Application tick period
    pub application_ms: u16,
    /// Heartbeat tick period
    pub heartbeat_ms: u16,
}

impl TickConfig {
    /// Board defaults
    pub const DEFAULT: Self = Self {
        application_ms: APPLICATION_TICK_MS,
        heartbeat_ms: HEARTBEAT_TICK_MS,
    };
}

impl Default for TickConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Everything the controller needs at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    /// Strobe timing
    pub strobe: StrobeConfig,
    /// Tick periods
    pub ticks: TickConfig,
}

impl ControllerConfig {
    /// Board defaults
    pub const DEFAULT: Self = Self {
        strobe: StrobeConfig::DEFAULT,
        ticks: TickConfig::DEFAULT,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_period_matches_constant() {
        assert_eq!(StrobeConfig::default().period_us(), STROBE_PERIOD_US);
        assert_eq!(STROBE_PERIOD_US, 49_000);
    }

    #[test]
    fn test_controller_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.strobe.max_pulses, 10);
        assert_eq!(config.ticks.application_ms, 20);
        assert_eq!(config.ticks.heartbeat_ms, 500);
    }
}
