//! Cooperative dispatch loop
//!
//! The controller is the only consumer of [`EventFlags`]. One call to
//! [`Controller::poll`] is one pass of the main loop:
//!
//! 1. Drain the strobe flags (trigger, pulse-on, wait-tick, pulse-off) in
//!    that priority order, repeating until none is left. A flag raised by a
//!    handler during the drain (the zero-delay pulse-on) is serviced before
//!    the drain ends.
//! 2. Then, once each: conversion complete, application tick, heartbeat.
//!
//! Housekeeping therefore never delays a pending strobe event by more than
//! one handler. All pin, timer and PWM writes happen here, never in
//! interrupt context.

use strobesync_hal::{AnalogConverter, OneShotTimer, OutputPin, PwmCompare};

use crate::analog::{AnalogChannel, AnalogSampler, Conversion, ConversionError};
use crate::config::{ControllerConfig, NO_MOTION_SPEED_COUNTS};
use crate::flags::{EventFlags, TimerTarget};
use crate::scaling::{motor_compare, strobe_delay_us};
use crate::strobe::{StrobePhase, StrobeSequencer};

/// Hardware the controller drives
///
/// Created once at start-up and threaded through every pass.
pub struct Hardware<S, H, T, A, M> {
    /// Strobe light output
    pub strobe: S,
    /// Heartbeat LED
    pub heartbeat: H,
    /// Strobe phase timer
    pub timer: T,
    /// Analog converter shared by both potentiometers
    pub adc: A,
    /// Motor PWM channel
    pub motor: M,
}

/// What one pass handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PassSummary {
    /// Strobe handlers run during the drain
    pub strobe_events: u16,
    /// A trigger restarted the train
    pub triggered: bool,
    /// A completed conversion was routed
    pub conversion: Option<Conversion>,
    /// A conversion was started on this channel
    pub sampled: Option<AnalogChannel>,
    /// The heartbeat output was toggled
    pub heartbeat: bool,
}

impl PassSummary {
    /// Whether the pass did anything at all
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Diagnostic snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerStatus {
    /// Sequencer phase
    pub phase: StrobePhase,
    /// Pulses completed in the current train
    pub pulse_count: u8,
    /// Delay the next trigger will use (µs)
    pub delay_us: u32,
    /// Last value written to the motor compare register
    pub motor_compare: u16,
    /// Triggers handled since start-up
    pub triggers: u32,
    /// Failed analog conversions since start-up
    pub failed_conversions: u16,
}

/// Process-wide controller context
#[derive(Debug, Clone)]
pub struct Controller {
    config: ControllerConfig,
    strobe: StrobeSequencer,
    sampler: AnalogSampler,
    motor_compare: u16,
}

impl Controller {
    /// Create a controller with the given configuration
    pub const fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            strobe: StrobeSequencer::new(config.strobe),
            sampler: AnalogSampler::new(),
            motor_compare: NO_MOTION_SPEED_COUNTS,
        }
    }

    /// Put the outputs into their idle state
    ///
    /// Strobe off, motor at the neutral "no motion" compare value.
    pub fn start<S, H, T, A, M>(&mut self, hw: &mut Hardware<S, H, T, A, M>)
    where
        S: OutputPin,
        M: PwmCompare,
    {
        hw.strobe.set_low();
        self.motor_compare = NO_MOTION_SPEED_COUNTS;
        hw.motor.set_compare_value(self.motor_compare);
    }

    /// Configuration in use
    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Strobe sequencer
    pub const fn strobe(&self) -> &StrobeSequencer {
        &self.strobe
    }

    /// Strobe sequencer, mutable (delay overrides)
    pub fn strobe_mut(&mut self) -> &mut StrobeSequencer {
        &mut self.strobe
    }

    /// Analog sampler
    pub const fn sampler(&self) -> &AnalogSampler {
        &self.sampler
    }

    /// Diagnostic snapshot
    pub fn status(&self) -> ControllerStatus {
        let state = self.strobe.state();
        ControllerStatus {
            phase: self.strobe.phase(),
            pulse_count: state.pulse_count,
            delay_us: state.delay_us,
            motor_compare: self.motor_compare,
            triggers: self.strobe.triggers(),
            failed_conversions: self.sampler.failed_conversions(),
        }
    }

    /// Run one pass of the dispatch loop
    pub fn poll<S, H, T, A, M>(
        &mut self,
        flags: &EventFlags,
        hw: &mut Hardware<S, H, T, A, M>,
    ) -> PassSummary
    where
        S: OutputPin,
        H: OutputPin,
        T: OneShotTimer<TimerTarget>,
        A: AnalogConverter<AnalogChannel>,
        M: PwmCompare,
    {
        let mut summary = PassSummary::default();

        loop {
            let mut strobe_processing = false;

            if flags.trigger.take() {
                self.strobe.on_trigger(&mut hw.strobe, &mut hw.timer, flags);
                summary.triggered = true;
                summary.strobe_events += 1;
                strobe_processing = true;
            }

            if flags.pulse_on.take() {
                self.strobe.on_pulse_on(&mut hw.strobe, &mut hw.timer);
                summary.strobe_events += 1;
                strobe_processing = true;
            }

            if flags.wait_tick.take() {
                self.strobe.on_wait_tick(&mut hw.strobe, &mut hw.timer);
                summary.strobe_events += 1;
                strobe_processing = true;
            }

            if flags.pulse_off.take() {
                self.strobe.on_pulse_off(&mut hw.strobe, &mut hw.timer);
                summary.strobe_events += 1;
                strobe_processing = true;
            }

            if !strobe_processing {
                break;
            }
        }

        if let Some(result) = flags.conversion.take() {
            summary.conversion = self.on_conversion(result, &mut hw.motor);
        }

        if flags.app_tick.take() {
            summary.sampled = self.sampler.on_tick(&mut hw.adc);
        }

        if flags.heartbeat_tick.take() {
            hw.heartbeat.toggle();
            summary.heartbeat = true;
        }

        summary
    }

    /// Route a finished conversion to its scaler
    fn on_conversion<M: PwmCompare>(
        &mut self,
        result: Result<u16, ConversionError>,
        motor: &mut M,
    ) -> Option<Conversion> {
        let conversion = self.sampler.on_complete(result)?;
        match conversion.channel {
            AnalogChannel::Direction => {
                self.motor_compare = motor_compare(conversion.reading).min(motor.top());
                motor.set_compare_value(self.motor_compare);
            }
            AnalogChannel::Position => {
                let period_us = self.config.strobe.period_us();
                self.strobe
                    .set_delay_us(strobe_delay_us(conversion.reading, period_us));
            }
        }
        Some(conversion)
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(ControllerConfig::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Simulation;
    use heapless::Vec;

    fn rising(sim: &Simulation, since_us: u64) -> Vec<u64, 32> {
        sim.hw.strobe.rising_since(since_us).collect()
    }

    fn falling(sim: &Simulation, since_us: u64) -> Vec<u64, 32> {
        sim.hw.strobe.falling_since(since_us).collect()
    }

    #[test]
    fn test_start_writes_neutral_motor() {
        let sim = Simulation::new();
        assert_eq!(sim.controller.config(), &ControllerConfig::DEFAULT);
        assert_eq!(sim.hw.motor.compare(), NO_MOTION_SPEED_COUNTS);
        assert_eq!(sim.hw.motor.writes(), 1);
        assert!(sim.hw.strobe.is_set_low());
        assert_eq!(sim.controller.status().phase, StrobePhase::Idle);
    }

    #[test]
    fn test_empty_pass_is_idle() {
        let mut sim = Simulation::new().without_ticks();
        let summary = sim.controller.poll(&sim.flags, &mut sim.hw);
        assert!(summary.is_idle());
    }

    #[test]
    fn test_zero_delay_trigger_pulses_in_same_pass() {
        let mut sim = Simulation::new().without_ticks();
        let summary = sim.trigger();

        // trigger raises pulse-on, and the same drain services it
        assert_eq!(sim.passes(), 1);
        assert!(summary.triggered);
        assert_eq!(summary.strobe_events, 2);
        assert!(sim.hw.strobe.is_set_high());
        assert_eq!(
            sim.hw.timer.pending(),
            Some((1_000, TimerTarget::PulseOff))
        );
    }

    #[test]
    fn test_zero_delay_train_timing() {
        let mut sim = Simulation::new().without_ticks();
        sim.trigger();
        sim.run_for(1_000_000);

        let rising = rising(&sim, 0);
        let falling = falling(&sim, 0);
        assert_eq!(rising.len(), 10);
        assert_eq!(falling.len(), 10);
        for k in 0..10u64 {
            assert_eq!(rising[k as usize], k * 50_000);
            assert_eq!(falling[k as usize], k * 50_000 + 1_000);
        }
    }

    #[test]
    fn test_pulse_width_and_gap_are_exact() {
        let mut sim = Simulation::new().without_ticks();
        sim.trigger();
        sim.run_for(1_000_000);

        let rising = rising(&sim, 0);
        let falling = falling(&sim, 0);
        for (on, off) in rising.iter().zip(falling.iter()) {
            assert_eq!(off - on, 1_000);
        }
        for (off, next_on) in falling.iter().zip(rising.iter().skip(1)) {
            assert_eq!(next_on - off, 49_000);
        }
    }

    #[test]
    fn test_delayed_train_timing() {
        let mut sim = Simulation::new().without_ticks();
        sim.set_delay_us(500);
        let summary = sim.trigger();
        assert_eq!(summary.strobe_events, 1);
        assert!(sim.hw.strobe.is_set_low());

        sim.run_for(1_000_000);
        let rising = rising(&sim, 0);
        assert_eq!(rising.len(), 10);
        for (k, at) in rising.iter().enumerate() {
            assert_eq!(*at, 500 + k as u64 * 50_000);
        }
    }

    #[test]
    fn test_train_stops_after_ten_pulses() {
        let mut sim = Simulation::new().without_ticks();
        sim.trigger();
        sim.run_for(2_000_000);

        assert_eq!(sim.hw.strobe.rising_edges(), 10);
        assert!(sim.hw.strobe.is_set_low());
        assert_eq!(sim.hw.timer.pending(), None);
        let status = sim.controller.status();
        assert_eq!(status.phase, StrobePhase::Idle);
        assert_eq!(status.pulse_count, 10);
    }

    #[test]
    fn test_retrigger_mid_train_restarts_count() {
        let mut sim = Simulation::new().without_ticks();
        sim.trigger();
        sim.run_until(160_000);
        assert_eq!(sim.controller.status().pulse_count, 4);
        assert_eq!(falling(&sim, 0).last(), Some(&151_000));

        sim.trigger();
        assert_eq!(sim.controller.status().pulse_count, 0);
        assert_eq!(sim.controller.status().triggers, 2);

        sim.run_for(2_000_000);
        let restarted = rising(&sim, 160_000);
        assert_eq!(restarted.len(), 10);
        assert_eq!(restarted.first(), Some(&160_000));
        assert_eq!(restarted.last(), Some(&610_000));
        assert_eq!(sim.hw.strobe.rising_edges(), 14);
    }

    #[test]
    fn test_retrigger_during_delay_rearms_with_current_delay() {
        let mut sim = Simulation::new().without_ticks();
        sim.set_delay_us(5_000);
        sim.trigger();
        sim.run_until(2_000);
        assert_eq!(sim.now_us(), 2_000);
        assert_eq!(sim.controller.status().phase, StrobePhase::WaitDelay);
        assert_eq!(sim.hw.strobe.rising_edges(), 0);

        // the pending 5 ms expiry is cancelled, not stacked
        sim.set_delay_us(1_000);
        sim.trigger();
        assert_eq!(sim.hw.timer.pending(), Some((3_000, TimerTarget::PulseOn)));

        sim.run_for(1_000_000);
        let rising = rising(&sim, 0);
        assert_eq!(rising.len(), 10);
        assert_eq!(rising.first(), Some(&3_000));
        assert_eq!(rising.last(), Some(&453_000));
    }

    #[test]
    fn test_retrigger_after_train_end_runs_full_train() {
        let mut sim = Simulation::new().without_ticks();
        sim.trigger();
        sim.run_for(1_000_000);
        assert_eq!(sim.controller.status().phase, StrobePhase::Idle);
        assert_eq!(sim.hw.strobe.rising_edges(), 10);

        sim.trigger();
        assert_eq!(sim.controller.status().pulse_count, 0);
        sim.run_for(1_000_000);

        assert_eq!(sim.hw.strobe.rising_edges(), 20);
        assert_eq!(rising(&sim, 1_000_000).len(), 10);
        assert_eq!(sim.controller.status().phase, StrobePhase::Idle);
    }

    #[test]
    fn test_trigger_wins_over_expiry_at_same_instant() {
        let mut sim = Simulation::new().without_ticks();
        sim.trigger();
        // stop right before the first pulse-off expiry is handled
        sim.run_until(999);

        // the expiry and a new trigger land together
        sim.flags.timer_fired(TimerTarget::PulseOff);
        let summary = sim.trigger();
        assert!(summary.triggered);
        assert_eq!(summary.strobe_events, 2);
        assert_eq!(sim.controller.status().pulse_count, 0);

        sim.run_for(1_000_000);
        assert_eq!(sim.hw.strobe.rising_edges(), 11);
        assert_eq!(rising(&sim, 999).len(), 10);
    }

    #[test]
    fn test_retrigger_cuts_active_pulse() {
        let mut sim = Simulation::new().without_ticks();
        sim.trigger();
        sim.run_until(500);
        assert!(sim.hw.strobe.is_set_high());

        sim.set_delay_us(3_000);
        sim.trigger();
        assert!(sim.hw.strobe.is_set_low());
        assert_eq!(falling(&sim, 0).first(), Some(&500));

        sim.run_for(10_000);
        assert_eq!(rising(&sim, 1).first(), Some(&3_500));
    }

    #[test]
    fn test_pulses_stay_exact_with_housekeeping() {
        let mut sim = Simulation::new();
        sim.trigger();
        sim.run_for(1_000_000);

        let rising = rising(&sim, 0);
        assert_eq!(rising.len(), 10);
        for (k, at) in rising.iter().enumerate() {
            assert_eq!(*at, k as u64 * 50_000);
        }
    }

    #[test]
    fn test_sampling_alternates_channels() {
        let mut sim = Simulation::new();
        sim.run_until(200_000);

        let completed: Vec<AnalogChannel, 16> = sim.hw.adc.completed().copied().collect();
        assert_eq!(completed.len(), 9);
        for pair in completed.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        assert_eq!(completed[0], AnalogChannel::Position);
        assert_eq!(sim.hw.adc.in_flight(), Some(AnalogChannel::Direction));
    }

    #[test]
    fn test_conversions_route_to_scalers() {
        let mut sim = Simulation::new();
        sim.hw.adc.set_level(AnalogChannel::Direction, 1023);
        sim.hw.adc.set_level(AnalogChannel::Position, 1023);
        sim.run_until(41_000);

        let status = sim.controller.status();
        assert_eq!(status.delay_us, 49_000);
        assert_eq!(status.motor_compare, 575);
        assert_eq!(sim.hw.motor.compare(), 575);
    }

    #[test]
    fn test_busy_converter_skips_ticks() {
        let mut sim = Simulation::new();
        sim.hw.adc.set_conversion_us(30_000);
        sim.run_until(100_000);

        // ticks at 40 ms and 80 ms land while a conversion is running
        let completed: Vec<AnalogChannel, 16> = sim.hw.adc.completed().copied().collect();
        assert_eq!(
            completed.as_slice(),
            &[AnalogChannel::Position, AnalogChannel::Direction]
        );
        assert_eq!(sim.hw.adc.in_flight(), Some(AnalogChannel::Position));
    }

    #[test]
    fn test_failed_conversion_is_counted() {
        let mut sim = Simulation::new();
        sim.hw.adc.set_level(AnalogChannel::Position, 1023);
        sim.hw.adc.fail_next();
        sim.run_until(40_050);

        let status = sim.controller.status();
        assert_eq!(status.failed_conversions, 1);
        assert_eq!(status.delay_us, 0);
        assert!(sim.controller.sampler().is_busy());
        assert_eq!(sim.controller.sampler().channel(), AnalogChannel::Direction);
        assert_eq!(sim.hw.adc.in_flight(), Some(AnalogChannel::Direction));
    }

    #[test]
    fn test_heartbeat_toggles_every_half_second() {
        let mut sim = Simulation::new();
        sim.run_until(2_000_000);

        let rising: Vec<u64, 8> = sim
            .hw
            .heartbeat
            .edges()
            .filter(|edge| edge.high)
            .map(|edge| edge.at_us)
            .collect();
        assert_eq!(rising.as_slice(), &[500_000, 1_500_000]);
        assert!(sim.hw.heartbeat.is_set_low());
    }
}
