//! Strobe pulse-train sequencer
//!
//! A trigger starts (or restarts) a bounded train of light pulses:
//!
//! ```text
//! trigger ──► [delay] ──► ON ──1ms──► OFF ──wait──► ON ──1ms──► OFF ... (max_pulses)
//! ```
//!
//! One hardware timer serves every phase. The inter-pulse wait is not a
//! single long expiry but a software countdown of short wait ticks, so each
//! arm stays well inside the timer's native range and the timer is free to
//! be re-targeted between phases.
//!
//! A trigger in any phase is a full restart: the pending expiry is
//! cancelled, stale timer flags are dropped, and the train starts over with
//! whatever delay is current at that instant. Triggers are never queued.

use strobesync_hal::{OneShotTimer, OutputPin};

use crate::config::StrobeConfig;
use crate::flags::{EventFlags, TimerTarget};

/// Sequencer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StrobePhase {
    /// No train in progress, timer idle
    Idle,
    /// Triggered; waiting for the delay (or the immediate pulse-on flag)
    WaitDelay,
    /// Strobe output active
    On,
    /// Between pulses, counting wait ticks
    WaitInterPulse,
}

/// Mutable sequencer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StrobeState {
    /// Pulses completed in the current train (`0..=max_pulses`)
    pub pulse_count: u8,
    /// Wait ticks left before the next pulse
    pub wait_counter: u16,
    /// Delay between trigger and first pulse (µs)
    pub delay_us: u32,
}

/// Strobe sequencer
///
/// Owns the strobe timer. Only the handlers here arm or cancel it.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StrobeSequencer {
    config: StrobeConfig,
    phase: StrobePhase,
    state: StrobeState,
    triggers: u32,
}

impl StrobeSequencer {
    /// Create an idle sequencer with no delay
    pub const fn new(config: StrobeConfig) -> Self {
        Self {
            config,
            phase: StrobePhase::Idle,
            state: StrobeState {
                pulse_count: 0,
                wait_counter: config.period_ms,
                delay_us: 0,
            },
            triggers: 0,
        }
    }

    /// Current phase
    pub const fn phase(&self) -> StrobePhase {
        self.phase
    }

    /// Current state snapshot
    pub const fn state(&self) -> StrobeState {
        self.state
    }

    /// Timing configuration
    pub const fn config(&self) -> &StrobeConfig {
        &self.config
    }

    /// Triggers handled since start-up
    pub const fn triggers(&self) -> u32 {
        self.triggers
    }

    /// Delay that the next trigger will use
    pub const fn delay_us(&self) -> u32 {
        self.state.delay_us
    }

    /// Update the trigger-to-first-pulse delay
    ///
    /// Takes effect at the next trigger; a train in progress keeps going.
    pub fn set_delay_us(&mut self, delay_us: u32) {
        self.state.delay_us = delay_us;
    }

    /// Trigger handler: restart the train
    ///
    /// A pulse cut short by the restart ends here, so no pulse ever
    /// outlasts the pulse-on time.
    pub fn on_trigger<P, T>(&mut self, strobe: &mut P, timer: &mut T, flags: &EventFlags)
    where
        P: OutputPin,
        T: OneShotTimer<TimerTarget>,
    {
        timer.cancel();
        flags.clear_strobe_timers();
        strobe.set_low();

        self.triggers = self.triggers.wrapping_add(1);
        self.state.wait_counter = self.config.period_ms;
        self.state.pulse_count = 0;
        self.phase = StrobePhase::WaitDelay;

        if self.state.delay_us > 0 {
            timer.arm(self.state.delay_us, TimerTarget::PulseOn);
        } else {
            // Picked up by the same drain pass
            flags.pulse_on.set();
        }
    }

    /// Pulse-on handler: light the strobe for one pulse-on period
    pub fn on_pulse_on<P, T>(&mut self, strobe: &mut P, timer: &mut T)
    where
        P: OutputPin,
        T: OneShotTimer<TimerTarget>,
    {
        strobe.set_high();
        timer.arm(self.config.pulse_on_us, TimerTarget::PulseOff);
        self.phase = StrobePhase::On;
    }

    /// Pulse-off handler: end the pulse and start the wait, or finish
    pub fn on_pulse_off<P, T>(&mut self, strobe: &mut P, timer: &mut T)
    where
        P: OutputPin,
        T: OneShotTimer<TimerTarget>,
    {
        strobe.set_low();
        self.state.wait_counter = self.config.period_ms;
        self.state.pulse_count += 1;
        assert!(
            self.state.pulse_count <= self.config.max_pulses,
            "strobe pulse count exceeded its cap"
        );

        if self.state.pulse_count < self.config.max_pulses {
            timer.arm(self.config.wait_tick_us, TimerTarget::WaitTick);
            self.phase = StrobePhase::WaitInterPulse;
        } else {
            self.phase = StrobePhase::Idle;
        }
    }

    /// Wait-tick handler: count down, pulse again when the wait is over
    pub fn on_wait_tick<P, T>(&mut self, strobe: &mut P, timer: &mut T)
    where
        P: OutputPin,
        T: OneShotTimer<TimerTarget>,
    {
        self.state.wait_counter = self.state.wait_counter.saturating_sub(1);
        if self.state.wait_counter == 0 {
            self.state.wait_counter = self.config.period_ms;
            self.on_pulse_on(strobe, timer);
        } else {
            timer.arm(self.config.wait_tick_us, TimerTarget::WaitTick);
        }
    }
}

impl Default for StrobeSequencer {
    fn default() -> Self {
        Self::new(StrobeConfig::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct FakeTimer {
        pending: Option<(u32, TimerTarget)>,
        cancels: u32,
    }

    impl OneShotTimer<TimerTarget> for FakeTimer {
        fn arm(&mut self, duration_us: u32, target: TimerTarget) {
            assert!(self.pending.is_none(), "timer armed twice");
            self.pending = Some((duration_us, target));
        }

        fn cancel(&mut self) {
            self.pending = None;
            self.cancels += 1;
        }
    }

    impl FakeTimer {
        /// Let the pending expiry happen
        fn fire(&mut self) -> Option<(u32, TimerTarget)> {
            self.pending.take()
        }
    }

    #[derive(Debug, Default)]
    struct FakePin {
        high: bool,
        rising_edges: u32,
    }

    impl OutputPin for FakePin {
        fn set_high(&mut self) {
            if !self.high {
                self.rising_edges += 1;
            }
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    /// Run the sequencer's own timer to completion, handling each expiry
    fn run_train(seq: &mut StrobeSequencer, pin: &mut FakePin, timer: &mut FakeTimer) {
        while let Some((_, target)) = timer.fire() {
            match target {
                TimerTarget::PulseOn => seq.on_pulse_on(pin, timer),
                TimerTarget::PulseOff => seq.on_pulse_off(pin, timer),
                TimerTarget::WaitTick => seq.on_wait_tick(pin, timer),
            }
        }
    }

    #[test]
    fn test_trigger_without_delay_raises_pulse_on() {
        let flags = EventFlags::new();
        let mut seq = StrobeSequencer::default();
        let mut timer = FakeTimer::default();
        let mut pin = FakePin::default();

        seq.on_trigger(&mut pin, &mut timer, &flags);
        assert_eq!(timer.cancels, 1);
        assert!(timer.pending.is_none());
        assert!(flags.pulse_on.take());
        assert_eq!(seq.phase(), StrobePhase::WaitDelay);
    }

    #[test]
    fn test_trigger_with_delay_arms_timer() {
        let flags = EventFlags::new();
        let mut seq = StrobeSequencer::default();
        let mut timer = FakeTimer::default();
        let mut pin = FakePin::default();
        seq.set_delay_us(500);

        seq.on_trigger(&mut pin, &mut timer, &flags);
        assert_eq!(timer.pending, Some((500, TimerTarget::PulseOn)));
        assert!(!flags.pulse_on.is_set());
    }

    #[test]
    fn test_pulse_on_arms_pulse_off() {
        let mut seq = StrobeSequencer::default();
        let mut timer = FakeTimer::default();
        let mut pin = FakePin::default();

        seq.on_pulse_on(&mut pin, &mut timer);
        assert!(pin.is_set_high());
        assert_eq!(timer.pending, Some((1_000, TimerTarget::PulseOff)));
        assert_eq!(seq.phase(), StrobePhase::On);
    }

    #[test]
    fn test_wait_counts_down_period_ticks() {
        let mut seq = StrobeSequencer::default();
        let mut timer = FakeTimer::default();
        let mut pin = FakePin::default();

        seq.on_pulse_on(&mut pin, &mut timer);
        timer.fire();
        seq.on_pulse_off(&mut pin, &mut timer);
        assert_eq!(seq.phase(), StrobePhase::WaitInterPulse);
        assert_eq!(seq.state().wait_counter, 49);

        let mut wait_ticks = 0;
        while let Some((_, TimerTarget::WaitTick)) = timer.fire() {
            wait_ticks += 1;
            seq.on_wait_tick(&mut pin, &mut timer);
        }
        // the 49th tick starts the next pulse instead of re-arming
        assert_eq!(wait_ticks, 49);
        assert!(pin.is_set_high());
        assert_eq!(seq.state().wait_counter, 49);
    }

    #[test]
    fn test_train_stops_at_max_pulses() {
        let flags = EventFlags::new();
        let mut seq = StrobeSequencer::default();
        let mut timer = FakeTimer::default();
        let mut pin = FakePin::default();

        seq.on_trigger(&mut pin, &mut timer, &flags);
        assert!(flags.pulse_on.take());
        seq.on_pulse_on(&mut pin, &mut timer);
        run_train(&mut seq, &mut pin, &mut timer);

        assert_eq!(pin.rising_edges, 10);
        assert!(pin.is_set_low());
        assert_eq!(seq.state().pulse_count, 10);
        assert_eq!(seq.phase(), StrobePhase::Idle);
    }

    #[test]
    fn test_trigger_mid_train_restarts() {
        let flags = EventFlags::new();
        let mut seq = StrobeSequencer::default();
        let mut timer = FakeTimer::default();
        let mut pin = FakePin::default();

        seq.on_trigger(&mut pin, &mut timer, &flags);
        flags.pulse_on.take();
        seq.on_pulse_on(&mut pin, &mut timer);
        while seq.state().pulse_count < 4 {
            match timer.fire() {
                Some((_, TimerTarget::PulseOn)) => seq.on_pulse_on(&mut pin, &mut timer),
                Some((_, TimerTarget::PulseOff)) => seq.on_pulse_off(&mut pin, &mut timer),
                Some((_, TimerTarget::WaitTick)) => seq.on_wait_tick(&mut pin, &mut timer),
                None => unreachable!(),
            }
        }
        assert!(timer.pending.is_some());

        // a stale expiry already latched must not leak into the new train
        flags.wait_tick.set();
        seq.set_delay_us(2_000);
        seq.on_trigger(&mut pin, &mut timer, &flags);

        assert_eq!(seq.state().pulse_count, 0);
        assert_eq!(seq.state().wait_counter, 49);
        assert!(!flags.wait_tick.is_set());
        assert!(pin.is_set_low());
        assert_eq!(timer.pending, Some((2_000, TimerTarget::PulseOn)));
        assert_eq!(seq.triggers(), 2);
    }

    #[test]
    fn test_small_config() {
        let config = StrobeConfig {
            period_ms: 2,
            pulse_on_us: 100,
            wait_tick_us: 100,
            max_pulses: 3,
        };
        let flags = EventFlags::new();
        let mut seq = StrobeSequencer::new(config);
        let mut timer = FakeTimer::default();
        let mut pin = FakePin::default();

        seq.on_trigger(&mut pin, &mut timer, &flags);
        flags.pulse_on.take();
        seq.on_pulse_on(&mut pin, &mut timer);
        run_train(&mut seq, &mut pin, &mut timer);
        assert_eq!(pin.rising_edges, 3);
    }
}
