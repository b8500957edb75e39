//! Host-side simulator
//!
//! Replays the firmware's event sources against a virtual microsecond
//! clock so the controller can be exercised without hardware:
//!
//! - a 1 ms base tick feeding [`TickCounters`]
//! - a software one-shot strobe timer
//! - an analog converter with a fixed conversion latency
//! - output pins that record every edge with its timestamp
//!
//! Sources that become due at the same instant all raise their flags
//! before the single dispatch pass for that instant, just like interrupts
//! that land while the main loop is busy.

use heapless::HistoryBuffer;

use strobesync_hal::{AnalogConverter, OneShotTimer, OutputPin, PwmCompare};

use crate::analog::AnalogChannel;
use crate::config::{ControllerConfig, MOTOR_PWM_TOP, ONE_MILLISECOND_US};
use crate::dispatch::{Controller, Hardware, PassSummary};
use crate::flags::{EventFlags, TimerTarget};
use crate::tick::TickCounters;

/// Base tick period of the simulated tick interrupt
pub const BASE_TICK_US: u64 = ONE_MILLISECOND_US as u64;

/// Default conversion latency (13 ADC clocks at 125 kHz)
pub const DEFAULT_CONVERSION_US: u64 = 104;

/// Edges kept per pin
pub const EDGE_HISTORY: usize = 128;

/// Output transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// When the level changed
    pub at_us: u64,
    /// New level
    pub high: bool,
}

/// Output pin recording its edges
#[derive(Debug)]
pub struct SimPin {
    high: bool,
    now_us: u64,
    rising: u32,
    edges: HistoryBuffer<Edge, EDGE_HISTORY>,
}

impl SimPin {
    fn new() -> Self {
        Self {
            high: false,
            now_us: 0,
            rising: 0,
            edges: HistoryBuffer::new(),
        }
    }

    fn drive(&mut self, high: bool) {
        if high != self.high {
            self.high = high;
            if high {
                self.rising += 1;
            }
            self.edges.write(Edge {
                at_us: self.now_us,
                high,
            });
        }
    }

    /// Rising edges since start-up
    pub fn rising_edges(&self) -> u32 {
        self.rising
    }

    /// Recorded edges, oldest first
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.oldest_ordered()
    }

    /// Timestamps of rising edges at or after `since_us`, oldest first
    pub fn rising_since(&self, since_us: u64) -> impl Iterator<Item = u64> + '_ {
        self.edges()
            .filter(move |edge| edge.high && edge.at_us >= since_us)
            .map(|edge| edge.at_us)
    }

    /// Timestamps of falling edges at or after `since_us`, oldest first
    pub fn falling_since(&self, since_us: u64) -> impl Iterator<Item = u64> + '_ {
        self.edges()
            .filter(move |edge| !edge.high && edge.at_us >= since_us)
            .map(|edge| edge.at_us)
    }
}

impl OutputPin for SimPin {
    fn set_high(&mut self) {
        self.drive(true);
    }

    fn set_low(&mut self) {
        self.drive(false);
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Software one-shot timer
#[derive(Debug, Default)]
pub struct SimTimer {
    now_us: u64,
    pending: Option<(u64, TimerTarget)>,
    arms: u32,
    cancels: u32,
}

impl SimTimer {
    /// Pending expiry, if armed
    pub fn pending(&self) -> Option<(u64, TimerTarget)> {
        self.pending
    }

    /// Number of arm calls
    pub fn arms(&self) -> u32 {
        self.arms
    }

    /// Number of cancel calls
    pub fn cancels(&self) -> u32 {
        self.cancels
    }
}

impl OneShotTimer<TimerTarget> for SimTimer {
    fn arm(&mut self, duration_us: u32, target: TimerTarget) {
        assert!(
            self.pending.is_none(),
            "strobe timer armed while an expiry was pending"
        );
        self.arms += 1;
        self.pending = Some((self.now_us + u64::from(duration_us), target));
    }

    fn cancel(&mut self) {
        self.cancels += 1;
        self.pending = None;
    }
}

/// Analog converter with a fixed latency
#[derive(Debug)]
pub struct SimAdc {
    now_us: u64,
    conversion_us: u64,
    levels: [u16; 2],
    in_flight: Option<(u64, AnalogChannel)>,
    fail_next: bool,
    completed: HistoryBuffer<AnalogChannel, 32>,
}

impl SimAdc {
    fn new(conversion_us: u64) -> Self {
        Self {
            now_us: 0,
            conversion_us,
            levels: [0; 2],
            in_flight: None,
            fail_next: false,
            completed: HistoryBuffer::new(),
        }
    }

    fn level(&self, channel: AnalogChannel) -> u16 {
        match channel {
            AnalogChannel::Direction => self.levels[0],
            AnalogChannel::Position => self.levels[1],
        }
    }

    /// Set what a conversion on `channel` will read
    pub fn set_level(&mut self, channel: AnalogChannel, reading: u16) {
        match channel {
            AnalogChannel::Direction => self.levels[0] = reading,
            AnalogChannel::Position => self.levels[1] = reading,
        }
    }

    /// Change the conversion latency for conversions started from now on
    pub fn set_conversion_us(&mut self, conversion_us: u64) {
        self.conversion_us = conversion_us;
    }

    /// Make the next conversion fail
    pub fn fail_next(&mut self) {
        self.fail_next = true;
    }

    /// Whether a conversion is running
    pub fn in_flight(&self) -> Option<AnalogChannel> {
        self.in_flight.map(|(_, channel)| channel)
    }

    /// Channels of completed conversions, oldest first
    pub fn completed(&self) -> impl Iterator<Item = &AnalogChannel> {
        self.completed.oldest_ordered()
    }
}

impl AnalogConverter<AnalogChannel> for SimAdc {
    fn start_conversion(&mut self, channel: AnalogChannel) {
        assert!(
            self.in_flight.is_none(),
            "conversion started while another was in flight"
        );
        self.in_flight = Some((self.now_us + self.conversion_us, channel));
    }
}

/// PWM compare register
#[derive(Debug)]
pub struct SimPwm {
    compare: u16,
    writes: u32,
}

impl SimPwm {
    /// Last compare value written
    pub fn compare(&self) -> u16 {
        self.compare
    }

    /// Number of writes
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl PwmCompare for SimPwm {
    fn set_compare_value(&mut self, value: u16) {
        self.compare = value;
        self.writes += 1;
    }

    fn top(&self) -> u16 {
        MOTOR_PWM_TOP
    }
}

/// Simulated board
pub type SimHardware = Hardware<SimPin, SimPin, SimTimer, SimAdc, SimPwm>;

/// Controller plus simulated event sources on a virtual clock
pub struct Simulation {
    /// Flag store shared by the simulated sources and the controller
    pub flags: EventFlags,
    /// Controller under test
    pub controller: Controller,
    /// Simulated outputs and peripherals
    pub hw: SimHardware,
    ticks: TickCounters,
    ticks_enabled: bool,
    now_us: u64,
    next_tick_us: u64,
    passes: u32,
}

impl Simulation {
    /// Simulation with board defaults, ticks running
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::DEFAULT)
    }

    /// Simulation with a custom controller configuration
    pub fn with_config(config: ControllerConfig) -> Self {
        let mut hw = Hardware {
            strobe: SimPin::new(),
            heartbeat: SimPin::new(),
            timer: SimTimer::default(),
            adc: SimAdc::new(DEFAULT_CONVERSION_US),
            motor: SimPwm {
                compare: 0,
                writes: 0,
            },
        };
        let mut controller = Controller::new(config);
        controller.start(&mut hw);

        Self {
            flags: EventFlags::new(),
            controller,
            hw,
            ticks: TickCounters::new(config.ticks),
            ticks_enabled: true,
            now_us: 0,
            next_tick_us: BASE_TICK_US,
            passes: 0,
        }
    }

    /// Stop the tick source (no sampling, no heartbeat)
    pub fn without_ticks(mut self) -> Self {
        self.ticks_enabled = false;
        self
    }

    /// Current virtual time
    pub fn now_us(&self) -> u64 {
        self.now_us
    }

    /// Dispatch passes run so far
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Force the strobe delay, bypassing the Position channel
    pub fn set_delay_us(&mut self, delay_us: u32) {
        self.controller.strobe_mut().set_delay_us(delay_us);
    }

    /// Raise a trigger edge now and run the pass that handles it
    pub fn trigger(&mut self) -> PassSummary {
        self.flags.trigger.set();
        self.dispatch()
    }

    /// Advance the clock by `duration_us`
    pub fn run_for(&mut self, duration_us: u64) {
        self.run_until(self.now_us + duration_us);
    }

    /// Advance the clock to `end_us`, handling every event on the way
    pub fn run_until(&mut self, end_us: u64) {
        while let Some(at_us) = self.next_event_us() {
            if at_us > end_us {
                break;
            }
            self.now_us = at_us;
            self.raise_due();
            self.dispatch();
        }
        self.now_us = self.now_us.max(end_us);
    }

    fn next_event_us(&self) -> Option<u64> {
        let timer = self.hw.timer.pending.map(|(at, _)| at);
        let adc = self.hw.adc.in_flight.map(|(at, _)| at);
        let tick = self.ticks_enabled.then_some(self.next_tick_us);
        [timer, adc, tick].into_iter().flatten().min()
    }

    fn raise_due(&mut self) {
        if let Some((at, target)) = self.hw.timer.pending {
            if at == self.now_us {
                self.hw.timer.pending = None;
                self.flags.timer_fired(target);
            }
        }

        if let Some((at, channel)) = self.hw.adc.in_flight {
            if at == self.now_us {
                self.hw.adc.in_flight = None;
                if core::mem::take(&mut self.hw.adc.fail_next) {
                    self.flags.conversion.fail();
                } else {
                    self.flags.conversion.publish(self.hw.adc.level(channel));
                }
                self.hw.adc.completed.write(channel);
            }
        }

        if self.ticks_enabled && self.next_tick_us == self.now_us {
            self.ticks.advance(&self.flags);
            self.next_tick_us += BASE_TICK_US;
        }
    }

    fn dispatch(&mut self) -> PassSummary {
        let now = self.now_us;
        self.hw.strobe.now_us = now;
        self.hw.heartbeat.now_us = now;
        self.hw.timer.now_us = now;
        self.hw.adc.now_us = now;
        self.passes += 1;
        self.controller.poll(&self.flags, &mut self.hw)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
