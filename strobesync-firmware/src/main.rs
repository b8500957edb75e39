//! StrobeSync - Strobe and Motor Controller Firmware
//!
//! Main firmware binary for RP2040-based boards. A trigger edge starts a
//! bounded train of strobe pulses; two potentiometers set the
//! trigger-to-pulse delay and the motor speed.
//!
//! All control logic lives in `strobesync-core`. The tasks spawned here
//! only turn hardware events into flags for the dispatch task.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::Peri;
use {defmt_rtt as _, panic_probe as _};

use strobesync_core::config::{ControllerConfig, MOTOR_PWM_TOP, NO_MOTION_SPEED_COUNTS};
use strobesync_core::{Controller, Hardware};
use strobesync_hal_rp2040::gpio::inactive_level;
use strobesync_hal_rp2040::{PwmChannel, RpOutput, RpPwm};

use crate::analog::SignalConverter;
use crate::timer::SignalTimer;

mod analog;
mod board;
mod channels;
mod tasks;
mod timer;

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("StrobeSync firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = ControllerConfig::DEFAULT;
    info!(
        "Strobe: {} pulses, {}us on, {}ms period",
        config.strobe.max_pulses, config.strobe.pulse_on_us, config.strobe.period_ms
    );

    // Pins are taken through the board types, so a mismatch with the
    // board constants fails to compile
    let strobe_pin: Peri<'static, board::StrobePin> = p.PIN_15;
    let heartbeat_pin: Peri<'static, board::HeartbeatPin> = p.PIN_25;
    let motor_pin: Peri<'static, board::MotorPwmPin> = p.PIN_16;
    let direction_pin: Peri<'static, board::DirectionPin> = p.PIN_26;
    let position_pin: Peri<'static, board::PositionPin> = p.PIN_27;
    let trigger_pin: Peri<'static, board::TriggerPin> = p.PIN_14;

    // Outputs start inactive
    let strobe = RpOutput::new(
        Output::new(strobe_pin, inactive_level(board::STROBE.inverted)),
        board::STROBE.inverted,
    );
    let heartbeat = RpOutput::new(
        Output::new(heartbeat_pin, inactive_level(board::HEARTBEAT.inverted)),
        board::HEARTBEAT.inverted,
    );
    info!(
        "Strobe on GPIO{}, heartbeat on GPIO{}",
        board::STROBE.pin,
        board::HEARTBEAT.pin
    );

    // Motor PWM: 125MHz / (MOTOR_PWM_TOP + 1) ~ 122kHz
    let motor_pwm = Pwm::new_output_a(p.PWM_SLICE0, motor_pin, PwmConfig::default());
    let motor = RpPwm::new(motor_pwm, PwmChannel::A, MOTOR_PWM_TOP, NO_MOTION_SPEED_COUNTS);
    info!("Motor PWM on GPIO{}", board::MOTOR_PWM_PIN);

    // Potentiometers on ADC0/ADC1
    let adc = Adc::new(p.ADC, Irqs, AdcConfig::default());
    let direction = Channel::new_pin(direction_pin, Pull::None);
    let position = Channel::new_pin(position_pin, Pull::None);
    info!(
        "Direction on GPIO{}, position on GPIO{}",
        board::DIRECTION_INPUT.gpio(),
        board::POSITION_INPUT.gpio()
    );

    // Trigger input idles high; the sensor pulls it low
    let trigger = Input::new(trigger_pin, Pull::Up);
    info!("Trigger on GPIO{}", board::TRIGGER_PIN);

    let hw: tasks::BoardHardware = Hardware {
        strobe,
        heartbeat,
        timer: SignalTimer::new(),
        adc: SignalConverter,
        motor,
    };
    let controller = Controller::new(config);

    // Spawn tasks
    spawner.spawn(tasks::pulse_timer_task()).unwrap();
    spawner.spawn(tasks::adc_task(adc, direction, position)).unwrap();
    spawner
        .spawn(tasks::trigger_task(trigger, board::TRIGGER_EDGE))
        .unwrap();
    spawner.spawn(tasks::tick_task(config.ticks)).unwrap();
    spawner.spawn(tasks::dispatch_task(controller, hw)).unwrap();

    info!("All tasks spawned, firmware running");
}
