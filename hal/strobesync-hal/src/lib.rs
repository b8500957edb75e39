//! StrobeSync Hardware Abstraction Layer
//!
//! This crate defines the hardware contracts the control core consumes.
//! Chip-specific HALs (or the host simulator) implement them so the same
//! dispatch loop runs on the RP2040 and in host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  strobesync-core (dispatch loop)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  strobesync-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ strobesync-   │       │ core::sim     │
//! │ hal-rp2040    │       │ (host tests)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital outputs (strobe, heartbeat)
//! - [`timer::OneShotTimer`] - Single re-armable one-shot timer
//! - [`adc::AnalogConverter`] - Start-and-forget analog conversions
//! - [`pwm::PwmCompare`] - PWM compare register

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod pwm;
pub mod timer;

// Re-export key traits at crate root for convenience
pub use adc::AnalogConverter;
pub use gpio::OutputPin;
pub use pwm::PwmCompare;
pub use timer::OneShotTimer;
