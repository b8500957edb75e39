//! Board-agnostic control core for the strobe/motor controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Event flag store shared with interrupt-level producers
//! - Periodic tick counters (application tick, heartbeat)
//! - Round-robin analog sampler
//! - Motor speed and strobe delay scaling
//! - Strobe pulse-train sequencer
//! - Cooperative dispatch loop tying it together
//!
//! Hardware is reached only through the `strobesync-hal` traits. The
//! `sim` module (tests or the `sim` feature) drives the same controller
//! against a virtual clock.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod analog;
pub mod config;
pub mod dispatch;
pub mod flags;
pub mod scaling;
pub mod strobe;
pub mod tick;

#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use dispatch::{Controller, Hardware};
pub use flags::EventFlags;
