//! Embassy async tasks
//!
//! Every task except `dispatch_task` stands in for one interrupt source:
//! it waits for its event, raises a flag and wakes the dispatch task.

pub mod adc;
pub mod dispatch;
pub mod pulse_timer;
pub mod tick;
pub mod trigger;

pub use adc::adc_task;
pub use dispatch::{dispatch_task, BoardHardware};
pub use pulse_timer::pulse_timer_task;
pub use tick::tick_task;
pub use trigger::trigger_task;
