#![deny(unsafe_op_in_unsafe_fn)]
// Library half of the panel binary so the screens can be driven from tests
// without the LCD or the knob attached.

pub mod app;
pub mod cancel;
pub mod config;
pub mod display;
pub mod error;
pub mod input;
pub mod menu;
pub mod refresh;
pub mod sensors;
pub mod system;
pub mod ui;
pub mod units;
