//! Turns a Mahjong arcade control panel into a USB keyboard.
//!
//! The panel is a 5 x 6 switch matrix. [`scanner::Scanner`] drives it through
//! `embedded-hal` pins, [`keymap::KEYMAP`] names every position, and
//! [`tracker::Tracker`] forwards each change to a [`hid::HidTransmitter`]
//! exactly once. Nothing in here touches the RP2040 directly, so it all runs
//! under `cargo test` on the host.
#![cfg_attr(not(test), no_std)]

pub mod hid;
pub mod keymap;
pub mod matrix;
pub mod scanner;
pub mod tracker;

pub use keyberon::key_code::KeyCode;
