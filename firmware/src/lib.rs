#![cfg_attr(not(test), no_std)]

//! Device core for the pattern-gated credential vault.
//!
//! The crate is hardware agnostic: the display, keystroke injection, real-time clock and raw
//! button pins are reached through traits so the whole workflow runs unchanged in tests and in
//! the host simulator.

extern crate alloc;

pub mod config;
pub mod crypto;
pub mod generator;
pub mod storage;
pub mod system;
pub mod ui;

pub use config::DeviceConfig;
pub use storage::{MemoryBackend, VaultBackend, VaultError, VaultStore};
pub use system::Device;
pub use ui::{AccessStateMachine, UiEffect, UiScreen};
