#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

pub mod config;
#[cfg(feature = "std")]
pub mod error;
pub mod gesture;
pub mod kdf;
pub mod vault;
