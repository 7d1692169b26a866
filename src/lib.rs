//! StingrayTV CLI Library
//!
//! This library provides the core functionality for the `stingray` CLI: the
//! installation directory, the asset download lifecycle, bundle extraction and
//! the container runtime wrapper.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;
