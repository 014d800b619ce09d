#![forbid(unsafe_code)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]

//! # Physim CLI
//!
//! Headless front end for the `physim` simulations: argument parsing,
//! configuration resolution and the fixed-rate run loop. The `physim`
//! binary is a thin wrapper over these modules.

pub mod cli;
pub mod config;
pub mod runner;
