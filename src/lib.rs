// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod error;
pub mod model;

pub mod store;
pub mod eligibility;
pub mod settlement;
pub mod accounting;

pub mod specs;
pub mod fetch;
pub mod proxy;

pub mod csv;
pub mod file;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{PenaError, Result};
pub use store::Store;
