//! Configuration loading and management for the site payroll service.
//!
//! This module loads the service settings and optional seed records from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use site_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Default cut weekday: {}", config.payroll().default_cut_weekday.index());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{PayrollSettings, SeedData, ServerSettings, ServiceConfig};
