//! Application state for the site payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::config::PayrollSettings;
use crate::store::LaborStore;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers:
/// the record store, the clock supplying "today", and the payroll settings.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn LaborStore>,
    clock: Arc<dyn Clock>,
    settings: Arc<PayrollSettings>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(store: Arc<dyn LaborStore>, clock: Arc<dyn Clock>, settings: PayrollSettings) -> Self {
        Self {
            store,
            clock,
            settings: Arc::new(settings),
        }
    }

    /// Returns the record store.
    pub fn store(&self) -> &dyn LaborStore {
        self.store.as_ref()
    }

    /// Returns today's date according to the configured clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Returns the payroll settings.
    pub fn settings(&self) -> &PayrollSettings {
        &self.settings
    }
}
