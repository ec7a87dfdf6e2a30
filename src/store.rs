//! Dashboard State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::Record;

/// Records shown on the dashboard
#[derive(Clone, Debug, Default, Store)]
pub struct DashboardState {
    /// Last listing read from storage, ordered by code
    pub records: Vec<Record>,
}

/// Type alias for the store
pub type DashboardStore = Store<DashboardState>;

/// Get the dashboard store from context
pub fn use_dashboard_store() -> DashboardStore {
    expect_context::<DashboardStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Current records (tracked)
pub fn store_records(store: &DashboardStore) -> Vec<Record> {
    store.records().get()
}

/// Current records without subscribing
pub fn store_records_untracked(store: &DashboardStore) -> Vec<Record> {
    store.records().get_untracked()
}

/// Number of records (tracked)
pub fn store_record_count(store: &DashboardStore) -> usize {
    store.records().read().len()
}

/// Replace the listing with a fresh read from storage
pub fn store_replace_records(store: &DashboardStore, records: Vec<Record>) {
    store.records().set(records);
}

/// Empty the listing after a clear-all
pub fn store_clear_records(store: &DashboardStore) {
    store.records().write().clear();
}
