//! Dashboard Component
//!
//! Lists every stored record with CSV export and clear-all.
//!
//! The listing is re-read on mount, on window focus and on `storage` events
//! from other tabs. `storage` never fires for writes made in this tab, so the
//! mount-time read is what picks up scans made before navigating here.

use leptos::ev;
use leptos::prelude::*;

use crate::browser;
use crate::components::{ConfirmButton, RecordCard};
use crate::context::use_app_context;
use crate::export::{self, CSV_MIME};
use crate::repository::{browser_records, touches_namespace};
use crate::store::{
    store_clear_records, store_record_count, store_records, store_records_untracked,
    store_replace_records, use_dashboard_store,
};

#[component]
pub fn Dashboard() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_dashboard_store();
    let (error, set_error) = signal(None::<String>);

    // Load records on mount and whenever the trigger changes
    Effect::new(move |_| {
        let trigger = ctx.reload_trigger.get();
        let config = ctx.config();
        match browser_records(&config).and_then(|repo| repo.list()) {
            Ok(records) => {
                tracing::debug!(count = records.len(), trigger, "dashboard loaded records");
                set_error.set(None);
                store_replace_records(&store, records);
            }
            Err(err) => {
                tracing::error!("failed to list records: {}", err);
                set_error.set(Some(err.to_string()));
            }
        }
    });

    let prefix = ctx.config().storage.prefix;
    let storage_listener = window_event_listener(ev::storage, move |event| {
        if touches_namespace(event.key().as_deref(), &prefix) {
            ctx.reload();
        }
    });
    let focus_listener = window_event_listener(ev::focus, move |_| ctx.reload());
    on_cleanup(move || {
        storage_listener.remove();
        focus_listener.remove();
    });

    let export_csv = move |_| {
        let config = ctx.config();
        let records = store_records_untracked(&store);
        let Some(csv) = export::render_csv(&records, &config.export.code_header) else {
            return;
        };
        match browser::download_text(&config.export.file_name, CSV_MIME, &csv) {
            Ok(()) => tracing::info!(rows = records.len(), "exported records"),
            Err(err) => tracing::error!("export failed: {}", err),
        }
    };

    let clear_all = Callback::new(move |_: ()| {
        let config = ctx.config();
        match browser_records(&config).and_then(|repo| repo.clear()) {
            Ok(_) => store_clear_records(&store),
            Err(err) => {
                tracing::error!("failed to clear records: {}", err);
                set_error.set(Some(err.to_string()));
            }
        }
    });

    view! {
        <div class="container mt-4">
            <div class="d-flex justify-content-between align-items-center mb-4">
                <h1>"Dashboard"</h1>
                <Show when=move || { store_record_count(&store) > 0 }>
                    <div class="btn-group">
                        <button class="btn btn-success m-3" on:click=export_csv>
                            "Export to Excel"
                        </button>
                        <ConfirmButton
                            label="Clear All Data"
                            button_class="btn btn-danger m-3"
                            on_confirm=clear_all
                        />
                    </div>
                </Show>
            </div>

            {move || error.get().map(|msg| view! { <div class="alert alert-danger">{msg}</div> })}

            <Show
                when=move || { store_record_count(&store) > 0 }
                fallback=|| view! {
                    <div class="alert alert-info">
                        "No data found in local storage. Go to the 'Scan' page to add data."
                    </div>
                }
            >
                <For
                    each=move || store_records(&store)
                    key=|record| (record.code.clone(), record.checklist)
                    children=move |record| view! { <RecordCard record=record /> }
                />
            </Show>
        </div>
    }
}
