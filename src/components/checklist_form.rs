//! Checklist Form Component
//!
//! One checkbox per flag for the active record.

use leptos::prelude::*;

use crate::models::{Flag, Record};

#[component]
pub fn ChecklistForm(
    record: ReadSignal<Option<Record>>,
    #[prop(into)] on_toggle: Callback<(Flag, bool)>,
) -> impl IntoView {
    let checkboxes = Flag::ALL
        .into_iter()
        .map(|flag| {
            let checked = move || {
                record
                    .get()
                    .map(|r| r.checklist.get(flag))
                    .unwrap_or(false)
            };
            view! {
                <div class="form-check">
                    <input
                        class="form-check-input"
                        type="checkbox"
                        id=flag.input_id()
                        prop:checked=checked
                        on:change=move |ev| on_toggle.run((flag, event_target_checked(&ev)))
                    />
                    <label class="form-check-label" for=flag.input_id()>{flag.label()}</label>
                </div>
            }
        })
        .collect_view();

    view! {
        <form on:submit=|ev| ev.prevent_default()>
            <label class="form-label">"Check applicable items:"</label>
            <div class="d-flex gap-5 flex-wrap">{checkboxes}</div>
        </form>
    }
}
