//! Confirm Button Component
//!
//! Inline confirmation for destructive actions.

use leptos::prelude::*;

/// Shows `label` initially. When clicked, asks "Are you sure?" with
/// confirm/cancel buttons and runs `on_confirm` only on confirm.
#[component]
pub fn ConfirmButton(
    #[prop(into)] label: String,
    #[prop(into)] button_class: String,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let (confirming, set_confirming) = signal(false);

    view! {
        <Show when=move || !confirming.get()>
            <button class=button_class.clone() on:click=move |_| set_confirming.set(true)>
                {label.clone()}
            </button>
        </Show>
        <Show when=move || confirming.get()>
            <span class="confirm-inline m-3">
                <span class="me-2">"Are you sure?"</span>
                <button
                    class="btn btn-danger btn-sm me-1"
                    on:click=move |_| {
                        set_confirming.set(false);
                        on_confirm.run(());
                    }
                >
                    "Yes, clear"
                </button>
                <button class="btn btn-outline-secondary btn-sm" on:click=move |_| set_confirming.set(false)>
                    "Cancel"
                </button>
            </span>
        </Show>
    }
}
