//! Khodam Scan App
//!
//! Navigation shell switching between the dashboard and scanner views.

use leptos::ev;
use leptos::prelude::*;
use reactive_stores::Store;

use crate::components::{Dashboard, NavBar, ScannerView};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::route::Route;
use crate::store::DashboardState;

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let (reload_trigger, set_reload_trigger) = signal(0u32);
    let (route, set_route) = signal(Route::current());

    // Provide context to all children
    provide_context(AppContext::new(config, (reload_trigger, set_reload_trigger)));
    provide_context(Store::new(DashboardState::default()));

    let hash_listener = window_event_listener(ev::hashchange, move |_| {
        let next = Route::current();
        tracing::debug!(?next, "route changed");
        set_route.set(next);
    });
    on_cleanup(move || hash_listener.remove());

    view! {
        <NavBar route=route />
        <main>
            {move || match route.get() {
                Route::Dashboard => view! { <Dashboard /> }.into_any(),
                Route::Scan => view! { <ScannerView /> }.into_any(),
            }}
        </main>
    }
}
