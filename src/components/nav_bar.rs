//! Navigation Bar Component
//!
//! Persistent header linking the dashboard and scanner views.

use leptos::prelude::*;

use crate::route::Route;

#[component]
pub fn NavBar(route: ReadSignal<Route>) -> impl IntoView {
    let link = move |target: Route| {
        view! {
            <a
                class=move || if route.get() == target { "nav-link active" } else { "nav-link" }
                href=target.href()
            >
                {target.title()}
            </a>
        }
    };

    view! {
        <nav class="navbar navbar-expand-lg bg-light">
            <div class="container">
                <a class="navbar-brand" href=Route::Dashboard.href()>"A3dad Khodam"</a>
                <div class="navbar-nav me-auto">
                    {link(Route::Dashboard)}
                    {link(Route::Scan)}
                </div>
            </div>
        </nav>
    }
}
