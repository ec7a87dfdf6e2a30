//! Record Card Component

use leptos::prelude::*;

use crate::models::Record;

/// One scanned code with a checked/unchecked row per flag
#[component]
pub fn RecordCard(record: Record) -> impl IntoView {
    let rows = record
        .checklist
        .entries()
        .map(|(flag, checked)| {
            view! {
                <tr>
                    <td>{flag.key()}</td>
                    <td>{if checked { "✔️" } else { "❌" }}</td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <div class="card mb-3">
            <div class="card-header">
                <h5 class="card-title mb-0" style="word-break: break-all;">{record.code}</h5>
            </div>
            <div class="card-body">
                <table class="table table-striped table-bordered table-hover table-sm">
                    <thead>
                        <tr>
                            <th>"Item"</th>
                            <th>"Checked"</th>
                        </tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            </div>
        </div>
    }
}
