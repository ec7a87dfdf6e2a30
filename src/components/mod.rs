//! UI Components
//!
//! Leptos components for the navigation shell and both views.

mod nav_bar;
mod confirm_button;
mod record_card;
mod dashboard;
mod checklist_form;
mod scanner_view;

pub use nav_bar::NavBar;
pub use confirm_button::ConfirmButton;
pub use record_card::RecordCard;
pub use dashboard::Dashboard;
pub use checklist_form::ChecklistForm;
pub use scanner_view::ScannerView;
