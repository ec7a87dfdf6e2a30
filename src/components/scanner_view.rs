//! Scanner View Component
//!
//! Camera preview until a code is decoded, then the checklist for that code.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::ChecklistForm;
use crate::context::use_app_context;
use crate::models::{Flag, Record};
use crate::repository::{browser_records, LocalStorageStore};
use crate::scanner::{CameraError, DecodeCallback, Html5QrcodeCamera, ScanController};

type BrowserScanner = ScanController<Html5QrcodeCamera, LocalStorageStore>;

#[component]
pub fn ScannerView() -> impl IntoView {
    let ctx = use_app_context();
    let config = ctx.config();
    let (active, set_active) = signal(None::<Record>);
    let (error, set_error) = signal(None::<String>);

    let controller: Option<Rc<BrowserScanner>> = match browser_records(&config) {
        Ok(records) => {
            let camera = Html5QrcodeCamera::new(config.scanner.clone());
            Some(Rc::new(ScanController::new(camera, records)))
        }
        Err(err) => {
            tracing::error!("scanner storage unavailable: {}", err);
            set_error.set(Some(err.to_string()));
            None
        }
    };
    let controller = StoredValue::new_local(controller);

    // Start the camera; the decode callback holds a weak handle so the
    // controller is dropped with the view
    let start_capture = move || {
        let Some(ctl) = controller.try_get_value().flatten() else { return };
        let weak = Rc::downgrade(&ctl);
        let on_decode: DecodeCallback = Box::new(move |text| {
            let Some(ctl) = weak.upgrade() else { return };
            spawn_local(async move {
                if let Some(record) = ctl.handle_decode(text).await {
                    set_error.set(None);
                    set_active.set(Some(record));
                }
            });
        });
        spawn_local(async move {
            match ctl.start(on_decode).await {
                Ok(()) | Err(CameraError::Cancelled) => {}
                Err(err) => {
                    set_error.set(Some(format!("QR Code Scanner failed to start: {}", err)));
                }
            }
        });
    };

    // Capture whenever there is no active code; wait a frame so the preview
    // element is in the DOM
    Effect::new(move |_| {
        if active.get().is_none() {
            request_animation_frame(start_capture);
        }
    });

    on_cleanup(move || {
        if let Some(Some(ctl)) = controller.try_get_value() {
            spawn_local(async move { ctl.shutdown().await });
        }
    });

    let on_toggle = Callback::new(move |(flag, checked): (Flag, bool)| {
        let updated = controller.with_value(|ctl| {
            ctl.as_ref().and_then(|ctl| ctl.toggle(flag, checked))
        });
        if let Some(record) = updated {
            set_active.set(Some(record));
        }
    });

    let scan_another = move |_| {
        controller.with_value(|ctl| {
            if let Some(ctl) = ctl {
                ctl.scan_another();
            }
        });
        set_active.set(None);
    };

    let element_id = config.scanner.element_id;

    view! {
        <div class="container mt-4">
            {move || error.get().map(|msg| view! { <div class="alert alert-danger">{msg}</div> })}

            <Show
                when=move || active.get().is_some()
                fallback=move || view! {
                    <div>
                        <h2>"QR Code Scanner"</h2>
                        <p>"Point your camera at a QR code to scan it."</p>
                        <div id=element_id.clone() style="width: 100%; max-width: 500px; margin: 0 auto;"></div>
                    </div>
                }
            >
                <h2>"Scan Successful!"</h2>
                <div class="alert alert-success">
                    <p class="mb-0">"Scanned Data:"</p>
                    <strong style="word-break: break-all;">
                        {move || active.get().map(|record| record.code).unwrap_or_default()}
                    </strong>
                </div>
                <div class="row mt-4">
                    <div class="col-md-8">
                        <ChecklistForm record=active on_toggle=on_toggle />
                    </div>
                    <div class="col-md-4 d-flex align-items-start justify-content-md-end mt-3 mt-md-0">
                        <button class="btn btn-secondary" on:click=scan_another>"Scan Another"</button>
                    </div>
                </div>
            </Show>
        </div>
    }
}
