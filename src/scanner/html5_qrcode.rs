//! `html5-qrcode` binding
//!
//! The library is loaded from a `<script>` tag and exposes a global
//! `Html5Qrcode` class.

use std::cell::RefCell;

use async_trait::async_trait;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::{CameraError, DecodeCallback, DecodeGate, QrCamera};
use crate::browser::js_error_text;
use crate::config::ScannerConfig;

#[wasm_bindgen]
extern "C" {
    #[derive(Clone)]
    type Html5Qrcode;

    #[wasm_bindgen(constructor, catch)]
    fn new(element_id: &str, verbose: bool) -> Result<Html5Qrcode, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn start(
        this: &Html5Qrcode,
        camera: &JsValue,
        config: &JsValue,
        on_success: &js_sys::Function,
        on_failure: &js_sys::Function,
    ) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn stop(this: &Html5Qrcode) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, getter, js_name = isScanning)]
    fn is_scanning(this: &Html5Qrcode) -> bool;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CameraConstraints<'a> {
    facing_mode: &'a str,
}

#[derive(Serialize)]
struct QrBox {
    width: u32,
    height: u32,
}

#[derive(Serialize)]
struct CaptureOptions {
    fps: u32,
    qrbox: QrBox,
}

type SuccessClosure = Closure<dyn FnMut(String)>;
type FailureClosure = Closure<dyn FnMut(JsValue)>;

/// [`QrCamera`] backed by `Html5Qrcode`.
///
/// A fresh JS scanner is created on every `start`, since the preview element
/// is re-rendered between sessions.
pub struct Html5QrcodeCamera {
    config: ScannerConfig,
    scanner: RefCell<Option<Html5Qrcode>>,
    gate: DecodeGate,
    // Kept alive while the JS side may call them
    closures: RefCell<Option<(SuccessClosure, FailureClosure)>>,
}

impl Html5QrcodeCamera {
    pub fn new(config: ScannerConfig) -> Self {
        Self {
            config,
            scanner: RefCell::new(None),
            gate: DecodeGate::new(),
            closures: RefCell::new(None),
        }
    }

    fn to_js<T: Serialize>(value: &T) -> Result<JsValue, CameraError> {
        serde_wasm_bindgen::to_value(value).map_err(|e| CameraError::Start(e.to_string()))
    }
}

#[async_trait(?Send)]
impl QrCamera for Html5QrcodeCamera {
    async fn start(&self, on_decode: DecodeCallback) -> Result<(), CameraError> {
        let scanner = Html5Qrcode::new(&self.config.element_id, false)
            .map_err(|e| CameraError::Start(js_error_text(&e)))?;

        let camera = Self::to_js(&CameraConstraints {
            facing_mode: &self.config.facing_mode,
        })?;
        let options = Self::to_js(&CaptureOptions {
            fps: self.config.fps,
            qrbox: QrBox {
                width: self.config.qrbox,
                height: self.config.qrbox,
            },
        })?;

        let mut deliver = self.gate.arm(on_decode);
        let on_success = SuccessClosure::new(move |text: String| deliver(text));
        // Called for every frame without a code
        let on_failure = FailureClosure::new(|_: JsValue| {});

        let pending = scanner.start(
            &camera,
            &options,
            on_success.as_ref().unchecked_ref(),
            on_failure.as_ref().unchecked_ref(),
        );
        *self.closures.borrow_mut() = Some((on_success, on_failure));
        *self.scanner.borrow_mut() = Some(scanner);

        let result = match pending {
            Ok(promise) => JsFuture::from(promise).await.map(|_| ()),
            Err(e) => Err(e),
        };
        result.map_err(|e| {
            self.gate.disarm();
            CameraError::Start(js_error_text(&e))
        })
    }

    async fn stop(&self) -> Result<(), CameraError> {
        self.gate.disarm();

        let scanner = self.scanner.borrow().clone();
        let Some(scanner) = scanner else {
            return Err(CameraError::NotRunning);
        };
        if !scanner.is_scanning() {
            return Err(CameraError::NotRunning);
        }

        let promise = scanner
            .stop()
            .map_err(|e| CameraError::Stop(js_error_text(&e)))?;
        JsFuture::from(promise)
            .await
            .map_err(|e| CameraError::Stop(js_error_text(&e)))?;
        tracing::debug!("camera stopped");
        Ok(())
    }
}
