//! Camera seam

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;

/// Receives the decoded payload. Fires at most once per `start`.
pub type DecodeCallback = Box<dyn FnMut(String)>;

/// Camera errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// Permission denied, no camera, library missing.
    Start(String),
    Stop(String),
    /// Stop requested while not capturing.
    NotRunning,
    /// The scanner was reset or torn down before the start completed.
    Cancelled,
}

impl std::fmt::Display for CameraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraError::Start(msg) => write!(f, "{}", msg),
            CameraError::Stop(msg) => write!(f, "failed to stop camera: {}", msg),
            CameraError::NotRunning => write!(f, "camera is not running"),
            CameraError::Cancelled => write!(f, "camera start cancelled"),
        }
    }
}

impl std::error::Error for CameraError {}

/// A camera that continuously decodes QR codes once started.
///
/// `stop` must guarantee that `on_decode` does not fire afterwards, even if
/// a frame was being decoded when it was called.
#[async_trait(?Send)]
pub trait QrCamera {
    /// Start capture; resolves once the camera is streaming
    async fn start(&self, on_decode: DecodeCallback) -> Result<(), CameraError>;

    /// Stop capture; `Err(NotRunning)` if it was not capturing
    async fn stop(&self) -> Result<(), CameraError>;
}

/// Stop `camera`, treating "not running" as success.
pub async fn release<C: QrCamera + ?Sized>(camera: &C) -> Result<(), CameraError> {
    match camera.stop().await {
        Ok(()) | Err(CameraError::NotRunning) => Ok(()),
        Err(err) => Err(err),
    }
}

/// Single-shot delivery of decode results.
///
/// Each [`DecodeGate::arm`] hands out a callback that forwards the first
/// payload only. [`DecodeGate::disarm`] closes the current callback, so a
/// frame decoded while a stop is in flight is dropped. Callbacks from an
/// earlier arm stay closed after re-arming.
#[derive(Default)]
pub struct DecodeGate {
    current: RefCell<Rc<Cell<bool>>>,
}

impl DecodeGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&self, mut on_decode: DecodeCallback) -> DecodeCallback {
        let open = Rc::new(Cell::new(true));
        *self.current.borrow_mut() = Rc::clone(&open);
        Box::new(move |text| {
            if open.replace(false) {
                on_decode(text);
            }
        })
    }

    pub fn disarm(&self) {
        self.current.borrow().set(false);
    }

    pub fn is_armed(&self) -> bool {
        self.current.borrow().get()
    }
}
