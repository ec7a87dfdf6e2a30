//! QR Scanner
//!
//! Camera abstraction, the `html5-qrcode` binding, the scan session state
//! machine and the controller tying them to record storage.

mod camera;
mod html5_qrcode;
mod session;
mod controller;

pub use camera::{release, CameraError, DecodeCallback, DecodeGate, QrCamera};
pub use html5_qrcode::Html5QrcodeCamera;
pub use session::{ScanPhase, ScanSession};
pub use controller::ScanController;
