//! Application Configuration
//!
//! Defaults can be overridden by a JSON block embedded in `index.html`:
//! `<script id="app-config" type="application/json">{ ... }</script>`.

use rolling_logger::Verbosity;
use serde::{Deserialize, Serialize};

/// Id of the optional inline config element.
pub const CONFIG_ELEMENT_ID: &str = "app-config";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub export: ExportConfig,
    pub scanner: ScannerConfig,
    pub verbosity: Verbosity,
}

/// Where records live in `localStorage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Namespace prefix prepended to every scanned code.
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Name of the downloaded CSV file.
    pub file_name: String,
    /// Header of the first CSV column.
    pub code_header: String,
}

/// Settings handed to the QR scanner library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Id of the element the camera preview is rendered into.
    pub element_id: String,
    /// Frames analysed per second.
    pub fps: u32,
    /// Side of the square scan box in pixels.
    pub qrbox: u32,
    /// `environment` selects the rear camera.
    pub facing_mode: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            prefix: "data/".to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "a3dad_khodam_data.csv".to_string(),
            code_header: "Code".to_string(),
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            element_id: "qr-reader".to_string(),
            fps: 10,
            qrbox: 250,
            facing_mode: "environment".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse the inline config text, falling back to defaults.
    ///
    /// Returns the config and, on a parse failure, the error text so the
    /// caller can log it once logging is up.
    pub fn from_inline(text: Option<&str>) -> (Self, Option<String>) {
        match text.map(str::trim).filter(|t| !t.is_empty()) {
            None => (Self::default(), None),
            Some(json) => match Self::from_json(json) {
                Ok(config) => (config, None),
                Err(e) => (Self::default(), Some(e.to_string())),
            },
        }
    }

    /// Read the config from the page.
    pub fn load() -> (Self, Option<String>) {
        let text = crate::browser::element_text(CONFIG_ELEMENT_ID);
        Self::from_inline(text.as_deref())
    }
}
