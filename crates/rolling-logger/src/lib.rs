//! Rolling Logger
//!
//! A `tracing` layer that echoes every event to the host console and keeps
//! the most recent formatted lines in a fixed-size circular buffer.

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

/// Lines kept by [`init`] when no explicit capacity is given.
pub const DEFAULT_CAPACITY: usize = 500;

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Info and above.
    #[default]
    Normal,
    /// Debug and above.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    pub fn to_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

// ========================
// Circular buffer
// ========================

/// Bounded buffer of formatted log lines; the oldest line is evicted first.
#[derive(Debug)]
pub struct RollingBuffer {
    capacity: usize,
    lines: Mutex<VecDeque<String>>,
}

impl RollingBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            lines: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&self, line: String) {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Snapshot of the buffered lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        let lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if any buffered line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        let lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        lines.iter().any(|line| line.contains(needle))
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

// ========================
// Layer
// ========================

/// Layer that formats events into the shared [`RollingBuffer`].
pub struct RollingLayer {
    buffer: Arc<RollingBuffer>,
    echo: bool,
}

impl RollingLayer {
    pub fn new(buffer: Arc<RollingBuffer>) -> Self {
        Self { buffer, echo: true }
    }

    /// Keep lines in the buffer only, without writing to the console.
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }
}

impl<S: Subscriber> Layer<S> for RollingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let line = format!(
            "{} {:<5} {}: {}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            meta.level(),
            meta.target(),
            visitor.finish()
        );

        if self.echo {
            console::emit(*meta.level(), &line);
        }
        self.buffer.push(line);
    }
}

/// Collects the `message` field and renders the rest as `key=value`.
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl LineVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            format!("{}{}", self.message, self.fields)
        }
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod console {
    use tracing::Level;
    use wasm_bindgen::JsValue;

    pub fn emit(level: Level, line: &str) {
        let value = JsValue::from_str(line);
        match level {
            Level::ERROR => web_sys::console::error_1(&value),
            Level::WARN => web_sys::console::warn_1(&value),
            Level::INFO => web_sys::console::info_1(&value),
            _ => web_sys::console::debug_1(&value),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod console {
    use tracing::Level;

    pub fn emit(_level: Level, line: &str) {
        eprintln!("{}", line);
    }
}

/// Install the rolling layer as the global subscriber.
///
/// Only the first call installs anything; later calls return a fresh,
/// unattached buffer.
pub fn init(verbosity: Verbosity) -> Arc<RollingBuffer> {
    init_with_capacity(verbosity, DEFAULT_CAPACITY)
}

pub fn init_with_capacity(verbosity: Verbosity, capacity: usize) -> Arc<RollingBuffer> {
    let buffer = Arc::new(RollingBuffer::new(capacity));
    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::from_level(verbosity.to_level()))
        .with(RollingLayer::new(Arc::clone(&buffer)));

    // Ignore error if a subscriber is already set
    let _ = tracing::subscriber::set_global_default(subscriber);
    buffer
}
