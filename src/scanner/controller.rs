//! Scan Controller
//!
//! Drives one camera and one scan session against record storage. All
//! methods run on the UI thread; `RefCell` borrows are never held across an
//! `.await`.

use std::cell::RefCell;

use super::{release, CameraError, DecodeCallback, QrCamera, ScanPhase, ScanSession};
use crate::models::{Checklist, Flag, Record};
use crate::repository::{KeyValueStore, RecordRepository};

pub struct ScanController<C, S> {
    camera: C,
    records: RecordRepository<S>,
    session: RefCell<ScanSession>,
}

impl<C: QrCamera, S: KeyValueStore> ScanController<C, S> {
    pub fn new(camera: C, records: RecordRepository<S>) -> Self {
        Self {
            camera,
            records,
            session: RefCell::new(ScanSession::new()),
        }
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn records(&self) -> &RecordRepository<S> {
        &self.records
    }

    pub fn phase(&self) -> ScanPhase {
        self.session.borrow().phase().clone()
    }

    pub fn active(&self) -> Option<Record> {
        self.session.borrow().active().cloned()
    }

    /// Start capture. On failure the session stays `Idle`; there is no retry.
    ///
    /// A reset or shutdown while the camera is still starting wins: the
    /// camera is stopped again as soon as it is up and `Cancelled` returned.
    pub async fn start(&self, on_decode: DecodeCallback) -> Result<(), CameraError> {
        let generation = self.session.borrow().generation();
        match self.camera.start(on_decode).await {
            Ok(()) if self.session.borrow().generation() != generation => {
                if let Err(err) = release(&self.camera).await {
                    tracing::warn!("failed to stop camera after cancelled start: {}", err);
                }
                tracing::debug!("camera start cancelled");
                Err(CameraError::Cancelled)
            }
            Ok(()) => {
                tracing::debug!("camera started");
                Ok(())
            }
            Err(err) => {
                tracing::error!("camera failed to start: {}", err);
                Err(err)
            }
        }
    }

    /// Handle a decoded payload.
    ///
    /// The camera is stopped (and the stop awaited) before the decoded state
    /// is committed. Returns the active record, or `None` if this decode lost
    /// to an earlier one or the session was reset meanwhile.
    pub async fn handle_decode(&self, decoded: String) -> Option<Record> {
        let ticket = self.session.borrow_mut().claim(&decoded)?;

        if let Err(err) = release(&self.camera).await {
            tracing::warn!("camera did not stop cleanly: {}", err);
        }

        let checklist = self.load_or_default(ticket.code());
        let record = self.session.borrow_mut().commit(ticket, checklist).cloned()?;

        // First scan of a code creates its record
        self.persist(&record);
        tracing::info!(code = %record.code, "code scanned");
        Some(record)
    }

    /// Set `flag` on the active record and persist the whole checklist.
    pub fn toggle(&self, flag: Flag, checked: bool) -> Option<Record> {
        let record = self.session.borrow_mut().toggle(flag, checked).cloned()?;
        self.persist(&record);
        Some(record)
    }

    /// Forget the active record; the caller restarts capture.
    pub fn scan_another(&self) {
        self.session.borrow_mut().reset();
    }

    /// Teardown: invalidate pending decodes and stop the camera if running.
    pub async fn shutdown(&self) {
        self.session.borrow_mut().reset();
        match release(&self.camera).await {
            Ok(()) => tracing::debug!("scanner shut down"),
            Err(err) => tracing::warn!("failed to stop camera on teardown: {}", err),
        }
    }

    fn load_or_default(&self, code: &str) -> Checklist {
        match self.records.find(code) {
            Ok(Some(checklist)) => checklist,
            Ok(None) => Checklist::default(),
            Err(err) => {
                tracing::error!(code, "failed to load stored checklist, using defaults: {}", err);
                Checklist::default()
            }
        }
    }

    fn persist(&self, record: &Record) {
        if let Err(err) = self.records.save(record) {
            tracing::error!(code = %record.code, "failed to save checklist: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::Arc;

    use async_trait::async_trait;
    use rolling_logger::{RollingBuffer, RollingLayer};
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    use super::*;
    use crate::repository::MemoryStore;
    use crate::scanner::DecodeGate;

    const VALID: &str = r#"{"قداس":true,"تناول":true,"اعتراف":false,"ادوات":false,"صلاة":true}"#;

    #[derive(Default)]
    struct FakeCamera {
        running: Cell<bool>,
        fail_start: Option<String>,
        gate: DecodeGate,
        callback: RefCell<Option<DecodeCallback>>,
        starts: Cell<u32>,
        stops: Cell<u32>,
    }

    impl FakeCamera {
        fn failing(reason: &str) -> Self {
            Self {
                fail_start: Some(reason.to_string()),
                ..Self::default()
            }
        }

        /// Simulate a frame that decodes to `text`. Frames already in the
        /// decoder still reach the callback while a stop is in flight.
        fn emit(&self, text: &str) {
            if let Some(callback) = self.callback.borrow_mut().as_mut() {
                callback(text.to_string());
            }
        }
    }

    #[async_trait(?Send)]
    impl QrCamera for FakeCamera {
        async fn start(&self, on_decode: DecodeCallback) -> Result<(), CameraError> {
            self.starts.set(self.starts.get() + 1);
            // Permission prompt, device warm-up
            tokio::task::yield_now().await;
            if let Some(reason) = &self.fail_start {
                return Err(CameraError::Start(reason.clone()));
            }
            *self.callback.borrow_mut() = Some(self.gate.arm(on_decode));
            self.running.set(true);
            Ok(())
        }

        async fn stop(&self) -> Result<(), CameraError> {
            self.gate.disarm();
            let was_running = self.running.replace(false);
            // Let other tasks run while the "hardware" stops
            tokio::task::yield_now().await;
            if !was_running {
                return Err(CameraError::NotRunning);
            }
            self.stops.set(self.stops.get() + 1);
            Ok(())
        }
    }

    type TestController = ScanController<FakeCamera, MemoryStore>;

    fn controller_with(store: MemoryStore) -> TestController {
        ScanController::new(FakeCamera::default(), RecordRepository::new(store, "data/"))
    }

    fn recorder() -> (Rc<RefCell<Vec<String>>>, DecodeCallback) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, Box::new(move |text| sink.borrow_mut().push(text)))
    }

    #[tokio::test]
    async fn test_new_code_gets_default_and_is_persisted() {
        let ctl = controller_with(MemoryStore::new());
        let (seen, callback) = recorder();
        ctl.start(callback).await.expect("start failed");

        ctl.camera().emit("ABC123");
        assert_eq!(seen.borrow().as_slice(), ["ABC123".to_string()]);

        let record = ctl.handle_decode("ABC123".to_string()).await.expect("decode lost");
        assert_eq!(record, Record::new("ABC123", Checklist::default()));
        assert_eq!(ctl.camera().stops.get(), 1);
        assert!(!ctl.camera().running.get());
        assert_eq!(ctl.records().find("ABC123").unwrap(), Some(Checklist::default()));
        assert!(matches!(ctl.phase(), ScanPhase::Decoded(_)));
    }

    #[tokio::test]
    async fn test_rescan_loads_last_persisted() {
        let ctl = controller_with(MemoryStore::with_entries([("data/ABC", VALID)]));
        ctl.start(Box::new(|_| {})).await.unwrap();

        let record = ctl.handle_decode("ABC".to_string()).await.unwrap();
        let expected = Checklist::default()
            .with(Flag::Mass, true)
            .with(Flag::Communion, true)
            .with(Flag::Prayer, true);
        assert_eq!(record.checklist, expected);
    }

    #[tokio::test]
    async fn test_malformed_stored_value_replaced_by_default() {
        let ctl = controller_with(MemoryStore::with_entries([("data/ABC", "[1,2,3]")]));
        let buffer = Arc::new(RollingBuffer::new(16));
        let subscriber = Registry::default().with(RollingLayer::new(Arc::clone(&buffer)).quiet());
        let _guard = tracing::subscriber::set_default(subscriber);

        let record = ctl.handle_decode("ABC".to_string()).await.unwrap();

        assert_eq!(record.checklist, Checklist::default());
        assert_eq!(ctl.records().find("ABC").unwrap(), Some(Checklist::default()));
        assert!(buffer.contains("failed to load stored checklist"));
    }

    #[tokio::test]
    async fn test_toggles_persist_in_order() {
        let ctl = controller_with(MemoryStore::new());
        ctl.start(Box::new(|_| {})).await.unwrap();
        ctl.handle_decode("ABC123".to_string()).await.unwrap();

        let toggles = [
            (Flag::Mass, true),
            (Flag::Confession, true),
            (Flag::Prayer, true),
            (Flag::Mass, false),
            (Flag::Prayer, false),
            (Flag::Mass, true),
        ];
        let mut expected = Checklist::default();
        for (flag, checked) in toggles {
            expected.set(flag, checked);
            let record = ctl.toggle(flag, checked).unwrap();
            assert_eq!(record.checklist, expected);
            assert_eq!(ctl.records().find("ABC123").unwrap(), Some(expected));
        }

        let raw = ctl.records().store().get("data/ABC123").unwrap().unwrap();
        assert_eq!(
            raw,
            r#"{"قداس":true,"تناول":false,"اعتراف":true,"ادوات":false,"صلاة":false}"#
        );
    }

    #[tokio::test]
    async fn test_toggle_without_active_code_is_noop() {
        let ctl = controller_with(MemoryStore::new());
        assert!(ctl.toggle(Flag::Mass, true).is_none());
        assert_eq!(ctl.records().store().len(), 0);
    }

    #[tokio::test]
    async fn test_racing_decodes_commit_once() {
        let ctl = controller_with(MemoryStore::new());
        ctl.start(Box::new(|_| {})).await.unwrap();

        let (first, second) = tokio::join!(
            ctl.handle_decode("FIRST".to_string()),
            ctl.handle_decode("SECOND".to_string()),
        );

        assert_eq!(first.map(|r| r.code), Some("FIRST".to_string()));
        assert!(second.is_none());
        assert_eq!(ctl.records().list().unwrap().len(), 1);
        assert_eq!(ctl.camera().stops.get(), 1);
    }

    #[tokio::test]
    async fn test_reset_during_stop_discards_decode() {
        let ctl = controller_with(MemoryStore::new());
        ctl.start(Box::new(|_| {})).await.unwrap();

        let (decoded, _) = tokio::join!(ctl.handle_decode("LATE".to_string()), async {
            ctl.scan_another();
        });

        assert!(decoded.is_none());
        assert_eq!(ctl.phase(), ScanPhase::Idle);
        assert_eq!(ctl.records().find("LATE").unwrap(), None);
    }

    #[tokio::test]
    async fn test_scan_another_then_next_code() {
        let ctl = controller_with(MemoryStore::new());
        ctl.start(Box::new(|_| {})).await.unwrap();
        ctl.handle_decode("A".to_string()).await.unwrap();
        ctl.toggle(Flag::Communion, true);

        ctl.scan_another();
        assert!(ctl.active().is_none());
        ctl.start(Box::new(|_| {})).await.unwrap();
        let record = ctl.handle_decode("B".to_string()).await.unwrap();

        assert_eq!(record.checklist, Checklist::default());
        assert_eq!(ctl.camera().starts.get(), 2);
        let records = ctl.records().list().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].checklist.get(Flag::Communion));
    }

    #[tokio::test]
    async fn test_start_failure_leaves_idle() {
        let ctl = ScanController::new(
            FakeCamera::failing("NotAllowedError: Permission denied"),
            RecordRepository::new(MemoryStore::new(), "data/"),
        );

        let err = ctl.start(Box::new(|_| {})).await.unwrap_err();
        assert_eq!(err.to_string(), "NotAllowedError: Permission denied");
        assert_eq!(ctl.phase(), ScanPhase::Idle);
    }

    #[tokio::test]
    async fn test_shutdown_tolerates_not_running() {
        let ctl = controller_with(MemoryStore::new());
        ctl.shutdown().await;
        assert_eq!(ctl.camera().stops.get(), 0);

        ctl.start(Box::new(|_| {})).await.unwrap();
        ctl.shutdown().await;
        assert_eq!(ctl.camera().stops.get(), 1);
        ctl.shutdown().await;
        assert_eq!(ctl.camera().stops.get(), 1);
    }

    #[tokio::test]
    async fn test_decode_after_shutdown_is_discarded() {
        let ctl = controller_with(MemoryStore::new());
        ctl.start(Box::new(|_| {})).await.unwrap();

        let (decoded, _) = tokio::join!(ctl.handle_decode("GONE".to_string()), ctl.shutdown());
        assert!(decoded.is_none());
        assert_eq!(ctl.records().store().len(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_during_pending_start_stops_camera() {
        let ctl = controller_with(MemoryStore::new());
        let (seen, callback) = recorder();

        let (started, _) = tokio::join!(ctl.start(callback), ctl.shutdown());

        assert_eq!(started, Err(CameraError::Cancelled));
        assert!(!ctl.camera().running.get());
        assert_eq!(ctl.camera().stops.get(), 1);
        ctl.camera().emit("AFTER");
        assert!(seen.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_scan_another_during_pending_start_cancels_it() {
        let ctl = controller_with(MemoryStore::new());

        let (started, _) = tokio::join!(ctl.start(Box::new(|_| {})), async {
            ctl.scan_another();
        });

        assert_eq!(started, Err(CameraError::Cancelled));
        assert!(!ctl.camera().running.get());
        assert_eq!(ctl.phase(), ScanPhase::Idle);

        // The follow-up start from the view goes through
        ctl.start(Box::new(|_| {})).await.unwrap();
        assert!(ctl.camera().running.get());
        assert_eq!(ctl.camera().starts.get(), 2);
    }

    #[tokio::test]
    async fn test_start_logs_cancellation() {
        let ctl = controller_with(MemoryStore::new());
        let buffer = Arc::new(RollingBuffer::new(16));
        let subscriber = Registry::default().with(RollingLayer::new(Arc::clone(&buffer)).quiet());
        let _guard = tracing::subscriber::set_default(subscriber);

        let (started, _) = tokio::join!(ctl.start(Box::new(|_| {})), ctl.shutdown());

        assert!(started.is_err());
        assert!(buffer.contains("camera start cancelled"));
        assert!(!buffer.contains("camera failed to start"));
    }

    #[tokio::test]
    async fn test_decode_during_stop_is_not_delivered() {
        let ctl = controller_with(MemoryStore::new());
        let (seen, callback) = recorder();
        ctl.start(callback).await.unwrap();

        tokio::join!(ctl.shutdown(), async { ctl.camera().emit("LATE") });

        assert!(seen.borrow().is_empty());
        assert!(!ctl.camera().running.get());
    }
}
