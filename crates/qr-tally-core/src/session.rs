use crate::config::AppConfig;
use crate::dedup;
use crate::error::Error;
use crate::feedback::{FeedbackReporter, SilentFeedback};
use crate::model::{Decision, LastScanMarker, ScanEntry, Settings, DEFAULT_SESSION_LABEL};
use crate::scan_log::ScanLog;
use crate::store::{DurableStore, RocksBackend};
use crate::writer::BufferedWriter;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Owner of the single writable scan log, settings, session label and
/// cooldown marker. Every decode and UI command goes through here.
///
/// Log mutations are persisted through the buffered writer; settings and the
/// session label are written straight to the store on each change.
pub struct ScanSession {
    store: DurableStore,
    writer: BufferedWriter,
    log: ScanLog,
    settings: Settings,
    session_label: String,
    marker: LastScanMarker,
    capturing: bool,
    reporter: Box<dyn FeedbackReporter>,
}

impl ScanSession {
    /// Load all three slots from the store. Read failures fall back to
    /// defaults.
    pub fn hydrate(store: DurableStore, flush_delay: Duration) -> Self {
        let log = ScanLog::from_entries(store.load_rows());
        let session_label = store.load_session_label();
        let settings = store.load_settings();
        info!(
            "Hydrated session '{}' with {} rows ({} distinct)",
            session_label,
            log.len(),
            log.distinct_codes()
        );
        debug!("Settings: {:?}", settings);

        Self {
            writer: BufferedWriter::new(store.clone(), flush_delay),
            store,
            log,
            settings,
            session_label,
            marker: LastScanMarker::default(),
            capturing: false,
            reporter: Box::new(SilentFeedback),
        }
    }

    /// Open the RocksDB store named by the config and hydrate from it.
    pub fn open(config: &AppConfig) -> Result<Self, Error> {
        let backend = RocksBackend::open(&config.store_path)?;
        let store = DurableStore::new(Arc::new(backend));
        Ok(Self::hydrate(store, config.flush_delay()))
    }

    pub fn with_reporter(mut self, reporter: Box<dyn FeedbackReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn log(&self) -> &ScanLog {
        &self.log
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session_label(&self) -> &str {
        &self.session_label
    }

    pub fn marker(&self) -> &LastScanMarker {
        &self.marker
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn has_pending_write(&self) -> bool {
        self.writer.has_pending()
    }

    /// Returns false if capture was already running.
    pub fn scan_start(&mut self) -> bool {
        if self.capturing {
            return false;
        }
        self.capturing = true;
        self.reporter.on_capture_started();
        debug!("Capture started");
        true
    }

    /// Stops accepting decodes. A pending buffered write is left to fire.
    pub fn scan_stop(&mut self) -> bool {
        if !self.capturing {
            return false;
        }
        self.capturing = false;
        self.reporter.on_capture_stopped();
        debug!("Capture stopped");
        true
    }

    /// Feed one raw decode at `now` (epoch milliseconds).
    ///
    /// Returns `None` while capture is stopped or for blank input.
    pub fn on_decode(&mut self, raw_text: &str, now: i64) -> Option<Decision> {
        if !self.capturing {
            debug!("Ignoring decode while capture is stopped");
            return None;
        }

        let decision = dedup::process(
            raw_text,
            now,
            &mut self.log,
            &self.settings,
            &mut self.marker,
        )?;

        if decision.is_accept() {
            self.writer.stage(self.log.snapshot());
        }

        self.reporter.on_decision(&decision);
        if self.settings.beep_enabled {
            if let Some(cue) = decision.cue() {
                self.reporter.on_cue(cue);
            }
        }
        Some(decision)
    }

    /// `on_decode` stamped with the current wall clock.
    pub fn on_decode_now(&mut self, raw_text: &str) -> Option<Decision> {
        self.on_decode(raw_text, chrono::Utc::now().timestamp_millis())
    }

    /// Remove the most recent entry. The cooldown marker is left as is, so
    /// the removed code is still subject to cooldown.
    pub fn undo_last(&mut self) -> Option<ScanEntry> {
        let removed = self.log.undo_last()?;
        self.writer.stage(self.log.snapshot());
        self.reporter.on_undo(&removed);
        debug!("Undid {} ({} rows left)", removed.code, self.log.len());
        Some(removed)
    }

    /// Drop every entry. Settings and the cooldown marker are kept.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.log.clear();
        self.writer.stage(self.log.snapshot());
        self.reporter.on_clear(removed);
        info!("Cleared {} rows", removed);
        removed
    }

    /// Apply new settings and persist them immediately. The new settings stay
    /// in effect even if the save fails.
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), Error> {
        debug!("Updating settings: {:?}", settings);
        self.settings = settings;
        self.store.save_settings(&self.settings)
    }

    /// Set the batch label, trimmed. A blank label resets to the default.
    pub fn update_session_label(&mut self, label: &str) -> Result<(), Error> {
        let label = label.trim();
        self.session_label = if label.is_empty() {
            DEFAULT_SESSION_LABEL.to_string()
        } else {
            label.to_string()
        };
        debug!("Session label set to '{}'", self.session_label);
        self.store.save_session_label(&self.session_label)
    }

    /// Write any staged snapshot now instead of waiting for the timer.
    pub fn shutdown(&mut self) -> bool {
        self.scan_stop();
        self.writer.flush_now()
    }
}
