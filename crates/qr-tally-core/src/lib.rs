pub mod config;
pub mod dedup;
pub mod error;
pub mod export;
pub mod feedback;
pub mod model;
pub mod scan_log;
pub mod session;
pub mod store;
pub mod writer;

pub use config::AppConfig;
pub use error::Error;
pub use feedback::{FeedbackReporter, SilentFeedback};
pub use model::{Cue, Decision, LastScanMarker, ScanEntry, Settings};
pub use scan_log::ScanLog;
pub use session::ScanSession;
pub use writer::BufferedWriter;
