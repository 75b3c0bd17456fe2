use crate::model::{Decision, LastScanMarker, ScanEntry, Settings};
use crate::scan_log::ScanLog;
use tracing::{debug, trace};

/// Run one raw decode through the cooldown and duplicate rules.
///
/// Returns `None` for blank input. Cooldown is checked first: a repeat of the
/// last processed code inside `settings.cooldown_ms` is dropped without
/// touching the marker or the log. Anything past the cooldown refreshes the
/// marker, then is either appended or suppressed as a duplicate.
pub fn process(
    raw_text: &str,
    now: i64,
    log: &mut ScanLog,
    settings: &Settings,
    marker: &mut LastScanMarker,
) -> Option<Decision> {
    let code = raw_text.trim();
    if code.is_empty() {
        trace!("Ignoring blank decode");
        return None;
    }

    let window = i64::try_from(settings.cooldown_ms).unwrap_or(i64::MAX);
    if code == marker.last_code && now.saturating_sub(marker.last_timestamp) < window {
        trace!("Cooldown suppressed {}", code);
        return Some(Decision::SuppressCooldown {
            code: code.to_string(),
        });
    }

    marker.last_code = code.to_string();
    marker.last_timestamp = now;

    let seen_before = log.contains(code);
    if seen_before && settings.unique_only {
        debug!("Duplicate suppressed {}", code);
        return Some(Decision::SuppressDuplicate {
            code: code.to_string(),
        });
    }

    let entry = ScanEntry {
        code: code.to_string(),
        timestamp: now,
    };
    log.push(entry.clone());
    debug!("Accepted {} (seen before: {})", code, seen_before);
    Some(Decision::Accept { entry, seen_before })
}
