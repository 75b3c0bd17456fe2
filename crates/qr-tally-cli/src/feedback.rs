use colored::*;
use qr_tally_core::{Cue, Decision, FeedbackReporter, ScanEntry};
use std::io::{self, Write};
use tracing::trace;

const BELL: &str = "\x07";

/// Terminal feedback: one colored line per decision, bell for cues.
///
/// - first scan of a code: green
/// - code seen before: yellow
/// - cooldown suppression: silent
pub struct CliFeedback;

impl FeedbackReporter for CliFeedback {
    fn on_capture_started(&self) {
        eprintln!("  {} Scanning, one code per line (Ctrl-D to finish)", "●".cyan());
    }

    fn on_capture_stopped(&self) {
        eprintln!("  {} Scanning paused", "■".dimmed());
    }

    fn on_decision(&self, decision: &Decision) {
        match decision {
            Decision::Accept {
                entry,
                seen_before: false,
            } => println!("  {} Recorded: {}", "✓".green(), entry.code.bold()),
            Decision::Accept {
                entry,
                seen_before: true,
            } => println!("  {} Recorded again: {}", "✓".yellow(), entry.code.bold()),
            Decision::SuppressDuplicate { code } => {
                println!("  {} Already scanned: {}", "!".yellow(), code.bold())
            }
            Decision::SuppressCooldown { code } => trace!("Cooldown: {}", code),
        }
    }

    fn on_cue(&self, cue: Cue) {
        let bells = match cue {
            Cue::Ok => 1,
            Cue::Dup => 2,
        };
        let mut stderr = io::stderr();
        let _ = stderr.write_all(BELL.repeat(bells).as_bytes());
        let _ = stderr.flush();
    }

    fn on_undo(&self, removed: &ScanEntry) {
        println!("  {} Undid: {}", "↶".cyan(), removed.code.bold());
    }

    fn on_clear(&self, removed: usize) {
        println!("  {} Cleared {} scans", "✗".red(), removed);
    }
}
