//! Progress reporting for long conversions

use std::time::{Duration, Instant};

use opcorpora_parser::ConversionStats;

/// Logs a progress line every `every` records.
pub struct ProgressTracker {
    every: u64,
    next_report: u64,
    start_time: Instant,
}

impl ProgressTracker {
    /// `every == 0` disables intermediate reports.
    #[must_use]
    pub fn new(every: u64) -> Self {
        Self {
            every,
            next_report: every,
            start_time: Instant::now(),
        }
    }

    /// Check if a report is due for `processed` records
    #[must_use]
    pub fn should_report(&self, processed: u64) -> bool {
        self.every > 0 && processed >= self.next_report
    }

    pub fn observe(&mut self, stats: &ConversionStats) {
        let processed = stats.total();
        if !self.should_report(processed) {
            return;
        }
        self.next_report = processed + self.every;

        tracing::info!(
            records = processed,
            lemmas = stats.lemmas,
            forms = stats.forms,
            rate = format!("{:.0} records/sec", rate(processed, self.start_time.elapsed())),
            "Conversion progress"
        );
    }

    /// Log the final summary
    pub fn finish(&self, stats: &ConversionStats) {
        let elapsed = self.start_time.elapsed();
        tracing::info!(
            lemmas = stats.lemmas,
            forms = stats.forms,
            grammemes = stats.grammemes,
            link_types = stats.link_types,
            links = stats.links,
            elapsed = format!("{elapsed:?}"),
            rate = format!("{:.0} records/sec", rate(stats.total(), elapsed)),
            "Conversion complete"
        );
    }
}

fn rate(processed: u64, elapsed: Duration) -> f64 {
    if elapsed.as_secs_f64() > 0.0 {
        #[allow(clippy::cast_precision_loss)]
        let rate = processed as f64 / elapsed.as_secs_f64();
        rate
    } else {
        0.0
    }
}
