//! Scan progress accounting and reporting

use crate::scanner::index::ClassNameIndex;
use std::time::{Duration, Instant};
use tracing::info;

/// Progress is reported every this many percent of the slots
pub const PROGRESS_REPORT_PERCENT: u64 = 5;

/// Counters observed at one point of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub iteration: u64,
    pub total: u64,
    pub elapsed: Duration,
    pub class_buckets: usize,
    pub distinct_buckets: usize,
}

impl ProgressSnapshot {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.iteration as f64 * 100.0 / self.total as f64
    }
}

/// Receives progress snapshots. Must not influence the scan.
pub trait ProgressSink {
    fn report(&mut self, snapshot: &ProgressSnapshot);
}

/// Logs snapshots through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn report(&mut self, snapshot: &ProgressSnapshot) {
        let secs = snapshot.elapsed.as_secs();
        info!(
            "{}/{} addresses ({:.2}%) | Elapsed: {:02}:{:02}",
            snapshot.iteration,
            snapshot.total,
            snapshot.percent(),
            secs / 60,
            secs % 60
        );
        info!(
            "Classes Found: {} | Distinct Classes: {}",
            snapshot.class_buckets, snapshot.distinct_buckets
        );
    }
}

/// Collects every snapshot, mostly useful in tests
impl ProgressSink for Vec<ProgressSnapshot> {
    fn report(&mut self, snapshot: &ProgressSnapshot) {
        self.push(*snapshot);
    }
}

/// Counts visited slots and decides when to emit a snapshot
#[derive(Debug)]
pub struct ProgressTracker {
    total: u64,
    interval: u64,
    next_report: u64,
    iteration: u64,
    last_reported: Option<u64>,
    started: Instant,
}

impl ProgressTracker {
    /// Slots between reports: 5% of `total`, at least 1
    pub fn interval(total: u64) -> u64 {
        (total * PROGRESS_REPORT_PERCENT / 100).max(1)
    }

    pub fn new(total: u64) -> Self {
        let interval = Self::interval(total);
        ProgressTracker {
            total,
            interval,
            next_report: interval,
            iteration: 0,
            last_reported: None,
            started: Instant::now(),
        }
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Count one visited slot, reporting when the next threshold is reached
    pub fn advance(&mut self, classes: &ClassNameIndex, sink: &mut dyn ProgressSink) {
        self.iteration += 1;
        if self.iteration >= self.next_report {
            self.emit(classes, sink);
            self.next_report += self.interval;
        }
    }

    /// Emit a closing snapshot unless the current count was just reported
    pub fn finish(&mut self, classes: &ClassNameIndex, sink: &mut dyn ProgressSink) {
        if self.last_reported != Some(self.iteration) {
            self.emit(classes, sink);
        }
    }

    fn emit(&mut self, classes: &ClassNameIndex, sink: &mut dyn ProgressSink) {
        let snapshot = ProgressSnapshot {
            iteration: self.iteration,
            total: self.total,
            elapsed: self.elapsed(),
            class_buckets: classes.bucket_count(),
            distinct_buckets: classes.distinct_bucket_count(),
        };
        sink.report(&snapshot);
        self.last_reported = Some(self.iteration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval() {
        assert_eq!(ProgressTracker::interval(0), 1);
        assert_eq!(ProgressTracker::interval(8), 1);
        assert_eq!(ProgressTracker::interval(19), 1);
        assert_eq!(ProgressTracker::interval(20), 1);
        assert_eq!(ProgressTracker::interval(100), 5);
        assert_eq!(ProgressTracker::interval(1_000_000), 50_000);
    }

    #[test]
    fn test_reports_every_interval() {
        let classes = ClassNameIndex::new();
        let mut sink: Vec<ProgressSnapshot> = Vec::new();
        let mut tracker = ProgressTracker::new(100);

        for _ in 0..100 {
            tracker.advance(&classes, &mut sink);
        }
        tracker.finish(&classes, &mut sink);

        let counts: Vec<u64> = sink.iter().map(|s| s.iteration).collect();
        assert_eq!(counts.len(), 20);
        assert_eq!(counts[0], 5);
        assert_eq!(*counts.last().unwrap(), 100);
        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_finish_reports_partial_count() {
        let classes = ClassNameIndex::new();
        let mut sink: Vec<ProgressSnapshot> = Vec::new();
        let mut tracker = ProgressTracker::new(100);

        for _ in 0..7 {
            tracker.advance(&classes, &mut sink);
        }
        tracker.finish(&classes, &mut sink);

        let counts: Vec<u64> = sink.iter().map(|s| s.iteration).collect();
        assert_eq!(counts, vec![5, 7]);
        assert_eq!(sink[1].total, 100);
    }

    #[test]
    fn test_finish_with_nothing_visited() {
        let classes = ClassNameIndex::new();
        let mut sink: Vec<ProgressSnapshot> = Vec::new();
        let mut tracker = ProgressTracker::new(0);
        tracker.finish(&classes, &mut sink);

        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].iteration, 0);
        assert_eq!(sink[0].percent(), 100.0);
    }

    #[test]
    fn test_tracing_sink_does_not_panic() {
        let mut sink = TracingProgressSink;
        sink.report(&ProgressSnapshot {
            iteration: 1,
            total: 0,
            elapsed: Duration::from_secs(75),
            class_buckets: 0,
            distinct_buckets: 0,
        });
    }
}
