//! Fetched reports
//!
//! Every report fetch is numbered when it starts and, once it lands, kept
//! under that number. A page carries the number of the report it shows, so a
//! redraw only ever touches that page's own data.
//!
//! Staleness is judged per subject: a finished fetch is superseded only when a
//! later-started fetch for the same subject has already landed.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::models::AttemptRecord;

/// Reports kept for redraws; the oldest are evicted first
pub const REPORT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct CachedReport {
    pub seq: u64,
    pub subject: Option<String>,
    pub records: Arc<Vec<AttemptRecord>>,
    pub fetched_at: DateTime<Utc>,
}

/// Outcome of offering a finished fetch to the cache
#[derive(Debug, Clone)]
pub enum Stored {
    /// Newest report for its subject
    Fresh(CachedReport),
    /// A later fetch for the same subject landed first; carries that report
    Superseded(CachedReport),
}

#[derive(Debug, Default)]
struct Reports {
    by_seq: BTreeMap<u64, CachedReport>,
    newest_by_subject: HashMap<Option<String>, u64>,
}

#[derive(Debug)]
pub struct ReportCache {
    next_seq: AtomicU64,
    capacity: usize,
    reports: RwLock<Reports>,
}

impl Default for ReportCache {
    fn default() -> Self {
        Self::with_capacity(REPORT_CAPACITY)
    }
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            next_seq: AtomicU64::new(0),
            capacity: capacity.max(1),
            reports: RwLock::new(Reports::default()),
        }
    }

    /// Number a fetch that is about to start
    pub fn begin(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Store a finished fetch
    pub fn store(&self, report: CachedReport) -> Stored {
        let mut reports = self.reports.write();

        let newer = reports
            .newest_by_subject
            .get(&report.subject)
            .copied()
            .filter(|newest| *newest > report.seq)
            .and_then(|newest| reports.by_seq.get(&newest).cloned());

        if let Some(newer) = newer {
            tracing::debug!(
                stale = report.seq,
                current = newer.seq,
                subject = ?report.subject,
                "Discarding stale report response"
            );
            return Stored::Superseded(newer);
        }

        reports
            .newest_by_subject
            .insert(report.subject.clone(), report.seq);
        reports.by_seq.insert(report.seq, report.clone());

        while reports.by_seq.len() > self.capacity {
            if let Some((evicted, old)) = reports.by_seq.pop_first() {
                if reports.newest_by_subject.get(&old.subject) == Some(&evicted) {
                    reports.newest_by_subject.remove(&old.subject);
                }
            }
        }

        Stored::Fresh(report)
    }

    /// The report stored under `seq`, if it is still kept
    pub fn get(&self, seq: u64) -> Option<CachedReport> {
        self.reports.read().by_seq.get(&seq).cloned()
    }
}
