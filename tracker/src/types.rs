//! Record and snapshot types for engagement tracking.
//!
//! This module defines the persisted [`EngagementRecord`] schema and the
//! read-only [`EngagementSnapshot`] returned by queries. All types serialize
//! to camelCase JSON.
//!
//! # Forward Compatibility
//!
//! Stored records must remain readable across versions: every field of
//! [`EngagementRecord`] falls back to its default when missing, and unknown
//! fields are ignored on read. A record written by a newer or older version
//! therefore parses without error.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The persisted engagement record.
///
/// One record exists per installation, stored as a single JSON value under
/// a well-known key. It accumulates visits and per-platform click counts
/// across process lifetimes.
///
/// # Example
///
/// ```
/// use engage_tracker::types::EngagementRecord;
///
/// let record = EngagementRecord::default();
/// assert_eq!(record.visit_count, 0);
/// assert_eq!(record.total_clicks, 0);
/// assert!(record.clicks_by_platform.is_empty());
/// assert!(record.recent_events.is_empty());
/// assert!(record.last_click.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngagementRecord {
    /// Number of tracker initializations (one per page load).
    pub visit_count: u64,

    /// Click counters keyed by platform identifier.
    ///
    /// Open-world taxonomy: any non-empty identifier gets its own entry.
    pub clicks_by_platform: BTreeMap<String, u64>,

    /// Total clicks across all platforms.
    ///
    /// Stored redundantly; [`reconcile`](Self::reconcile) restores
    /// consistency with `clicks_by_platform` after loading.
    pub total_clicks: u64,

    /// The most recent click, overwritten on every click.
    pub last_click: Option<LastClick>,

    /// Bounded FIFO of recent clicks, oldest first.
    pub recent_events: VecDeque<ClickEvent>,

    /// When the current session started.
    pub session_start: DateTime<Utc>,
}

impl Default for EngagementRecord {
    fn default() -> Self {
        Self {
            visit_count: 0,
            clicks_by_platform: BTreeMap::new(),
            total_clicks: 0,
            last_click: None,
            recent_events: VecDeque::new(),
            session_start: DateTime::UNIX_EPOCH,
        }
    }
}

impl EngagementRecord {
    /// Returns the sum of all per-platform click counters.
    #[must_use]
    pub fn clicks_sum(&self) -> u64 {
        self.clicks_by_platform.values().sum()
    }

    /// Restores the invariant that `total_clicks` equals the sum of
    /// `clicks_by_platform`.
    ///
    /// A record loaded from storage may carry a stale or missing total
    /// (older schema versions stored counters only). The counter map is
    /// authoritative.
    pub fn reconcile(&mut self) {
        let sum = self.clicks_sum();
        if self.total_clicks != sum {
            tracing::debug!(
                stored = self.total_clicks,
                derived = sum,
                "Reconciling total click count with platform counters"
            );
            self.total_clicks = sum;
        }
    }

    /// Evicts oldest events until at most `cap` remain.
    ///
    /// Applied after loading so that a record written under a larger cap
    /// shrinks to the configured bound.
    pub fn truncate_events(&mut self, cap: usize) {
        while self.recent_events.len() > cap {
            self.recent_events.pop_front();
        }
    }
}

/// A single tracked click in the recent-events history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    /// Platform identifier (e.g. "facebook", "instagram").
    pub platform: String,

    /// When the click occurred.
    pub timestamp: DateTime<Utc>,

    /// Seconds elapsed between session start and the click.
    pub seconds_on_page: u64,
}

/// The most recent click, kept separately from the bounded history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastClick {
    /// Platform identifier of the click.
    pub platform: String,

    /// When the click occurred.
    pub timestamp: DateTime<Utc>,
}

/// A read-only view of the current engagement state.
///
/// Produced by [`EngagementTracker::query`](crate::tracker::EngagementTracker::query).
/// Holds owned copies; it does not change when the tracker records further
/// clicks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementSnapshot {
    /// Total tracked visits.
    pub visit_count: u64,

    /// Total tracked clicks, equal to the sum of `clicks_by_platform`.
    pub total_clicks: u64,

    /// Click counters keyed by platform identifier.
    pub clicks_by_platform: BTreeMap<String, u64>,

    /// The most recent click, if any clicks were recorded.
    pub last_click: Option<LastClick>,

    /// The most recent events, oldest first, capped at the configured
    /// snapshot size.
    pub recent_events: Vec<ClickEvent>,

    /// Clicks per visit: `total_clicks / visit_count`, or `0.0` when no
    /// visits were recorded.
    pub engagement_ratio: f64,
}
