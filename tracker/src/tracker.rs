//! The engagement tracker component.
//!
//! [`EngagementTracker`] owns the in-memory engagement record and a
//! [`RecordStore`] for durability. The hosting application constructs one
//! instance and passes it by reference to whatever UI code needs to record
//! or report engagement; there is no global state.
//!
//! # Lifecycle
//!
//! The tracker has exactly two states, **Uninitialized** and **Active**.
//! [`initialize`](EngagementTracker::initialize) is the only transition and
//! is expected once per process lifetime, at page load. Calling
//! [`record_click`](EngagementTracker::record_click) or
//! [`query`](EngagementTracker::query) before initialization operates on an
//! empty in-memory record instead of faulting; pre-initialization clicks
//! are not persisted, so an unloaded default can never overwrite a stored
//! record.
//!
//! # Error Handling
//!
//! No tracker operation returns an error or panics. Storage failures are
//! logged and tracking continues in-memory for the rest of the session;
//! an unparseable stored record is replaced by defaults.
//!
//! # Example
//!
//! ```
//! use engage_tracker::config::Config;
//! use engage_tracker::store::MemoryStore;
//! use engage_tracker::tracker::EngagementTracker;
//!
//! let mut tracker = EngagementTracker::new(MemoryStore::new(), Config::default());
//! tracker.initialize();
//!
//! assert_eq!(tracker.record_click("instagram", 4), Some(1));
//! assert_eq!(tracker.record_click("instagram", 9), Some(2));
//!
//! let snapshot = tracker.query();
//! assert_eq!(snapshot.visit_count, 1);
//! assert_eq!(snapshot.total_clicks, 2);
//! assert_eq!(snapshot.engagement_ratio, 2.0);
//! ```

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::store::RecordStore;
use crate::types::{ClickEvent, EngagementRecord, EngagementSnapshot, LastClick};

/// Lifecycle state of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackerState {
    /// Constructed but not yet initialized; holds an empty default record.
    Uninitialized,
    /// Initialized; the record was loaded (or defaulted) and a visit was
    /// counted.
    Active,
}

/// Records page visits and per-platform clicks into a persisted record.
///
/// The store implementation is injected at construction, keeping the
/// tracker testable and independent of where the record lives.
#[derive(Debug)]
pub struct EngagementTracker<S: RecordStore> {
    store: S,
    config: Config,
    record: EngagementRecord,
    state: TrackerState,
}

impl<S: RecordStore> EngagementTracker<S> {
    /// Creates an uninitialized tracker holding an empty record.
    ///
    /// # Arguments
    ///
    /// * `store` - Durable storage for the record
    /// * `config` - Bounds for history and snapshots
    #[must_use]
    pub fn new(store: S, config: Config) -> Self {
        Self {
            store,
            config,
            record: EngagementRecord::default(),
            state: TrackerState::Uninitialized,
        }
    }

    /// Returns `true` once [`initialize`](Self::initialize) has run.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == TrackerState::Active
    }

    /// Loads the persisted record, counts a visit, and writes the record
    /// back.
    ///
    /// A missing or unparseable stored value is replaced by an empty
    /// default; a storage failure leaves the tracker running in-memory.
    /// Expected once per page load; calling again simulates a new visit.
    pub fn initialize(&mut self) {
        self.record = self.load_or_default();
        self.record.reconcile();
        self.record.truncate_events(self.config.recent_cap);

        self.record.visit_count += 1;
        self.record.session_start = Utc::now();
        self.state = TrackerState::Active;

        self.persist();
        info!(visits = self.record.visit_count, "Tracker initialized");
    }

    /// Records one click for `platform` at `seconds_on_page` elapsed
    /// session time.
    ///
    /// Unknown platforms are accepted and tracked under their own key.
    /// Leading and trailing whitespace is trimmed from the identifier.
    ///
    /// # Returns
    ///
    /// The updated click count for the platform (`Some(n)` means this was
    /// click number `n`), or `None` when the identifier is empty — an
    /// empty identifier indicates a caller bug and the click is silently
    /// not recorded.
    pub fn record_click(&mut self, platform: &str, seconds_on_page: u64) -> Option<u64> {
        let platform = platform.trim();
        if platform.is_empty() {
            debug!("Ignoring click with empty platform identifier");
            return None;
        }

        let now = Utc::now();

        let count = {
            let counter = self
                .record
                .clicks_by_platform
                .entry(platform.to_string())
                .or_insert(0);
            *counter += 1;
            *counter
        };
        self.record.total_clicks += 1;

        self.record.last_click = Some(LastClick {
            platform: platform.to_string(),
            timestamp: now,
        });

        self.record.recent_events.push_back(ClickEvent {
            platform: platform.to_string(),
            timestamp: now,
            seconds_on_page,
        });
        self.record.truncate_events(self.config.recent_cap);

        if self.is_active() {
            self.persist();
        } else {
            warn!(
                platform,
                "Click recorded before initialization; kept in-memory only"
            );
        }

        debug!(platform, count, seconds_on_page, "Click recorded");
        Some(count)
    }

    /// Returns a read-only snapshot of the current state.
    ///
    /// Pure with respect to tracker state: no mutation, no storage access.
    /// The engagement ratio is `total_clicks / visit_count`, or `0.0` when
    /// no visits were recorded.
    #[must_use]
    pub fn query(&self) -> EngagementSnapshot {
        let engagement_ratio = if self.record.visit_count == 0 {
            0.0
        } else {
            self.record.total_clicks as f64 / self.record.visit_count as f64
        };

        let skip = self
            .record
            .recent_events
            .len()
            .saturating_sub(self.config.snapshot_events);
        let recent_events = self
            .record
            .recent_events
            .iter()
            .skip(skip)
            .cloned()
            .collect();

        EngagementSnapshot {
            visit_count: self.record.visit_count,
            total_clicks: self.record.total_clicks,
            clicks_by_platform: self.record.clicks_by_platform.clone(),
            last_click: self.record.last_click.clone(),
            recent_events,
            engagement_ratio,
        }
    }

    /// Clears the persisted record and zeroes the in-memory state.
    ///
    /// Irreversible. The session clock carries over, so elapsed-time
    /// reporting stays monotone within the session. Confirmation belongs
    /// to the UI layer, not here.
    pub fn reset(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear stored record");
        }

        let session_start = self.record.session_start;
        self.record = EngagementRecord::default();
        self.record.session_start = session_start;

        info!("Engagement record reset");
    }

    /// Reads and parses the stored record, substituting defaults for
    /// anything that cannot be read or parsed.
    fn load_or_default(&self) -> EngagementRecord {
        let text = match self.store.read() {
            Ok(Some(text)) => text,
            Ok(None) => return EngagementRecord::default(),
            Err(e) => {
                warn!(error = %e, "Storage unavailable, tracking in-memory only");
                return EngagementRecord::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "Stored record unparseable, starting fresh");
                EngagementRecord::default()
            }
        }
    }

    /// Serializes the record and writes it to the store, logging (not
    /// propagating) any failure.
    fn persist(&self) {
        let text = match serde_json::to_string(&self.record) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to serialize record");
                return;
            }
        };

        if let Err(e) = self.store.write(&text) {
            warn!(error = %e, "Failed to persist record, continuing in-memory");
        }
    }
}
