//! Engage Tracker - local engagement analytics aggregator.
//!
//! This crate records page visits and per-platform click counts into a
//! single persisted record, and exposes a query surface for reporting.
//!
//! # Overview
//!
//! A hosting application constructs one [`EngagementTracker`] with an
//! injected [`RecordStore`] and calls [`initialize`] once per page load.
//! Tracked link activations become [`record_click`] calls; reporting UIs
//! consume [`query`] snapshots; [`reset`] clears everything after explicit
//! user confirmation (the confirmation itself is the host's concern).
//!
//! The tracker never surfaces an error to its caller: storage failures
//! degrade to in-memory tracking for the session, and a corrupt stored
//! record is replaced by defaults.
//!
//! [`initialize`]: tracker::EngagementTracker::initialize
//! [`record_click`]: tracker::EngagementTracker::record_click
//! [`query`]: tracker::EngagementTracker::query
//! [`reset`]: tracker::EngagementTracker::reset
//! [`EngagementTracker`]: tracker::EngagementTracker
//! [`RecordStore`]: store::RecordStore
//!
//! # Modules
//!
//! - [`types`]: Persisted record and snapshot types
//! - [`store`]: Durable local storage abstraction and implementations
//! - [`tracker`]: The engagement tracker component
//! - [`config`]: Configuration from environment variables

pub mod config;
pub mod store;
pub mod tracker;
pub mod types;

pub use config::{Config, ConfigError};
pub use store::{FileStore, MemoryStore, RecordStore, StoreError, STORAGE_KEY};
pub use tracker::EngagementTracker;
pub use types::{ClickEvent, EngagementRecord, EngagementSnapshot, LastClick};
