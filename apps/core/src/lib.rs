//! Selection and refresh orchestration for the NixVis analytics dashboard.
//!
//! The page shell supplies a [`StatsSource`], a [`PreferenceStore`] and the
//! concrete [`widget`] adapters; this crate keeps the selected website and
//! date range consistent across all of them.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod event;
pub mod generation;
pub mod preference;
pub mod selector;
pub mod widget;

#[cfg(test)]
mod testing;

pub use api::{StatsEndpoint, StatsSource};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, RefreshOutcome};
pub use domain::{
    DateRange, OverallStats, RankingKind, RankingRow, Selection, StatBundle, Website, WebsiteList,
};
pub use error::{DashboardError, Result};
pub use event::DashboardEvent;
pub use generation::{RequestGeneration, Ticket};
pub use preference::{MemoryPreferences, PreferenceStore};
pub use selector::{SelectorStyle, WebsiteSelector};
