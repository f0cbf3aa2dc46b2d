//! The stats HTTP API as seen from the dashboard.

use crate::domain::{DateRange, OverallStats, RankingKind, RankingRow, Website};
use crate::error::Result;

/// Data collaborator the dashboard fetches from.
///
/// Futures are not required to be `Send`: the dashboard runs on a single
/// event loop.
#[allow(async_fn_in_trait)]
pub trait StatsSource {
    async fn fetch_websites(&self) -> Result<Vec<Website>>;

    async fn fetch_overall(&self, website_id: &str, range: DateRange) -> Result<OverallStats>;

    async fn fetch_ranking(
        &self,
        kind: RankingKind,
        website_id: &str,
        range: DateRange,
        limit: usize,
    ) -> Result<Vec<RankingRow>>;
}

/// Builds request URLs for the stats API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsEndpoint {
    base: String,
}

impl StatsEndpoint {
    /// `base` is the origin or path prefix of the API; empty means same origin.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn websites(&self) -> String {
        format!("{}/api/websites", self.base)
    }

    pub fn overall(&self, website_id: &str, range: DateRange) -> String {
        self.stats("overall", website_id, range, None)
    }

    pub fn ranking(
        &self,
        kind: RankingKind,
        website_id: &str,
        range: DateRange,
        limit: usize,
    ) -> String {
        self.stats(kind.as_str(), website_id, range, Some(limit))
    }

    /// `/api/stats/{stat_type}` with the selection encoded as query parameters.
    pub fn stats(
        &self,
        stat_type: &str,
        website_id: &str,
        range: DateRange,
        limit: Option<usize>,
    ) -> String {
        let mut url = format!(
            "{}/api/stats/{}?id={}&timeRange={}",
            self.base,
            urlencoding::encode(stat_type),
            urlencoding::encode(website_id),
            range.as_str(),
        );
        if let Some(limit) = limit {
            url.push_str(&format!("&limit={limit}"));
        }
        url
    }
}
