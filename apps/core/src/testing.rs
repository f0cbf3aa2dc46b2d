//! Fakes shared by the unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{FutureExt, Shared};

use crate::api::StatsSource;
use crate::domain::{DateRange, OverallStats, RankingKind, RankingRow, Selection, Website};
use crate::error::{DashboardError, Result};
use crate::preference::PreferenceStore;
use crate::widget::{Notifier, PresentationWidget, StatWidget, Widgets};

pub fn sites() -> Vec<Website> {
    vec![Website::new("1", "A"), Website::new("2", "B")]
}

/// Preference store whose contents stay observable after it is boxed.
#[derive(Debug, Clone, Default)]
pub struct SharedPreferences {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl SharedPreferences {
    pub fn insert(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl PreferenceStore for SharedPreferences {
    fn get(&self, key: &str, default: &str) -> String {
        self.value(key).unwrap_or_else(|| default.to_string())
    }

    fn set(&mut self, key: &str, value: &str) {
        self.insert(key, value);
    }
}

type Gate = Shared<oneshot::Receiver<()>>;

/// Gate name that holds the website list fetch.
pub const WEBSITES_GATE: &str = "websites";

/// Scriptable stats source that records every call.
#[derive(Default)]
pub struct FakeSource {
    websites: Option<Vec<Website>>,
    /// Ranking kinds that fail, for one website or for all of them.
    failing: RefCell<Vec<(RankingKind, Option<String>)>>,
    calls: RefCell<Vec<String>>,
    gates: RefCell<HashMap<String, Gate>>,
}

impl FakeSource {
    pub fn with_websites(websites: Vec<Website>) -> Self {
        Self {
            websites: Some(websites),
            ..Self::default()
        }
    }

    pub fn failing_websites() -> Self {
        Self::default()
    }

    pub fn fail_ranking(&self, kind: RankingKind) {
        self.failing.borrow_mut().push((kind, None));
    }

    pub fn fail_ranking_for(&self, kind: RankingKind, website_id: &str) {
        self.failing
            .borrow_mut()
            .push((kind, Some(website_id.to_string())));
    }

    fn ranking_fails(&self, kind: RankingKind, website_id: &str) -> bool {
        self.failing.borrow().iter().any(|(failing, only)| {
            *failing == kind && (only.is_none() || only.as_deref() == Some(website_id))
        })
    }

    /// Holds every fetch for `website_id` (or the website list, for
    /// [`WEBSITES_GATE`]) until the returned sender fires.
    pub fn gate(&self, website_id: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .borrow_mut()
            .insert(website_id.to_string(), rx.shared());
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    async fn wait_for_gate(&self, website_id: &str) {
        let gate = self.gates.borrow().get(website_id).cloned();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }
}

impl StatsSource for FakeSource {
    async fn fetch_websites(&self) -> Result<Vec<Website>> {
        self.calls.borrow_mut().push("websites".to_string());
        self.wait_for_gate(WEBSITES_GATE).await;
        self.websites
            .clone()
            .ok_or_else(|| DashboardError::request("/api/websites", "connection refused"))
    }

    async fn fetch_overall(&self, website_id: &str, range: DateRange) -> Result<OverallStats> {
        self.calls
            .borrow_mut()
            .push(format!("overall:{website_id}:{}", range.as_str()));
        self.wait_for_gate(website_id).await;
        let seed = website_id.parse::<u64>().unwrap_or(0);
        Ok(OverallStats {
            uv: seed * 10,
            pv: seed * 100,
            traffic: seed * 1000,
        })
    }

    async fn fetch_ranking(
        &self,
        kind: RankingKind,
        website_id: &str,
        range: DateRange,
        limit: usize,
    ) -> Result<Vec<RankingRow>> {
        self.calls.borrow_mut().push(format!(
            "{}:{website_id}:{}:{limit}",
            kind.as_str(),
            range.as_str()
        ));
        self.wait_for_gate(website_id).await;
        if self.ranking_fails(kind, website_id) {
            return Err(DashboardError::Status {
                endpoint: format!("/api/stats/{}", kind.as_str()),
                status: 500,
            });
        }
        Ok(vec![RankingRow::new(format!("{}-{website_id}", kind.as_str()), 1)])
    }
}

/// Widget set that writes a line per call into a shared log.
#[derive(Debug, Clone, Default)]
pub struct WidgetLog {
    entries: Rc<RefCell<Vec<String>>>,
}

impl WidgetLog {
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    pub fn updates(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.starts_with("update:"))
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.starts_with("error:"))
            .collect()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    fn push(&self, entry: String) {
        self.entries.borrow_mut().push(entry);
    }

    pub fn widgets(&self) -> Widgets {
        Widgets {
            summary: Box::new(Summary(self.clone())),
            urls: Box::new(Table(RankingKind::Url, self.clone())),
            referers: Box::new(Table(RankingKind::Referer, self.clone())),
            browsers: Box::new(Table(RankingKind::Browser, self.clone())),
            operating_systems: Box::new(Table(RankingKind::Os, self.clone())),
            devices: Box::new(Table(RankingKind::Device, self.clone())),
            chart: Box::new(Presentation("chart", self.clone())),
            map: Box::new(Presentation("map", self.clone())),
            notifier: Box::new(Banner(self.clone())),
        }
    }
}

struct Summary(WidgetLog);

impl StatWidget<OverallStats> for Summary {
    fn update(&mut self, data: &OverallStats) {
        self.0.push(format!("update:summary:{}", data.uv));
    }
}

struct Table(RankingKind, WidgetLog);

impl StatWidget<[RankingRow]> for Table {
    fn update(&mut self, data: &[RankingRow]) {
        let first = data.first().map_or("", |row| row.label.as_str());
        self.1
            .push(format!("update:{}:{first}", self.0.as_str()));
    }
}

struct Presentation(&'static str, WidgetLog);

impl PresentationWidget for Presentation {
    fn init(&mut self) {
        self.1.push(format!("init:{}", self.0));
    }

    fn reconfigure(&mut self, selection: &Selection) {
        self.1.push(format!(
            "reconfigure:{}:{}:{}",
            self.0,
            selection.website_id,
            selection.range.as_str()
        ));
    }
}

struct Banner(WidgetLog);

impl Notifier for Banner {
    fn notify_error(&mut self, message: &str) {
        self.0.push(format!("error:{message}"));
    }

    fn clear(&mut self) {
        self.0.push("clear".to_string());
    }
}
