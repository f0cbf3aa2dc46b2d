//! Widget adapters backed by the shared view the renderer draws from.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use nixvis_dashboard::widget::{Notifier, PresentationWidget, StatWidget, Widgets};
use nixvis_dashboard::{
    OverallStats, RankingKind, RankingRow, RequestGeneration, Result, Selection, Ticket,
};
use tracing::{debug, warn};
use wasm_bindgen_futures::spawn_local;

use crate::api::{HttpStatsSource, TrafficPoint};

/// Data a chart or map loads for itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesState<T> {
    Idle,
    Loading,
    Ready(T),
    Unavailable,
}

impl<T> Default for SeriesState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

#[derive(Debug, Default)]
pub struct DashboardView {
    /// Set once the website list has been resolved.
    pub initialized: bool,
    pub overall: Option<OverallStats>,
    pub rankings: HashMap<RankingKind, Vec<RankingRow>>,
    pub traffic: SeriesState<Vec<TrafficPoint>>,
    pub locations: SeriesState<Vec<RankingRow>>,
    pub error: Option<String>,
    pub ranking_tab: usize,
}

impl DashboardView {
    pub fn ranking_kind(&self) -> RankingKind {
        RankingKind::from_index(self.ranking_tab).unwrap_or(RankingKind::Url)
    }

    pub fn next_ranking_tab(&mut self) {
        self.ranking_tab = (self.ranking_tab + 1) % RankingKind::ALL.len();
    }

    pub fn previous_ranking_tab(&mut self) {
        self.ranking_tab = if self.ranking_tab == 0 {
            RankingKind::ALL.len() - 1
        } else {
            self.ranking_tab - 1
        };
    }
}

pub type SharedView = Rc<RefCell<DashboardView>>;

pub fn build(view: &SharedView, source: &Rc<HttpStatsSource>, ranking_limit: usize) -> Widgets {
    let table = |kind| -> Box<dyn StatWidget<[RankingRow]>> {
        Box::new(RankingTable {
            kind,
            view: Rc::clone(view),
        })
    };

    Widgets {
        summary: Box::new(SummaryPanel(Rc::clone(view))),
        urls: table(RankingKind::Url),
        referers: table(RankingKind::Referer),
        browsers: table(RankingKind::Browser),
        operating_systems: table(RankingKind::Os),
        devices: table(RankingKind::Device),
        chart: Box::new(TrafficChart {
            source: Rc::clone(source),
            view: Rc::clone(view),
            generation: RequestGeneration::new(),
        }),
        map: Box::new(GeoMap {
            source: Rc::clone(source),
            view: Rc::clone(view),
            generation: RequestGeneration::new(),
            limit: ranking_limit,
        }),
        notifier: Box::new(ErrorBanner(Rc::clone(view))),
    }
}

struct SummaryPanel(SharedView);

impl StatWidget<OverallStats> for SummaryPanel {
    fn update(&mut self, data: &OverallStats) {
        self.0.borrow_mut().overall = Some(*data);
    }
}

struct RankingTable {
    kind: RankingKind,
    view: SharedView,
}

impl StatWidget<[RankingRow]> for RankingTable {
    fn update(&mut self, data: &[RankingRow]) {
        self.view
            .borrow_mut()
            .rankings
            .insert(self.kind, data.to_vec());
    }
}

struct TrafficChart {
    source: Rc<HttpStatsSource>,
    view: SharedView,
    generation: RequestGeneration,
}

impl PresentationWidget for TrafficChart {
    fn init(&mut self) {
        self.view.borrow_mut().traffic = SeriesState::Idle;
    }

    fn reconfigure(&mut self, selection: &Selection) {
        let ticket = self.generation.begin();
        self.view.borrow_mut().traffic = SeriesState::Loading;

        let source = Rc::clone(&self.source);
        let selection = selection.clone();
        let load = async move {
            source
                .fetch_timeseries(&selection.website_id, selection.range)
                .await
        };
        load_series(Rc::clone(&self.view), ticket, "traffic", load, |view| {
            &mut view.traffic
        });
    }
}

struct GeoMap {
    source: Rc<HttpStatsSource>,
    view: SharedView,
    generation: RequestGeneration,
    limit: usize,
}

impl PresentationWidget for GeoMap {
    fn init(&mut self) {
        self.view.borrow_mut().locations = SeriesState::Idle;
    }

    fn reconfigure(&mut self, selection: &Selection) {
        let ticket = self.generation.begin();
        self.view.borrow_mut().locations = SeriesState::Loading;

        let source = Rc::clone(&self.source);
        let selection = selection.clone();
        let limit = self.limit;
        let load = async move {
            source
                .fetch_locations(&selection.website_id, selection.range, limit)
                .await
        };
        load_series(Rc::clone(&self.view), ticket, "locations", load, |view| {
            &mut view.locations
        });
    }
}

/// Runs a widget's own fetch in the background and stores the result unless
/// the widget has been reconfigured again meanwhile.
fn load_series<T, F>(
    view: SharedView,
    ticket: Ticket,
    series: &'static str,
    load: F,
    slot: fn(&mut DashboardView) -> &mut SeriesState<T>,
) where
    T: 'static,
    F: Future<Output = Result<T>> + 'static,
{
    spawn_local(async move {
        let result = load.await;
        if !ticket.is_current() {
            debug!(series, request = ticket.id(), "discarding superseded series");
            return;
        }

        let state = match result {
            Ok(data) => SeriesState::Ready(data),
            Err(error) => {
                warn!(series, error = %error, "failed to load series");
                SeriesState::Unavailable
            }
        };
        *slot(&mut view.borrow_mut()) = state;
    });
}

struct ErrorBanner(SharedView);

impl Notifier for ErrorBanner {
    fn notify_error(&mut self, message: &str) {
        self.0.borrow_mut().error = Some(message.to_string());
    }

    fn clear(&mut self) {
        self.0.borrow_mut().error = None;
    }
}
