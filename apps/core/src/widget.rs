//! Contracts of the display units the dashboard feeds.
//!
//! Adapters are sinks. They never check which selection a dataset belongs
//! to; the dashboard only hands them data for the latest request.

use crate::domain::{OverallStats, RankingKind, RankingRow, Selection, StatBundle};

/// A widget redrawn from one category of fetched data.
pub trait StatWidget<T: ?Sized> {
    fn update(&mut self, data: &T);
}

/// A widget that loads its own data whenever the selection changes
/// (the traffic chart and the geographic map).
pub trait PresentationWidget {
    fn init(&mut self) {}

    fn reconfigure(&mut self, selection: &Selection);
}

/// User-visible error banner.
pub trait Notifier {
    fn notify_error(&mut self, message: &str);

    fn clear(&mut self) {}
}

pub type SummaryWidget = Box<dyn StatWidget<OverallStats>>;
pub type RankingTable = Box<dyn StatWidget<[RankingRow]>>;

/// Every widget on the page.
pub struct Widgets {
    pub summary: SummaryWidget,
    pub urls: RankingTable,
    pub referers: RankingTable,
    pub browsers: RankingTable,
    pub operating_systems: RankingTable,
    pub devices: RankingTable,
    pub chart: Box<dyn PresentationWidget>,
    pub map: Box<dyn PresentationWidget>,
    pub notifier: Box<dyn Notifier>,
}

impl Widgets {
    pub fn ranking_mut(&mut self, kind: RankingKind) -> &mut RankingTable {
        match kind {
            RankingKind::Url => &mut self.urls,
            RankingKind::Referer => &mut self.referers,
            RankingKind::Browser => &mut self.browsers,
            RankingKind::Os => &mut self.operating_systems,
            RankingKind::Device => &mut self.devices,
        }
    }

    pub(crate) fn init_presentation(&mut self) {
        self.chart.init();
        self.map.init();
    }

    pub(crate) fn reconfigure_presentation(&mut self, selection: &Selection) {
        self.chart.reconfigure(selection);
        self.map.reconfigure(selection);
    }

    /// Pushes a complete bundle to the summary panel and every ranking table.
    pub(crate) fn apply(&mut self, bundle: &StatBundle) {
        self.summary.update(&bundle.overall);
        for (kind, rows) in bundle.rankings() {
            self.ranking_mut(kind).update(rows);
        }
        self.notifier.clear();
    }
}
