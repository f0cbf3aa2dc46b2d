//! Refresh orchestration.
//!
//! [`Dashboard`] owns the live [`Selection`] and is the only place it is
//! mutated. A refresh captures the selection, reconfigures the chart and the
//! map straight away, then fetches every stat category concurrently and
//! applies the batch only if it succeeded in full and is still the latest
//! request.

use std::cell::{Ref, RefCell, RefMut};
use std::future::Future;
use std::rc::Rc;

use futures::StreamExt;
use tracing::{debug, error, info, warn};

use crate::api::StatsSource;
use crate::config::DashboardConfig;
use crate::domain::{RankingKind, Selection, StatBundle};
use crate::error::{DashboardError, Result};
use crate::event::{DashboardEvent, EventReceiver};
use crate::generation::RequestGeneration;
use crate::selector::WebsiteSelector;
use crate::widget::Widgets;

pub const STATS_FAILED_MESSAGE: &str = "Unable to load statistics";
pub const WEBSITES_FAILED_MESSAGE: &str = "Unable to load the website list, reload the page to retry";

/// How a single refresh ended.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// Every widget now shows this refresh's data.
    Applied,
    /// At least one fetch failed; no widget was touched.
    Failed(DashboardError),
    /// A newer refresh was issued while this one was in flight.
    Superseded,
    /// There is no website to fetch for.
    Skipped,
}

pub struct Dashboard<S> {
    source: Rc<S>,
    selector: Rc<RefCell<WebsiteSelector>>,
    widgets: RefCell<Widgets>,
    selection: RefCell<Selection>,
    generation: RequestGeneration,
    config: DashboardConfig,
}

impl<S: StatsSource> Dashboard<S> {
    pub fn new(
        source: Rc<S>,
        selector: Rc<RefCell<WebsiteSelector>>,
        widgets: Widgets,
        config: DashboardConfig,
    ) -> Self {
        let selection = Selection::new(String::new(), config.default_range);
        Self {
            source,
            selector,
            widgets: RefCell::new(widgets),
            selection: RefCell::new(selection),
            generation: RequestGeneration::new(),
            config,
        }
    }

    /// Prepares the widgets, loads the website list and performs the first
    /// refresh. Returns the initially selected website id.
    pub async fn initialize(&self) -> String {
        self.widgets.borrow_mut().init_presentation();

        let selected = WebsiteSelector::initialize(&self.selector, &*self.source).await;
        let load_failed = self.selector.borrow().load_failed();

        if load_failed {
            self.widgets
                .borrow_mut()
                .notifier
                .notify_error(WEBSITES_FAILED_MESSAGE);
        }

        self.selection.borrow_mut().website_id.clone_from(&selected);
        info!(
            website = %selected,
            range = self.config.default_range.as_str(),
            "dashboard initialized"
        );

        self.refresh().await;
        selected
    }

    /// Starts a refresh for the current selection.
    ///
    /// The selection is captured and the chart and map are reconfigured
    /// before this returns; the fetch batch runs when the future is awaited.
    pub fn refresh(&self) -> impl Future<Output = RefreshOutcome> + '_ {
        let selection = self.selection.borrow().clone();
        let ticket = self.generation.begin();

        if !selection.is_empty() {
            self.widgets
                .borrow_mut()
                .reconfigure_presentation(&selection);
        }

        async move {
            if selection.is_empty() {
                debug!(request = ticket.id(), "no website selected, skipping refresh");
                return RefreshOutcome::Skipped;
            }

            debug!(
                request = ticket.id(),
                website = %selection.website_id,
                range = selection.range.as_str(),
                "refreshing statistics"
            );
            let fetched = self.fetch_bundle(&selection).await;

            if !ticket.is_current() {
                debug!(
                    request = ticket.id(),
                    latest = self.generation.latest(),
                    "discarding superseded refresh"
                );
                return RefreshOutcome::Superseded;
            }

            match fetched {
                Ok(bundle) => {
                    self.widgets.borrow_mut().apply(&bundle);
                    debug!(request = ticket.id(), "statistics applied");
                    RefreshOutcome::Applied
                }
                Err(err) => {
                    error!(
                        request = ticket.id(),
                        website = %selection.website_id,
                        error = %err,
                        "failed to load statistics"
                    );
                    self.widgets
                        .borrow_mut()
                        .notifier
                        .notify_error(STATS_FAILED_MESSAGE);
                    RefreshOutcome::Failed(err)
                }
            }
        }
    }

    async fn fetch_bundle(&self, selection: &Selection) -> Result<StatBundle> {
        let id = selection.website_id.as_str();
        let range = selection.range;
        let limit = self.config.ranking_limit;
        let source = &*self.source;

        let (overall, urls, referers, browsers, operating_systems, devices) = futures::try_join!(
            source.fetch_overall(id, range),
            source.fetch_ranking(RankingKind::Url, id, range, limit),
            source.fetch_ranking(RankingKind::Referer, id, range, limit),
            source.fetch_ranking(RankingKind::Browser, id, range, limit),
            source.fetch_ranking(RankingKind::Os, id, range, limit),
            source.fetch_ranking(RankingKind::Device, id, range, limit),
        )?;

        Ok(StatBundle {
            selection: selection.clone(),
            overall,
            urls,
            referers,
            browsers,
            operating_systems,
            devices,
        })
    }

    /// Folds a user event into the selection. Returns whether a refresh is due.
    pub fn apply(&self, event: DashboardEvent) -> bool {
        match event {
            DashboardEvent::WebsiteSelected(id) => {
                if !self.selector.borrow().contains(&id) {
                    warn!(website = %id, "ignoring selection outside the website list");
                    return false;
                }
                self.selection.borrow_mut().website_id = id;
            }
            DashboardEvent::RangeChanged(range) => {
                self.selection.borrow_mut().range = range;
            }
        }
        true
    }

    /// Processes events until every sender is dropped. Each accepted event
    /// starts exactly one refresh; refreshes may overlap and only the latest
    /// one reaches the widgets.
    pub async fn run(&self, events: EventReceiver) {
        events
            .for_each_concurrent(None, move |event| {
                let pending = self.apply(event).then(move || self.refresh());
                async move {
                    if let Some(refresh) = pending {
                        refresh.await;
                    }
                }
            })
            .await;
        debug!("dashboard event stream closed");
    }

    pub fn selection(&self) -> Selection {
        self.selection.borrow().clone()
    }

    pub fn selector(&self) -> Ref<'_, WebsiteSelector> {
        self.selector.borrow()
    }

    /// Mutable access for key handlers. Must not be held while the
    /// dashboard is processing an event.
    pub fn selector_mut(&self) -> RefMut<'_, WebsiteSelector> {
        self.selector.borrow_mut()
    }

    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DateRange;
    use crate::event;
    use crate::preference::SELECTED_WEBSITE_KEY;
    use crate::selector::SelectorStyle;
    use crate::testing::{sites, FakeSource, SharedPreferences, WidgetLog};

    struct Harness {
        dashboard: Dashboard<FakeSource>,
        source: Rc<FakeSource>,
        log: WidgetLog,
        _events: EventReceiver,
    }

    fn harness(source: FakeSource) -> Harness {
        let (events, receiver) = event::channel();
        let selector = Rc::new(RefCell::new(WebsiteSelector::new(
            SelectorStyle::Tabs,
            Box::new(SharedPreferences::default()),
            SELECTED_WEBSITE_KEY,
            events,
        )));
        let log = WidgetLog::default();
        let source = Rc::new(source);
        let dashboard = Dashboard::new(
            Rc::clone(&source),
            selector,
            log.widgets(),
            DashboardConfig::default(),
        );
        Harness {
            dashboard,
            source,
            log,
            _events: receiver,
        }
    }

    #[tokio::test]
    async fn initialize_prepares_widgets_and_applies_first_refresh() {
        let h = harness(FakeSource::with_websites(sites()));

        let selected = h.dashboard.initialize().await;

        assert_eq!(selected, "1");
        assert_eq!(h.dashboard.selection(), Selection::new("1", DateRange::Today));
        let entries = h.log.entries();
        assert_eq!(entries[..2], ["init:chart", "init:map"]);
        assert!(entries.contains(&"reconfigure:chart:1:today".to_string()));
        assert!(entries.contains(&"reconfigure:map:1:today".to_string()));
        assert_eq!(h.log.updates().len(), 6);
        assert!(h.log.errors().is_empty());
    }

    #[tokio::test]
    async fn refresh_fans_out_with_same_selection_and_limit() {
        let h = harness(FakeSource::with_websites(sites()));
        h.dashboard.initialize().await;

        let mut calls = h.source.calls();
        calls.sort();
        assert_eq!(
            calls,
            vec![
                "browser:1:today:10",
                "device:1:today:10",
                "os:1:today:10",
                "overall:1:today",
                "referer:1:today:10",
                "url:1:today:10",
                "websites",
            ]
        );
    }

    #[tokio::test]
    async fn one_failed_category_leaves_every_widget_untouched() {
        let h = harness(FakeSource::with_websites(sites()));
        h.source.fail_ranking(RankingKind::Os);

        h.dashboard.initialize().await;

        assert!(h.log.updates().is_empty());
        assert_eq!(h.log.errors(), vec![format!("error:{STATS_FAILED_MESSAGE}")]);
        assert!(!h.log.entries().contains(&"clear".to_string()));
    }

    #[tokio::test]
    async fn failed_refresh_reports_the_error() {
        let h = harness(FakeSource::with_websites(sites()));
        h.dashboard.initialize().await;
        h.source.fail_ranking(RankingKind::Device);

        let outcome = h.dashboard.refresh().await;

        assert!(matches!(
            outcome,
            RefreshOutcome::Failed(DashboardError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn website_list_failure_notifies_and_skips_refresh() {
        let h = harness(FakeSource::failing_websites());

        let selected = h.dashboard.initialize().await;

        assert_eq!(selected, "");
        assert_eq!(h.log.errors(), vec![format!("error:{WEBSITES_FAILED_MESSAGE}")]);
        assert!(h.log.updates().is_empty());
        assert_eq!(h.source.calls(), vec!["websites"]);
        assert!(matches!(h.dashboard.refresh().await, RefreshOutcome::Skipped));
    }

    #[tokio::test]
    async fn empty_website_list_skips_refresh_silently() {
        let h = harness(FakeSource::with_websites(Vec::new()));

        h.dashboard.initialize().await;

        assert!(h.log.errors().is_empty());
        assert_eq!(h.source.calls(), vec!["websites"]);
        assert!(h.dashboard.selector().placeholder().is_some());
    }

    #[tokio::test]
    async fn website_event_triggers_one_refresh_with_new_id() {
        let h = harness(FakeSource::with_websites(sites()));
        h.dashboard.initialize().await;
        h.source.clear_calls();
        h.log.clear();

        let (tx, rx) = event::channel();
        assert!(tx
            .unbounded_send(DashboardEvent::WebsiteSelected("2".to_string()))
            .is_ok());
        drop(tx);
        h.dashboard.run(rx).await;

        let calls = h.source.calls();
        assert_eq!(calls.len(), 6);
        assert!(calls.iter().all(|call| call.contains(":2:today")));
        assert_eq!(h.log.updates().len(), 6);
        assert_eq!(h.dashboard.selection().website_id, "2");
    }

    #[tokio::test]
    async fn queued_events_each_refresh_once() {
        let h = harness(FakeSource::with_websites(sites()));
        h.dashboard.initialize().await;
        h.source.clear_calls();

        let (tx, rx) = event::channel();
        for event in [
            DashboardEvent::WebsiteSelected("2".to_string()),
            DashboardEvent::RangeChanged(DateRange::Week),
            DashboardEvent::WebsiteSelected("9".to_string()),
        ] {
            assert!(tx.unbounded_send(event).is_ok());
        }
        drop(tx);
        h.dashboard.run(rx).await;

        let calls = h.source.calls();
        assert_eq!(calls.iter().filter(|call| call.contains(":2:today")).count(), 6);
        assert_eq!(calls.iter().filter(|call| call.contains(":2:week")).count(), 6);
        assert_eq!(calls.len(), 12);
        assert_eq!(h.dashboard.selection(), Selection::new("2", DateRange::Week));
    }

    #[tokio::test]
    async fn range_change_triggers_one_refresh_with_new_range() {
        let h = harness(FakeSource::with_websites(sites()));
        h.dashboard.initialize().await;
        h.source.clear_calls();

        assert!(h.dashboard.apply(DashboardEvent::RangeChanged(DateRange::Month)));
        let outcome = h.dashboard.refresh().await;

        assert!(matches!(outcome, RefreshOutcome::Applied));
        let calls = h.source.calls();
        assert_eq!(calls.len(), 6);
        assert!(calls.iter().all(|call| call.contains(":1:month")));
    }

    #[tokio::test]
    async fn unknown_website_event_is_rejected() {
        let h = harness(FakeSource::with_websites(sites()));
        h.dashboard.initialize().await;

        assert!(!h.dashboard.apply(DashboardEvent::WebsiteSelected("9".to_string())));
        assert_eq!(h.dashboard.selection().website_id, "1");
    }

    #[tokio::test]
    async fn older_refresh_finishing_last_is_discarded() {
        let h = harness(FakeSource::with_websites(sites()));
        h.dashboard.initialize().await;
        h.log.clear();

        let release_first = h.source.gate("1");
        let first = h.dashboard.refresh();
        h.dashboard
            .apply(DashboardEvent::WebsiteSelected("2".to_string()));
        let second = h.dashboard.refresh();

        let (first_outcome, second_outcome) = futures::join!(first, async {
            let outcome = second.await;
            let _ = release_first.send(());
            outcome
        });

        assert!(matches!(first_outcome, RefreshOutcome::Superseded));
        assert!(matches!(second_outcome, RefreshOutcome::Applied));
        let updates = h.log.updates();
        assert_eq!(updates.len(), 6);
        assert!(updates.contains(&"update:summary:20".to_string()));
        assert!(updates.contains(&"update:url:url-2".to_string()));
    }

    #[tokio::test]
    async fn older_refresh_failing_last_stays_silent() {
        let h = harness(FakeSource::with_websites(sites()));
        h.dashboard.initialize().await;
        h.log.clear();
        h.source.fail_ranking_for(RankingKind::Os, "1");

        let release_first = h.source.gate("1");
        let first = h.dashboard.refresh();
        h.dashboard
            .apply(DashboardEvent::WebsiteSelected("2".to_string()));
        let second = h.dashboard.refresh();

        let (first_outcome, second_outcome) = futures::join!(first, async {
            let outcome = second.await;
            let _ = release_first.send(());
            outcome
        });

        assert!(matches!(first_outcome, RefreshOutcome::Superseded));
        assert!(matches!(second_outcome, RefreshOutcome::Applied));
        assert!(h.log.errors().is_empty());
        assert_eq!(h.log.updates().len(), 6);
        assert_eq!(h.log.entries().last().map(String::as_str), Some("clear"));
    }

    #[tokio::test]
    async fn failure_for_one_website_does_not_block_another() {
        let h = harness(FakeSource::with_websites(sites()));
        h.source.fail_ranking_for(RankingKind::Referer, "2");
        h.dashboard.initialize().await;

        assert!(h.dashboard.apply(DashboardEvent::WebsiteSelected("2".to_string())));
        assert!(matches!(
            h.dashboard.refresh().await,
            RefreshOutcome::Failed(DashboardError::Status { status: 500, .. })
        ));
        assert_eq!(h.log.errors(), vec![format!("error:{STATS_FAILED_MESSAGE}")]);
        assert_eq!(h.log.updates().len(), 6);
    }
}
