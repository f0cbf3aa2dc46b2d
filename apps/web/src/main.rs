use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use nixvis_dashboard::event::{self, EventSender};
use nixvis_dashboard::{Dashboard, DashboardConfig, WebsiteSelector};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use tracing::{debug, info, warn};
use wasm_bindgen_futures::spawn_local;

use crate::api::HttpStatsSource;
use crate::input::{command_for, Command, RangeKeys};
use crate::storage::LocalStoragePreferences;
use crate::widgets::{DashboardView, SharedView};

mod api;
mod config;
mod format;
mod input;
mod logging;
mod render;
mod storage;
mod widgets;

type PageDashboard = Dashboard<HttpStatsSource>;

fn main() -> io::Result<()> {
    let (config, config_error) = match config::read_page_config() {
        Ok(config) => (config.unwrap_or_default(), None),
        Err(error) => (DashboardConfig::default(), Some(error)),
    };

    logging::init(config.debug);
    if let Some(error) = config_error {
        warn!(error = %error, "ignoring invalid page configuration");
    }
    info!(
        api_base = %config.api_base,
        ranking_limit = config.ranking_limit,
        "starting dashboard"
    );

    let (events, receiver) = event::channel();
    let range_keys = RangeKeys::new(config.default_range);
    let source = Rc::new(HttpStatsSource::new(&config.api_base));
    let view: SharedView = Rc::new(RefCell::new(DashboardView::default()));

    let selector = RefCell::new(WebsiteSelector::new(
        config.selector_style,
        Box::new(LocalStoragePreferences::new()),
        config.preference_key.clone(),
        events.clone(),
    ));
    let widgets = widgets::build(&view, &source, config.ranking_limit);
    let dashboard = Rc::new(Dashboard::new(
        source,
        Rc::new(selector),
        widgets,
        config,
    ));

    spawn_local({
        let dashboard = Rc::clone(&dashboard);
        let view = Rc::clone(&view);
        async move {
            dashboard.initialize().await;
            view.borrow_mut().initialized = true;
            dashboard.run(receiver).await;
        }
    });

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let dashboard = Rc::clone(&dashboard);
        let view = Rc::clone(&view);
        move |event| {
            if let Some(command) = command_for(&event.code) {
                dispatch(command, &dashboard, &view, &range_keys, &events);
            }
        }
    });

    terminal.draw_web(move |f| {
        let view = view.borrow();
        let selection = dashboard.selection();
        render::render_page(&view, &dashboard.selector(), selection.range, f);
    });

    Ok(())
}

fn dispatch(
    command: Command,
    dashboard: &PageDashboard,
    view: &SharedView,
    range_keys: &RangeKeys,
    events: &EventSender,
) {
    match command {
        Command::NextWebsite => {
            dashboard.selector_mut().select_next();
        }
        Command::PreviousWebsite => {
            dashboard.selector_mut().select_previous();
        }
        Command::SetRange(range) => {
            let Some(event) = range_keys.request(range) else {
                return;
            };
            debug!(range = range.as_str(), "date range requested");
            if events.unbounded_send(event).is_err() {
                warn!("dashboard event loop is gone, range change dropped");
            }
        }
        Command::NextRanking => view.borrow_mut().next_ranking_tab(),
        Command::PreviousRanking => view.borrow_mut().previous_ranking_tab(),
    }
}
