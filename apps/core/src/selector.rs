//! Website selector.
//!
//! Holds the fetched website list and the single active entry. Activating an
//! entry persists it and emits [`DashboardEvent::WebsiteSelected`] before
//! returning.

use std::cell::RefCell;

use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::api::StatsSource;
use crate::domain::Website;
use crate::error::{DashboardError, Result};
use crate::event::{DashboardEvent, EventSender};
use crate::preference::PreferenceStore;

pub const EMPTY_PLACEHOLDER: &str = "No websites available";

/// How the selector is drawn. Behaviour is identical for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorStyle {
    #[default]
    Tabs,
    Dropdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorEntry<'a> {
    pub id: &'a str,
    pub label: &'a str,
    pub active: bool,
}

pub struct WebsiteSelector {
    style: SelectorStyle,
    preferences: Box<dyn PreferenceStore>,
    preference_key: String,
    events: EventSender,
    websites: Vec<Website>,
    active: Option<usize>,
    load_error: Option<DashboardError>,
}

impl WebsiteSelector {
    pub fn new(
        style: SelectorStyle,
        preferences: Box<dyn PreferenceStore>,
        preference_key: impl Into<String>,
        events: EventSender,
    ) -> Self {
        Self {
            style,
            preferences,
            preference_key: preference_key.into(),
            events,
            websites: Vec::new(),
            active: None,
            load_error: None,
        }
    }

    /// Fetches the website list and resolves the initial selection.
    /// Returns the selected id, or an empty string when nothing can be selected.
    ///
    /// Takes the shared cell so the selector stays readable (and no borrow is
    /// held) while the list is in flight.
    pub async fn initialize<S: StatsSource>(selector: &RefCell<Self>, source: &S) -> String {
        let fetched = source.fetch_websites().await;
        selector.borrow_mut().populate(fetched)
    }

    /// Resolves the initial selection from an already fetched website list.
    ///
    /// The stored preference wins when it names a listed website, otherwise
    /// the first website in list order. Nothing is persisted here.
    pub fn populate(&mut self, fetched: Result<Vec<Website>>) -> String {
        self.websites.clear();
        self.active = None;
        self.load_error = None;

        let websites = match fetched {
            Ok(websites) => websites,
            Err(err) => {
                error!(error = %err, "failed to load website list");
                self.load_error = Some(err);
                return String::new();
            }
        };

        if websites.is_empty() {
            info!("no websites available");
            return String::new();
        }

        let stored = self.preferences.get(&self.preference_key, "");
        let index = websites
            .iter()
            .position(|website| !stored.is_empty() && website.id == stored)
            .unwrap_or_else(|| {
                if !stored.is_empty() {
                    debug!(stored = %stored, "stored website is no longer listed");
                }
                0
            });

        self.websites = websites;
        self.active = Some(index);
        let selected = self.websites[index].id.clone();
        info!(website = %selected, count = self.websites.len(), "website selector ready");
        selected
    }

    /// User picked the website `id`. Unknown ids are ignored.
    pub fn select(&mut self, id: &str) -> bool {
        let Some(index) = self.websites.iter().position(|website| website.id == id) else {
            warn!(website = %id, "ignoring selection of unknown website");
            return false;
        };
        self.activate(index);
        true
    }

    pub fn select_next(&mut self) -> bool {
        let Some(current) = self.active else {
            return false;
        };
        self.activate((current + 1) % self.websites.len());
        true
    }

    pub fn select_previous(&mut self) -> bool {
        let Some(current) = self.active else {
            return false;
        };
        let len = self.websites.len();
        self.activate((current + len - 1) % len);
        true
    }

    fn activate(&mut self, index: usize) {
        self.active = Some(index);
        let id = self.websites[index].id.clone();
        self.preferences.set(&self.preference_key, &id);
        debug!(website = %id, "website selected");
        if self
            .events
            .unbounded_send(DashboardEvent::WebsiteSelected(id))
            .is_err()
        {
            warn!("dashboard event loop is gone, selection not dispatched");
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = SelectorEntry<'_>> + '_ {
        self.websites
            .iter()
            .enumerate()
            .map(move |(index, website)| SelectorEntry {
                id: &website.id,
                label: &website.name,
                active: self.active == Some(index),
            })
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.map(|index| self.websites[index].id.as_str())
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Label of the disabled entry shown when there is nothing to select.
    pub fn placeholder(&self) -> Option<&'static str> {
        self.websites.is_empty().then_some(EMPTY_PLACEHOLDER)
    }

    pub fn is_enabled(&self) -> bool {
        !self.websites.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.websites.iter().any(|website| website.id == id)
    }

    pub fn websites(&self) -> &[Website] {
        &self.websites
    }

    pub fn load_failed(&self) -> bool {
        self.load_error.is_some()
    }

    pub const fn style(&self) -> SelectorStyle {
        self.style
    }
}
