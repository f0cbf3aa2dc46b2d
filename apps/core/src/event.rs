use futures::channel::mpsc;

use crate::domain::DateRange;

/// User intents the dashboard reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    /// A website entry was activated in the selector.
    WebsiteSelected(String),
    /// The date range control changed.
    RangeChanged(DateRange),
}

pub type EventSender = mpsc::UnboundedSender<DashboardEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<DashboardEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded()
}
