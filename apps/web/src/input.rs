use std::cell::Cell;

use nixvis_dashboard::{DashboardEvent, DateRange};
use ratzilla::event::KeyCode;

/// What a key press asks the page to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NextWebsite,
    PreviousWebsite,
    SetRange(DateRange),
    NextRanking,
    PreviousRanking,
}

pub fn command_for(code: &KeyCode) -> Option<Command> {
    match code {
        KeyCode::Right => Some(Command::NextWebsite),
        KeyCode::Left => Some(Command::PreviousWebsite),
        KeyCode::Down => Some(Command::NextRanking),
        KeyCode::Up => Some(Command::PreviousRanking),
        KeyCode::Char(key @ '1'..='4') => {
            let index = key.to_digit(10)? as usize - 1;
            DateRange::from_index(index).map(Command::SetRange)
        }
        _ => None,
    }
}

/// Last date range the keyboard asked for.
///
/// The dashboard's own selection lags behind until it processes the queued
/// event, so repeated presses are compared against this instead.
#[derive(Debug)]
pub struct RangeKeys {
    requested: Cell<DateRange>,
}

impl RangeKeys {
    pub const fn new(initial: DateRange) -> Self {
        Self {
            requested: Cell::new(initial),
        }
    }

    /// Event to send for a press of `range`, `None` when it is already the
    /// latest request.
    pub fn request(&self, range: DateRange) -> Option<DashboardEvent> {
        if self.requested.replace(range) == range {
            return None;
        }
        Some(DashboardEvent::RangeChanged(range))
    }
}
