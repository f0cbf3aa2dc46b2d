//! Request sequencing for overlapping async work.
//!
//! Every request takes a [`Ticket`] when it is issued. When it completes it
//! applies its result only if no newer ticket has been handed out since.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct RequestGeneration {
    latest: Rc<Cell<u64>>,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request, superseding every ticket issued before it.
    pub fn begin(&self) -> Ticket {
        let id = self.latest.get() + 1;
        self.latest.set(id);
        Ticket {
            id,
            latest: Rc::clone(&self.latest),
        }
    }

    pub fn latest(&self) -> u64 {
        self.latest.get()
    }
}

#[derive(Debug, Clone)]
pub struct Ticket {
    id: u64,
    latest: Rc<Cell<u64>>,
}

impl Ticket {
    pub const fn id(&self) -> u64 {
        self.id
    }

    pub fn is_current(&self) -> bool {
        self.latest.get() == self.id
    }
}
