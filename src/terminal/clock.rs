use chrono::{Local, NaiveDateTime};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Local wall clock of the terminal.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    /// Wait before retrying after a transient failure.
    fn sleep(&self, d: Duration) {
        std::thread::sleep(d);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Settable clock. Clones share the same time, so a test can keep a handle
/// while the terminal owns another. Sleeping advances the time instead of
/// blocking.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<NaiveDateTime>>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, t: NaiveDateTime) {
        self.now.set(t);
    }

    pub fn advance(&self, d: chrono::Duration) {
        self.now.set(self.now.get() + d);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }

    fn sleep(&self, d: Duration) {
        if let Ok(d) = chrono::Duration::from_std(d) {
            self.advance(d);
        }
    }
}
