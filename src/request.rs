//! Dropping responses that arrive too late to matter.
//!
//! A view takes a [Ticket] before every request and only applies the response
//! if the ticket is still current: the view is still mounted and no newer
//! request has been started on the same tracker.

use std::{cell::Cell, rc::Rc};

use yew::functional::{hook, use_effect_with_deps, use_state};

#[derive(Debug)]
struct TrackerState {
    generation: Cell<u64>,
    mounted: Cell<bool>,
}

#[derive(Clone, Debug)]
pub struct RequestTracker {
    state: Rc<TrackerState>,
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self {
            state: Rc::new(TrackerState {
                generation: Cell::new(0),
                mounted: Cell::new(true),
            }),
        }
    }
}

impl RequestTracker {
    /// Start a request. Any ticket handed out earlier becomes stale.
    pub fn begin(&self) -> Ticket {
        let generation = self.state.generation.get() + 1;
        self.state.generation.set(generation);
        Ticket {
            state: self.state.clone(),
            generation,
        }
    }

    /// Mark the owning view as gone. Every outstanding ticket becomes stale.
    pub fn unmount(&self) {
        self.state.mounted.set(false);
    }

    pub fn is_mounted(&self) -> bool {
        self.state.mounted.get()
    }
}

#[derive(Debug)]
pub struct Ticket {
    state: Rc<TrackerState>,
    generation: u64,
}

impl Ticket {
    pub fn is_current(&self) -> bool {
        let current = self.state.mounted.get() && self.state.generation.get() == self.generation;
        if !current {
            tracing::debug!("Discarding stale response (request #{})", self.generation);
        }
        current
    }
}

/// A tracker that lives as long as the calling component and is unmounted
/// with it.
#[hook]
pub fn use_request_tracker() -> RequestTracker {
    let tracker = (*use_state(RequestTracker::default)).clone();

    {
        let tracker = tracker.clone();
        use_effect_with_deps(move |_| move || tracker.unmount(), ());
    }

    tracker
}
