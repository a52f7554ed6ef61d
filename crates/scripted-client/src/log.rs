use std::sync::{Arc, Mutex};

/// A lifecycle event of a scripted session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionLifecycle {
    /// The session with the given id was opened.
    Opened(u64),
    /// The session with the given id was closed.
    Closed(u64),
}

/// A shared log of session lifecycle events.
///
/// Every clone observes the same log. `Opened` is recorded when a
/// session is created, `Closed` when it is dropped, so the log is the
/// ground truth for asserting that sessions never overlap.
#[derive(Clone, Default, Debug)]
pub struct SessionLog {
    events: Arc<Mutex<Vec<SessionLifecycle>>>,
}

impl SessionLog {
    pub(crate) fn record(&self, event: SessionLifecycle) {
        self.events
            .lock()
            .expect("session log lock poisoned")
            .push(event);
    }

    /// Returns a snapshot of the recorded events.
    pub fn events(&self) -> Vec<SessionLifecycle> {
        self.events
            .lock()
            .expect("session log lock poisoned")
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_between_clones() {
        let log = SessionLog::default();
        let clone = log.clone();
        log.record(SessionLifecycle::Opened(0));
        clone.record(SessionLifecycle::Closed(0));
        assert_eq!(
            log.events(),
            vec![SessionLifecycle::Opened(0), SessionLifecycle::Closed(0)]
        );
    }
}
