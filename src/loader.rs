//! Delayed page delivery.
//!
//! The catalog is local, but the feed should still behave like a remote one:
//! a requested page shows up after a short latency, and while it is pending
//! the list shows a loading footer.  [`PageLoader`] schedules that delay on a
//! tokio runtime and sends the finished request back to the UI thread over an
//! [`mpsc`] channel, which the main loop drains on every tick.
//!
//! ## For contributors
//!
//! Only the *timing* happens off-thread.  The page itself is appended by
//! [`Feed::complete_load`] on the UI thread when the message arrives, so the
//! feed never needs a lock.

use std::sync::mpsc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::feed::{Feed, PageRequest};

/// Default simulated latency before a page arrives.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

/// Messages sent from loader tasks to the UI thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMsg {
    /// The delay for this request has elapsed; append its page.
    PageReady(PageRequest),
}

pub struct PageLoader {
    runtime: Handle,
    tx: mpsc::Sender<LoadMsg>,
    latency: Duration,
}

impl PageLoader {
    /// Create a loader and the receiver the main loop should drain.
    pub fn new(runtime: Handle, latency: Duration) -> (Self, mpsc::Receiver<LoadMsg>) {
        let (tx, rx) = mpsc::channel();
        (Self { runtime, tx, latency }, rx)
    }

    /// Ask `feed` for its next page.
    ///
    /// Returns `false` (and schedules nothing) when the feed refuses: a load
    /// is already pending or a filter other than `All` is active.
    pub fn request(&self, feed: &mut Feed) -> bool {
        let Some(request) = feed.begin_load() else {
            return false;
        };

        let tx = self.tx.clone();
        let latency = self.latency;
        self.runtime.spawn(async move {
            tokio::time::sleep(latency).await;
            // If the receiver is gone the app has exited; nothing to do.
            let _ = tx.send(LoadMsg::PageReady(request));
        });
        true
    }
}

/// Apply one loader message to `feed`.  Returns the number of products
/// appended.
pub fn apply(feed: &mut Feed, msg: LoadMsg) -> usize {
    match msg {
        LoadMsg::PageReady(request) => feed.complete_load(request),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use std::sync::Arc;
    use tokio::runtime::Runtime;

    const WAIT: Duration = Duration::from_secs(5);

    fn setup(latency: Duration) -> (Runtime, PageLoader, mpsc::Receiver<LoadMsg>, Feed) {
        let runtime = Runtime::new().unwrap();
        let (loader, rx) = PageLoader::new(runtime.handle().clone(), latency);
        let feed = Feed::new(Arc::new(Catalog::generate(60, 3)), 20);
        (runtime, loader, rx, feed)
    }

    #[test]
    fn page_arrives_after_latency() {
        let (_rt, loader, rx, mut feed) = setup(Duration::from_millis(20));

        assert!(loader.request(&mut feed));
        assert!(feed.is_loading());
        assert!(feed.displayed().is_empty(), "nothing appended before the delay");

        let msg = rx.recv_timeout(WAIT).unwrap();
        assert_eq!(apply(&mut feed, msg), 20);
        assert!(!feed.is_loading());
        assert_eq!(feed.page(), 2);
    }

    #[test]
    fn rapid_double_request_schedules_one_page() {
        let (_rt, loader, rx, mut feed) = setup(Duration::from_millis(20));

        assert!(loader.request(&mut feed));
        assert!(!loader.request(&mut feed));

        let msg = rx.recv_timeout(WAIT).unwrap();
        apply(&mut feed, msg);
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        assert_eq!(feed.displayed().len(), 20);
    }

    #[test]
    fn sequential_requests_walk_the_catalog() {
        let (_rt, loader, rx, mut feed) = setup(Duration::ZERO);

        for _ in 0..4 {
            assert!(loader.request(&mut feed));
            let msg = rx.recv_timeout(WAIT).unwrap();
            apply(&mut feed, msg);
        }

        assert_eq!(feed.displayed().len(), 60);
        assert!(feed.is_exhausted());
    }
}
