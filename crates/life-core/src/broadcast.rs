//! Fan-out of published generations to any number of viewers.
//!
//! [`BoardBroadcaster`] wraps a [`tokio::sync::broadcast`] channel. Each
//! [`Subscription`] owns an independent cursor into a bounded ring of
//! recent generations, so:
//!
//! - publishing never blocks and succeeds with zero subscribers,
//! - a slow subscriber only affects itself: once it is more than the
//!   channel capacity behind, its oldest pending generations are dropped
//!   and it resumes from the oldest one still retained,
//! - dropping a subscription releases its cursor immediately.

use futures::Stream;
use tokio::sync::broadcast;
use tracing::debug;

use crate::simulation::Generation;

/// Default per-subscriber queue depth.
pub const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Publishing side of the generation channel.
///
/// Cheap to clone; all clones feed the same set of subscribers.
#[derive(Debug, Clone)]
pub struct BoardBroadcaster {
    tx: broadcast::Sender<Generation>,
    capacity: usize,
}

impl BoardBroadcaster {
    /// Create a broadcaster whose subscribers may fall up to `capacity`
    /// generations behind before losing any.
    ///
    /// A `capacity` of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Publish a generation to every current subscriber.
    ///
    /// Returns the number of subscribers it was queued for. Returns 0 if
    /// nobody is subscribed, which is not an error.
    pub fn publish(&self, generation: &Generation) -> usize {
        // send only fails when there are no receivers.
        self.tx.send(generation.clone()).unwrap_or(0)
    }

    /// Start receiving every generation published from now on.
    pub fn subscribe(&self) -> Subscription {
        let rx = self.tx.subscribe();
        debug!(subscribers = self.tx.receiver_count(), "Viewer subscribed");
        Subscription { rx, skipped: 0 }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Per-subscriber queue depth.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for BoardBroadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_BROADCAST_CAPACITY)
    }
}

/// One viewer's feed of generations.
#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<Generation>,
    skipped: u64,
}

impl Subscription {
    /// Wait for the next generation.
    ///
    /// Returns `None` once every [`BoardBroadcaster`] has been dropped and
    /// all queued generations have been received. If this subscription
    /// fell behind, the dropped generations are counted in
    /// [`skipped`](Self::skipped) and the oldest retained one is returned.
    pub async fn next(&mut self) -> Option<Generation> {
        loop {
            match self.rx.recv().await {
                Ok(generation) => return Some(generation),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    self.skipped = self.skipped.saturating_add(n);
                    debug!(skipped = n, "Subscriber lagged, dropping oldest generations");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Total generations this subscription has lost by falling behind.
    pub const fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Adapt the subscription into a [`Stream`] of generations.
    ///
    /// The stream ends when the channel closes. Dropping the stream
    /// releases the subscription.
    pub fn into_stream(self) -> impl Stream<Item = Generation> + Send + 'static {
        futures::stream::unfold(self, |mut sub| async move {
            sub.next().await.map(|generation| (generation, sub))
        })
    }

    /// Release the subscription. Equivalent to dropping it.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        debug!(skipped = self.skipped, "Viewer unsubscribed");
    }
}
