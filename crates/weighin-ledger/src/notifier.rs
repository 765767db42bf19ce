use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing::debug;
use weighin_types::{EntryId, LedgerSnapshot, TournamentId};

/// Default capacity of the broadcast channel handed out by `subscribe`.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// What happened to the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Appended(EntryId),
    Updated(EntryId),
    Removed(EntryId),
    /// Memory was replaced by the persisted record.
    Reloaded,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Appended(id) => write!(f, "appended {id}"),
            Self::Updated(id) => write!(f, "updated {id}"),
            Self::Removed(id) => write!(f, "removed {id}"),
            Self::Reloaded => f.write_str("reloaded"),
        }
    }
}

/// A published ledger change: the full post-change snapshot.
#[derive(Clone, Debug)]
pub struct LedgerChange {
    pub tournament_id: TournamentId,
    pub kind: ChangeKind,
    pub snapshot: Arc<LedgerSnapshot>,
}

/// Receiver half of [`ChangeNotifier::subscribe`].
pub type ChangeStream = broadcast::Receiver<LedgerChange>;

/// Synchronous subscriber called on every published change.
pub trait LedgerObserver: Send {
    fn on_change(&mut self, change: &LedgerChange);
}

/// Lets a caller keep a handle to an observer it has attached.
impl<T: LedgerObserver> LedgerObserver for Arc<Mutex<T>> {
    fn on_change(&mut self, change: &LedgerChange) {
        self.lock().expect("lock poisoned").on_change(change);
    }
}

/// Fan-out of ledger changes to attached observers and broadcast receivers.
///
/// Observers run inline, in attach order, before the broadcast send.
/// Broadcast receivers that fall behind lose the oldest changes; every change
/// carries the full snapshot, so the latest one is always sufficient.
pub struct ChangeNotifier {
    observers: Vec<Box<dyn LedgerObserver>>,
    sender: broadcast::Sender<LedgerChange>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            observers: Vec::new(),
            sender,
        }
    }

    pub fn attach(&mut self, observer: Box<dyn LedgerObserver>) {
        self.observers.push(observer);
    }

    /// Open a new broadcast receiver. It sees changes published after this call.
    pub fn subscribe(&self) -> ChangeStream {
        self.sender.subscribe()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Deliver `snapshot` to every observer and receiver.
    pub fn publish(&mut self, tournament_id: &TournamentId, kind: ChangeKind, snapshot: &LedgerSnapshot) {
        let change = LedgerChange {
            tournament_id: tournament_id.clone(),
            kind,
            snapshot: Arc::new(snapshot.clone()),
        };
        for observer in &mut self.observers {
            observer.on_change(&change);
        }
        // A send error only means nobody is listening.
        let delivered = self.sender.send(change).unwrap_or(0);
        debug!(
            tournament = %tournament_id,
            %kind,
            observers = self.observers.len(),
            receivers = delivered,
            "published ledger change"
        );
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observers.len())
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weighin_types::Division;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<ChangeKind>,
    }

    impl LedgerObserver for Recorder {
        fn on_change(&mut self, change: &LedgerChange) {
            self.seen.push(change.kind);
        }
    }

    fn snapshot() -> LedgerSnapshot {
        LedgerSnapshot::empty(TournamentId::new("t").unwrap(), Division::Nearshore)
    }

    #[test]
    fn observers_and_receivers_both_see_changes() {
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        let mut notifier = ChangeNotifier::new();
        notifier.attach(Box::new(Arc::clone(&recorder)));
        let mut rx = notifier.subscribe();

        let snap = snapshot();
        notifier.publish(&snap.tournament_id, ChangeKind::Reloaded, &snap);

        assert_eq!(recorder.lock().unwrap().seen, vec![ChangeKind::Reloaded]);
        let change = rx.try_recv().unwrap();
        assert_eq!(change.kind, ChangeKind::Reloaded);
        assert_eq!(*change.snapshot, snap);
    }

    #[test]
    fn publishing_without_listeners_is_fine() {
        let mut notifier = ChangeNotifier::new();
        let snap = snapshot();
        notifier.publish(&snap.tournament_id, ChangeKind::Reloaded, &snap);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn late_subscribers_miss_earlier_changes() {
        let mut notifier = ChangeNotifier::new();
        let snap = snapshot();
        notifier.publish(&snap.tournament_id, ChangeKind::Reloaded, &snap);
        let mut rx = notifier.subscribe();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn lagging_receiver_keeps_latest() {
        let mut notifier = ChangeNotifier::with_capacity(2);
        let mut rx = notifier.subscribe();
        let snap = snapshot();
        for _ in 0..5 {
            notifier.publish(&snap.tournament_id, ChangeKind::Reloaded, &snap);
        }
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Lagged(3))
        ));
        assert!(rx.try_recv().is_ok());
    }
}
