use std::fmt;

/// Handle returned by `Subject::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

/// Push-style change notification.
/// Every `publish` bumps the version and calls each observer in subscription
/// order, so observers see every intermediate value. Hosts that cannot take
/// callbacks (the browser bridge) poll `version()` instead.
pub struct Subject<T> {
    version: u64,
    observers: Vec<(SubscriptionId, Box<dyn FnMut(&T)>)>,
    next_id: u32,
}

impl<T> Subject<T> {
    pub fn new() -> Self {
        Self {
            version: 0,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn publish(&mut self, value: &T) {
        self.version += 1;
        for (_, observer) in &mut self.observers {
            observer(value);
        }
    }

    /// Number of values published so far.
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl<T> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("version", &self.version)
            .field("observers", &self.observers.len())
            .finish()
    }
}
