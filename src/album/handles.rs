//! Bookkeeping for session-only display handles.
//!
//! Every photo shown to the user holds a [`DisplayHandle`] (the host-side
//! analogue of an object URL). The registry tracks which handles are live,
//! and after each mutation it is synced against the current collection so
//! that superseded handles are released exactly once.

use std::collections::BTreeSet;
use std::fmt;

/// Ephemeral handle for rendering a photo. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayHandle(u64);

impl DisplayHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

type ReleaseHook = Box<dyn Fn(DisplayHandle) + Send + Sync>;

/// The set of live handles.
#[derive(Default)]
pub struct HandleRegistry {
    next: u64,
    live: BTreeSet<DisplayHandle>,
    on_release: Option<ReleaseHook>,
}

impl fmt::Debug for HandleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleRegistry")
            .field("next", &self.next)
            .field("live", &self.live)
            .finish_non_exhaustive()
    }
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook invoked once for every released handle.
    pub fn with_release_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(DisplayHandle) + Send + Sync + 'static,
    {
        self.on_release = Some(Box::new(hook));
        self
    }

    /// Issues a new live handle.
    pub fn issue(&mut self) -> DisplayHandle {
        self.next += 1;
        let handle = DisplayHandle(self.next);
        self.live.insert(handle);
        handle
    }

    /// Releases `handle`. Returns `false` if it was not live, so a handle
    /// is never released twice.
    pub fn release(&mut self, handle: DisplayHandle) -> bool {
        if !self.live.remove(&handle) {
            return false;
        }
        if let Some(hook) = &self.on_release {
            hook(handle);
        }
        true
    }

    /// Releases every live handle not in `current` and returns them.
    pub fn sync<I>(&mut self, current: I) -> Vec<DisplayHandle>
    where
        I: IntoIterator<Item = DisplayHandle>,
    {
        let keep: BTreeSet<DisplayHandle> = current.into_iter().collect();
        let stale: Vec<DisplayHandle> = self.live.difference(&keep).copied().collect();
        for handle in &stale {
            self.release(*handle);
        }
        stale
    }

    /// Releases everything. Returns how many handles were live.
    pub fn release_all(&mut self) -> usize {
        self.sync(std::iter::empty()).len()
    }

    pub fn is_live(&self, handle: DisplayHandle) -> bool {
        self.live.contains(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording() -> (HandleRegistry, Arc<Mutex<Vec<DisplayHandle>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let reg = HandleRegistry::new().with_release_hook(move |h| sink.lock().unwrap().push(h));
        (reg, log)
    }

    #[test]
    fn issued_handles_are_distinct_and_live() {
        let mut reg = HandleRegistry::new();
        let a = reg.issue();
        let b = reg.issue();
        assert_ne!(a, b);
        assert!(reg.is_live(a) && reg.is_live(b));
        assert_eq!(reg.live_count(), 2);
    }

    #[test]
    fn release_happens_exactly_once() {
        let (mut reg, log) = recording();
        let a = reg.issue();
        assert!(reg.release(a));
        assert!(!reg.release(a));
        assert_eq!(log.lock().unwrap().as_slice(), &[a]);
    }

    #[test]
    fn sync_releases_only_superseded_handles() {
        let (mut reg, log) = recording();
        let a = reg.issue();
        let b = reg.issue();
        let c = reg.issue();

        let released = reg.sync([a, c]);
        assert_eq!(released, vec![b]);
        assert_eq!(reg.sync([a, c]), vec![]);
        assert_eq!(log.lock().unwrap().as_slice(), &[b]);
    }

    #[test]
    fn release_all_empties_the_registry() {
        let (mut reg, log) = recording();
        reg.issue();
        reg.issue();
        assert_eq!(reg.release_all(), 2);
        assert_eq!(reg.live_count(), 0);
        assert_eq!(reg.release_all(), 0);
        assert_eq!(log.lock().unwrap().len(), 2);
    }
}
