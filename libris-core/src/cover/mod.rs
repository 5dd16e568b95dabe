//! Title → cover image cache, filled lazily by background lookups
//!
//! Entries are memoized for the life of the process: once a title resolves
//! to [`CoverEntry::Found`] or [`CoverEntry::NotFound`] it is never looked up
//! again. There is no invalidation.

mod lookup;

pub use lookup::{CoverLookup, VolumeSearchLookup};

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Cached state of a title's cover
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverEntry {
    /// Not looked up yet, or lookup in flight
    Pending,
    Found(String),
    NotFound,
}

impl CoverEntry {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// What to draw in a cover slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverArt {
    Loading,
    Image(String),
    /// First character of the title, uppercased
    Placeholder(String),
}

impl CoverArt {
    pub fn for_entry(title: &str, entry: &CoverEntry) -> Self {
        match entry {
            CoverEntry::Pending => Self::Loading,
            CoverEntry::Found(url) => Self::Image(url.clone()),
            CoverEntry::NotFound => Self::Placeholder(placeholder_letter(title)),
        }
    }
}

/// First character of `title`, uppercased. Empty for an empty title.
pub fn placeholder_letter(title: &str) -> String {
    title
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// Broadcast when a title resolves for the first time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverResolved {
    pub title: String,
    pub entry: CoverEntry,
}

#[derive(Debug, Clone)]
enum Slot {
    InFlight,
    Resolved(CoverEntry),
}

pub struct CoverCache {
    lookup: Arc<dyn CoverLookup>,
    slots: Mutex<HashMap<String, Slot>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    events: broadcast::Sender<CoverResolved>,
}

impl std::fmt::Debug for CoverCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoverCache")
            .field("titles", &self.slots.lock().len())
            .finish()
    }
}

impl CoverCache {
    pub fn new(lookup: Arc<dyn CoverLookup>) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            lookup,
            slots: Mutex::new(HashMap::new()),
            tasks: Mutex::new(Vec::new()),
            events,
        }
    }

    /// Current state for `title`. Unseen and in-flight titles are `Pending`.
    pub fn lookup(&self, title: &str) -> CoverEntry {
        match self.slots.lock().get(title) {
            Some(Slot::Resolved(entry)) => entry.clone(),
            _ => CoverEntry::Pending,
        }
    }

    pub fn art(&self, title: &str) -> CoverArt {
        CoverArt::for_entry(title, &self.lookup(title))
    }

    /// Whether `title` has been scheduled or resolved
    pub fn contains(&self, title: &str) -> bool {
        self.slots.lock().contains_key(title)
    }

    /// Receive an event for every title resolved from now on
    pub fn subscribe(&self) -> broadcast::Receiver<CoverResolved> {
        self.events.subscribe()
    }

    /// Start a background lookup for `title` unless it is already known.
    ///
    /// Returns `true` if a lookup was spawned. Outside a tokio runtime nothing
    /// is spawned or claimed and `false` is returned.
    pub fn schedule(self: &Arc<Self>, title: &str) -> bool {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No runtime, not scheduling cover lookup for {:?}", title);
            return false;
        };
        {
            let mut slots = self.slots.lock();
            if slots.contains_key(title) {
                return false;
            }
            slots.insert(title.to_string(), Slot::InFlight);
        }

        tracing::debug!("Scheduling cover lookup for {:?}", title);
        let cache = Arc::clone(self);
        let title = title.to_string();
        let handle = runtime.spawn(async move {
            cache.fetch_and_store(&title).await;
        });

        let mut tasks = self.tasks.lock();
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);
        true
    }

    /// Resolve `title` now. Never fails: every lookup error becomes `NotFound`.
    ///
    /// A title that already resolved is answered from the cache without an
    /// external call. Concurrent calls for an unresolved title may each look
    /// it up; the first result stored wins.
    pub async fn resolve(&self, title: &str) -> CoverEntry {
        {
            let mut slots = self.slots.lock();
            if let Some(Slot::Resolved(entry)) = slots.get(title) {
                return entry.clone();
            }
            slots.insert(title.to_string(), Slot::InFlight);
        }
        self.fetch_and_store(title).await
    }

    /// Wait for every scheduled lookup to finish
    pub async fn wait_pending(&self) {
        loop {
            let handles = std::mem::take(&mut *self.tasks.lock());
            if handles.is_empty() {
                return;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::warn!("Cover lookup task failed: {}", e);
                }
            }
        }
    }

    async fn fetch_and_store(&self, title: &str) -> CoverEntry {
        let entry = match self.lookup.thumbnail(title).await {
            Ok(Some(url)) => CoverEntry::Found(url),
            Ok(None) => CoverEntry::NotFound,
            Err(e) => {
                tracing::debug!("Cover lookup for {:?} failed: {}", title, e);
                CoverEntry::NotFound
            }
        };
        self.store(title, entry)
    }

    /// Compare-and-set: keep an existing resolution, otherwise store `entry`
    fn store(&self, title: &str, entry: CoverEntry) -> CoverEntry {
        {
            let mut slots = self.slots.lock();
            if let Some(Slot::Resolved(existing)) = slots.get(title) {
                return existing.clone();
            }
            slots.insert(title.to_string(), Slot::Resolved(entry.clone()));
        }

        // No subscribers is fine
        let _ = self.events.send(CoverResolved {
            title: title.to_string(),
            entry: entry.clone(),
        });
        entry
    }
}
