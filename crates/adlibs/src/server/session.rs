//! Per-viewer dashboard sessions.
//!
//! Each browser tab sends a session id with its dashboard requests. The
//! session remembers the chosen theme and the KPIs last shown, so trend
//! arrows compare against what that viewer saw rather than what any other
//! viewer saw.

use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

use lru::LruCache;
use tracing::debug;

use crate::kpi::KpiTracker;
use crate::theme::Theme;

/// State remembered for one viewer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Theme last selected.
    pub theme: Theme,
    /// KPIs last shown.
    pub tracker: KpiTracker,
}

/// Bounded map of sessions. When full, the least recently seen session is
/// evicted.
///
/// The lock is only held to copy a session in or out, so rendering happens
/// outside it.
#[derive(Debug)]
pub struct SessionStore {
    default_theme: Theme,
    cache: Mutex<LruCache<String, Session>>,
}

impl SessionStore {
    /// Create a store holding at most `capacity` sessions (at least 1).
    #[must_use]
    pub fn new(capacity: usize, default_theme: Theme) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            default_theme,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// A copy of session `id`, created if needed and marked as recently seen.
    ///
    /// A `theme` is stored in the session before it is returned.
    pub fn checkout(&self, id: &str, theme: Option<Theme>) -> Session {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        if !cache.contains(id) && cache.len() == cache.cap().get() {
            if let Some((evicted, _)) = cache.pop_lru() {
                debug!(session = %evicted, "Evicting dashboard session");
            }
        }

        let default_theme = self.default_theme;
        let session = cache.get_or_insert_mut(id.to_string(), || {
            debug!(session = id, "New dashboard session");
            Session {
                theme: default_theme,
                tracker: KpiTracker::new(),
            }
        });
        if let Some(theme) = theme {
            session.theme = theme;
        }
        session.clone()
    }

    /// Store `session` under `id`, marking it as recently seen.
    pub fn save(&self, id: &str, session: Session) {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((evicted, _)) = cache.push(id.to_string(), session) {
            if evicted != id {
                debug!(session = %evicted, "Evicting dashboard session");
            }
        }
    }

    /// A copy of session `id`, if it exists. Does not count as a visit.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Session> {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.peek(id).cloned()
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if there are no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
