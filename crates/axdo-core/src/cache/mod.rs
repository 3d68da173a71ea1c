/*!
Tree Cache: a TTL cache of reads keyed by scope (spec §3.6, §4.2).

A single mutex-guarded map that readers and writers share, specialized to
a single configurable TTL rather than a per-call recency argument, since
the core is on-demand rather than continuously observing.
*/

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::model::Element;
use crate::platform::Reader;
use crate::types::{CoreResult, Scope};

#[derive(Clone)]
struct Entry {
  tree: Arc<Element>,
  stored_at: Instant,
}

/// TTL cache of `(scope → tree)`, keyed by the scope's tuple of
/// `(app, window_title, window_id, pid)` rendered as a string key.
///
/// A `ttl` of `None` disables caching entirely: every `get_or_read` call
/// falls through to the adapter.
pub struct TreeCache {
  ttl: Option<Duration>,
  entries: Mutex<std::collections::HashMap<String, Entry>>,
}

fn cache_key(scope: &Scope) -> String {
  format!(
    "{}\u{0}{}\u{0}{}\u{0}{}",
    scope.app.as_deref().unwrap_or(""),
    scope.window_title.as_deref().unwrap_or(""),
    scope.window_id.map_or(String::new(), |id| id.to_string()),
    scope.pid.map_or(String::new(), |pid| pid.to_string()),
  )
}

impl TreeCache {
  /// Build a cache with the given TTL. `None` disables caching.
  #[must_use]
  pub fn new(ttl: Option<Duration>) -> Self {
    Self {
      ttl,
      entries: Mutex::new(std::collections::HashMap::new()),
    }
  }

  /// Return the cached tree for `scope` if present and within TTL,
  /// otherwise read through `adapter`, store the result, and return it.
  ///
  /// Adapter errors are returned directly and never cached (spec §4.2
  /// "Failure").
  pub fn get_or_read<R: Reader + ?Sized>(&self, adapter: &R, scope: &Scope) -> CoreResult<Arc<Element>> {
    let key = cache_key(scope);

    if let Some(ttl) = self.ttl {
      let guard = self.entries.lock();
      if let Some(entry) = guard.get(&key) {
        if entry.stored_at.elapsed() <= ttl {
          return Ok(Arc::clone(&entry.tree));
        }
      }
    }

    let tree = Arc::new(adapter.read_elements(scope)?);

    if self.ttl.is_some() {
      let mut guard = self.entries.lock();
      guard.insert(
        key,
        Entry {
          tree: Arc::clone(&tree),
          stored_at: Instant::now(),
        },
      );
    }

    Ok(tree)
  }

  /// Drop all entries whose scope's `app` equals `app`.
  pub fn invalidate(&self, app: &str) {
    let mut guard = self.entries.lock();
    guard.retain(|key, _| !key.starts_with(&format!("{app}\u{0}")));
  }

  /// Drop the entire cache.
  pub fn invalidate_all(&self) {
    self.entries.lock().clear();
  }

  /// Number of live entries. Test/debug helper.
  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.lock().len()
  }

  /// Whether the cache currently holds no entries.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::platform::mock::MockAdapter;

  fn scope(app: &str) -> Scope {
    Scope::for_app(app)
  }

  #[test]
  fn caches_within_ttl() {
    let adapter = MockAdapter::with_default_tree();
    let cache = TreeCache::new(Some(Duration::from_millis(500)));
    let first = cache.get_or_read(&adapter, &scope("Notes")).unwrap();
    let second = cache.get_or_read(&adapter, &scope("Notes")).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(adapter.read_count(), 1);
  }

  #[test]
  fn nil_ttl_disables_cache() {
    let adapter = MockAdapter::with_default_tree();
    let cache = TreeCache::new(None);
    cache.get_or_read(&adapter, &scope("Notes")).unwrap();
    cache.get_or_read(&adapter, &scope("Notes")).unwrap();
    assert_eq!(adapter.read_count(), 2);
    assert!(cache.is_empty());
  }

  #[test]
  fn invalidate_drops_only_matching_app() {
    let adapter = MockAdapter::with_default_tree();
    let cache = TreeCache::new(Some(Duration::from_secs(5)));
    cache.get_or_read(&adapter, &scope("Notes")).unwrap();
    cache.get_or_read(&adapter, &scope("Mail")).unwrap();
    cache.invalidate("Notes");
    assert_eq!(cache.len(), 1);
  }

  #[test]
  fn invalidate_all_clears_everything() {
    let adapter = MockAdapter::with_default_tree();
    let cache = TreeCache::new(Some(Duration::from_secs(5)));
    cache.get_or_read(&adapter, &scope("Notes")).unwrap();
    cache.get_or_read(&adapter, &scope("Mail")).unwrap();
    cache.invalidate_all();
    assert!(cache.is_empty());
  }

  #[test]
  fn read_error_is_not_cached() {
    let adapter = MockAdapter::failing();
    let cache = TreeCache::new(Some(Duration::from_secs(5)));
    assert!(cache.get_or_read(&adapter, &scope("Ghost")).is_err());
    assert!(cache.is_empty());
  }
}
