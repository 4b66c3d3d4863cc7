use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Small in process cache with per entry expiry.
/// Holds the issued token per user so a token can be revoked before its
/// signature expires.
#[derive(Clone, Default)]
pub struct TtlCache {
  inner: Arc<Mutex<HashMap<String, (String, Instant)>>>,
}

impl TtlCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, key: &str) -> Option<String> {
    let mut map = self.inner.lock().expect("cache poisoned");
    match map.get(key) {
      Some((value, expires_at)) if *expires_at > Instant::now() => {
        Some(value.clone())
      }
      Some(_) => {
        map.remove(key);
        None
      }
      None => None,
    }
  }

  pub fn set(&self, key: &str, value: &str, ttl: Duration) {
    let mut map = self.inner.lock().expect("cache poisoned");
    map.insert(key.to_owned(), (value.to_owned(), Instant::now() + ttl));
  }

  pub fn delete(&self, key: &str) {
    let mut map = self.inner.lock().expect("cache poisoned");
    map.remove(key);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn set_get_delete() {
    let cache = TtlCache::new();
    cache.set("token:u1", "abc", Duration::from_secs(60));
    assert_eq!(cache.get("token:u1"), Some("abc".to_owned()));
    cache.delete("token:u1");
    assert_eq!(cache.get("token:u1"), None);
  }

  #[test]
  fn entries_expire() {
    let cache = TtlCache::new();
    cache.set("token:u1", "abc", Duration::from_millis(10));
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(cache.get("token:u1"), None);
  }
}
