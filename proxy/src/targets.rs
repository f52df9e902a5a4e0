use crate::errors::ProxyError;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

/// Environment slots naming backend base URLs, in rotation order.
pub const BACKEND_ENV_VARS: &[&str] = &["BACKEND_1", "BACKEND_2", "BACKEND_3"];

/// The set of backend base URLs this gateway can forward to, together with
/// the rotation cursor shared by every route.
///
/// The pool is built once at process start and is immutable afterwards. An
/// empty pool is a valid state: the process keeps serving and each proxied
/// request is answered with a configuration error instead.
#[derive(Debug)]
pub struct TargetPool {
    targets: Vec<Url>,
    cursor: AtomicUsize,
}

impl TargetPool {
    pub fn new(targets: Vec<Url>) -> Self {
        Self {
            targets,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Reads the `BACKEND_*` environment slots. Unset and empty slots are
    /// skipped; a malformed URL is a configuration error naming the variable.
    pub fn from_env() -> Result<Self, ProxyError> {
        Self::from_values(
            BACKEND_ENV_VARS
                .iter()
                .map(|name| (*name, env::var(name).ok())),
        )
    }

    pub fn from_values<'a>(
        values: impl IntoIterator<Item = (&'a str, Option<String>)>,
    ) -> Result<Self, ProxyError> {
        let mut targets = Vec::new();
        for (name, value) in values {
            let Some(value) = value else { continue };
            if value.is_empty() {
                continue;
            }
            let url = Url::parse(&value).map_err(|source| ProxyError::InvalidTarget {
                var: name.to_string(),
                source,
            })?;
            targets.push(url);
        }
        Ok(Self::new(targets))
    }

    pub fn targets(&self) -> &[Url] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Returns the next target in rotation and advances the shared cursor.
    ///
    /// The stored cursor always stays below the pool length; concurrent
    /// callers each observe a distinct advance.
    pub fn next_target(&self) -> Option<&Url> {
        if self.targets.is_empty() {
            return None;
        }
        let len = self.targets.len();
        let index = self
            .cursor
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |cursor| {
                Some((cursor + 1) % len)
            })
            // the update closure never returns None
            .unwrap_or(0);
        Some(&self.targets[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_of(urls: &[&str]) -> TargetPool {
        TargetPool::new(urls.iter().map(|u| Url::parse(u).unwrap()).collect())
    }

    #[test]
    fn test_round_robin_rotation() {
        let pool = pool_of(&[
            "http://backend-a:4000",
            "http://backend-b:4000",
            "http://backend-c:4000",
        ]);

        // Two full cycles: each target selected exactly twice, in pool order.
        let selected: Vec<&Url> = (0..6).map(|_| pool.next_target().unwrap()).collect();
        let expected: Vec<&Url> = pool.targets().iter().cycle().take(6).collect();
        assert_eq!(selected, expected);
    }

    #[test]
    fn test_cursor_wraps_to_start() {
        let pool = pool_of(&["http://a:1", "http://b:1", "http://c:1"]);

        let first = pool.next_target().unwrap().clone();
        for _ in 0..pool.len() - 1 {
            pool.next_target().unwrap();
        }
        // After len selections the rotation is back where it started.
        assert_eq!(pool.next_target().unwrap(), &first);
    }

    #[test]
    fn test_single_target() {
        let pool = pool_of(&["http://only:4000"]);
        for _ in 0..3 {
            assert_eq!(pool.next_target().unwrap().as_str(), "http://only:4000/");
        }
    }

    #[test]
    fn test_empty_pool() {
        let pool = TargetPool::new(vec![]);
        assert!(pool.is_empty());
        assert!(pool.next_target().is_none());
        // Stays empty on repeated selection attempts.
        assert!(pool.next_target().is_none());
    }

    #[test]
    fn test_from_values_skips_unset_and_empty() {
        let pool = TargetPool::from_values([
            ("BACKEND_1", None),
            ("BACKEND_2", Some("".to_string())),
            ("BACKEND_3", Some("http://10.0.0.3:8080".to_string())),
        ])
        .unwrap();

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.targets()[0].as_str(), "http://10.0.0.3:8080/");
    }

    #[test]
    fn test_from_values_rejects_malformed_url() {
        let result = TargetPool::from_values([("BACKEND_2", Some("10.0.0.3:8080".to_string()))]);
        match result {
            Err(ProxyError::InvalidTarget { var, .. }) => assert_eq!(var, "BACKEND_2"),
            other => panic!("expected InvalidTarget, got {other:?}"),
        }
    }
}
