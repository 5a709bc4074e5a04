//! 请求合并
//!
//! 同一个键上同时只允许一个取数请求在途；其余调用者等待同一个结果，
//! 不会叠加发起新的请求。取数在独立任务中执行，完成后由该任务释放键，
//! 所有等待者都断开时也一样。下一次调用重新取数。

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error};

use crate::errors::{MonpadError, Result};

type SharedFetch<T> = Shared<BoxFuture<'static, Result<T>>>;

/// (取数编号, 共享结果)，编号用于只释放自己插入的条目
type InFlight<T> = DashMap<String, (u64, SharedFetch<T>)>;

pub struct RequestCoalescer<T>
where
    T: Clone + Send + Sync + 'static,
{
    in_flight: Arc<InFlight<T>>,
    next_id: AtomicU64,
}

impl<T> Default for RequestCoalescer<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self {
            in_flight: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<T> RequestCoalescer<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self, key: &str) -> bool {
        self.in_flight.contains_key(key)
    }

    /// 执行 `fetch`，若同键已有在途请求则直接等待它的结果
    ///
    /// 键中不应包含令牌等敏感信息，它会出现在日志里。
    pub async fn run<F>(&self, key: &str, fetch: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let shared = match self.in_flight.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                debug!("Joining in-flight fetch for {}", key);
                entry.get().1.clone()
            }
            Entry::Vacant(entry) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let shared = self.spawn_fetch(key.to_string(), id, fetch);
                entry.insert((id, shared.clone()));
                shared
            }
        };

        shared.await
    }

    fn spawn_fetch<F>(&self, key: String, id: u64, fetch: F) -> SharedFetch<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let in_flight = Arc::clone(&self.in_flight);
        let handle = tokio::spawn(async move {
            let result = fetch.await;
            in_flight.remove_if(&key, |_, (pending, _)| *pending == id);
            result
        });

        async move {
            handle.await.unwrap_or_else(|e| {
                error!("Coalesced fetch task failed: {}", e);
                Err(MonpadError::upstream("The fetch was interrupted"))
            })
        }
        .boxed()
        .shared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MonpadError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::Poll;

    #[tokio::test]
    async fn test_overlapping_calls_share_one_fetch() {
        let coalescer = RequestCoalescer::<u32>::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let first_calls = calls.clone();
        let mut first = Box::pin(coalescer.run("matrix", async move {
            first_calls.fetch_add(1, Ordering::SeqCst);
            rx.await.ok();
            Ok(7)
        }));
        assert!(matches!(futures_util::poll!(&mut first), Poll::Pending));
        assert!(coalescer.is_in_flight("matrix"));

        let second_calls = calls.clone();
        let mut second = Box::pin(coalescer.run("matrix", async move {
            second_calls.fetch_add(1, Ordering::SeqCst);
            Ok(99)
        }));
        assert!(matches!(futures_util::poll!(&mut second), Poll::Pending));

        tx.send(()).unwrap();
        assert_eq!(first.await.unwrap(), 7);
        assert_eq!(second.await.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!coalescer.is_in_flight("matrix"));
    }

    #[tokio::test]
    async fn test_sequential_calls_fetch_again() {
        let coalescer = RequestCoalescer::<u32>::new();
        assert_eq!(coalescer.run("k", async { Ok(1) }).await.unwrap(), 1);
        assert_eq!(coalescer.run("k", async { Ok(2) }).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_errors_are_shared_and_released() {
        let coalescer = RequestCoalescer::<u32>::new();
        let result = coalescer
            .run("k", async { Err(MonpadError::network("down")) })
            .await;
        assert!(matches!(result, Err(MonpadError::Network(_))));
        assert!(!coalescer.is_in_flight("k"));
    }

    #[tokio::test]
    async fn test_key_released_when_all_waiters_drop() {
        let coalescer = RequestCoalescer::<u32>::new();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let mut waiter = Box::pin(coalescer.run("matrix", async move {
            rx.await.ok();
            Ok(1)
        }));
        assert!(matches!(futures_util::poll!(&mut waiter), Poll::Pending));
        drop(waiter);
        assert!(coalescer.is_in_flight("matrix"));

        tx.send(()).unwrap();
        for _ in 0..50 {
            if !coalescer.is_in_flight("matrix") {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(!coalescer.is_in_flight("matrix"));
        assert_eq!(coalescer.run("matrix", async { Ok(2) }).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_block_each_other() {
        let coalescer = RequestCoalescer::<&'static str>::new();
        let (a, b) = tokio::join!(
            coalescer.run("a", async { Ok("a") }),
            coalescer.run("b", async { Ok("b") })
        );
        assert_eq!(a.unwrap(), "a");
        assert_eq!(b.unwrap(), "b");
    }
}
