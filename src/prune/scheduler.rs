//! Fixed-concurrency runner for batches of async work
//!
//! Items start in input order as capacity frees up and all workers run as
//! futures on the calling task. Every item runs to completion even when a
//! sibling fails, and outcome `i` always belongs to input item `i`.

use futures::stream::{self, StreamExt};
use std::future::Future;

/// Default number of in-flight provider requests at each fan-out point
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Runs a worker over a list of items with at most `concurrency` in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedScheduler {
    concurrency: usize,
}

impl BoundedScheduler {
    /// A concurrency of zero is treated as one
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run `worker` over `items`, returning one outcome per item in input order
    pub async fn run<I, O, E, F, Fut>(&self, items: Vec<I>, worker: F) -> Vec<Result<O, E>>
    where
        F: Fn(I) -> Fut,
        Fut: Future<Output = Result<O, E>>,
    {
        let total = items.len();
        let worker = &worker;

        let mut indexed: Vec<(usize, Result<O, E>)> = stream::iter(items.into_iter().enumerate())
            .map(|(index, item)| async move { (index, worker(item).await) })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        indexed.sort_by_key(|(index, _)| *index);
        debug_assert_eq!(indexed.len(), total);
        indexed.into_iter().map(|(_, outcome)| outcome).collect()
    }
}

impl Default for BoundedScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Default)]
    struct Gauge {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl Gauge {
        fn enter(&self) {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
        }

        fn leave(&self) {
            self.active.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_never_exceeds_concurrency() {
        let gauge = Arc::new(Gauge::default());
        let scheduler = BoundedScheduler::new(3);

        let outcomes = scheduler
            .run((0..12u64).collect(), |n| {
                let gauge = gauge.clone();
                async move {
                    gauge.enter();
                    // Uneven durations so completions interleave
                    tokio::time::sleep(Duration::from_millis(5 + (n % 4) * 3)).await;
                    gauge.leave();
                    Ok::<_, String>(n * 10)
                }
            })
            .await;

        assert_eq!(outcomes.len(), 12);
        assert_eq!(gauge.peak.load(Ordering::SeqCst), 3);
        for (n, outcome) in outcomes.into_iter().enumerate() {
            assert_eq!(outcome, Ok(n as u64 * 10));
        }
    }

    #[tokio::test]
    async fn test_outcomes_follow_input_order_not_completion_order() {
        let scheduler = BoundedScheduler::new(4);

        // Earlier items finish last
        let outcomes = scheduler
            .run(vec![40u64, 30, 20, 10], |delay| async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok::<_, String>(delay)
            })
            .await;

        assert_eq!(outcomes, vec![Ok(40), Ok(30), Ok(20), Ok(10)]);
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_siblings() {
        let ran = Arc::new(AtomicUsize::new(0));
        let outcomes = BoundedScheduler::new(2)
            .run(vec!["a", "bad", "c", "d"], |item| {
                let ran = ran.clone();
                async move {
                    ran.fetch_add(1, Ordering::SeqCst);
                    if item == "bad" {
                        Err(format!("{} failed", item))
                    } else {
                        Ok(item.to_uppercase())
                    }
                }
            })
            .await;

        assert_eq!(ran.load(Ordering::SeqCst), 4);
        assert_eq!(outcomes[0], Ok("A".to_string()));
        assert_eq!(outcomes[1], Err("bad failed".to_string()));
        assert_eq!(outcomes[3], Ok("D".to_string()));
    }

    #[tokio::test]
    async fn test_items_start_in_input_order() {
        let started = Arc::new(Mutex::new(Vec::new()));
        BoundedScheduler::new(1)
            .run(vec![3, 1, 2], |n| {
                let started = started.clone();
                async move {
                    started.lock().unwrap().push(n);
                    Ok::<_, ()>(())
                }
            })
            .await;

        assert_eq!(*started.lock().unwrap(), vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_makes_progress() {
        let scheduler = BoundedScheduler::new(0);
        assert_eq!(scheduler.concurrency(), 1);

        let outcomes = scheduler
            .run(vec![1, 2], |n| async move { Ok::<_, ()>(n + 1) })
            .await;
        assert_eq!(outcomes, vec![Ok(2), Ok(3)]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let outcomes: Vec<Result<(), ()>> = BoundedScheduler::default()
            .run(Vec::<u8>::new(), |_| async { Ok(()) })
            .await;
        assert!(outcomes.is_empty());
    }
}
