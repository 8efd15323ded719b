// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-key FIFO serialization queue.
//!
//! Two quick interactions against the same document each perform a fetch,
//! local computation, and an edit as separate suspension points; interleaved,
//! they lose updates. Capabilities that opt into serialization funnel every
//! invocation for a document through one FIFO per key, collapsing the race
//! into a strict sequence.
//!
//! Guarantees:
//! - at most one call executing per key at any instant, in arrival order;
//! - a failing call is reported to the error sink and draining continues;
//! - [`PanelioError::LayoutOverflow`] is not swallowed: the remainder of the
//!   key's queue still drains, then the error propagates to the drainer;
//! - a key's entry is removed once drained — no lingering empty queues.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::Mutex;
use tracing::error;

use panelio_core::error::PanelioError;

/// A queued unit of work.
pub type QueueCall = BoxFuture<'static, Result<(), PanelioError>>;

/// Sink receiving swallowed call errors, keyed by queue key.
pub type ErrorSink = Arc<dyn Fn(&str, &PanelioError) + Send + Sync>;

struct QueueState {
    running: bool,
    pending: VecDeque<QueueCall>,
}

/// Per-key FIFO async queue with automatic cleanup of drained keys.
pub struct ResourceQueue {
    queues: Mutex<HashMap<String, QueueState>>,
    error_sink: ErrorSink,
}

impl Default for ResourceQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceQueue {
    /// Create a queue reporting swallowed errors through `tracing`.
    pub fn new() -> Self {
        Self::with_error_sink(Arc::new(|key, err| {
            error!(key, error = %err, "queued call failed");
        }))
    }

    /// Create a queue with a custom error sink (tests observe swallowed
    /// errors this way).
    pub fn with_error_sink(error_sink: ErrorSink) -> Self {
        Self {
            queues: Mutex::new(HashMap::new()),
            error_sink,
        }
    }

    /// Enqueue a call under `key`.
    ///
    /// The caller that finds the key idle becomes the drainer: it runs every
    /// pending call for the key to completion before returning, re-entrantly
    /// picking up work enqueued meanwhile. Callers that find the key busy
    /// return immediately; their call runs within the active drain.
    pub async fn enqueue(&self, key: &str, call: QueueCall) -> Result<(), PanelioError> {
        {
            let mut queues = self.queues.lock().await;
            let state = queues.entry(key.to_string()).or_insert_with(|| QueueState {
                running: false,
                pending: VecDeque::new(),
            });
            state.pending.push_back(call);
            if state.running {
                return Ok(());
            }
            state.running = true;
        }
        self.drain(key).await
    }

    /// Number of keys currently tracked (running or pending).
    pub async fn len(&self) -> usize {
        self.queues.lock().await.len()
    }

    /// True when no key has running or pending work.
    pub async fn is_empty(&self) -> bool {
        self.queues.lock().await.is_empty()
    }

    async fn drain(&self, key: &str) -> Result<(), PanelioError> {
        let mut overflow: Option<PanelioError> = None;
        loop {
            let call = {
                let mut queues = self.queues.lock().await;
                match queues.get_mut(key) {
                    Some(state) => match state.pending.pop_front() {
                        Some(call) => Some(call),
                        None => {
                            queues.remove(key);
                            None
                        }
                    },
                    None => None,
                }
            };
            let Some(call) = call else {
                return match overflow {
                    Some(err) => Err(err),
                    None => Ok(()),
                };
            };

            match call.await {
                Ok(()) => {}
                Err(err @ PanelioError::LayoutOverflow { .. }) => {
                    // Programming defect: keep draining so later calls are
                    // not dropped, then surface it to the drainer.
                    if overflow.is_none() {
                        overflow = Some(err);
                    }
                }
                Err(err) => (self.error_sink)(key, &err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Mutex as AsyncMutex;

    fn ok_call(log: Arc<AsyncMutex<Vec<usize>>>, n: usize, delay_ms: u64) -> QueueCall {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            log.lock().await.push(n);
            Ok(())
        })
    }

    #[tokio::test]
    async fn calls_for_one_key_run_in_fifo_order() {
        let queue = Arc::new(ResourceQueue::new());
        let log = Arc::new(AsyncMutex::new(Vec::new()));

        // The first enqueue drains; later enqueues land while it runs.
        let drainer = {
            let queue = Arc::clone(&queue);
            let log = Arc::clone(&log);
            tokio::spawn(async move { queue.enqueue("k", ok_call(log, 0, 50)).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        for n in 1..5 {
            queue.enqueue("k", ok_call(Arc::clone(&log), n, 5)).await.unwrap();
        }
        drainer.await.unwrap().unwrap();

        assert_eq!(*log.lock().await, vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty().await, "drained key must be removed");
    }

    #[tokio::test]
    async fn calls_never_overlap_in_time() {
        let queue = Arc::new(ResourceQueue::new());
        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));

        let make_call = |active: Arc<AtomicUsize>, max_active: Arc<AtomicUsize>| -> QueueCall {
            Box::pin(async move {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                max_active.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                active.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            })
        };

        let mut drains = Vec::new();
        for _ in 0..6 {
            let queue = Arc::clone(&queue);
            let call = make_call(Arc::clone(&active), Arc::clone(&max_active));
            drains.push(tokio::spawn(async move { queue.enqueue("k", call).await }));
        }
        for d in drains {
            d.await.unwrap().unwrap();
        }

        assert_eq!(max_active.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn different_keys_interleave_freely() {
        let queue = Arc::new(ResourceQueue::new());
        let log = Arc::new(AsyncMutex::new(Vec::new()));

        let a = {
            let queue = Arc::clone(&queue);
            let log = Arc::clone(&log);
            tokio::spawn(async move { queue.enqueue("a", ok_call(log, 1, 60)).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        // Key "b" finishes while "a" is still sleeping.
        queue.enqueue("b", ok_call(Arc::clone(&log), 2, 1)).await.unwrap();
        a.await.unwrap().unwrap();

        assert_eq!(*log.lock().await, vec![2, 1]);
    }

    #[tokio::test]
    async fn swallowed_errors_reach_the_sink_and_do_not_halt_draining() {
        let seen = Arc::new(AsyncMutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let queue = Arc::new(ResourceQueue::with_error_sink(Arc::new(move |key, err| {
            let key = key.to_string();
            let msg = err.to_string();
            sink_seen.try_lock().expect("sink lock").push((key, msg));
        })));
        let log = Arc::new(AsyncMutex::new(Vec::new()));

        let failing: QueueCall = Box::pin(async { Err(PanelioError::Internal("boom".into())) });
        let drainer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.enqueue("k", failing).await })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        queue.enqueue("k", ok_call(Arc::clone(&log), 7, 1)).await.unwrap();
        drainer.await.unwrap().unwrap();

        assert_eq!(*log.lock().await, vec![7], "later calls must still run");
        let seen = seen.lock().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "k");
        assert!(seen[0].1.contains("boom"));
    }

    #[tokio::test]
    async fn layout_overflow_propagates_to_the_drainer() {
        let queue = ResourceQueue::new();
        let overflowing: QueueCall = Box::pin(async {
            Err(PanelioError::LayoutOverflow {
                slots: 26,
                capacity: 25,
            })
        });
        let result = queue.enqueue("k", overflowing).await;
        assert!(matches!(result, Err(PanelioError::LayoutOverflow { .. })));
        assert!(queue.is_empty().await, "key must still be cleaned up");
    }

    #[tokio::test]
    async fn layout_overflow_does_not_drop_queued_calls() {
        let queue = Arc::new(ResourceQueue::new());
        let log = Arc::new(AsyncMutex::new(Vec::new()));

        let slow_overflow: QueueCall = Box::pin(async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            Err(PanelioError::LayoutOverflow {
                slots: 26,
                capacity: 25,
            })
        });
        let drainer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.enqueue("k", slow_overflow).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.enqueue("k", ok_call(Arc::clone(&log), 3, 1)).await.unwrap();

        let result = drainer.await.unwrap();
        assert!(matches!(result, Err(PanelioError::LayoutOverflow { .. })));
        assert_eq!(*log.lock().await, vec![3], "remainder of the queue still drains");
    }

    #[tokio::test]
    async fn no_lingering_entries_after_simple_enqueue() {
        let queue = ResourceQueue::new();
        queue
            .enqueue("solo", Box::pin(async { Ok(()) }))
            .await
            .unwrap();
        assert_eq!(queue.len().await, 0);
    }
}
