//! Streamed responses.
//!
//! An interaction can be answered as a stream of actions instead of one JSON
//! document. [`frame`] adds the markers the client expects around the
//! actions; [`BlockingStream`] lets a synchronous host consume actions
//! produced by an async task.
//!
//! ```text
//! fresh_boundary, rerun*, (actions... | no_change), task_done, last
//! ```

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::{Action, ActionsResponse, Op};
use crate::error::Result;

/// Channel capacity between producer and consumer.
const CHANNEL_CAPACITY: usize = 64;

/// Wrap a response in stream markers, announcing `reruns` reruns.
pub fn frame(response: &ActionsResponse, reruns: usize) -> Vec<Action> {
    let target = response.target;
    let mut framed = Vec::with_capacity(response.actions.len() + reruns + 3);
    framed.push(Action::marker(Op::FreshBoundary, target));
    framed.extend((0..reruns).map(|_| Action::marker(Op::Rerun, target)));
    if response.is_empty() {
        framed.push(Action::marker(Op::NoChange, target));
    } else {
        framed.extend(response.actions.iter().cloned());
    }
    framed.push(Action::marker(Op::TaskDone, target));
    framed.push(Action::marker(Op::Last, target));
    framed
}

// =============================================================================
// Async -> blocking bridge
// =============================================================================

/// Sending half handed to the producer.
pub type StreamSender<T> = mpsc::Sender<Result<T>>;

/// Blocking iterator over items produced by an async task.
///
/// Items arrive in send order. The first `Err` is yielded and ends the
/// iteration. Dropping the iterator closes the channel and aborts the task.
///
/// Must not be iterated from inside an async context of the same runtime.
#[derive(Debug)]
pub struct BlockingStream<T> {
    rx: mpsc::Receiver<Result<T>>,
    task: Option<JoinHandle<()>>,
    done: bool,
}

impl<T: Send + 'static> BlockingStream<T> {
    /// Spawn `producer` on `handle`, feeding the returned stream.
    pub fn spawn<F, Fut>(handle: &Handle, producer: F) -> Self
    where
        F: FnOnce(StreamSender<T>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let task = handle.spawn(producer(tx));
        Self {
            rx,
            task: Some(task),
            done: false,
        }
    }
}

impl<T> Iterator for BlockingStream<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.rx.blocking_recv() {
            Some(Ok(item)) => Some(Ok(item)),
            Some(Err(err)) => {
                self.finish();
                Some(Err(err))
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

impl<T> BlockingStream<T> {
    fn finish(&mut self) {
        self.done = true;
        self.rx.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<T> Drop for BlockingStream<T> {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Element, Props, Target};
    use crate::error::Error;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::runtime::Runtime;

    fn add(key: &str) -> Action {
        Action::add(vec![0], Element::new("text", key, Props::new()), Target::App)
    }

    #[test]
    fn test_frame_wraps_actions() {
        let response = ActionsResponse::new(vec![add("a"), add("b")], Target::Fragment);
        let kinds: Vec<&str> = frame(&response, 0).iter().map(Action::kind).collect();
        assert_eq!(kinds, ["fresh_boundary", "add", "add", "task_done", "last"]);
        assert!(frame(&response, 0).iter().all(|a| a.target == Target::Fragment));
    }

    #[test]
    fn test_frame_empty_and_reruns() {
        let response = ActionsResponse::empty(Target::App);
        let kinds: Vec<&str> = frame(&response, 2).iter().map(Action::kind).collect();
        assert_eq!(kinds, ["fresh_boundary", "rerun", "rerun", "no_change", "task_done", "last"]);
    }

    #[test]
    fn test_stream_preserves_order() {
        let rt = Runtime::new().unwrap();
        let stream = BlockingStream::spawn(rt.handle(), |tx| async move {
            for i in 0..10 {
                if tx.send(Ok(i)).await.is_err() {
                    return;
                }
            }
        });
        let items: Vec<i32> = stream.map(|r| r.unwrap()).collect();
        assert_eq!(items, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_stream_stops_after_first_error() {
        let rt = Runtime::new().unwrap();
        let mut stream = BlockingStream::spawn(rt.handle(), |tx| async move {
            let _ = tx.send(Ok(1)).await;
            let _ = tx.send(Err(Error::Stream("boom".into()))).await;
            let _ = tx.send(Ok(2)).await;
        });
        assert_eq!(stream.next().unwrap().unwrap(), 1);
        assert!(matches!(stream.next(), Some(Err(Error::Stream(_)))));
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_drop_closes_producer() {
        let rt = Runtime::new().unwrap();
        let sent = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&sent);
        let mut stream = BlockingStream::spawn(rt.handle(), move |tx| async move {
            loop {
                if tx.send(Ok(())).await.is_err() {
                    return;
                }
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        assert!(stream.next().is_some());
        drop(stream);

        std::thread::sleep(Duration::from_millis(50));
        let after_drop = sent.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(sent.load(Ordering::SeqCst), after_drop);
        assert!(after_drop <= CHANNEL_CAPACITY + 1);
    }
}
