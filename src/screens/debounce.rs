use std::time::Duration;

use tokio::sync::mpsc;

/// Sending half of a [`Debouncer`], held by the input field.
#[derive(Debug, Clone)]
pub struct DebounceInput<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> DebounceInput<T> {
    /// Records a keystroke. Returns `false` once the debouncer is gone.
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

/// Collapses bursts of input into the last value after a quiet period.
///
/// Used for search-triggered refetches: only the text the user stopped
/// typing at reaches the backend.
#[derive(Debug)]
pub struct Debouncer<T> {
    rx: mpsc::UnboundedReceiver<T>,
    quiet: Duration,
}

impl<T> Debouncer<T> {
    /// Creates a debouncer and the input handle feeding it.
    pub fn new(quiet: Duration) -> (DebounceInput<T>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (DebounceInput { tx }, Self { rx, quiet })
    }

    /// Waits for input, then for `quiet` without new input.
    ///
    /// # Returns
    ///
    /// The latest value, or `None` once every input handle is dropped and
    /// nothing is pending.
    pub async fn settled(&mut self) -> Option<T> {
        let mut latest = self.rx.recv().await?;

        loop {
            match tokio::time::timeout(self.quiet, self.rx.recv()).await {
                Ok(Some(value)) => latest = value,
                Ok(None) | Err(_) => return Some(latest),
            }
        }
    }
}
