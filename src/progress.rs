use tokio::sync::mpsc;

/// Advisory events for a presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Human readable status line
    Status(String),
    /// Detail pages finished so far, successful or not
    Fetched { completed: usize, total: usize },
}

/// Best-effort progress side channel
///
/// Sending never blocks and a closed or missing receiver is ignored. Every
/// status line is also logged.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    tx: Option<mpsc::UnboundedSender<ProgressEvent>>,
}

impl Progress {
    pub fn new(tx: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A channel and the progress handle feeding it
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Progress that goes nowhere
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn status(&self, message: impl Into<String>) {
        let message = message.into();
        ::log::info!("{}", message);
        self.send(ProgressEvent::Status(message));
    }

    pub fn fetched(&self, completed: usize, total: usize) {
        self.send(ProgressEvent::Fetched { completed, total });
    }

    fn send(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}
