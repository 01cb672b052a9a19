use std::fmt;

/// User-facing message raised while a calculation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Progress(String),
    Error(String),
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Progress(msg) => write!(f, "{}", msg),
            Notification::Error(msg) => write!(f, "Error: {}", msg),
        }
    }
}

pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);

    fn progress(&mut self, msg: &str) {
        self.notify(Notification::Progress(msg.to_string()));
    }

    fn error(&mut self, msg: &str) {
        self.notify(Notification::Error(msg.to_string()));
    }
}

/// Stores notifications instead of printing them.
#[derive(Debug, Default)]
pub struct BufferedSink {
    buffer: Vec<Notification>,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.buffer
    }

    /// Return all collected notifications, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.buffer)
    }

    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.buffer.iter().filter_map(|n| match n {
            Notification::Error(msg) => Some(msg.as_str()),
            Notification::Progress(_) => None,
        })
    }
}

impl NotificationSink for BufferedSink {
    fn notify(&mut self, notification: Notification) {
        self.buffer.push(notification);
    }
}

/// Prints every notification to stderr as it arrives.
#[derive(Debug, Default)]
pub struct StderrSink;

impl NotificationSink for StderrSink {
    fn notify(&mut self, notification: Notification) {
        eprintln!("{}", notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_sink_collects_in_order() {
        let mut sink = BufferedSink::new();
        sink.progress("Calculate Results");
        sink.error("bad config");

        assert_eq!(
            sink.notifications(),
            &[
                Notification::Progress("Calculate Results".to_string()),
                Notification::Error("bad config".to_string()),
            ]
        );
        assert_eq!(sink.errors().collect::<Vec<_>>(), vec!["bad config"]);
    }

    #[test]
    fn test_drain_empties_buffer() {
        let mut sink = BufferedSink::new();
        sink.progress("one");
        assert_eq!(sink.drain().len(), 1);
        assert!(sink.notifications().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Notification::Error("x".to_string()).to_string(), "Error: x");
        assert_eq!(Notification::Progress("y".to_string()).to_string(), "y");
    }
}
