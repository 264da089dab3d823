use std::sync::Arc;

/// Receiver of human-readable progress lines
pub type LogSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Progress reporting for one crawl
///
/// Every line becomes a `tracing` event and, when a sink is attached, is also
/// handed to the sink (a UI log pane, a channel, a test recorder).
#[derive(Clone, Default)]
pub struct ProgressLog {
    sink: Option<LogSink>,
}

impl ProgressLog {
    pub fn new(sink: Option<LogSink>) -> Self {
        Self { sink }
    }

    pub fn debug(&self, line: impl AsRef<str>) {
        let line = line.as_ref();
        tracing::debug!("{}", line);
        self.forward(line);
    }

    pub fn info(&self, line: impl AsRef<str>) {
        let line = line.as_ref();
        tracing::info!("{}", line);
        self.forward(line);
    }

    pub fn warn(&self, line: impl AsRef<str>) {
        let line = line.as_ref();
        tracing::warn!("{}", line);
        self.forward(line);
    }

    pub fn error(&self, line: impl AsRef<str>) {
        let line = line.as_ref();
        tracing::error!("{}", line);
        self.forward(line);
    }

    fn forward(&self, line: &str) {
        if let Some(sink) = &self.sink {
            sink(line);
        }
    }
}

impl std::fmt::Debug for ProgressLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressLog")
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
