//! Progress reporting for the deployment pipeline.
//!
//! The pipeline never prints directly. It hands status lines to a
//! [`Reporter`], which the CLI renders on the terminal and tests record.

use std::sync::Mutex;

/// Pipeline stage a progress line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Resolving the project number
    Fetch,
    /// Granting IAM roles
    Permissions,
    /// Running the deploy command
    Deploy,
}

impl Stage {
    /// Console marker shown in front of the stage's progress line.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Fetch => "🔍",
            Self::Permissions => "🛠️ ",
            Self::Deploy => "🚀",
        }
    }
}

/// Sink for human-readable pipeline output.
pub trait Reporter {
    /// A stage is starting.
    fn stage(&self, stage: Stage, msg: &str);

    /// A step finished successfully.
    fn success(&self, msg: &str);

    /// The whole deployment finished successfully.
    fn finished(&self, msg: &str);

    /// Something failed.
    fn error(&self, msg: &str);

    /// Extra diagnostic output for the preceding error.
    fn detail(&self, msg: &str);
}

/// Reporter that discards everything.
pub struct NoReporter;

impl Reporter for NoReporter {
    fn stage(&self, _stage: Stage, _msg: &str) {}
    fn success(&self, _msg: &str) {}
    fn finished(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
    fn detail(&self, _msg: &str) {}
}

/// A single recorded report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// See [`Reporter::stage`]
    Stage(Stage, String),
    /// See [`Reporter::success`]
    Success(String),
    /// See [`Reporter::finished`]
    Finished(String),
    /// See [`Reporter::error`]
    Error(String),
    /// See [`Reporter::detail`]
    Detail(String),
}

/// Reporter that keeps every line in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<Event>>,
}

impl RecordingReporter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events recorded so far.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// The stages reported so far, in order.
    pub fn stages(&self) -> Vec<Stage> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Stage(stage, _) => Some(stage),
                _ => None,
            })
            .collect()
    }

    /// Error messages reported so far.
    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Error(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Reporter for RecordingReporter {
    fn stage(&self, stage: Stage, msg: &str) {
        self.push(Event::Stage(stage, msg.to_string()));
    }

    fn success(&self, msg: &str) {
        self.push(Event::Success(msg.to_string()));
    }

    fn finished(&self, msg: &str) {
        self.push(Event::Finished(msg.to_string()));
    }

    fn error(&self, msg: &str) {
        self.push(Event::Error(msg.to_string()));
    }

    fn detail(&self, msg: &str) {
        self.push(Event::Detail(msg.to_string()));
    }
}
