//! Diagnostic messages produced by the transformer and validator.
//!
//! A [`Message`] is a `(severity, code, text)` triple. Each run collects its
//! messages in a [`MessageLog`], which is consumed at the end of the run to
//! produce the de-duplicated, first-seen-order list handed to the caller.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How serious a diagnostic is.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// Something could not be inferred or is missing but optional.
    Warning,
    /// The dataset does not conform to the schema.
    Error,
    /// A check ran cleanly.
    Success,
}

/// Wire shape of a [`Message`]: a three-element JSON array.
type MessageTuple = (Severity, String, String);

/// A single diagnostic.
///
/// Serializes as `["error", "missing-segment-name", "..."]` so consumers
/// see the same tuple shape regardless of which component produced it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "MessageTuple", into = "MessageTuple")]
pub struct Message {
    /// Severity of the diagnostic.
    pub severity: Severity,
    /// Short machine-readable slug identifying the check.
    pub code: String,
    /// Human-readable explanation.
    pub text: String,
}

impl Message {
    /// Creates a message with the given severity.
    #[must_use]
    pub fn new(severity: Severity, code: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            text: text.into(),
        }
    }

    /// Creates a [`Severity::Warning`] message.
    #[must_use]
    pub fn warning(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, text)
    }

    /// Creates a [`Severity::Error`] message.
    #[must_use]
    pub fn error(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, text)
    }

    /// Creates a [`Severity::Success`] message.
    #[must_use]
    pub fn success(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(Severity::Success, code, text)
    }

    /// Whether this message has [`Severity::Error`].
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<MessageTuple> for Message {
    fn from((severity, code, text): MessageTuple) -> Self {
        Self {
            severity,
            code,
            text,
        }
    }
}

impl From<Message> for MessageTuple {
    fn from(message: Message) -> Self {
        (message.severity, message.code, message.text)
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:<8} {}: {}", self.severity, self.code, self.text)
    }
}

/// Accumulates messages over one transform or validation run.
#[derive(Debug, Default, Clone)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Appends a message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Appends a warning.
    pub fn warning(&mut self, code: impl Into<String>, text: impl Into<String>) {
        self.push(Message::warning(code, text));
    }

    /// Appends an error.
    pub fn error(&mut self, code: impl Into<String>, text: impl Into<String>) {
        self.push(Message::error(code, text));
    }

    /// Appends a success message.
    pub fn success(&mut self, code: impl Into<String>, text: impl Into<String>) {
        self.push(Message::success(code, text));
    }

    /// Number of messages recorded so far, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether any recorded message is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(Message::is_error)
    }

    /// Whether any recorded message is a warning or an error.
    #[must_use]
    pub fn has_problems(&self) -> bool {
        self.messages
            .iter()
            .any(|m| matches!(m.severity, Severity::Warning | Severity::Error))
    }

    /// Consumes the log, returning each distinct message once in the order
    /// it was first recorded.
    #[must_use]
    pub fn into_deduped(self) -> Vec<Message> {
        let mut seen = BTreeSet::new();
        self.messages
            .into_iter()
            .filter(|message| seen.insert(message.clone()))
            .collect()
    }
}
