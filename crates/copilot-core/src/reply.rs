//! Chat-completion chunks streamed back to the webhook caller.
//!
//! The reply wire format mirrors the chat-completion streaming protocol:
//! every chunk serializes compactly with snake_case fields, carries exactly
//! one choice, and keeps `finish_reason` at JSON `null` until the terminal
//! chunk. Consumers parse each serialized chunk independently, so nothing
//! here may ever produce multi-line JSON.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Object label reported on every streamed chunk.
pub const CHUNK_OBJECT: &str = "chat.completion.chunk";

/// Model label reported on every streamed chunk.
pub const MODEL_LABEL: &str = "gpt-3.5-turbo-0613";

/// Strongly-typed invocation identifier.
///
/// One invocation id is minted per webhook request. Every chunk id of the
/// reply derives from it, which gives clients a stable correlation prefix
/// across the chunks of one logical response.
///
/// # Example
///
/// ```
/// use copilot_core::reply::InvocationId;
/// let invocation = InvocationId::new();
/// assert!(invocation.chunk_id(1).ends_with('1'));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(pub Uuid);

impl InvocationId {
    /// Creates a new random invocation ID.
    ///
    /// Uses UUID v4 for globally unique identifiers without coordination.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the chunk id for the given position within the reply.
    ///
    /// Chunk ids are the hyphen-free lowercase invocation id followed by a
    /// decimal sequence suffix, so ids of one reply share a 32-character
    /// prefix and differ only in the trailing sequence number.
    pub fn chunk_id(&self, sequence: usize) -> String {
        format!("{}{sequence}", self.0.simple())
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for InvocationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Terminal marker carried by the last chunk of a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The reply completed normally.
    Stop,
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stop => write!(f, "stop"),
        }
    }
}

/// One streamed chunk of a chat-completion reply.
///
/// Field order matters on the wire and matches the declaration order here:
/// `id`, `object`, `created`, `model`, `choices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    /// Correlation id: hyphen-free invocation id plus sequence suffix.
    pub id: String,
    /// Always [`CHUNK_OBJECT`].
    pub object: String,
    /// Unix epoch seconds captured when the reply was built.
    pub created: i64,
    /// Always [`MODEL_LABEL`].
    pub model: String,
    /// Choices carried by this chunk; exactly one in this protocol.
    pub choices: Vec<ChatChoice>,
}

/// A single choice within a chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    /// Position of this choice within the reply; always 0 here.
    pub index: u32,
    /// Incremental content carried by this chunk.
    pub delta: ChatDelta,
    /// Set on the terminal chunk only. In-progress chunks serialize this
    /// as an explicit JSON `null`, never omit it.
    pub finish_reason: Option<FinishReason>,
}

/// Incremental content fragment of one chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatDelta {
    /// Text fragment; empty on the terminal chunk.
    pub content: String,
}

impl ChatCompletionChunk {
    /// Builds an in-progress chunk carrying `content` at `sequence`.
    pub fn content(
        invocation: InvocationId,
        sequence: usize,
        created: i64,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: invocation.chunk_id(sequence),
            object: CHUNK_OBJECT.to_string(),
            created,
            model: MODEL_LABEL.to_string(),
            choices: vec![ChatChoice {
                index: 0,
                delta: ChatDelta { content: content.into() },
                finish_reason: None,
            }],
        }
    }

    /// Builds the terminal chunk: empty content, `finish_reason` set.
    ///
    /// Exactly one terminal chunk closes every reply; no chunk may follow
    /// it on the wire.
    pub fn terminal(invocation: InvocationId, sequence: usize, created: i64) -> Self {
        Self {
            id: invocation.chunk_id(sequence),
            object: CHUNK_OBJECT.to_string(),
            created,
            model: MODEL_LABEL.to_string(),
            choices: vec![ChatChoice {
                index: 0,
                delta: ChatDelta { content: String::new() },
                finish_reason: Some(FinishReason::Stop),
            }],
        }
    }

    /// True when this chunk carries the terminal marker.
    pub fn is_terminal(&self) -> bool {
        self.choices.iter().any(|choice| choice.finish_reason.is_some())
    }
}
