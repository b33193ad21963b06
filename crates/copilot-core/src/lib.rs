//! Core domain types for the copilot agent.
//!
//! Provides the chat-completion chunk model streamed back to callers, the
//! invocation identifier that correlates the chunks of one reply, and the
//! clock abstraction that keeps wire timestamps testable. The HTTP layer
//! and the test harness both build on these types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod reply;
pub mod time;

pub use reply::{ChatChoice, ChatCompletionChunk, ChatDelta, FinishReason, InvocationId};
pub use time::{Clock, RealClock, TestClock};
