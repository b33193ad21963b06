//! Server-sent reply streaming.
//!
//! The reply wire protocol mirrors chat-completion streaming:
//! - each chunk is sent as `data: {json}\n\n`
//! - the terminal chunk carries `finish_reason: "stop"` and empty content
//! - the final record is the literal `data: [DONE]\n\n`
//!
//! Every yielded event leaves as its own flushed HTTP chunk, so clients
//! observe records incrementally instead of one buffered body.

use axum::response::sse::{Event, Sse};
use copilot_core::{ChatCompletionChunk, InvocationId};
use futures::stream::Stream;

/// Sentinel closing every reply stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Builds the SSE reply for one resolved invocation.
///
/// Emits one record per content fragment in order, then the terminal
/// chunk, then the sentinel. Sequence numbers restart at 0 for every
/// invocation, so the terminal chunk of an n-fragment reply carries
/// suffix n. Chunks are built inside the generator: a fragment is
/// serialized only after its predecessors are already on the wire, and a
/// serialization failure mid-stream surfaces as a stream error that tears
/// down the connection rather than a late status change.
pub fn reply_stream(
    invocation: InvocationId,
    created: i64,
    fragments: Vec<String>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = async_stream::stream! {
        let mut sequence = 0;

        for fragment in fragments {
            let chunk = ChatCompletionChunk::content(invocation, sequence, created, fragment);
            yield Event::default().json_data(&chunk);
            sequence += 1;
        }

        let terminal = ChatCompletionChunk::terminal(invocation, sequence, created);
        yield Event::default().json_data(&terminal);

        yield Ok(Event::default().data(DONE_SENTINEL));
    };

    // No keep-alive: replies are short and fixed-shape, and comment pings
    // would interleave with the record order clients parse.
    Sse::new(stream)
}
