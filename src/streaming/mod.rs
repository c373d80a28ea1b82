//! Streaming Module
//!
//! Consumes a chunked `text/event-stream` chat-completions response:
//! - UTF-8 safe line decoding across chunk boundaries
//! - `data:` frame parsing and the `[DONE]` sentinel
//! - the callback and stream encodings of one stream's events

pub mod consumer;
pub mod decoder;
pub mod events;
pub mod frame;
mod types;

pub use consumer::{FnCallbacks, StreamCallbacks, StreamConsumer, callbacks};
pub use decoder::LineCodec;
pub use events::{Outcome, StreamEvent};
pub use frame::{DATA_PREFIX, DONE_SENTINEL, Frame, parse_line};
pub use types::*;
