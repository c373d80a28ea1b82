//! # wikistream
//!
//! Streams short encyclopedia entries from an OpenAI-compatible
//! chat-completions endpoint, delivering generated text fragment by fragment
//! as the `text/event-stream` response arrives.
//!
//! Each call ends with exactly one outcome: completed, aborted by the
//! caller's [`CancelHandle`], or failed. Aborts are silent; only transport
//! and protocol failures reach the error callback. Individual malformed
//! `data:` frames are skipped.
//!
//! ```rust,ignore
//! use wikistream::prelude::*;
//!
//! let client = WikiClient::from_env()?;
//! let cancel = CancelHandle::new();
//! let mut text = String::new();
//! let mut cbs = callbacks(
//!     |fragment: &str| text.push_str(fragment),
//!     || println!("done"),
//!     |err: &WikiError| eprintln!("failed: {err}"),
//! );
//! client
//!     .fetch_stream_wiki("树袋熊", PromptMode::Topic, &mut cbs, Some(&cancel))
//!     .await;
//! ```
#![deny(unsafe_code)]

pub mod cancel;
pub mod client;
pub mod config;
pub mod error;
pub mod prompt;
pub mod request;
pub mod streaming;
pub mod telemetry;

pub use cancel::CancelHandle;
pub use client::WikiClient;
pub use config::WikiConfig;
pub use error::{Result, WikiError};

/// Commonly used types.
pub mod prelude {
    pub use crate::cancel::CancelHandle;
    pub use crate::client::WikiClient;
    pub use crate::config::WikiConfig;
    pub use crate::error::{ErrorCategory, WikiError};
    pub use crate::prompt::PromptMode;
    pub use crate::request::{ChatMessage, ChatRequest, Role, StreamRequest};
    pub use crate::streaming::{
        FragmentStream, FragmentStreamHandle, Outcome, StreamCallbacks, StreamConsumer,
        StreamEvent, callbacks,
    };
}
