//! Core Streaming Types

use futures::Stream;
use std::pin::Pin;

use crate::cancel::CancelHandle;
use crate::error::WikiError;

use super::StreamEvent;

/// Fragment Stream
///
/// Yields zero or more [`StreamEvent::Fragment`]s, then ends after
/// [`StreamEvent::Completed`] or an error. On cancellation it ends without
/// either.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, WikiError>> + Send>>;

/// Fragment stream together with the handle that aborts it.
pub struct FragmentStreamHandle {
    /// The underlying stream
    pub stream: FragmentStream,
    /// Handle to cancel the stream
    pub cancel: CancelHandle,
}
