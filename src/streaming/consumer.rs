//! Stream Consumer
//!
//! Owns one outbound streaming request from send to terminal outcome:
//!
//! ```text
//! Idle -> Requesting -> Streaming -> Completed | Aborted | Failed
//!              \-> Failed (non-2xx, no body, send error)
//! ```
//!
//! Chunks are read strictly one after another; every line a chunk completes
//! is handled before the next read. Every suspension point (send, error
//! body, next line) is raced against the cancel handle.

use std::time::Duration;

use bytes::Bytes;
use futures::Stream;
use futures_util::StreamExt;
use reqwest::StatusCode;
use tokio_util::codec::FramedRead;
use tokio_util::io::StreamReader;
use tracing::{debug, trace, warn};

use crate::cancel::CancelHandle;
use crate::error::{MAX_ERROR_BODY, WikiError};
use crate::request::StreamRequest;

use super::decoder::LineCodec;
use super::events::{Outcome, StreamEvent};
use super::frame::{Frame, parse_line};
use super::types::FragmentStream;

/// Upper bound on reading a non-success response body.
const ERROR_BODY_TIMEOUT: Duration = Duration::from_secs(2);

/// Receives the progress and terminal callbacks of one stream.
///
/// For one invocation the calls are totally ordered: any number of
/// `on_fragment`, then at most one of `on_complete` / `on_error`.
pub trait StreamCallbacks {
    fn on_fragment(&mut self, fragment: &str);
    fn on_complete(&mut self);
    fn on_error(&mut self, error: &WikiError);
}

/// [`StreamCallbacks`] built from three closures.
pub struct FnCallbacks<F, C, E> {
    on_fragment: F,
    on_complete: C,
    on_error: E,
}

/// Bundle fragment, completion and error closures into [`StreamCallbacks`].
pub fn callbacks<F, C, E>(on_fragment: F, on_complete: C, on_error: E) -> FnCallbacks<F, C, E>
where
    F: FnMut(&str),
    C: FnMut(),
    E: FnMut(&WikiError),
{
    FnCallbacks {
        on_fragment,
        on_complete,
        on_error,
    }
}

impl<F, C, E> StreamCallbacks for FnCallbacks<F, C, E>
where
    F: FnMut(&str),
    C: FnMut(),
    E: FnMut(&WikiError),
{
    fn on_fragment(&mut self, fragment: &str) {
        (self.on_fragment)(fragment)
    }

    fn on_complete(&mut self) {
        (self.on_complete)()
    }

    fn on_error(&mut self, error: &WikiError) {
        (self.on_error)(error)
    }
}

/// Issues streaming requests and turns their bodies into fragments.
///
/// Holds no per-stream state; each call gets its own decoder, so one
/// consumer can drive any number of concurrent streams.
#[derive(Debug, Clone, Default)]
pub struct StreamConsumer {
    http: reqwest::Client,
}

impl StreamConsumer {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Consume one request, reporting through `callbacks`.
    ///
    /// Without a cancel handle the stream can only complete or fail. The
    /// returned [`Outcome`] matches what the callbacks saw.
    pub async fn consume<C>(
        &self,
        request: StreamRequest,
        callbacks: &mut C,
        cancel: Option<&CancelHandle>,
    ) -> Outcome
    where
        C: StreamCallbacks + ?Sized,
    {
        let cancel = cancel.cloned().unwrap_or_default();
        let stream = self.stream(request, cancel.clone());
        Self::drive(stream, callbacks, &cancel).await
    }

    /// Send the request and frame its body.
    pub fn stream(&self, request: StreamRequest, cancel: CancelHandle) -> FragmentStream {
        debug!(
            endpoint = %request.endpoint(),
            model = %request.body().model,
            "starting stream"
        );
        let builder = request.into_request_builder(&self.http);

        let s = async_stream::stream! {
            let builder = match builder {
                Ok(builder) => builder,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let sent = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("cancelled before response");
                    return;
                }
                sent = builder.send() => sent,
            };

            let response = match sent {
                Ok(response) => response,
                Err(e) => {
                    yield Err(WikiError::from_send_error(e));
                    return;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let body = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return,
                    body = read_error_body(response) => body,
                };
                yield Err(WikiError::api_error(status.as_u16(), body));
                return;
            }
            if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
                yield Err(WikiError::MissingBody(status.as_u16()));
                return;
            }

            let bytes = response
                .bytes_stream()
                .map(|chunk| chunk.map_err(WikiError::from_read_error));
            let mut framed = Self::frame_bytes(bytes, cancel);
            while let Some(item) = framed.next().await {
                yield item;
            }
        };

        Box::pin(s)
    }

    /// Frame an already-open body.
    ///
    /// End of input yields [`StreamEvent::Completed`] even without the
    /// sentinel; an unterminated last line is discarded. A read error is
    /// yielded unless the handle was cancelled first. Once cancellation is
    /// seen, lines still buffered from earlier chunks are dropped.
    pub fn frame_bytes<S, B>(byte_stream: S, cancel: CancelHandle) -> FragmentStream
    where
        S: Stream<Item = Result<B, WikiError>> + Send + 'static,
        B: Into<Bytes> + Send + 'static,
    {
        let reader = StreamReader::new(byte_stream.map(|chunk| {
            chunk
                .map(Into::<Bytes>::into)
                .map_err(std::io::Error::other)
        }));

        let s = async_stream::stream! {
            let mut lines = std::pin::pin!(FramedRead::new(reader, LineCodec::new()));

            loop {
                let next = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        debug!("stream cancelled");
                        return;
                    }
                    next = lines.next() => next,
                };

                let line = match next {
                    Some(Ok(line)) => line,
                    Some(Err(e)) => {
                        if !cancel.is_cancelled() {
                            yield Err(WikiError::from_io_error(e));
                        }
                        return;
                    }
                    None => {
                        yield Ok(StreamEvent::Completed);
                        return;
                    }
                };

                match parse_line(&line) {
                    Frame::Ignored | Frame::Delta(None) => {}
                    Frame::Done => {
                        debug!("received done sentinel");
                        yield Ok(StreamEvent::Completed);
                        return;
                    }
                    Frame::Malformed(reason) => {
                        debug!(%reason, "skipping malformed frame");
                    }
                    Frame::Delta(Some(text)) => {
                        trace!(len = text.len(), "fragment");
                        yield Ok(StreamEvent::Fragment(text));
                    }
                }
            }
        };

        Box::pin(s)
    }

    /// Feed a [`FragmentStream`] into `callbacks` until a terminal outcome.
    ///
    /// Fragments observed after `cancel` fired are not delivered. The stream
    /// is dropped before returning, which releases its connection.
    pub async fn drive<C>(
        mut stream: FragmentStream,
        callbacks: &mut C,
        cancel: &CancelHandle,
    ) -> Outcome
    where
        C: StreamCallbacks + ?Sized,
    {
        while let Some(item) = stream.next().await {
            match item {
                Ok(StreamEvent::Fragment(text)) => {
                    if cancel.is_cancelled() {
                        break;
                    }
                    callbacks.on_fragment(&text);
                }
                Ok(StreamEvent::Completed) => {
                    debug!("stream completed");
                    callbacks.on_complete();
                    return Outcome::Completed;
                }
                Err(err) => {
                    if cancel.is_cancelled() {
                        break;
                    }
                    warn!(error = %err, "stream failed");
                    callbacks.on_error(&err);
                    return Outcome::Failed(err);
                }
            }
        }

        debug!("stream aborted");
        Outcome::Aborted
    }
}

/// Read at most [`MAX_ERROR_BODY`] bytes of an error response, giving up
/// after [`ERROR_BODY_TIMEOUT`]. Whatever arrived by then is kept.
async fn read_error_body(response: reqwest::Response) -> String {
    let deadline = tokio::time::Instant::now() + ERROR_BODY_TIMEOUT;
    let mut chunks = std::pin::pin!(response.bytes_stream());
    let mut body = Vec::new();

    while body.len() < MAX_ERROR_BODY {
        match tokio::time::timeout_at(deadline, chunks.next()).await {
            Ok(Some(Ok(chunk))) => body.extend_from_slice(&chunk),
            Ok(_) => break,
            Err(_) => {
                debug!(len = body.len(), "error body still open, giving up");
                break;
            }
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
