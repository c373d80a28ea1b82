//! Line framing
//!
//! Transport chunks are arbitrary byte slices: a chunk may end in the middle
//! of a multi-byte character or in the middle of a line. [`LineCodec`] is a
//! `tokio_util` decoder that waits for a `'\n'` before decoding anything, so
//! partial characters never reach UTF-8 decoding.

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::debug;

/// Newline-delimited text frames.
///
/// Unlike `LinesCodec`, invalid UTF-8 becomes U+FFFD instead of an error,
/// a trailing `'\r'` is kept, and an unterminated last line is dropped at
/// end of input.
#[derive(Debug, Default)]
pub struct LineCodec {
    // Bytes before this index are known to contain no '\n'.
    next_index: usize,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = std::io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, Self::Error> {
        match buf[self.next_index..].iter().position(|b| *b == b'\n') {
            Some(offset) => {
                let end = self.next_index + offset;
                self.next_index = 0;
                let line = buf.split_to(end + 1);
                Ok(Some(String::from_utf8_lossy(&line[..end]).into_owned()))
            }
            None => {
                self.next_index = buf.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<String>, Self::Error> {
        if let Some(line) = self.decode(buf)? {
            return Ok(Some(line));
        }
        if !buf.is_empty() {
            debug!(len = buf.len(), "dropping unterminated last line");
            buf.clear();
        }
        self.next_index = 0;
        Ok(None)
    }
}
