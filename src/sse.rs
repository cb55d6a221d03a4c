//! Server-Sent Events (SSE) processing for streaming completions.
//!
//! This module converts the raw byte stream of a streaming chat-completions
//! response into decoded [`ChatCompletionChunk`] frames. Raw bytes are
//! buffered across network reads until a complete `\n\n`-delimited event is
//! available, so neither JSON objects nor multibyte UTF-8 sequences split
//! across reads are ever decoded in half. A complete frame that still fails
//! to parse gets one best-effort repair (truncating trailing bytes after
//! the last `}`) before being dropped. Dropped frames never abort the
//! stream.

use bytes::{Bytes, BytesMut};
use futures::stream::{self, Stream, StreamExt};

use crate::error::{Error, Result};
use crate::observability::{STREAM_DROPPED_FRAMES, STREAM_FRAMES, STREAM_REPAIRED_FRAMES};
use crate::types::ChatCompletionChunk;

/// The line prefix marking a payload-bearing SSE frame.
const DATA_PREFIX: &str = "data: ";

/// The sentinel payload marking the end of a stream.
const DONE_SENTINEL: &str = "[DONE]";

/// The outcome of inspecting one SSE frame.
enum Frame {
    /// A decoded content-bearing (or control-field-bearing) chunk.
    Chunk(ChatCompletionChunk),

    /// The terminal `[DONE]` sentinel.
    Done,

    /// A frame with nothing to deliver: comments, keep-alives, blank
    /// payloads, or payloads that failed to parse even after repair.
    Skip,
}

/// Process a stream of bytes into a stream of completion chunks.
///
/// Transport errors surface as `Err` items; malformed frames are silently
/// discarded and the stream continues. The stream ends at the `[DONE]`
/// sentinel or when the underlying byte stream is exhausted.
pub fn process_sse<S>(byte_stream: S) -> impl Stream<Item = Result<ChatCompletionChunk>>
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin + 'static,
{
    // Convert reqwest errors to our error type
    let stream = byte_stream.map(|result| {
        result
            .map_err(|e| Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e))))
    });

    let buffer = BytesMut::new();

    stream::unfold(
        (stream, buffer),
        move |(mut stream, mut buffer)| async move {
            loop {
                // Drain complete frames already in the buffer.
                while let Some(frame_bytes) = take_frame(&mut buffer) {
                    match decode_frame(&frame_bytes) {
                        Frame::Chunk(chunk) => return Some((Ok(chunk), (stream, buffer))),
                        Frame::Done => return None,
                        Frame::Skip => continue,
                    }
                }

                // Read more data
                match stream.next().await {
                    Some(Ok(bytes)) => buffer.extend_from_slice(&bytes),
                    Some(Err(e)) => {
                        return Some((Err(e), (stream, buffer)));
                    }
                    None => {
                        // End of stream: a final frame may lack its `\n\n`
                        // terminator; process the remainder as one frame.
                        if !buffer.is_empty() {
                            let frame = decode_frame(&buffer);
                            buffer.clear();
                            if let Frame::Chunk(chunk) = frame {
                                return Some((Ok(chunk), (stream, buffer)));
                            }
                        }
                        return None;
                    }
                }
            }
        },
    )
}

/// Split one complete SSE frame off the front of the buffer, if present.
///
/// Frames are delimited by double newlines; anything before the delimiter is
/// one frame, and the rest stays buffered.
fn take_frame(buffer: &mut BytesMut) -> Option<BytesMut> {
    let idx = buffer.windows(2).position(|w| w == b"\n\n")?;
    let mut frame = buffer.split_to(idx + 2);
    frame.truncate(idx);
    Some(frame)
}

/// Decode one complete frame's bytes.
///
/// A complete frame that is not valid UTF-8 is malformed; it is dropped
/// like any other unparseable frame rather than aborting the stream.
fn decode_frame(frame: &[u8]) -> Frame {
    match std::str::from_utf8(frame) {
        Ok(text) => parse_frame(text),
        Err(_) => {
            STREAM_DROPPED_FRAMES.click();
            Frame::Skip
        }
    }
}

/// Inspect one frame's lines and decode its payload.
fn parse_frame(frame_text: &str) -> Frame {
    // Only `data: ` lines are payload-bearing; event names, comments, and
    // other framing are ignored. The last data line wins.
    let mut data = None;
    for line in frame_text.lines() {
        if let Some(payload) = line.strip_prefix(DATA_PREFIX) {
            data = Some(payload);
        }
    }

    let Some(payload) = data else {
        return Frame::Skip;
    };

    if payload == DONE_SENTINEL {
        return Frame::Done;
    }
    if payload.is_empty() || payload == "\n" {
        return Frame::Skip;
    }

    match serde_json::from_str::<ChatCompletionChunk>(payload) {
        Ok(chunk) => {
            STREAM_FRAMES.click();
            Frame::Chunk(chunk)
        }
        Err(_) => repair_and_parse(payload),
    }
}

/// Best-effort repair for a frame whose payload failed to parse.
///
/// Network chunking can leave stray bytes after the closing brace of a JSON
/// object; truncating past the last `}` recovers those frames. Payloads that
/// still fail are dropped without aborting the stream.
fn repair_and_parse(payload: &str) -> Frame {
    let repaired = match payload.rfind('}') {
        Some(index) if index + 1 < payload.len() => &payload[..index + 1],
        _ => {
            STREAM_DROPPED_FRAMES.click();
            return Frame::Skip;
        }
    };

    match serde_json::from_str::<ChatCompletionChunk>(repaired) {
        Ok(chunk) => {
            STREAM_REPAIRED_FRAMES.click();
            Frame::Chunk(chunk)
        }
        Err(_) => {
            STREAM_DROPPED_FRAMES.click();
            Frame::Skip
        }
    }
}
