//! Line-buffered server-sent-event decoding
//!
//! Transport chunks do not line up with SSE lines: a frame can be split
//! across chunks and one chunk can carry many frames. Bytes are buffered
//! until a full line is available, so multi-byte characters split across
//! chunks also survive.

use std::collections::VecDeque;
use std::pin::Pin;

use futures_util::stream::{self, Stream, StreamExt};

use super::{ProviderError, StreamEvent, TextStream};

/// One `data:` line together with the most recent `event:` name
#[derive(Debug, Clone, PartialEq)]
pub struct SseFrame {
    pub event: Option<String>,
    pub data: String,
}

struct DecoderState<S> {
    source: Pin<Box<S>>,
    buffer: Vec<u8>,
    event: Option<String>,
    pending: VecDeque<SseFrame>,
    finished: bool,
}

impl<S> DecoderState<S> {
    fn drain_lines(&mut self) {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.process_line(&line[..line.len() - 1]);
        }
    }

    fn process_line(&mut self, raw: &[u8]) {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = String::from_utf8_lossy(raw);

        if line.is_empty() {
            // blank line ends an event block
            self.event = None;
        } else if let Some(name) = line.strip_prefix("event:") {
            self.event = Some(name.trim().to_string());
        } else if let Some(data) = line.strip_prefix("data:") {
            let data = data.strip_prefix(' ').unwrap_or(data);
            self.pending.push_back(SseFrame {
                event: self.event.clone(),
                data: data.to_string(),
            });
        }
        // comments (":") and unknown fields are ignored
    }
}

/// Decode a byte stream into SSE frames
pub fn sse_frames<S, B, E>(source: S) -> impl Stream<Item = Result<SseFrame, ProviderError>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<ProviderError>,
{
    let state = DecoderState {
        source: Box::pin(source),
        buffer: Vec::new(),
        event: None,
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(frame) = state.pending.pop_front() {
                return Some((Ok(frame), state));
            }
            if state.finished {
                return None;
            }
            match state.source.next().await {
                Some(Ok(chunk)) => {
                    state.buffer.extend_from_slice(chunk.as_ref());
                    state.drain_lines();
                }
                Some(Err(e)) => {
                    state.finished = true;
                    return Some((Err(e.into()), state));
                }
                None => {
                    state.finished = true;
                    if !state.buffer.is_empty() {
                        let rest = std::mem::take(&mut state.buffer);
                        state.process_line(&rest);
                    }
                }
            }
        }
    })
}

/// Decode a byte stream into provider events using a per-frame parser.
///
/// The parser returns `None` for frames that are malformed or carry nothing
/// of interest; those are skipped. Decoding stops after the first error.
pub fn decode_events<S, B, E, F>(source: S, parse_frame: F) -> TextStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<ProviderError> + Send + 'static,
    F: Fn(&SseFrame) -> Option<Result<Vec<StreamEvent>, ProviderError>> + Send + 'static,
{
    let events = sse_frames(source)
        .map(move |frame| match frame {
            Ok(frame) => match parse_frame(&frame) {
                Some(Ok(events)) => events.into_iter().map(Ok).collect::<Vec<_>>(),
                Some(Err(e)) => vec![Err(e)],
                None => {
                    log::debug!("Skipping SSE frame: {}", frame.data);
                    Vec::new()
                }
            },
            Err(e) => vec![Err(e)],
        })
        .flat_map(stream::iter)
        .scan(false, |failed, item| {
            if *failed {
                return futures_util::future::ready(None);
            }
            *failed = item.is_err();
            futures_util::future::ready(Some(item))
        });

    Box::pin(events)
}
