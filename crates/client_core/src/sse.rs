//! Incremental decoder for `text/event-stream` bodies.

use tracing::warn;

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Longest line kept while waiting for its terminator. Anything longer is
/// dropped together with the event it belongs to.
const MAX_LINE_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: String,
    pub data: String,
    pub id: Option<String>,
}

impl SseFrame {
    pub fn is_message(&self) -> bool {
        self.event == "message"
    }
}

/// Splits arbitrary body chunks into [`SseFrame`]s. Chunks may end anywhere,
/// including inside a multi-byte character.
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
    data: String,
    event: Option<String>,
    last_id: Option<String>,
    started: bool,
    skip_line: bool,
}

impl SseDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.pending.extend_from_slice(chunk);
        if !self.started {
            if self.pending.len() < BOM.len() && BOM.starts_with(&self.pending) {
                return Vec::new();
            }
            if self.pending.starts_with(BOM) {
                self.pending.drain(..BOM.len());
            }
            self.started = true;
        }

        let mut frames = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[start..]
            .iter()
            .position(|byte| *byte == b'\n' || *byte == b'\r')
        {
            let end = start + offset;
            let next = if self.pending[end] == b'\r' {
                match self.pending.get(end + 1) {
                    Some(b'\n') => end + 2,
                    Some(_) => end + 1,
                    // Wait for the next chunk to see whether `\n` follows.
                    None => break,
                }
            } else {
                end + 1
            };

            if self.skip_line {
                self.skip_line = false;
            } else {
                let line = String::from_utf8_lossy(&self.pending[start..end]).into_owned();
                if let Some(frame) = self.process_line(&line) {
                    frames.push(frame);
                }
            }
            start = next;
        }
        self.pending.drain(..start);

        if self.pending.len() > MAX_LINE_BYTES {
            warn!(bytes = self.pending.len(), "dropping oversized event stream line");
            self.pending.clear();
            self.data.clear();
            self.event = None;
            self.skip_line = true;
        }
        frames
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
            }
            "event" => self.event = Some(value.to_string()),
            "id" if !value.contains('\0') => self.last_id = Some(value.to_string()),
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }

        let mut data = std::mem::take(&mut self.data);
        data.pop();
        Some(SseFrame {
            event: event
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "message".to_string()),
            data,
            id: self.last_id.clone(),
        })
    }
}
