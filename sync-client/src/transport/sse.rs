//! Incremental decoder for the push-stream body.
//!
//! The server frames messages as Server-Sent Events: one or more `data:`
//! lines followed by a blank line. Lines end in CRLF, LF, or a lone CR. A
//! line that starts with `{` outside of an event is taken as a complete
//! newline-delimited JSON message instead.

use tracing::warn;

/// Longest line kept; anything longer is discarded up to its terminator.
pub const MAX_LINE_BYTES: usize = 1 << 20;

/// Splits a byte stream into message bodies.
#[derive(Debug, Default)]
pub struct SseDecoder {
    partial: Vec<u8>,
    data: Vec<String>,
    /// The last line ended in CR; a LF right after it belongs to that line.
    after_cr: bool,
    /// The current line overflowed and is being skipped.
    skipping: bool,
}

impl SseDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of the body; returns every message it completes.
    ///
    /// Chunks may split lines (and UTF-8 sequences) anywhere.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut messages = Vec::new();
        let mut rest = chunk;

        if self.after_cr && !rest.is_empty() {
            self.after_cr = false;
            if rest[0] == b'\n' {
                rest = &rest[1..];
            }
        }

        while let Some(pos) = rest.iter().position(|b| *b == b'\n' || *b == b'\r') {
            let (head, tail) = rest.split_at(pos);
            rest = &tail[1..];
            if tail[0] == b'\r' {
                match rest.first() {
                    Some(b'\n') => rest = &rest[1..],
                    Some(_) => {}
                    None => self.after_cr = true,
                }
            }

            if self.skipping {
                self.skipping = false;
                self.partial.clear();
                continue;
            }
            self.partial.extend_from_slice(head);
            let raw = std::mem::take(&mut self.partial);
            if let Some(message) = self.line(&String::from_utf8_lossy(&raw)) {
                messages.push(message);
            }
        }

        if !self.skipping {
            self.partial.extend_from_slice(rest);
            if self.partial.len() > MAX_LINE_BYTES {
                warn!(limit = MAX_LINE_BYTES, "push stream line too long; discarding");
                self.partial.clear();
                self.data.clear();
                self.skipping = true;
            }
        }
        messages
    }

    /// Reset at end of stream.
    ///
    /// An event without its terminating blank line is incomplete and is
    /// discarded. Returns whether anything was discarded.
    pub fn finish(&mut self) -> bool {
        let discarded = !self.partial.is_empty() || !self.data.is_empty() || self.skipping;
        *self = Self::default();
        discarded
    }

    fn line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        if line.starts_with('{') && self.data.is_empty() {
            return Some(line.to_string());
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data.push(value.to_string());
        }
        None
    }

    fn dispatch(&mut self) -> Option<String> {
        if self.data.is_empty() {
            return None;
        }
        let message = self.data.join("\n");
        self.data.clear();
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_event() {
        let mut decoder = SseDecoder::new();
        let out = decoder.feed(b"data: {\"type\":\"PlayEnd\"}\n\n");
        assert_eq!(out, vec![r#"{"type":"PlayEnd"}"#]);
    }

    #[test]
    fn event_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"da").is_empty());
        assert!(decoder.feed(b"ta: {\"type\":").is_empty());
        assert!(decoder.feed(b"\"RecordBegin\"}\r\n").is_empty());
        let out = decoder.feed(b"\r\n");
        assert_eq!(out, vec![r#"{"type":"RecordBegin"}"#]);
    }

    #[test]
    fn multi_line_data_is_joined() {
        let mut decoder = SseDecoder::new();
        let out = decoder.feed(b"data: first\ndata: second\n\n");
        assert_eq!(out, vec!["first\nsecond"]);
    }

    #[test]
    fn comments_and_other_fields_are_ignored() {
        let mut decoder = SseDecoder::new();
        let out = decoder.feed(b": keep-alive\n\nevent: update\nid: 7\nretry: 500\ndata:x\n\n");
        assert_eq!(out, vec!["x"]);
    }

    #[test]
    fn several_events_in_one_chunk() {
        let mut decoder = SseDecoder::new();
        let out = decoder.feed(b"data: a\n\ndata: b\n\n");
        assert_eq!(out, vec!["a", "b"]);
    }

    #[test]
    fn bare_json_lines_are_messages() {
        let mut decoder = SseDecoder::new();
        let out = decoder.feed(b"{\"type\":\"PlayEnd\"}\n{\"type\":\"RecordBegin\"}\n");
        assert_eq!(out, vec![r#"{"type":"PlayEnd"}"#, r#"{"type":"RecordBegin"}"#]);
    }

    #[test]
    fn utf8_split_inside_character() {
        let mut decoder = SseDecoder::new();
        let bytes = "data: café\n\n".as_bytes();
        let split = bytes.len() - 3;
        assert!(decoder.feed(&bytes[..split]).is_empty());
        assert_eq!(decoder.feed(&bytes[split..]), vec!["café"]);
    }

    #[test]
    fn finish_discards_unterminated_event() {
        let mut decoder = SseDecoder::new();
        assert_eq!(decoder.feed(b"data: done\n\ndata: tail"), vec!["done"]);
        assert!(decoder.finish());
        assert!(!decoder.finish());

        assert!(decoder.feed(b"data: no blank line\n").is_empty());
        assert!(decoder.finish());
        assert!(decoder.feed(b"\n").is_empty());
    }

    #[test]
    fn lone_cr_ends_lines() {
        let mut decoder = SseDecoder::new();
        let out = decoder.feed(b"data: a\r\rdata: b\r\r");
        assert_eq!(out, vec!["a", "b"]);
    }

    #[test]
    fn crlf_split_between_chunks_is_one_terminator() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: a\r").is_empty());
        assert!(decoder.feed(b"\ndata: b\r").is_empty());
        assert_eq!(decoder.feed(b"\n\r\n"), vec!["a\nb"]);
    }

    #[test]
    fn overlong_line_is_dropped() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: ").is_empty());
        let filler = vec![b'x'; MAX_LINE_BYTES + 1];
        assert!(decoder.feed(&filler).is_empty());
        assert!(decoder.feed(&filler).is_empty());

        let out = decoder.feed(b"xx\n\ndata: next\n\n");
        assert_eq!(out, vec!["next"]);
    }
}
