//! Minimal SSE line decoder for chat-completion streams.

/// Payload that signals normal end-of-stream.
pub(crate) const DONE_SENTINEL: &str = "[DONE]";

/// Buffering decoder that turns raw transport chunks into complete `data:`
/// payloads. A trailing partial line is kept for the next push; lines
/// without the `data:` prefix (comments, `event:`, blanks) are dropped.
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buffer: String,
}

impl SseDecoder {
    /// Guard against malformed streams that never produce a newline.
    const MAX_BUFFER: usize = 1024 * 1024;

    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, get every `data:` payload it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        if self.buffer.len() > Self::MAX_BUFFER {
            tracing::warn!("SSE buffer exceeded {} bytes, dropping oldest half", Self::MAX_BUFFER);
            let mut keep_from = self.buffer.len() - Self::MAX_BUFFER / 2;
            while !self.buffer.is_char_boundary(keep_from) {
                keep_from += 1;
            }
            self.buffer.drain(..keep_from);
        }

        let mut payloads = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(data) = line.strip_prefix("data:") {
                payloads.push(data.trim_start().to_string());
            }
        }
        payloads
    }

    #[cfg(test)]
    fn push_str(&mut self, s: &str) -> Vec<String> {
        self.push(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_complete_frame() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.push_str("data: {\"text\": \"hello\"}\n\n");
        assert_eq!(payloads, vec!["{\"text\": \"hello\"}"]);
    }

    #[test]
    fn buffers_partial_lines_across_pushes() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push_str("data: {\"part\":").is_empty());
        let payloads = decoder.push_str(" 1}\n");
        assert_eq!(payloads, vec!["{\"part\": 1}"]);
    }

    #[test]
    fn splits_multiple_frames_in_one_chunk() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.push_str("data: first\ndata: second\ndata: third\n");
        assert_eq!(payloads, vec!["first", "second", "third"]);
    }

    #[test]
    fn done_sentinel_comes_through_verbatim() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.push_str("data: [DONE]\n");
        assert_eq!(payloads, vec![DONE_SENTINEL]);
    }

    #[test]
    fn non_data_lines_are_dropped() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.push_str("event: ping\n: comment\n\ndata: kept\n");
        assert_eq!(payloads, vec!["kept"]);
    }

    #[test]
    fn crlf_lines_are_trimmed() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.push_str("data: a\r\ndata:b\r\n");
        assert_eq!(payloads, vec!["a", "b"]);
    }
}
