use scout_logging::scout_debug;

/// Blank line separating two frames.
pub const FRAME_DELIMITER: &str = "\n\n";
/// Marker of a payload line inside a frame.
pub const DATA_PREFIX: &str = "data: ";
/// Payload that terminates the stream. Never emitted.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Incremental decoder for a server-sent event stream.
///
/// Text may be pushed in arbitrary pieces; the payloads produced are the same
/// as for the whole text pushed at once.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: String,
    /// Buffer prefix already known to hold no delimiter.
    scanned: usize,
    finished: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `text` and returns the payloads of every frame it completed.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        let mut payloads = Vec::new();
        if self.finished {
            return payloads;
        }

        self.buffer.push_str(text);
        while let Some(found) = self.buffer[self.scanned..].find(FRAME_DELIMITER) {
            let end = self.scanned + found;
            self.scanned = 0;
            let frame: String = self.buffer.drain(..end + FRAME_DELIMITER.len()).collect();
            for line in frame[..end].split('\n') {
                let Some(data) = line.strip_prefix(DATA_PREFIX) else {
                    continue;
                };
                let data = data.trim();
                if data.is_empty() {
                    continue;
                }
                if data == DONE_SENTINEL {
                    self.finished = true;
                    self.buffer.clear();
                    return payloads;
                }
                payloads.push(data.to_string());
            }
        }
        self.scanned = self.resume_offset();
        payloads
    }

    /// Where the next delimiter search starts: far enough back to catch a
    /// delimiter split across pushes, on a char boundary.
    fn resume_offset(&self) -> usize {
        let mut offset = self
            .buffer
            .len()
            .saturating_sub(FRAME_DELIMITER.len() - 1);
        while !self.buffer.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }

    /// Whether the termination sentinel has been seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Ends decoding. An incomplete trailing frame is discarded; its length in
    /// bytes is returned.
    pub fn finish(self) -> usize {
        let discarded = self.buffer.len();
        if discarded > 0 {
            scout_debug!("Discarding {} bytes of incomplete trailing frame", discarded);
        }
        discarded
    }
}
