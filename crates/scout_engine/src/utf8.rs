use encoding_rs::{CoderResult, Decoder, UTF_8};

/// Streaming UTF-8 decoder for network chunks.
///
/// A multi-byte character split across two chunks is held back until its
/// remaining bytes arrive. Invalid sequences become U+FFFD.
pub struct Utf8ChunkDecoder {
    decoder: Decoder,
    had_replacements: bool,
}

impl Default for Utf8ChunkDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self {
            decoder: UTF_8.new_decoder_with_bom_removal(),
            had_replacements: false,
        }
    }

    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.run(bytes, false)
    }

    /// Flushes held-back bytes at end of stream.
    pub fn finish(&mut self) -> String {
        self.run(&[], true)
    }

    pub fn had_replacements(&self) -> bool {
        self.had_replacements
    }

    fn run(&mut self, mut input: &[u8], last: bool) -> String {
        let mut out = String::new();
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(input.len())
                .unwrap_or(input.len() * 3 + 4);
            out.reserve(needed);
            let (result, read, replaced) = self.decoder.decode_to_string(input, &mut out, last);
            self.had_replacements |= replaced;
            input = &input[read..];
            match result {
                CoderResult::InputEmpty => return out,
                CoderResult::OutputFull => continue,
            }
        }
    }
}
