//! Fixed-size overlapping text windows

/// Splits text into character windows of a configured size and overlap
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker; the caller has validated `overlap < chunk_size`
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self { chunk_size, overlap }
    }

    /// Split text into windows; consecutive windows share `overlap`
    /// characters at the boundary
    pub fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();

        if len == 0 || text.trim().is_empty() {
            return Vec::new();
        }
        if len <= self.chunk_size {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut start = 0usize;

        loop {
            let mut end = (start + self.chunk_size).min(len);

            if end < len {
                // Prefer cutting after whitespace; the window must stay
                // longer than the overlap so the walk keeps advancing
                if let Some(ws) = chars[start..end].iter().rposition(|c| c.is_whitespace()) {
                    let shortened = ws + 1;
                    if shortened > self.overlap && shortened >= self.chunk_size / 2 {
                        end = start + shortened;
                    }
                }
            }

            chunks.push(chars[start..end].iter().collect());

            if end == len {
                break;
            }
            start = end - self.overlap;
        }

        chunks
    }
}
