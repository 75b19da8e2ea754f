//! Indentation-aware text accumulation for emitted source.

/// Accumulates generated source text, indenting each written line by the
/// current level. Four spaces per level.
pub struct IndentWriter {
    buffer: String,
    level: usize,
}

const UNIT: &str = "    ";

impl IndentWriter {
    /// Start with an empty buffer at indentation level zero.
    #[must_use]
    pub fn new() -> Self {
        IndentWriter {
            buffer: String::new(),
            level: 0,
        }
    }

    /// Increase the indentation level.
    pub fn indent(&mut self) -> &mut Self {
        self.level += 1;
        self
    }

    /// Decrease the indentation level.
    pub fn dedent(&mut self) -> &mut Self {
        self.level = self.level.saturating_sub(1);
        self
    }

    /// Write one line at the current level. Text containing newlines is split
    /// and each piece indented on its own.
    pub fn line(&mut self, text: &str) -> &mut Self {
        for piece in text.split('\n') {
            if piece.is_empty() {
                self.buffer.push('\n');
                continue;
            }
            for _ in 0..self.level {
                self.buffer.push_str(UNIT);
            }
            self.buffer.push_str(piece);
            self.buffer.push('\n');
        }
        self
    }

    /// Write an empty line.
    pub fn blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    /// Consume the writer, yielding the accumulated text.
    #[must_use]
    pub fn finish(self) -> String {
        self.buffer
    }
}

impl Default for IndentWriter {
    fn default() -> Self {
        Self::new()
    }
}
