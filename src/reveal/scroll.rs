/// Geometry of the fixed-height question box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollViewport {
    pub columns: usize,
    pub line_height: f32,
    pub height: f32,
}

impl Default for ScrollViewport {
    fn default() -> Self {
        Self {
            columns: 48,
            line_height: 28.0,
            height: 100.0,
        }
    }
}

impl ScrollViewport {
    /// Scroll offset that brings the last line of `text` into view.
    pub fn bottom(&self, text: &str) -> f32 {
        let content = wrapped_lines(text, self.columns) as f32 * self.line_height;
        (content - self.height).max(0.0)
    }
}

/// Number of lines `text` takes when greedily word-wrapped at `columns`.
/// Words longer than a line are broken across lines.
pub fn wrapped_lines(text: &str, columns: usize) -> usize {
    if text.is_empty() {
        return 0;
    }
    let columns = columns.max(1);
    let mut lines = 1;
    let mut width = 0;

    for word in text.split(' ') {
        let len = word.chars().count();
        let needed = if width == 0 { len } else { width + 1 + len };
        if needed <= columns {
            width = needed;
            continue;
        }
        if width > 0 {
            lines += 1;
        }
        let overflow = len.saturating_sub(1) / columns;
        lines += overflow;
        width = len - overflow * columns;
    }
    lines
}
