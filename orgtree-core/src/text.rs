//! Label text: greedy line wrapping and the text measurement seam.

/// Greedily pack space-separated words into lines of at most `max_line_len`
/// characters. The joining space is not counted. Words are never split, so a
/// word longer than the limit gets a line of its own.
pub fn wrap(text: &str, max_line_len: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;
    for word in text.split(' ') {
        let word_len = word.chars().count();
        if line_len + word_len <= max_line_len {
            if !line.is_empty() {
                line.push(' ');
                line_len += 1;
            }
            line.push_str(word);
            line_len += word_len;
        } else {
            if !line.is_empty() {
                out.push(std::mem::take(&mut line));
            }
            line.push_str(word);
            line_len = word_len;
        }
    }
    if !line.is_empty() {
        out.push(line);
    }
    out
}

/// Supplies the rendered pixel width of a string.
pub trait TextMeasurer {
    fn text_width(&self, text: &str, font_size: f64) -> f64;
}

/// Width proportional to character count. Used headless and in tests.
#[derive(Debug, Clone)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
}

impl Default for DeterministicTextMeasurer {
    fn default() -> Self {
        Self { char_width_factor: 0.6 }
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size.max(1.0) * self.char_width_factor
    }
}
