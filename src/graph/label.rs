//! Category label wrapping

/// Characters per line for category hub labels
pub const CATEGORY_LABEL_WIDTH: usize = 20;

/// Greedily pack whitespace-separated words into lines of at most `width`
/// characters, joined with `\n`.
///
/// Words are never split: a word longer than `width` gets a line of its own.
pub fn wrap_label(text: &str, width: usize) -> String {
    wrap_lines(text, width).join("\n")
}

pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
