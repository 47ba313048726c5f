//! Line-preserving message splitting.

/// Maximum message length accepted by the Bot API, in characters.
pub const MESSAGE_LIMIT: usize = 4096;

/// Split `text` into chunks of at most `limit` characters, breaking only
/// between lines.
///
/// Lines are accumulated into a chunk until the next line (plus its `\n`
/// separator) would push it over `limit`. A single line longer than `limit`
/// is kept whole as its own oversized chunk. Joining the chunks with `\n`
/// gives back the original text.
#[must_use]
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    if text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    let mut has_line = false;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        let added = if has_line { line_len + 1 } else { line_len };

        if has_line && current_len + added > limit {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
            has_line = false;
        }

        if has_line {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
        has_line = true;
    }

    if has_line {
        chunks.push(current);
    }

    chunks
}
