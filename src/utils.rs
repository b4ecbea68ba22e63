/// Splits `message` into chunks that fit after an `indent` wide header and
/// joins them with a newline plus `indent` spaces.
pub fn indent_wrap(message: &str, indent: usize, width: usize) -> String {
    let wrap_area = width.saturating_sub(indent).max(1);
    let chars: Vec<char> = message.chars().collect();
    if chars.len() <= wrap_area {
        return message.to_string();
    }

    let separator = format!("\n{}", " ".repeat(indent));
    chars
        .chunks(wrap_area)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<String>>()
        .join(&separator)
}

/// Keeps the last `width` chars of `text`, padded on the left to `width`.
pub fn right_align_tail(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let tail: String = text.chars().skip(len.saturating_sub(width)).collect();
    format!("{:>width$}", tail, width = width)
}

pub fn center(text: &str, width: usize) -> String {
    format!("{:^width$}", text, width = width)
}

/// Text as it shows on screen, without ANSI escape codes.
pub fn clean_ansi_text(orig: &str) -> String {
    let mut text = String::new();
    let mut in_ansi_escape = false;
    for c in orig.chars() {
        if in_ansi_escape {
            if c == 'm' {
                in_ansi_escape = false;
            }
        } else if c == 0o33 as char {
            in_ansi_escape = true;
        } else {
            text.push(c);
        }
    }
    text
}
