//! Formatting utilities (Telegram HTML escaping, numbers, truncation).

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `50000000` → `"50,000,000"`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Areas are shown without a trailing `.0` for whole numbers.
pub fn format_area(area: f64) -> String {
    if area.fract() == 0.0 && area.abs() < 1e15 {
        format!("{}", area as i64)
    } else {
        format!("{area}")
    }
}

/// Truncate to `max_chars` characters, appending `...` when something was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    format!("{}...", text.chars().take(max_chars).collect::<String>())
}

/// Single-line preview used for button labels and list rows.
pub fn truncate_one_line(text: &str, max_chars: usize) -> String {
    let cleaned = text.replace('\n', " ");
    truncate_chars(cleaned.trim(), max_chars)
}

/// A tag left open at a message break: closed at the end of one piece, reopened in the next.
#[derive(Clone, Debug)]
struct OpenTag {
    name: String,
    open: String,
}

/// Smallest units the splitter never cuts: a tag, an entity like `&amp;`, or one character.
fn html_units(html: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut rest = html;
    while let Some(c) = rest.chars().next() {
        let end = match c {
            '<' => rest.find('>').map(|i| i + 1),
            '&' => rest
                .find(';')
                .filter(|i| {
                    *i <= 10 && rest[1..*i].chars().all(|c| c.is_ascii_alphanumeric() || c == '#')
                })
                .map(|i| i + 1),
            _ => None,
        }
        .unwrap_or(c.len_utf8());
        units.push(&rest[..end]);
        rest = &rest[end..];
    }
    units
}

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches(['<', '/'])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

fn apply_tag(stack: &mut Vec<OpenTag>, unit: &str) {
    if !unit.starts_with('<') || unit.ends_with("/>") {
        return;
    }
    let name = tag_name(unit);
    if name.is_empty() {
        return;
    }
    if unit.starts_with("</") {
        if let Some(pos) = stack.iter().rposition(|t| t.name == name) {
            stack.truncate(pos);
        }
    } else {
        stack.push(OpenTag {
            name,
            open: unit.to_string(),
        });
    }
}

fn closing(stack: &[OpenTag]) -> String {
    stack.iter().rev().map(|t| format!("</{}>", t.name)).collect()
}

fn reopening(stack: &[OpenTag]) -> String {
    stack.iter().map(|t| t.open.as_str()).collect()
}

/// Split Telegram HTML into pieces of at most `limit` characters.
///
/// Breaks at the last newline that fits, otherwise mid-line. Tags open across a break are
/// closed and reopened so every piece parses on its own.
pub fn split_html(html: &str, limit: usize) -> Vec<String> {
    if html.chars().count() <= limit {
        return vec![html.to_string()];
    }

    let mut pieces = Vec::new();
    let mut stack: Vec<OpenTag> = Vec::new();
    let mut chunk = String::new();
    let mut chunk_len = 0usize;
    let mut prefix_len = 0usize;
    let mut prefix_bytes = 0usize;
    // Byte offset just past the last newline in `chunk`, with the tags open at that point.
    let mut newline: Option<(usize, Vec<OpenTag>)> = None;

    for unit in html_units(html) {
        let unit_len = unit.chars().count();
        let mut after = stack.clone();
        apply_tag(&mut after, unit);
        let close_len = closing(&after).chars().count();

        while chunk_len + unit_len + close_len > limit && chunk_len > prefix_len {
            let (head, open_at_break) = match newline.take() {
                Some((at, open)) => {
                    let rest = chunk.split_off(at);
                    chunk.pop();
                    (std::mem::replace(&mut chunk, rest), open)
                }
                None => (std::mem::take(&mut chunk), stack.clone()),
            };
            pieces.push(format!("{head}{}", closing(&open_at_break)));

            let reopen = reopening(&open_at_break);
            prefix_len = reopen.chars().count();
            prefix_bytes = reopen.len();
            chunk.insert_str(0, &reopen);
            chunk_len = chunk.chars().count();
        }

        chunk.push_str(unit);
        chunk_len += unit_len;
        stack = after;
        // A break right after the reopened tags would leave an empty piece.
        if unit == "\n" && chunk.len() > prefix_bytes + 1 {
            newline = Some((chunk.len(), stack.clone()));
        }
    }

    if chunk_len > prefix_len {
        pieces.push(format!("{chunk}{}", closing(&stack)));
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html() {
        let s = r#"<a href="x&y">"#;
        assert_eq!(escape_html(s), "&lt;a href=&quot;x&amp;y&quot;&gt;");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(50_000_000), "50,000,000");
        assert_eq!(group_thousands(-1234567), "-1,234,567");
    }

    #[test]
    fn formats_area() {
        assert_eq!(format_area(65.0), "65");
        assert_eq!(format_area(65.5), "65.5");
    }

    #[test]
    fn short_html_is_one_piece() {
        let html = "🏠 <b>Uy</b>\n&amp; hovli";
        assert_eq!(split_html(html, 4096), vec![html.to_string()]);
    }

    #[test]
    fn splits_at_newlines_and_rebalances_tags() {
        let html = format!("<b>{}\n{}</b>\noxiri", "a".repeat(30), "b".repeat(30));
        let pieces = split_html(&html, 45);
        assert_eq!(
            pieces,
            vec![
                format!("<b>{}</b>", "a".repeat(30)),
                format!("<b>{}</b>\noxiri", "b".repeat(30)),
            ]
        );
    }

    #[test]
    fn long_lines_are_cut_without_breaking_entities() {
        let html = "&amp;".repeat(50);
        let pieces = split_html(&html, 12);
        assert!(pieces.iter().all(|p| p.chars().count() <= 12));
        assert!(pieces.iter().all(|p| p.starts_with("&amp;") && p.ends_with(';')));
        assert_eq!(pieces.concat(), html);
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_chars("qisqa", 10), "qisqa");
        assert_eq!(truncate_chars("Ташкент", 3), "Таш...");
        assert_eq!(truncate_one_line("a\nb ", 10), "a b");
    }
}
