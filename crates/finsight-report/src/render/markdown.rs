use html_escape::encode_text;

/// Convert the small markdown subset models produce in report sections
/// into balanced HTML.
///
/// Supports `### ` sub-headings, `- `/`* ` bullets, `**bold**`, `*italic*`,
/// `***both***` and blank-line separated paragraphs. Input is escaped first, so raw
/// HTML in model output is rendered as text.
pub fn markdown_to_html(text: &str) -> String {
    let mut html = String::new();
    let mut paragraph: Vec<String> = Vec::new();
    let mut list: Vec<String> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();

        if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            flush_paragraph(&mut html, &mut paragraph);
            list.push(inline(item.trim()));
            continue;
        }

        flush_list(&mut html, &mut list);

        if trimmed.is_empty() {
            flush_paragraph(&mut html, &mut paragraph);
        } else if let Some(heading) = trimmed.strip_prefix("### ") {
            flush_paragraph(&mut html, &mut paragraph);
            html.push_str(&format!("<h3>{}</h3>", inline(heading.trim())));
        } else {
            paragraph.push(inline(trimmed));
        }
    }

    flush_list(&mut html, &mut list);
    flush_paragraph(&mut html, &mut paragraph);
    html
}

fn flush_paragraph(html: &mut String, paragraph: &mut Vec<String>) {
    if paragraph.is_empty() {
        return;
    }
    html.push_str("<p>");
    html.push_str(&paragraph.join("<br>"));
    html.push_str("</p>");
    paragraph.clear();
}

fn flush_list(html: &mut String, list: &mut Vec<String>) {
    if list.is_empty() {
        return;
    }
    html.push_str("<ul>");
    for item in list.drain(..) {
        html.push_str("<li>");
        html.push_str(&item);
        html.push_str("</li>");
    }
    html.push_str("</ul>");
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Emphasis {
    Em,
    Strong,
    StrongEm,
}

impl Emphasis {
    /// Longer runs of `*` are left as text
    fn from_run(len: usize) -> Option<Self> {
        match len {
            1 => Some(Self::Em),
            2 => Some(Self::Strong),
            3 => Some(Self::StrongEm),
            _ => None,
        }
    }

    fn open(self) -> &'static str {
        match self {
            Self::Em => "<em>",
            Self::Strong => "<strong>",
            Self::StrongEm => "<strong><em>",
        }
    }

    fn close(self) -> &'static str {
        match self {
            Self::Em => "</em>",
            Self::Strong => "</strong>",
            Self::StrongEm => "</em></strong>",
        }
    }
}

fn inline(text: &str) -> String {
    let escaped = encode_text(text);
    let bytes = escaped.as_bytes();

    // (offset, length, kind) of every marker run
    let mut runs: Vec<(usize, usize, Emphasis)> = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'*' {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i] == b'*' {
            i += 1;
        }
        if let Some(kind) = Emphasis::from_run(i - start) {
            runs.push((start, i - start, kind));
        }
    }

    // Pair runs like brackets. A closer matches the nearest open run of the
    // same kind; openers it skips over stay literal, so tags never cross.
    let mut tags: Vec<Option<&'static str>> = vec![None; runs.len()];
    let mut open: Vec<usize> = Vec::new();
    for (n, &(_, _, kind)) in runs.iter().enumerate() {
        match open.iter().rposition(|&o| runs[o].2 == kind) {
            Some(depth) => {
                tags[open[depth]] = Some(kind.open());
                tags[n] = Some(kind.close());
                open.truncate(depth);
            }
            None => open.push(n),
        }
    }

    let mut out = String::with_capacity(escaped.len());
    let mut cursor = 0;
    for (&(offset, len, _), tag) in runs.iter().zip(&tags) {
        out.push_str(&escaped[cursor..offset]);
        match tag {
            Some(tag) => out.push_str(tag),
            None => out.push_str(&escaped[offset..offset + len]),
        }
        cursor = offset + len;
    }
    out.push_str(&escaped[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_and_bullets() {
        let html = markdown_to_html("Intro line\n- **Assets:** 5,000\n- Debt free");
        assert_eq!(
            html,
            "<p>Intro line</p><ul><li><strong>Assets:</strong> 5,000</li><li>Debt free</li></ul>"
        );
    }

    #[test]
    fn test_paragraphs_and_line_breaks() {
        let html = markdown_to_html("one\ntwo\n\nthree");
        assert_eq!(html, "<p>one<br>two</p><p>three</p>");
    }

    #[test]
    fn test_escapes_raw_html() {
        let html = markdown_to_html("<script>alert(1)</script> & more");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp; more"));
    }

    #[test]
    fn test_unbalanced_markers_stay_literal() {
        assert_eq!(markdown_to_html("**open only"), "<p>**open only</p>");
        assert_eq!(
            markdown_to_html("*a* and *b"),
            "<p><em>a</em> and *b</p>"
        );
    }

    #[test]
    fn test_star_bullet_and_heading() {
        let html = markdown_to_html("### Plan\n* item *one*");
        assert_eq!(html, "<h3>Plan</h3><ul><li>item <em>one</em></li></ul>");
    }

    #[test]
    fn test_triple_markers_nest() {
        assert_eq!(
            markdown_to_html("***Important***"),
            "<p><strong><em>Important</em></strong></p>"
        );
        assert_eq!(
            markdown_to_html("**Net worth *after* tax**"),
            "<p><strong>Net worth <em>after</em> tax</strong></p>"
        );
    }

    #[test]
    fn test_interleaved_markers_never_cross() {
        assert_eq!(
            markdown_to_html("**a *b** c*"),
            "<p><strong>a *b</strong> c*</p>"
        );
    }
}
