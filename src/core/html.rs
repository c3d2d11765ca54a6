// src/core/html.rs
// Case-insensitive tag slicing. No DOM; just enough to find blocks in a page.

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Next `<open …>…</close>` block at or after `from`, as byte offsets into `s`.
pub fn next_tag_block_ci(s: &str, open: &str, close: &str, from: usize) -> Option<(usize, usize)> {
    block_in_lowered(s, &to_lower(s), &to_lower(open), &to_lower(close), from)
}

// `lc` is `to_lower(s)`; ASCII-only lowering keeps byte offsets aligned with `s`.
fn block_in_lowered(s: &str, lc: &str, open: &str, close: &str, from: usize) -> Option<(usize, usize)> {
    let start = lc.get(from..)?.find(open)? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lc[open_end..].find(close)?;
    let end = open_end + end_rel + close.len();
    Some((start, end))
}

/// Text between the opening tag's `>` and the last `<` of the block.
pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return block[oe + 1..cs].to_string();
            }
        }
    }
    s!()
}

/// Bodies of every `<script>` element, in document order.
pub fn script_bodies(doc: &str) -> Vec<String> {
    let lc = to_lower(doc);
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((s, e)) = block_in_lowered(doc, &lc, "<script", "</script>", pos) {
        out.push(inner_after_open_tag(&doc[s..e]));
        pos = e;
    }
    out
}

/// Replace every tag with a space, then collapse whitespace.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => { in_tag = false; out.push(' '); }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    super::sanitize::normalize_ws(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_scripts_regardless_of_case() {
        let doc = r#"<html><SCRIPT type="x">one()</SCRIPT><p>hi</p><script>two()</script></html>"#;
        assert_eq!(script_bodies(doc), vec![s!("one()"), s!("two()")]);
    }

    #[test]
    fn many_scripts_with_non_ascii_text() {
        let doc: String = (0..2000).map(|i| format!("<p>Año {i}</p><Script>s({i})</Script>")).collect();
        let bodies = script_bodies(&doc);
        assert_eq!(bodies.len(), 2000);
        assert_eq!(bodies[1999], "s(1999)");
        assert_eq!(next_tag_block_ci("<P>ñ</P>", "<p", "</p>", 0), Some((0, 9)));
    }

    #[test]
    fn strip_tags_keeps_words_apart() {
        assert_eq!(strip_tags("<li>12</li><li>34</li>"), "12 34");
    }
}
