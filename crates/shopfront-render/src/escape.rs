//! HTML escaping.

/// Escape text for use in element content and double-quoted attributes.
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_markup() {
        assert_eq!(
            html_escape(r#"<b>"Tee" & 'Co'</b>"#),
            "&lt;b&gt;&quot;Tee&quot; &amp; &#x27;Co&#x27;&lt;/b&gt;"
        );
        assert_eq!(html_escape("পাঞ্জাবি"), "পাঞ্জাবি");
    }
}
