use unicode_width::UnicodeWidthChar;

use url::Url;

/// Safely truncate a string, ensuring it is not truncated in the middle of multi-byte characters
///
/// This function will:
/// 1. Correctly handle Unicode characters (including CJK and emoji)
/// 2. Add ellipsis when maximum length is reached
/// 3. Ensure the output string's display width does not exceed the specified length
pub fn truncate_str(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthStr;

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(1);

        if current_width + char_width + 3 > max_width {
            break;
        }

        result.push(c);
        current_width += char_width;
    }

    result.push_str("...");
    result
}

/// Derives the display domain for whatever the user typed.
///
/// Input without a scheme is treated as `https://`. The host is returned
/// without a single leading `www.`; anything unparseable yields `""`.
pub fn derive_domain(input: &str) -> String {
    let normalized = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{input}")
    };

    let Ok(parsed) = Url::parse(&normalized) else {
        return String::new();
    };

    match parsed.host_str() {
        Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("Hello, world!", 10), "Hello, ...");
        assert_eq!(truncate_str("你好，世界！", 8), "你好...");
        assert_eq!(truncate_str("Hello 你好！", 10), "Hello ...");
        assert_eq!(truncate_str("Hi!", 10), "Hi!");
    }

    #[test]
    fn test_derive_domain() {
        assert_eq!(derive_domain("example.com"), "example.com");
        assert_eq!(derive_domain("https://www.example.com/path"), "example.com");
        assert_eq!(derive_domain("not a url"), "");
    }

    #[test]
    fn test_derive_domain_edge_cases() {
        assert_eq!(derive_domain("http://blog.example.com:8080/a?b=c"), "blog.example.com");
        assert_eq!(derive_domain("www.rust-lang.org"), "rust-lang.org");
        // only one prefix is stripped
        assert_eq!(derive_domain("www.www.example.com"), "www.example.com");
        assert_eq!(derive_domain("HTTPS://WWW.Example.COM"), "example.com");
        assert_eq!(derive_domain(""), "");
        assert_eq!(derive_domain("file:///etc/hosts"), "");
    }
}
