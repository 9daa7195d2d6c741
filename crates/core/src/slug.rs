use std::collections::HashMap;

/// Slug returned for heading text without a single letter or digit.
pub const EMPTY_SLUG: &str = "empty";

/// Turns heading text into an anchor id.
///
/// Letters and digits are kept (lowercased where the script has case);
/// every other run of characters becomes a single `-`, and no dash is
/// left at either end.
///
/// # Examples
///
/// ```
/// use vesselmark_core::slug::sanitize_heading_id;
///
/// assert_eq!(sanitize_heading_id("This is a header"), "this-is-a-header");
/// assert_eq!(sanitize_heading_id("main.go"), "main-go");
/// assert_eq!(sanitize_heading_id("   "), "empty");
/// ```
pub fn sanitize_heading_id(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut separator = false;

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if separator && !slug.is_empty() {
                slug.push('-');
            }
            separator = false;
            // Some mappings expand, e.g. 'İ' to "i\u{307}"; keep only the letters.
            slug.extend(ch.to_lowercase().filter(|c| c.is_alphanumeric()));
        } else {
            separator = true;
        }
    }

    if slug.is_empty() {
        slug.push_str(EMPTY_SLUG);
    }
    slug
}

/// Splits an explicit `{#id}` suffix off heading text.
///
/// Returns the text before the suffix (right-trimmed) and the id. Text
/// without a well-formed suffix comes back unchanged with `None`.
pub fn split_heading_id(text: &str) -> (&str, Option<&str>) {
    let trimmed = text.trim_end();
    let Some(inner) = trimmed.strip_suffix('}') else {
        return (text, None);
    };
    let Some(open) = inner.rfind("{#") else {
        return (text, None);
    };

    let id = &inner[open + 2..];
    if id.is_empty() || id.contains(|c: char| c.is_whitespace() || c == '{' || c == '}') {
        return (text, None);
    }
    (inner[..open].trim_end(), Some(id))
}

/// Issues unique anchor ids for the headings of one document.
///
/// The first use of a slug is returned as is; later collisions get `-1`,
/// `-2`, ... appended, skipping any suffixed id already handed out.
#[derive(Debug, Default)]
pub struct HeadingIds {
    counts: HashMap<String, usize>,
}

impl HeadingIds {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitizes `text` and returns a slug not yet issued in this document.
    pub fn next_id(&mut self, text: &str) -> String {
        self.unique(sanitize_heading_id(text))
    }

    /// Returns `slug`, or the first free suffixed variant of it.
    pub fn unique(&mut self, slug: String) -> String {
        let Some(&issued) = self.counts.get(&slug) else {
            self.counts.insert(slug.clone(), 0);
            return slug;
        };

        let mut n = issued;
        loop {
            n += 1;
            let candidate = format!("{slug}-{n}");
            if !self.counts.contains_key(&candidate) {
                self.counts.insert(slug, n);
                self.counts.insert(candidate.clone(), 0);
                return candidate;
            }
        }
    }

    /// Claims an explicit id so generated ones avoid it.
    pub fn reserve(&mut self, id: &str) {
        self.counts.entry(id.to_string()).or_insert(0);
    }

    /// Returns true if `id` was issued or reserved.
    pub fn contains(&self, id: &str) -> bool {
        self.counts.contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_table() {
        let cases = [
            ("This is a header", "this-is-a-header"),
            ("This is also          a header", "this-is-also-a-header"),
            ("main.go", "main-go"),
            ("Article 123", "article-123"),
            ("<- Let's try this, shall we?", "let-s-try-this-shall-we"),
            ("        ", "empty"),
            ("Hello, 世界", "hello-世界"),
            ("世界", "世界"),
            ("⌥", "empty"),
            ("", "empty"),
            ("Héllo Wörld", "héllo-wörld"),
            ("ΣΊΣΥΦΟΣ", "σίσυφοσ"),
            ("İstanbul", "istanbul"),
            ("İ", "i"),
        ];

        for (input, expected) in cases {
            assert_eq!(sanitize_heading_id(input), expected, "input {input:?}");
        }
    }

    #[test]
    fn sanitize_is_idempotent() {
        let inputs = [
            "This is a header",
            "<- Let's try",
            "Hello, 世界",
            "⌥",
            "a--b",
            "İstanbul",
            "İ",
        ];
        for input in inputs {
            let once = sanitize_heading_id(input);
            assert_eq!(sanitize_heading_id(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn never_leading_or_trailing_dash() {
        let slug = sanitize_heading_id("  --Intro!-- ");
        assert_eq!(slug, "intro");
    }

    #[test]
    fn split_heading_id_suffix() {
        assert_eq!(split_heading_id("Setup {#install}"), ("Setup", Some("install")));
        assert_eq!(split_heading_id("Setup {#install}  "), ("Setup", Some("install")));
        assert_eq!(split_heading_id("Setup"), ("Setup", None));
        assert_eq!(split_heading_id("Setup {#}"), ("Setup {#}", None));
        assert_eq!(split_heading_id("Setup {#a b}"), ("Setup {#a b}", None));
        assert_eq!(split_heading_id("Setup {.cls}"), ("Setup {.cls}", None));
    }

    #[test]
    fn deduplication() {
        let mut ids = HeadingIds::new();
        assert_eq!(ids.next_id("Title"), "title");
        assert_eq!(ids.next_id("Title"), "title-1");
        assert_eq!(ids.next_id("Title"), "title-2");
    }

    #[test]
    fn suffix_collisions_are_skipped() {
        let mut ids = HeadingIds::new();
        assert_eq!(ids.next_id("Title 1"), "title-1");
        assert_eq!(ids.next_id("Title"), "title");
        assert_eq!(ids.next_id("Title"), "title-2");
        assert_eq!(ids.next_id("Title 1"), "title-1-1");
    }

    #[test]
    fn reserve_prevents_collision() {
        let mut ids = HeadingIds::new();
        ids.reserve("intro");
        assert!(ids.contains("intro"));
        assert_eq!(ids.next_id("Intro"), "intro-1");
    }

    #[test]
    fn empty_headings_share_the_sentinel() {
        let mut ids = HeadingIds::new();
        assert_eq!(ids.next_id("???"), "empty");
        assert_eq!(ids.next_id("!!!"), "empty-1");
    }
}
