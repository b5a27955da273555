use regex::Regex;

const MIN_DESCRIPTION_CHARS: usize = 3;

/// Boilerplate a proxy puts around a post's caption.
#[derive(Debug, Clone, Copy)]
pub struct Boilerplate {
    pub leading_words: &'static [&'static str],
    pub trailing_patterns: &'static [&'static str],
}

impl Boilerplate {
    pub fn clean(&self, raw: &str) -> String {
        let mut text = collapse_whitespace(raw);
        if !self.leading_words.is_empty() {
            let pattern = format!(r"^(?:{})\b[\s:]*", self.leading_words.join("|"));
            text = strip(&text, &pattern);
        }
        for pattern in self.trailing_patterns {
            text = strip(&text, pattern);
        }
        text
    }

    /// Cleans `raw`, falling back to `fallback` when nothing meaningful is left.
    pub fn describe(&self, raw: Option<String>, fallback: &str) -> String {
        let cleaned = raw.map(|raw| self.clean(&raw)).unwrap_or_default();
        if cleaned.chars().count() < MIN_DESCRIPTION_CHARS {
            fallback.to_string()
        } else {
            cleaned
        }
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip(text: &str, pattern: &str) -> String {
    match Regex::new(pattern) {
        Ok(regex) => regex.replace(text, "").trim().to_string(),
        Err(_) => text.to_string(),
    }
}
