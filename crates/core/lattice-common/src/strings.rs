//! String helpers for the Lattice ecosystem.
//!
//! Substring slicing around needles, truncation, quoting, base64 and JSON
//! helpers, exposed as an extension trait on `str` plus a handful of free
//! functions for casing and random identifiers.

use crate::{LatticeError, LatticeResult};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::Rng;
use uuid::Uuid;

/// Character appended by [`StrExt::truncate_at`] in place of cut-off text.
pub const ELLIPSIS: char = '\u{2026}';

/// Controls how the substring helpers treat the needle and misses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubstringOptions {
    /// Keep the needle itself in the returned slice.
    pub include_needle: bool,
    /// Return an empty string when the needle is absent instead of the
    /// whole source.
    pub empty_if_missing: bool,
}

impl SubstringOptions {
    /// Options that keep the needle in the result.
    #[must_use]
    pub fn keep_needle() -> Self {
        Self { include_needle: true, empty_if_missing: false }
    }

    /// Options that yield an empty string on a miss.
    #[must_use]
    pub fn strict() -> Self {
        Self { include_needle: false, empty_if_missing: true }
    }
}

/// ASCII case-insensitive search. Byte positions are valid `str` indices
/// because only ASCII letters are folded.
fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    let hay = haystack.as_bytes();
    let ndl = needle.as_bytes();
    (0..=hay.len() - ndl.len()).find(|&i| {
        hay[i..i + ndl.len()]
            .iter()
            .zip(ndl)
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    })
}

fn rfind_ci(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    let hay = haystack.as_bytes();
    let ndl = needle.as_bytes();
    (0..=hay.len() - ndl.len()).rev().find(|&i| {
        hay[i..i + ndl.len()]
            .iter()
            .zip(ndl)
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    })
}

/// Extension methods on `str`.
pub trait StrExt {
    /// Returns the part of the string before the first occurrence of
    /// `needle` (ASCII case-insensitive).
    fn substring_before(&self, needle: &str, options: SubstringOptions) -> &str;

    /// Returns the part of the string after the first occurrence of
    /// `needle` (ASCII case-insensitive).
    fn substring_after(&self, needle: &str, options: SubstringOptions) -> &str;

    /// Returns the part of the string before the last occurrence of
    /// `needle` (ASCII case-insensitive).
    fn substring_before_last(&self, needle: &str, options: SubstringOptions) -> &str;

    /// Returns the part of the string after the last occurrence of
    /// `needle` (ASCII case-insensitive).
    fn substring_after_last(&self, needle: &str, options: SubstringOptions) -> &str;

    /// Returns the part of the string between `start` and `end`.
    ///
    /// A missing `end` needle extends the slice to the end of the string
    /// unless `empty_if_missing` is set.
    fn substring_between(&self, start: &str, end: &str, options: SubstringOptions) -> &str;

    /// Truncates to at most `max_len` characters, optionally replacing the
    /// last kept character with an ellipsis.
    fn truncate_at(&self, max_len: usize, add_ellipsis: bool) -> String;

    /// Wraps the string in `quote` characters.
    fn quote(&self, quote: char) -> String;

    /// Removes every occurrence of `needle`.
    fn remove(&self, needle: &str) -> String;

    /// Removes all double quotes.
    fn remove_quotes(&self) -> String;

    /// Replaces spaces with `%20`.
    fn escape_spaces(&self) -> String;

    /// Strips one trailing occurrence of `suffix`, if present.
    fn trim_end_once<'a>(&'a self, suffix: &str) -> &'a str;

    /// Strips one leading occurrence of `prefix`, if present.
    fn trim_start_once<'a>(&'a self, prefix: &str) -> &'a str;

    /// Cuts the string at the last occurrence of `needle` (needle removed).
    fn trim_end_at<'a>(&'a self, needle: &str) -> &'a str;

    /// ASCII case-insensitive equality.
    fn equals_insensitive(&self, other: &str) -> bool;

    /// ASCII case-insensitive containment.
    fn contains_insensitive(&self, needle: &str) -> bool;

    /// Checks whether the string is syntactically valid standard base64.
    fn is_base64(&self) -> bool;

    /// Encodes the string as standard base64.
    fn to_base64(&self) -> String;

    /// Decodes standard base64 into a UTF-8 string.
    fn from_base64(&self) -> LatticeResult<String>;

    /// Appends a line break.
    fn line_break(&self) -> String;

    /// Appends two line breaks.
    fn paragraph(&self) -> String;

    /// `None` when the string is empty.
    fn nil_if_empty(&self) -> Option<&str>;

    /// Falls back to `alternative` when the string is empty.
    fn or_if_empty<'a>(&'a self, alternative: &'a str) -> &'a str;

    /// Joins two path-ish segments with a single forward slash.
    fn combine(&self, other: &str) -> String;

    /// Upper-case hex MD5 digest of the string bytes.
    fn md5_hex(&self) -> String;

    /// Pretty-prints a JSON document; returns the input unchanged when it
    /// does not parse.
    fn format_json(&self) -> String;

    /// Parses a UUID, yielding the nil UUID on failure.
    fn parse_uuid_or_nil(&self) -> Uuid;
}

impl StrExt for str {
    fn substring_before(&self, needle: &str, options: SubstringOptions) -> &str {
        match find_ci(self, needle) {
            None if options.empty_if_missing => "",
            None => self,
            Some(i) => {
                let end = if options.include_needle { i + needle.len() } else { i };
                &self[..end]
            }
        }
    }

    fn substring_after(&self, needle: &str, options: SubstringOptions) -> &str {
        match find_ci(self, needle) {
            None if options.empty_if_missing => "",
            None => self,
            Some(i) => {
                let start = if options.include_needle { i } else { i + needle.len() };
                &self[start..]
            }
        }
    }

    fn substring_before_last(&self, needle: &str, options: SubstringOptions) -> &str {
        match rfind_ci(self, needle) {
            None if options.empty_if_missing => "",
            None => self,
            Some(i) => {
                let end = if options.include_needle { i + needle.len() } else { i };
                &self[..end]
            }
        }
    }

    fn substring_after_last(&self, needle: &str, options: SubstringOptions) -> &str {
        match rfind_ci(self, needle) {
            None if options.empty_if_missing => "",
            None => self,
            Some(i) => {
                let start = if options.include_needle { i } else { i + needle.len() };
                &self[start..]
            }
        }
    }

    fn substring_between(&self, start: &str, end: &str, options: SubstringOptions) -> &str {
        let Some(start_idx) = find_ci(self, start) else {
            return if options.empty_if_missing { "" } else { self };
        };
        let from = if options.include_needle { start_idx } else { start_idx + start.len() };

        match find_ci(&self[from..], end) {
            None if options.empty_if_missing => "",
            None => &self[from..],
            Some(rel) => {
                let to = if options.include_needle { from + rel + end.len() } else { from + rel };
                &self[from..to]
            }
        }
    }

    fn truncate_at(&self, max_len: usize, add_ellipsis: bool) -> String {
        if max_len == 0 || self.chars().count() <= max_len {
            return self.to_string();
        }

        if add_ellipsis {
            let mut out: String = self.chars().take(max_len - 1).collect();
            out.push(ELLIPSIS);
            out
        } else {
            self.chars().take(max_len).collect()
        }
    }

    fn quote(&self, quote: char) -> String {
        format!("{quote}{self}{quote}")
    }

    fn remove(&self, needle: &str) -> String {
        if needle.is_empty() {
            return self.to_string();
        }
        self.replace(needle, "")
    }

    fn remove_quotes(&self) -> String {
        self.remove("\"")
    }

    fn escape_spaces(&self) -> String {
        self.replace(' ', "%20")
    }

    fn trim_end_once<'a>(&'a self, suffix: &str) -> &'a str {
        self.strip_suffix(suffix).unwrap_or(self)
    }

    fn trim_start_once<'a>(&'a self, prefix: &str) -> &'a str {
        self.strip_prefix(prefix).unwrap_or(self)
    }

    fn trim_end_at<'a>(&'a self, needle: &str) -> &'a str {
        match self.rfind(needle) {
            Some(i) => &self[..i],
            None => self,
        }
    }

    fn equals_insensitive(&self, other: &str) -> bool {
        self.eq_ignore_ascii_case(other)
    }

    fn contains_insensitive(&self, needle: &str) -> bool {
        find_ci(self, needle).is_some()
    }

    fn is_base64(&self) -> bool {
        if self.is_empty() || self.len() % 4 != 0 {
            return false;
        }

        let mut end = self.len();
        let bytes = self.as_bytes();
        if bytes[end - 1] == b'=' {
            end -= 1;
        }
        if bytes[end - 1] == b'=' {
            end -= 1;
        }

        bytes[..end]
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || *b == b'+' || *b == b'/')
    }

    fn to_base64(&self) -> String {
        BASE64.encode(self.as_bytes())
    }

    fn from_base64(&self) -> LatticeResult<String> {
        let bytes = BASE64.decode(self)?;
        String::from_utf8(bytes).map_err(|e| LatticeError::encoding(e.to_string()))
    }

    fn line_break(&self) -> String {
        format!("{self}\n")
    }

    fn paragraph(&self) -> String {
        format!("{self}\n\n")
    }

    fn nil_if_empty(&self) -> Option<&str> {
        if self.is_empty() { None } else { Some(self) }
    }

    fn or_if_empty<'a>(&'a self, alternative: &'a str) -> &'a str {
        if self.is_empty() { alternative } else { self }
    }

    fn combine(&self, other: &str) -> String {
        if self.is_empty() {
            return other.to_string();
        }
        if other.is_empty() {
            return self.to_string();
        }

        let left = self.trim_end_matches(['/', '\\']);
        let right = other.trim_start_matches(['/', '\\']);
        format!("{left}/{right}")
    }

    fn md5_hex(&self) -> String {
        hex::encode_upper(md5::compute(self.as_bytes()).0)
    }

    fn format_json(&self) -> String {
        if self.is_empty() {
            return self.to_string();
        }

        match serde_json::from_str::<serde_json::Value>(self) {
            Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| self.to_string()),
            Err(_) => self.to_string(),
        }
    }

    fn parse_uuid_or_nil(&self) -> Uuid {
        Uuid::parse_str(self).unwrap_or(Uuid::nil())
    }
}

/// Check if a string is empty or contains only whitespace
#[must_use]
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Convert string to title case
#[must_use]
pub fn to_title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert string to `snake_case`
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_was_upper = false;

    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 && !prev_was_upper {
                result.push('_');
            }
            result.extend(c.to_lowercase());
            prev_was_upper = true;
        } else {
            result.push(c);
            prev_was_upper = false;
        }
    }

    result
}

/// Convert string to kebab-case
#[must_use]
pub fn to_kebab_case(s: &str) -> String {
    to_snake_case(s).replace('_', "-")
}

/// Generate a random alphanumeric string of given length
#[must_use]
pub fn random_alphanumeric(length: usize) -> String {
    const CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char)
        .collect()
}
