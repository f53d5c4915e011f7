use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Whole-input match: optional scheme and `www.`, then one of the three
/// accepted shapes followed by the 11-char identifier.
static VALID_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.)?(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([A-Za-z0-9_-]{11})",
    )
    .expect("Failed to compile YouTube regex")
});

/// Same shapes, unanchored. Used to pull the identifier out of a url.
static VIDEO_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([A-Za-z0-9_-]{11})")
        .expect("Failed to compile YouTube id regex")
});

pub fn is_valid_video_url(url: &str) -> bool {
    VALID_URL_REGEX.is_match(url)
}

/// Returns the identifier exactly as it appears in `url`.
pub fn extract_video_id(url: &str) -> Option<&str> {
    VIDEO_ID_REGEX
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Per-field validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn clear(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts = self
            .0
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>();
        write!(f, "{}", parts.join("; "))
    }
}

pub fn validate_required(value: &str, field_name: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{field_name} is required"));
    }
    None
}

pub fn validate_video_url(url: &str) -> Option<String> {
    if url.trim().is_empty() {
        return Some("YouTube URL is required".to_string());
    }
    if !is_valid_video_url(url.trim()) {
        return Some("Please enter a valid YouTube URL".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_three_url_shapes() {
        let cases = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "http://youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "www.youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "youtube.com/embed/dQw4w9WgXcQ?autoplay=1",
        ];

        for url in cases {
            assert!(is_valid_video_url(url), "{url} should be valid");
            assert_eq!(extract_video_id(url), Some("dQw4w9WgXcQ"), "{url}");
        }
    }

    #[test]
    fn keeps_identifier_as_written() {
        assert_eq!(
            extract_video_id("https://youtu.be/Ab-_9zXyQ01?si=xyz"),
            Some("Ab-_9zXyQ01")
        );
    }

    #[test]
    fn rejects_everything_else() {
        let cases = [
            "",
            "not a url",
            "https://vimeo.com/123456789",
            "https://youtu.be/short",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "ftp://youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?list=dQw4w9WgXcQ",
        ];

        for url in cases {
            assert!(!is_valid_video_url(url), "{url} should be invalid");
        }

        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id("https://youtu.be/short"), None);
    }

    #[test]
    fn validity_requires_match_at_start() {
        let url = "see https://youtu.be/dQw4w9WgXcQ";
        assert!(!is_valid_video_url(url));
        // extraction alone is not anchored
        assert_eq!(extract_video_id(url), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn url_messages() {
        assert_eq!(
            validate_video_url("   ").as_deref(),
            Some("YouTube URL is required")
        );
        assert_eq!(
            validate_video_url("https://example.com").as_deref(),
            Some("Please enter a valid YouTube URL")
        );
        assert_eq!(validate_video_url(" https://youtu.be/dQw4w9WgXcQ "), None);
    }

    #[test]
    fn required_field_is_trimmed() {
        assert_eq!(
            validate_required("  \t", "Video name").as_deref(),
            Some("Video name is required")
        );
        assert_eq!(validate_required(" x ", "Video name"), None);
    }
}
