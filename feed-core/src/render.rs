//! Post body rendering.
//!
//! Turns raw post text into an ordered list of [`Segment`]s: plain text or
//! autolinked URLs. The transform is pure and lossless: concatenating the
//! visible text of every segment gives back the input exactly. Only the link
//! target is normalized (a bare domain gets an `https://` prefix).

use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?i:https?://)?(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}(?::\d{1,5})?(?:/\S*)?$",
    )
    .expect("valid url regex")
});

/// One rendered piece of a post body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain text, including runs of whitespace.
    Text(String),
    /// A token recognized as a URL.
    Link {
        /// The token exactly as written.
        text: String,
        /// Link target, always with a scheme.
        href: String,
    },
}

impl Segment {
    /// The text a reader sees for this segment.
    pub fn visible_text(&self) -> &str {
        match self {
            Segment::Text(text) => text,
            Segment::Link { text, .. } => text,
        }
    }

    /// Whether this segment is a link.
    pub fn is_link(&self) -> bool {
        matches!(self, Segment::Link { .. })
    }
}

/// Render a post body into segments.
///
/// Whitespace runs and words alternate; each becomes its own segment.
/// Empty input renders nothing.
pub fn render(content: &str) -> Vec<Segment> {
    tokens(content).map(classify).collect()
}

/// Concatenate the visible text of rendered segments.
pub fn visible_text(segments: &[Segment]) -> String {
    segments.iter().map(Segment::visible_text).collect()
}

fn classify(token: &str) -> Segment {
    if token.chars().any(char::is_whitespace) || !URL_RE.is_match(token) {
        return Segment::Text(token.to_string());
    }

    let lower = token.to_ascii_lowercase();
    let href = if lower.starts_with("http://") || lower.starts_with("https://") {
        token.to_string()
    } else {
        format!("https://{}", token)
    };

    Segment::Link {
        text: token.to_string(),
        href,
    }
}

/// Split into maximal runs of whitespace / non-whitespace, keeping both.
fn tokens(content: &str) -> impl Iterator<Item = &str> {
    let mut rest = content;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let in_space = first.is_whitespace();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_whitespace() != in_space)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (token, tail) = rest.split_at(end);
        rest = tail;
        Some(token)
    })
}
