use serde::{Deserialize, Serialize};

/// Threshold applied when a start command carries no `minLikes`.
pub const DEFAULT_MIN_LIKES: u64 = 10;

/// A single extracted comment. Equality is structural; duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub likes: u64,
}

impl Comment {
    pub fn new(text: impl Into<String>, likes: u64) -> Self {
        Self {
            text: text.into(),
            likes,
        }
    }
}

/// One user-initiated extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    #[serde(rename = "minLikes", default = "default_min_likes")]
    pub min_likes: u64,
}

impl Default for ExtractionRequest {
    fn default() -> Self {
        Self {
            min_likes: DEFAULT_MIN_LIKES,
        }
    }
}

impl ExtractionRequest {
    /// A missing threshold falls back to the default. Zero is honored.
    pub fn from_option(min_likes: Option<u64>) -> Self {
        min_likes.map_or_else(Self::default, |min_likes| Self { min_likes })
    }
}

fn default_min_likes() -> u64 {
    DEFAULT_MIN_LIKES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_to_ten() {
        assert_eq!(ExtractionRequest::default().min_likes, 10);
        assert_eq!(ExtractionRequest::from_option(None).min_likes, 10);
        assert_eq!(ExtractionRequest::from_option(Some(0)).min_likes, 0);
        assert_eq!(ExtractionRequest::from_option(Some(250)).min_likes, 250);
    }

    #[test]
    fn test_request_missing_field_deserializes_to_default() {
        let req: ExtractionRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.min_likes, DEFAULT_MIN_LIKES);
    }

    #[test]
    fn test_comment_json_shape() {
        let json = serde_json::to_value(Comment::new("hello", 42)).unwrap();
        assert_eq!(json, serde_json::json!({ "text": "hello", "likes": 42 }));
    }
}
