use crate::domain::Comment;

/// Plain-text export body: a `Comment:`/`Likes:` pair per comment, with a
/// blank line between comments.
pub fn format_comments(comments: &[Comment]) -> String {
    comments
        .iter()
        .map(|c| format!("Comment: {}\nLikes: {}\n", c.text, c.likes))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Compact like count for display: `999`, `1.2K`, `3.4M`.
pub fn format_likes(likes: u64) -> String {
    if likes >= 1_000_000 {
        format!("{:.1}M", likes as f64 / 1_000_000.0)
    } else if likes >= 1000 {
        format!("{:.1}K", likes as f64 / 1000.0)
    } else {
        likes.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_two_comments() {
        let text = format_comments(&[Comment::new("first", 120), Comment::new("second", 3)]);
        assert_eq!(text, "Comment: first\nLikes: 120\n\nComment: second\nLikes: 3\n");
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_comments(&[]), "");
    }

    #[test]
    fn test_format_likes() {
        assert_eq!(format_likes(999), "999");
        assert_eq!(format_likes(1200), "1.2K");
        assert_eq!(format_likes(15_000), "15.0K");
        assert_eq!(format_likes(3_400_000), "3.4M");
    }
}
