use crate::domain::Comment;

/// Order by likes, most liked first. Equal counts keep their page order.
pub fn rank_comments(mut comments: Vec<Comment>) -> Vec<Comment> {
    // `sort_by` is stable.
    comments.sort_by(|a, b| b.likes.cmp(&a.likes));
    comments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_descending() {
        let ranked = rank_comments(vec![
            Comment::new("a", 1),
            Comment::new("b", 300),
            Comment::new("c", 20),
        ]);
        assert!(ranked.windows(2).all(|w| w[0].likes >= w[1].likes));
        assert_eq!(ranked[0].text, "b");
    }

    #[test]
    fn test_rank_keeps_source_order_on_ties() {
        let ranked = rank_comments(vec![
            Comment::new("first", 10),
            Comment::new("top", 99),
            Comment::new("second", 10),
            Comment::new("third", 10),
            Comment::new("low", 1),
        ]);
        let texts: Vec<_> = ranked.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["top", "first", "second", "third", "low"]);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank_comments(Vec::new()).is_empty());
    }
}
