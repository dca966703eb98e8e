//! Turns rendered comment elements into filtered [`Comment`] values.

use tracing::info;

use crate::agent::config::LoaderConfig;
use crate::agent::loader::load;
use crate::agent::{ExtractError, PageDriver, RawItem};
use crate::domain::Comment;

/// Load the thread, then read and filter whatever is rendered.
pub async fn extract<D: PageDriver + ?Sized>(
    driver: &D,
    min_likes: u64,
    config: &LoaderConfig,
) -> Result<Vec<Comment>, ExtractError> {
    load(driver, config).await?;

    let items = driver.read_items().await?;
    if items.is_empty() {
        return Err(ExtractError::NoContentFound);
    }
    info!("Found {} comments", items.len());

    let comments = filter_items(&items, min_likes);
    info!(
        "Filtered to {} comments with >={} likes",
        comments.len(),
        min_likes
    );
    Ok(comments)
}

/// Keep items whose parsed like count reaches `min_likes`, in page order.
/// Items missing their text or like label are skipped.
pub fn filter_items(items: &[RawItem], min_likes: u64) -> Vec<Comment> {
    items
        .iter()
        .filter_map(|item| {
            let text = item.text.as_deref()?;
            let label = item.likes_label.as_deref()?;
            Some(Comment::new(normalize_text(text), parse_likes(label)))
        })
        .filter(|comment| comment.likes >= min_likes)
        .collect()
}

/// Strip control and zero-width characters, then surrounding whitespace.
pub fn normalize_text(raw: &str) -> String {
    raw.chars()
        .filter(|&c| !is_invisible(c))
        .collect::<String>()
        .trim()
        .to_string()
}

fn is_invisible(c: char) -> bool {
    matches!(c,
        '\u{0}'..='\u{1F}'
        | '\u{7F}'..='\u{9F}'
        | '\u{200B}'..='\u{200D}'
        | '\u{2060}'
        | '\u{FEFF}'
    )
}

/// Parse a like label such as `"1.2K"`, `"2.5k"` or `"37"`.
///
/// Labels containing a `k` are read as a decimal prefix in thousands and
/// rounded; anything else keeps only its digits. Unparseable labels are 0.
pub fn parse_likes(label: &str) -> u64 {
    let label = label.trim();
    let lower = label.to_lowercase();

    if lower.contains('k') {
        let without_k = lower.replacen('k', "", 1);
        return match float_prefix(&without_k) {
            Some(value) => {
                let likes = (value * 1000.0).round();
                if likes.is_finite() && likes > 0.0 {
                    likes as u64
                } else {
                    0
                }
            }
            None => 0,
        };
    }

    let digits: String = label.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// Longest leading decimal number, ignoring leading whitespace.
fn float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, c) in s.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return None;
    }
    s[..end].trim_end_matches('.').parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedPage;

    fn item(text: &str, likes: &str) -> RawItem {
        RawItem {
            text: Some(text.to_string()),
            likes_label: Some(likes.to_string()),
        }
    }

    #[test]
    fn test_parse_likes_thousands() {
        assert_eq!(parse_likes("1.2K"), 1200);
        assert_eq!(parse_likes("2.5k"), 2500);
        assert_eq!(parse_likes(" 3K "), 3000);
    }

    #[test]
    fn test_parse_likes_plain_numbers() {
        assert_eq!(parse_likes("10"), 10);
        assert_eq!(parse_likes("1,234"), 1234);
        assert_eq!(parse_likes("  42\n"), 42);
    }

    #[test]
    fn test_parse_likes_garbage_is_zero() {
        assert_eq!(parse_likes(""), 0);
        assert_eq!(parse_likes("   "), 0);
        assert_eq!(parse_likes("Like"), 0);
        assert_eq!(parse_likes("k"), 0);
        assert_eq!(parse_likes("-1K"), 0);
    }

    #[test]
    fn test_normalize_strips_invisible_characters() {
        assert_eq!(normalize_text("  Great\u{200B} video\u{FEFF}!\n"), "Great video!");
        assert_eq!(normalize_text("\u{0}\u{1F}line\u{7F}\u{9F}"), "line");
        assert_eq!(normalize_text("emoji 🎉 stays"), "emoji 🎉 stays");
    }

    #[test]
    fn test_filter_respects_threshold_for_every_comment() {
        let items = vec![
            item("a", "5"),
            item("b", "10"),
            item("c", "1.2K"),
            item("d", ""),
            item("e", "11"),
        ];
        for threshold in [0, 1, 5, 10, 11, 1200, 5000] {
            let kept = filter_items(&items, threshold);
            assert!(kept.iter().all(|c| c.likes >= threshold));
        }
        let kept = filter_items(&items, 10);
        let texts: Vec<_> = kept.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c", "e"]);
    }

    #[test]
    fn test_filter_skips_incomplete_items() {
        let items = vec![
            RawItem {
                text: None,
                likes_label: Some("99".into()),
            },
            RawItem {
                text: Some("no label".into()),
                likes_label: None,
            },
            item("kept", "99"),
        ];
        assert_eq!(filter_items(&items, 0), vec![Comment::new("kept", 99)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_extract_with_no_items_fails() {
        let page = ScriptedPage::new(vec![0], vec![]);
        let err = extract(&page, 10, &LoaderConfig::default()).await.unwrap_err();
        assert!(matches!(err, ExtractError::NoContentFound));
    }

    #[tokio::test(start_paused = true)]
    async fn test_extract_threshold_above_max_is_empty_success() {
        let page = ScriptedPage::new(vec![2, 2, 2, 2], vec![item("a", "3"), item("b", "7")]);
        let comments = extract(&page, 1000, &LoaderConfig::default()).await.unwrap();
        assert!(comments.is_empty());
    }
}
