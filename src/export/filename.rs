/// Base name used when nothing survives sanitizing.
pub const DEFAULT_BASE_NAME: &str = "youtube";
/// Appended to every export name.
pub const NAME_SUFFIX: &str = "_comments";
pub const EXTENSION: &str = "txt";

const MAX_BASE_LEN: usize = 100;

/// Filesystem-safe `<base>_comments` name derived from a page title.
///
/// Emoji, characters illegal in file names and anything non-ASCII are
/// dropped, whitespace runs collapse to one space, and the base is capped
/// at 100 characters.
pub fn sanitize_file_name(title: &str) -> String {
    let without_symbols: String = title
        .chars()
        .filter(|&c| !is_pictographic(c) && !is_forbidden(c))
        .collect();

    let collapsed = collapse_whitespace(&without_symbols);
    let ascii: String = collapsed.chars().filter(char::is_ascii).collect();
    let base: String = ascii.trim().chars().take(MAX_BASE_LEN).collect();

    if base.is_empty() {
        format!("{DEFAULT_BASE_NAME}{NAME_SUFFIX}")
    } else {
        format!("{base}{NAME_SUFFIX}")
    }
}

fn collapse_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_run = false;
    for c in input.chars() {
        if is_space(c) {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// The set matched by a browser's `\s`. Unlike `char::is_whitespace` it
/// includes U+FEFF and excludes U+0085.
fn is_space(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | ' '
        | '\u{A0}' | '\u{1680}' | '\u{2000}'..='\u{200A}'
        | '\u{2028}' | '\u{2029}' | '\u{202F}' | '\u{205F}'
        | '\u{3000}' | '\u{FEFF}'
    )
}

fn is_pictographic(c: char) -> bool {
    matches!(c,
        '\u{1F600}'..='\u{1F64F}'
        | '\u{1F300}'..='\u{1F5FF}'
        | '\u{1F680}'..='\u{1F6FF}'
        | '\u{2600}'..='\u{26FF}'
        | '\u{2700}'..='\u{27BF}'
    )
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' | '\0'..='\u{1F}'
    )
}
