#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QuoteState {
    Unquoted,
    Single,
    Double,
}

/// Characters a backslash may escape inside double quotes.
fn escapable_in_double(c: char) -> bool {
    matches!(c, '"' | '\\' | '$' | '`')
}

/// Splits a command into shell words, removing quotes and escapes.
///
/// Single quotes keep everything literal. Inside double quotes a backslash only
/// escapes `"`, `\`, `$` and backtick. Outside quotes a backslash escapes any
/// character. An unterminated quote is closed implicitly at the end of input.
pub fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut state = QuoteState::Unquoted;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            QuoteState::Unquoted => match c {
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        words.push(std::mem::take(&mut current));
                    }
                }
                '\'' => state = QuoteState::Single,
                '"' => state = QuoteState::Double,
                '\\' => {
                    // a trailing backslash is dropped
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                _ => current.push(c),
            },
            QuoteState::Single => match c {
                '\'' => state = QuoteState::Unquoted,
                _ => current.push(c),
            },
            QuoteState::Double => match c {
                '"' => state = QuoteState::Unquoted,
                '\\' => match chars.peek() {
                    Some(&next) if escapable_in_double(next) => {
                        current.push(next);
                        chars.next();
                    }
                    _ => current.push('\\'),
                },
                _ => current.push(c),
            },
        }
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}
