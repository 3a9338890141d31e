use super::words::{split_words, QuoteState};

/// Output redirection targets for a single command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirections {
    pub stdout: Option<String>,
    pub stdout_append: bool,
    pub stderr: Option<String>,
    pub stderr_append: bool,
}

impl Redirections {
    pub fn is_empty(&self) -> bool {
        self.stdout.is_none() && self.stderr.is_none()
    }

    fn set(&mut self, stream: Stream, target: String, append: bool) {
        match stream {
            Stream::Stdout => {
                self.stdout = Some(target);
                self.stdout_append = append;
            }
            Stream::Stderr => {
                self.stderr = Some(target);
                self.stderr_append = append;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

struct Operator {
    stream: Stream,
    append: bool,
    len: usize,
}

/// Recognizes `>`, `>>`, `1>`, `1>>`, `2>`, `2>>` at `i`. A descriptor digit
/// only counts when it starts a word.
fn operator_at(chars: &[char], i: usize, word_start: bool) -> Option<Operator> {
    let (stream, arrow) = match chars[i] {
        '>' => (Stream::Stdout, i),
        '1' if word_start && chars.get(i + 1) == Some(&'>') => (Stream::Stdout, i + 1),
        '2' if word_start && chars.get(i + 1) == Some(&'>') => (Stream::Stderr, i + 1),
        _ => return None,
    };
    let append = chars.get(arrow + 1) == Some(&'>');
    let len = arrow - i + 1 + usize::from(append);
    Some(Operator {
        stream,
        append,
        len,
    })
}

/// Reads a redirection target starting at `start`, up to the next unquoted
/// whitespace or `>`. Returns the raw text and the index after it.
fn read_target(chars: &[char], start: usize) -> (String, usize) {
    let mut raw = String::new();
    let mut state = QuoteState::Unquoted;
    let mut i = start;

    while i < chars.len() {
        let c = chars[i];
        match state {
            QuoteState::Unquoted => {
                if c.is_whitespace() || c == '>' {
                    break;
                }
                match c {
                    '\'' => state = QuoteState::Single,
                    '"' => state = QuoteState::Double,
                    '\\' if i + 1 < chars.len() => {
                        raw.push(c);
                        i += 1;
                    }
                    _ => {}
                }
            }
            QuoteState::Single if c == '\'' => state = QuoteState::Unquoted,
            QuoteState::Double if c == '"' => state = QuoteState::Unquoted,
            QuoteState::Double if c == '\\' && i + 1 < chars.len() => {
                raw.push(c);
                i += 1;
            }
            _ => {}
        }
        raw.push(chars[i]);
        i += 1;
    }

    (raw, i)
}

/// Pulls every redirection operator and its target out of `input`.
///
/// Returns the remaining command text (trimmed) and the collected targets.
/// Later operators for the same stream override earlier ones. Operators inside
/// quotes are ordinary text, and an operator without a target is left in place.
pub fn extract_redirections(input: &str) -> (String, Redirections) {
    let chars: Vec<char> = input.chars().collect();
    let mut command = String::with_capacity(input.len());
    let mut redirections = Redirections::default();
    let mut state = QuoteState::Unquoted;
    let mut word_start = true;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match state {
            QuoteState::Unquoted => {
                if let Some(op) = operator_at(&chars, i, word_start) {
                    let mut target_start = i + op.len;
                    while target_start < chars.len() && chars[target_start].is_whitespace() {
                        target_start += 1;
                    }
                    let (raw, end) = read_target(&chars, target_start);
                    if !raw.is_empty() {
                        redirections.set(op.stream, split_words(&raw).concat(), op.append);
                        word_start = true;
                        i = end;
                        continue;
                    }
                    command.extend(&chars[i..i + op.len]);
                    word_start = false;
                    i += op.len;
                    continue;
                }

                match c {
                    '\'' => state = QuoteState::Single,
                    '"' => state = QuoteState::Double,
                    '\\' if i + 1 < chars.len() => {
                        command.push(c);
                        i += 1;
                    }
                    _ => {}
                }
                word_start = c.is_whitespace();
            }
            QuoteState::Single if c == '\'' => state = QuoteState::Unquoted,
            QuoteState::Double if c == '"' => state = QuoteState::Unquoted,
            QuoteState::Double if c == '\\' && i + 1 < chars.len() => {
                command.push(c);
                i += 1;
            }
            _ => {}
        }
        command.push(chars[i]);
        i += 1;
    }

    (command.trim().to_string(), redirections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdout_and_stderr_targets() {
        let (command, redirections) = extract_redirections("cat file > out.txt 2> err.txt");
        assert_eq!(command, "cat file");
        assert_eq!(redirections.stdout.as_deref(), Some("out.txt"));
        assert!(!redirections.stdout_append);
        assert_eq!(redirections.stderr.as_deref(), Some("err.txt"));
        assert!(!redirections.stderr_append);
    }

    #[test]
    fn test_append_operators() {
        let (command, redirections) = extract_redirections("ls 1>> log.txt 2>>errs");
        assert_eq!(command, "ls");
        assert_eq!(redirections.stdout.as_deref(), Some("log.txt"));
        assert!(redirections.stdout_append);
        assert_eq!(redirections.stderr.as_deref(), Some("errs"));
        assert!(redirections.stderr_append);
    }

    #[test]
    fn test_operator_without_spaces() {
        let (command, redirections) = extract_redirections("echo hi>out");
        assert_eq!(command, "echo hi");
        assert_eq!(redirections.stdout.as_deref(), Some("out"));
    }

    #[test]
    fn test_last_operator_wins() {
        let (command, redirections) = extract_redirections("echo x > a >> b");
        assert_eq!(command, "echo x");
        assert_eq!(redirections.stdout.as_deref(), Some("b"));
        assert!(redirections.stdout_append);
    }

    #[test]
    fn test_quoted_operator_is_text() {
        let (command, redirections) = extract_redirections(r#"echo "a > b" '2>c'"#);
        assert_eq!(command, r#"echo "a > b" '2>c'"#);
        assert!(redirections.is_empty());
    }

    #[test]
    fn test_digit_inside_word_is_not_descriptor() {
        let (command, redirections) = extract_redirections("echo a1>f");
        assert_eq!(command, "echo a1");
        assert_eq!(redirections.stdout.as_deref(), Some("f"));
    }

    #[test]
    fn test_quoted_target() {
        let (command, redirections) = extract_redirections(r#"echo hi > "my file.txt""#);
        assert_eq!(command, "echo hi");
        assert_eq!(redirections.stdout.as_deref(), Some("my file.txt"));
    }

    #[test]
    fn test_missing_target_is_left_in_place() {
        let (command, redirections) = extract_redirections("echo hi >");
        assert_eq!(command, "echo hi >");
        assert!(redirections.is_empty());
    }

    #[test]
    fn test_redirection_in_middle() {
        let (command, redirections) = extract_redirections("echo a 2>/dev/null b");
        assert_eq!(command, "echo a  b");
        assert_eq!(redirections.stderr.as_deref(), Some("/dev/null"));
    }

    #[test]
    fn test_escaped_operator_is_text() {
        let (command, redirections) = extract_redirections(r"echo \> x");
        assert_eq!(command, r"echo \> x");
        assert!(redirections.is_empty());
    }
}
