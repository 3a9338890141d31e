mod redirect;
mod words;

pub use redirect::{extract_redirections, Redirections};
pub use words::split_words;

use log::trace;

/// A command line after redirection extraction and word splitting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLine {
    pub words: Vec<String>,
    pub redirections: Redirections,
}

pub fn parse_line(line: &str) -> ParsedLine {
    let (command, redirections) = extract_redirections(line);
    let words = split_words(&command);
    trace!("parsed {:?} -> {:?} {:?}", line, words, redirections);
    ParsedLine {
        words,
        redirections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let parsed = parse_line(r#"echo 'a > b' "c" >> out.log"#);
        assert_eq!(parsed.words, vec!["echo", "a > b", "c"]);
        assert_eq!(parsed.redirections.stdout.as_deref(), Some("out.log"));
        assert!(parsed.redirections.stdout_append);
    }

    #[test]
    fn test_redirection_only_line_has_no_words() {
        let parsed = parse_line("> out.txt");
        assert!(parsed.words.is_empty());
    }
}
