use std::collections::BTreeSet;

use crate::{core::commands::BUILTINS, path::PathIndex, shell::Session};

/// Supplies executable names for completion, on top of the builtins.
pub trait CommandSource {
    fn command_names(&self) -> Vec<String>;
}

impl CommandSource for PathIndex {
    fn command_names(&self) -> Vec<String> {
        self.names().map(str::to_string).collect()
    }
}

impl CommandSource for Session {
    fn command_names(&self) -> Vec<String> {
        self.path_index().command_names()
    }
}

/// The word under completion and the words before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordContext {
    /// Earlier words joined by single spaces, with a trailing space when non-empty.
    pub prefix: String,
    /// Empty when the input ends in whitespace.
    pub current: String,
}

impl WordContext {
    pub fn from_input(input: &str) -> Self {
        let mut words: Vec<&str> = input.split_whitespace().collect();
        let ends_in_space = input.ends_with(char::is_whitespace);

        let current = if ends_in_space {
            String::new()
        } else {
            words.pop().unwrap_or_default().to_string()
        };
        let prefix = if words.is_empty() {
            String::new()
        } else {
            format!("{} ", words.join(" "))
        };

        Self { prefix, current }
    }
}

/// Sorted, deduplicated builtin and path names starting with `word`.
pub fn candidates(word: &str, source: &dyn CommandSource) -> Vec<String> {
    let mut names: BTreeSet<String> = BUILTINS.iter().map(|name| name.to_string()).collect();
    names.extend(source.command_names());
    names
        .into_iter()
        .filter(|name| name.starts_with(word))
        .collect()
}

pub fn longest_common_prefix(strings: &[String]) -> String {
    let Some((first, rest)) = strings.split_first() else {
        return String::new();
    };

    let mut len = first.len();
    for other in rest {
        len = first
            .char_indices()
            .zip(other.chars())
            .take_while(|((_, a), b)| a == b)
            .map(|((i, a), _)| i + a.len_utf8())
            .last()
            .unwrap_or(0)
            .min(len);
    }
    first[..len].to_string()
}
