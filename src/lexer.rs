//! A module implementing lexical analysis (tokenization) of a command line.
//!
//! The grammar is deliberately flat: a line is a run of words separated by
//! blanks. There is no quoting, no escaping and no expansion, so the text
//! between two delimiters is taken verbatim.

use std::ops::Index;

/// Characters that separate words on a command line.
pub const DELIMITERS: [char; 4] = [' ', '\t', '\r', '\n'];

/// An ordered sequence of words produced from one command line.
///
/// The first word is the command name, the rest are its positional arguments.
/// Every word is non-empty and free of [`DELIMITERS`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens(Vec<String>);

impl Tokens {
    /// The command name, if the line contained any word at all.
    pub fn command(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Everything after the command name.
    pub fn args(&self) -> &[String] {
        self.0.get(1..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Borrowed view of all words, command name included.
    pub fn as_strs(&self) -> Vec<&str> {
        self.0.iter().map(String::as_str).collect()
    }
}

impl Index<usize> for Tokens {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Tokens {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Tokens {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<S: Into<String>> FromIterator<S> for Tokens {
    /// Collects words as-is. Callers are expected to pass non-empty,
    /// delimiter-free words; use [`split_into_tokens`] for raw input.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Tokens(iter.into_iter().map(Into::into).collect())
    }
}

/// Splits `line` on maximal runs of [`DELIMITERS`].
///
/// Leading and trailing delimiters produce no empty words, and a blank line
/// yields an empty [`Tokens`]. Tokenization never fails. The returned words own
/// their text, so `line` can be dropped right after the call.
pub fn split_into_tokens(line: &str) -> Tokens {
    line.split(DELIMITERS)
        .filter(|word| !word.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<String> {
        split_into_tokens(line).into_iter().collect()
    }

    #[test]
    fn test_simple_command_with_args() {
        assert_eq!(words("echo hello world"), vec!["echo", "hello", "world"]);
    }

    #[test]
    fn test_runs_of_mixed_delimiters_collapse() {
        assert_eq!(words("  ls\t\t-l \r\n  /tmp \n"), vec!["ls", "-l", "/tmp"]);
    }

    #[test]
    fn test_blank_lines_yield_no_tokens() {
        for line in ["", " ", "\t", "\r\n", " \t \r \n "] {
            let tokens = split_into_tokens(line);
            assert!(tokens.is_empty(), "expected no tokens for {line:?}");
            assert_eq!(tokens.command(), None);
            assert!(tokens.args().is_empty());
        }
    }

    #[test]
    fn test_no_quoting_or_escaping() {
        assert_eq!(
            words(r#"echo "a b" 'c' \d $HOME"#),
            vec!["echo", "\"a", "b\"", "'c'", "\\d", "$HOME"]
        );
    }

    #[test]
    fn test_other_whitespace_is_token_content() {
        // vertical tab and form feed are not delimiters
        assert_eq!(words("a\x0bb c\x0cd"), vec!["a\x0bb", "c\x0cd"]);
    }

    #[test]
    fn test_command_and_args_split() {
        let tokens = split_into_tokens("cd /tmp extra");
        assert_eq!(tokens.command(), Some("cd"));
        assert_eq!(tokens.args(), ["/tmp", "extra"]);
        assert_eq!(tokens.len(), 3);
        assert_eq!(&tokens[1], "/tmp");
        assert_eq!(tokens.as_strs(), vec!["cd", "/tmp", "extra"]);
    }

    #[test]
    fn test_tokens_outlive_input() {
        let tokens = {
            let line = String::from("help me");
            split_into_tokens(&line)
        };
        assert_eq!(tokens.command(), Some("help"));
    }

    #[test]
    fn test_tokens_are_never_empty_or_delimited() {
        let tokens = split_into_tokens("\t a  bb\r\r ccc \n");
        for word in &tokens {
            assert!(!word.is_empty());
            assert!(!word.contains(DELIMITERS));
        }
        assert_eq!(tokens.len(), 3);
    }
}
