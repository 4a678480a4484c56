use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Why a string cannot name an environment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("environment name must not be empty")]
    Empty,
    #[error("environment name must start with a letter or underscore, not '{0}'")]
    InvalidStart(char),
    #[error("environment name may only contain letters, digits and underscores (found '{0}')")]
    InvalidChar(char),
}

/// A validated environment name
///
/// Names are Unicode identifiers: an `XID_Start` character or underscore,
/// then `XID_Continue` characters. That keeps every name a single path
/// component directly under the store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnvName(String);

fn start_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[\p{XID_Start}_]$").expect("start pattern is valid"))
}

fn continue_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\p{XID_Continue}$").expect("continue pattern is valid"))
}

fn char_matches(pattern: &Regex, ch: char) -> bool {
    let mut buf = [0u8; 4];
    pattern.is_match(ch.encode_utf8(&mut buf))
}

impl EnvName {
    pub fn parse(value: &str) -> Result<Self, NameError> {
        let mut chars = value.chars();
        let first = chars.next().ok_or(NameError::Empty)?;
        if !char_matches(start_pattern(), first) {
            return Err(NameError::InvalidStart(first));
        }
        if let Some(bad) = chars.find(|ch| !char_matches(continue_pattern(), *ch)) {
            return Err(NameError::InvalidChar(bad));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnvName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EnvName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("my_env2")]
    #[case("_private")]
    #[case("x")]
    #[case("Data_Science_3")]
    #[case("écoute")]
    #[case("e\u{301}te")]
    fn test_accepts_identifiers(#[case] input: &str) {
        let name = EnvName::parse(input).unwrap();
        assert_eq!(name.as_str(), input);
    }

    #[rstest]
    #[case("", NameError::Empty)]
    #[case("2bad", NameError::InvalidStart('2'))]
    #[case("my env", NameError::InvalidChar(' '))]
    #[case("a.b", NameError::InvalidChar('.'))]
    #[case("a/b", NameError::InvalidChar('/'))]
    #[case("..", NameError::InvalidStart('.'))]
    #[case("-flag", NameError::InvalidStart('-'))]
    #[case("dash-ed", NameError::InvalidChar('-'))]
    #[case("a²", NameError::InvalidChar('²'))]
    #[case("\u{301}e", NameError::InvalidStart('\u{301}'))]
    fn test_rejects_non_identifiers(#[case] input: &str, #[case] expected: NameError) {
        assert_eq!(EnvName::parse(input), Err(expected));
    }

    #[test]
    fn test_error_messages_mention_rule() {
        let err = EnvName::parse("a.b").unwrap_err();
        assert!(err.to_string().contains("letters, digits and underscores"));
    }
}
