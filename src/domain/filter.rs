//! Tokenizing and completion filtering shared by every node kind

use itertools::Itertools;

/// Split a command line into argument tokens on whitespace.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Tokenize a line that is still being typed.
///
/// An empty line, or one ending in whitespace, yields a trailing empty token:
/// the user is about to type the next word and every candidate matches it.
pub fn tokenize_partial(line: &str) -> Vec<String> {
    let mut tokens = tokenize(line);
    if line.is_empty() || line.ends_with(char::is_whitespace) {
        tokens.push(String::new());
    }
    tokens
}

/// Completion policy: case-insensitive "starts with".
pub fn matches_prefix(candidate: &str, token: &str) -> bool {
    candidate.to_lowercase().starts_with(&token.to_lowercase())
}

/// Keep the candidates matching `token`, sorted and without duplicates.
pub fn filter_prefix<'a, I>(candidates: I, token: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    candidates
        .into_iter()
        .filter(|candidate| matches_prefix(candidate, token))
        .sorted()
        .dedup()
        .map(str::to_string)
        .collect()
}
