//! Question tokenization.

/// Words never treated as protocol candidates.
pub const STOP_WORDS: &[&str] = &[
    "what", "how", "is", "are", "the", "a", "an", "and", "or", "but", "for", "with", "about",
    "tell", "me", "explain", "works",
];

/// Tokens of at most this many characters are never candidates.
const SHORT_TOKEN_LEN: usize = 2;

/// Lower-case, split on whitespace, strip surrounding punctuation.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

/// Tokens that could name a protocol, in question order without repeats.
pub fn candidate_terms(question: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for token in tokenize(question) {
        if token.chars().count() <= SHORT_TOKEN_LEN
            || STOP_WORDS.contains(&token.as_str())
            || terms.contains(&token)
        {
            continue;
        }
        terms.push(token);
    }
    terms
}
