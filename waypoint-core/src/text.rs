//! Text normalisation and hashing shared by the embedding cache and the
//! token counter.

/// Normalise text for cache keys: trim, lowercase, collapse whitespace runs.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// blake3 hex digest of the normalised text.
pub fn content_hash(text: &str) -> String {
    blake3::hash(normalize(text).as_bytes()).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize("  What   IS\tRust?\n"), "what is rust?");
    }

    #[test]
    fn hash_ignores_formatting_differences() {
        assert_eq!(content_hash("Hello World"), content_hash("  hello   world "));
        assert_ne!(content_hash("hello world"), content_hash("hello there"));
    }
}
