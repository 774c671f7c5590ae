//! Keyword patterns shared by the heuristic tier and slot synthesis.

use regex::Regex;
use std::sync::LazyLock;

macro_rules! keyword_pattern {
    ($name:ident, $regex_str:expr) => {
        pub static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

keyword_pattern!(
    RE_RECENCY,
    r"(?i)\b(latest|news|today|tonight|yesterday|current|currently|recent|recently|breaking|weather|forecast|price|stock|score|this week|right now)\b"
);

keyword_pattern!(
    RE_EDIT,
    r"(?i)\b(rewrite|rephrase|edit|fix|correct|proofread|shorten|simplify|revise|change|improve|polish|reword)\b"
);

keyword_pattern!(
    RE_WRITE,
    r"(?i)\b(write|draft|compose|create|generate)\b"
);

keyword_pattern!(
    RE_DOC_REFERENCE,
    r"(?i)\b(my (documents?|docs?|files?|notes|report|pdf)|attached|uploaded|the pdf|the document|according to)\b"
);

keyword_pattern!(RE_SECTION, r"(?i)\b(section|paragraph|chapter|heading)\b");

keyword_pattern!(RE_LINKS, r"(?i)\b(links?|sources?|urls?|references)\b");

keyword_pattern!(RE_SUMMARY, r"(?i)\b(summary|summari[sz]e|summari[sz]ing|tl;?dr|overview)\b");

keyword_pattern!(
    RE_LEADING_QUESTION,
    r"(?i)^\s*(what's|what is|what are|who is|who was|how do i|how do you|how does|how to|why is|why do|when is|where is|can you|could you|please|tell me about|explain)\s+"
);

/// False when the pattern failed to compile.
pub fn matches(pattern: &LazyLock<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(text))
}
