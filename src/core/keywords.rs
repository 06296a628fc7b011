//! Case-insensitive keyword matching.
//!
//! The mood classifier uses plain substring matching ([`contains_any`]), so
//! "sadness" counts as "sad". The reply table and scenario detection use
//! [`matches`]: a keyword without spaces must match a whole word, so `hi`
//! does not fire on "this", while a phrase matches anywhere.

/// Returns true if `keyword` occurs in `text` (already lowercased by the caller).
pub fn matches(text_lower: &str, keyword: &str) -> bool {
    let keyword = keyword.to_lowercase();
    if keyword.is_empty() {
        return false;
    }
    if keyword.contains(' ') {
        return text_lower.contains(&keyword);
    }

    let is_word = |c: char| c.is_alphanumeric();
    let mut start = 0;
    while let Some(found) = text_lower[start..].find(&keyword) {
        let begin = start + found;
        let end = begin + keyword.len();
        let before_ok = text_lower[..begin].chars().next_back().is_none_or(|c| !is_word(c));
        let after_ok = text_lower[end..].chars().next().is_none_or(|c| !is_word(c));
        if before_ok && after_ok {
            return true;
        }
        // Step past the first char of this hit and keep looking
        start = begin + text_lower[begin..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

/// Returns true if any keyword occurs anywhere in `text_lower`.
pub fn contains_any(text_lower: &str, keywords: &[&str]) -> bool {
    keywords
        .iter()
        .any(|k| !k.is_empty() && text_lower.contains(&k.to_lowercase()))
}

/// Returns true if any keyword matches as a word or phrase.
pub fn any(text_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| matches(text_lower, k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_word_match() {
        assert!(matches("hi there", "hi"));
        assert!(matches("oh, hi!", "hi"));
        assert!(!matches("this is it", "hi"));
        assert!(!matches("i made it", "mad"));
    }

    #[test]
    fn test_phrase_matches_as_substring() {
        assert!(matches("so, what if i quit?", "what if"));
        assert!(!matches("whatif", "what if"));
    }

    #[test]
    fn test_contains_any_matches_inside_words() {
        assert!(contains_any("such sadness today", &["sad"]));
        assert!(contains_any("a joyful morning", &["JOY"]));
        assert!(!contains_any("the sky is blue", &["sad", "joy"]));
        assert!(!contains_any("anything", &[""]));
    }

    #[test]
    fn test_keyword_case_is_normalized() {
        assert!(matches("hello world", "HELLO"));
    }

    #[test]
    fn test_apostrophes_are_word_boundaries() {
        assert!(matches("i'm so happy today", "happy"));
        assert!(matches("i can't wait", "can't wait"));
    }

    #[test]
    fn test_later_occurrence_still_found() {
        // First "hi" is inside "this", the second stands alone
        assert!(matches("this is hi", "hi"));
    }

    #[test]
    fn test_empty_keyword_never_matches() {
        assert!(!matches("anything", ""));
    }

    #[test]
    fn test_any() {
        assert!(any("goodbye friend", &["bye", "goodbye"]));
        assert!(!any("hello", &["bye", "goodbye"]));
    }
}
