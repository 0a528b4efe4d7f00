//! Heuristic recognition of self-describing locator strings.

/// Returns true when `s` looks like a self-describing locator rather than
/// a scheme-prefixed instruction: one or more letters followed by a colon.
///
/// The heuristic is intentionally permissive; validating the actual
/// locator format is the handle codec's job. Digits or punctuation before
/// the colon disqualify the string, as does reaching the end without one.
pub fn looks_like_locator(s: &str) -> bool {
    for ch in s.chars() {
        if ch == ':' {
            return true;
        }
        if !ch.is_alphabetic() {
            return false;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::looks_like_locator;

    #[test]
    fn recognizes_letters_then_colon() {
        assert!(looks_like_locator("IOR:010631"));
        assert!(looks_like_locator("corbaloc:iiop:host:3075/NameService"));
        assert!(looks_like_locator("ref:anything at all"));
        assert!(looks_like_locator("x:"));
    }

    #[test]
    fn rejects_scheme_prefixed_instructions() {
        assert!(!looks_like_locator("name_service#x"));
        assert!(!looks_like_locator("file#/tmp/x.ref"));
    }

    #[test]
    fn rejects_non_letters_before_colon() {
        assert!(!looks_like_locator("123abc:"));
        assert!(!looks_like_locator("a1:"));
        assert!(!looks_like_locator("a-b:"));
        assert!(!looks_like_locator(" ior:"));
    }

    #[test]
    fn rejects_no_colon_and_empty() {
        assert!(!looks_like_locator("letters"));
        assert!(!looks_like_locator(""));
    }
}
