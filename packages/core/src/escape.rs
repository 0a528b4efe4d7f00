//! Escape-aware string splitting.
//!
//! The instruction language uses `\` as its escape character: a delimiter
//! preceded by an unresolved `\` is a literal character, not a split point,
//! and `\\` escapes a literal backslash (so a delimiter after `\\` *does*
//! split).

use crate::error::ParseError;

/// The escape character of the instruction language.
pub const ESCAPE: char = '\\';

/// Split `input` at unescaped occurrences of `delimiter`, removing escape
/// characters from the produced tokens.
///
/// - An empty input yields a single empty token.
/// - An input ending exactly on a delimiter yields a trailing empty token.
/// - An input ending while still in escape fails with
///   [`ParseError::UnterminatedEscape`].
///
/// # Examples
///
/// ```rust
/// use refport_core::escape::split;
///
/// assert_eq!(split(r"a\/b/c", '/').unwrap(), vec!["a/b", "c"]);
/// assert_eq!(split(r"a\\/b", '/').unwrap(), vec![r"a\", "b"]);
/// ```
pub fn split(input: &str, delimiter: char) -> Result<Vec<String>, ParseError> {
    let tokens = split_keep_escapes(input, delimiter)?;
    Ok(tokens.iter().map(|t| unescape(t)).collect())
}

/// Split `input` at unescaped occurrences of `delimiter`, keeping escape
/// characters in the produced tokens.
///
/// Multi-stage parses need this variant: splitting a naming path by `/`
/// must leave `\.` sequences intact for the later `.` stage. Call
/// [`unescape`] on the final sub-fields.
pub fn split_keep_escapes(input: &str, delimiter: char) -> Result<Vec<String>, ParseError> {
    let mut result = Vec::new();

    if input.is_empty() {
        result.push(String::new());
        return Ok(result);
    }

    let mut in_escape = false;
    let mut start = 0;
    let mut last = ' ';
    for (i, ch) in input.char_indices() {
        if ch == delimiter {
            if in_escape {
                in_escape = false;
            } else {
                result.push(input[start..i].to_string());
                start = i + ch.len_utf8();
            }
        } else if ch == ESCAPE {
            in_escape = !in_escape;
        } else {
            in_escape = false;
        }
        last = ch;
    }
    if in_escape {
        return Err(ParseError::UnterminatedEscape {
            input: input.to_string(),
        });
    }
    if start < input.len() {
        result.push(input[start..].to_string());
    } else if last == delimiter {
        result.push(String::new());
    }

    Ok(result)
}

/// Remove every escape character from `s`.
///
/// The first `\` of a pair toggles into escape; the escaped character
/// (which may itself be another `\`) is copied literally and the flag
/// resets. A trailing lone `\` is dropped here; callers that must reject it
/// go through [`split`] or [`split_keep_escapes`] first.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_escape = false;
    for ch in s.chars() {
        if in_escape {
            out.push(ch);
            in_escape = false;
        } else if ch == ESCAPE {
            in_escape = true;
        } else {
            out.push(ch);
        }
    }
    out
}
