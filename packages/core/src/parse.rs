//! The instruction grammar: scheme prefixes and the naming-directory
//! address syntax.
//!
//! An instruction string is `"<scheme>#<body>"`. The naming-directory body
//! is `path-in-directory [@ directory-address]`, where the path honors the
//! escape convention of [`crate::escape`] and the directory address is
//! itself a full instruction string (resolved recursively by the
//! dispatcher).

use serde::{Deserialize, Serialize};

use crate::escape::{split_keep_escapes, unescape, ESCAPE};
use crate::error::ParseError;

/// The closed set of instruction schemes, each owning its literal prefix.
///
/// Prefix recognition is exact and case-sensitive. The prefixes are
/// mutually non-overlapping by design, so match order carries no
/// tie-break semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// `name_service#` - hierarchical naming directory.
    NameService,
    /// `file#` - filesystem path.
    File,
    /// `exec#` - externally launched command.
    Exec,
    /// `dynamic#` - named in-process strategy.
    Dynamic,
    /// `server_publish#` - server-published endpoint (export only).
    ServerPublish,
}

impl Scheme {
    /// All schemes, in classification order.
    pub const ALL: [Scheme; 5] = [
        Scheme::NameService,
        Scheme::File,
        Scheme::Exec,
        Scheme::Dynamic,
        Scheme::ServerPublish,
    ];

    /// The literal prefix the scheme owns.
    pub const fn prefix(self) -> &'static str {
        match self {
            Scheme::NameService => "name_service#",
            Scheme::File => "file#",
            Scheme::Exec => "exec#",
            Scheme::Dynamic => "dynamic#",
            Scheme::ServerPublish => "server_publish#",
        }
    }
}

/// Split an instruction string into its scheme and the body after the
/// prefix.
///
/// Fails with [`ParseError::UnrecognizedScheme`] when no prefix matches;
/// on import the dispatcher then consults the locator sniffer before
/// giving up.
pub fn classify(instructions: &str) -> Result<(Scheme, &str), ParseError> {
    for scheme in Scheme::ALL {
        if let Some(body) = instructions.strip_prefix(scheme.prefix()) {
            return Ok((scheme, body));
        }
    }
    Err(ParseError::UnrecognizedScheme)
}

/// One component of a naming-directory path: an `id` plus an optional
/// `kind` sub-field, both with escape characters removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameComponent {
    pub id: String,
    pub kind: Option<String>,
}

impl NameComponent {
    pub fn id(id: impl Into<String>) -> Self {
        NameComponent {
            id: id.into(),
            kind: None,
        }
    }

    pub fn with_kind(id: impl Into<String>, kind: impl Into<String>) -> Self {
        NameComponent {
            id: id.into(),
            kind: Some(kind.into()),
        }
    }
}

/// A parsed naming-directory instruction body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingAddress {
    /// The ordered name components of the path in the directory.
    pub components: Vec<NameComponent>,
    /// The optional recursive locator after `@`; itself a full instruction
    /// string. Absent means the process-wide default directory endpoint.
    pub directory_address: Option<String>,
}

impl NamingAddress {
    /// Parse the body of a `name_service#` instruction.
    ///
    /// The path runs to end-of-string or the first unescaped whitespace
    /// character (`\` immediately before whitespace protects it). After
    /// skipping whitespace, any trailing content must be introduced by `@`
    /// and must be followed by a non-empty directory address.
    pub fn parse(body: &str) -> Result<Self, ParseError> {
        let (raw_path, rest) = split_path_terminator(body);
        let directory_address = parse_directory_address(rest)?;
        let components = parse_components(raw_path)?;
        Ok(NamingAddress {
            components,
            directory_address,
        })
    }
}

/// Scan to the path terminator: end-of-string or the first unescaped
/// whitespace. An escape character skips the character after it.
fn split_path_terminator(body: &str) -> (&str, &str) {
    let mut chars = body.char_indices();
    while let Some((i, ch)) = chars.next() {
        if ch.is_whitespace() {
            return (&body[..i], &body[i..]);
        }
        if ch == ESCAPE {
            // The escaped character, if any, is part of the path.
            chars.next();
        }
    }
    (body, "")
}

/// Parse the optional `@ directory-address` suffix from the text after the
/// path.
fn parse_directory_address(rest: &str) -> Result<Option<String>, ParseError> {
    let rest = rest.trim_start();
    if rest.is_empty() {
        return Ok(None);
    }
    let Some(after_at) = rest.strip_prefix('@') else {
        return Err(ParseError::ExpectedAt);
    };
    let address = after_at.trim_start();
    if address.is_empty() {
        return Err(ParseError::MissingAddress);
    }
    Ok(Some(address.to_string()))
}

/// Split a raw (still-escaped) path into name components.
///
/// The `/` stage must not consume escapes the `.` stage still needs, so
/// both stages split escape-preserving and only the final `id`/`kind`
/// sub-fields are unescaped.
fn parse_components(raw_path: &str) -> Result<Vec<NameComponent>, ParseError> {
    if raw_path.is_empty() {
        return Err(ParseError::InvalidName {
            path: raw_path.to_string(),
        });
    }

    let raw_components = split_keep_escapes(raw_path, '/')?;
    let mut components = Vec::with_capacity(raw_components.len());
    for raw in &raw_components {
        let fields = split_keep_escapes(raw, '.')?;
        if fields.len() > 2 {
            return Err(ParseError::InvalidName {
                path: raw_path.to_string(),
            });
        }
        components.push(NameComponent {
            id: unescape(&fields[0]),
            kind: fields.get(1).map(|k| unescape(k)),
        });
    }
    Ok(components)
}

/// Extract the strategy identifier from a `dynamic#` body: the text before
/// the first space, unless that space is the leading character, in which
/// case the whole body is the identifier.
pub fn strategy_identifier(body: &str) -> &str {
    match body.find(' ') {
        Some(i) if i > 0 => &body[..i],
        _ => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_each_scheme() {
        assert_eq!(
            classify("name_service#foo/bar").unwrap(),
            (Scheme::NameService, "foo/bar")
        );
        assert_eq!(classify("file#/tmp/x.ref").unwrap(), (Scheme::File, "/tmp/x.ref"));
        assert_eq!(classify("exec#cat x").unwrap(), (Scheme::Exec, "cat x"));
        assert_eq!(classify("dynamic#my_strategy").unwrap(), (Scheme::Dynamic, "my_strategy"));
        assert_eq!(
            classify("server_publish#endpoint").unwrap(),
            (Scheme::ServerPublish, "endpoint")
        );
    }

    #[test]
    fn classify_is_case_sensitive_and_exact() {
        assert!(classify("FILE#/tmp/x").is_err());
        assert!(classify("file /tmp/x").is_err());
        assert!(classify("").is_err());
        assert!(classify("IOR:0100").is_err());
    }

    #[test]
    fn naming_path_without_address() {
        let addr = NamingAddress::parse("foo/bar").unwrap();
        assert_eq!(
            addr.components,
            vec![NameComponent::id("foo"), NameComponent::id("bar")]
        );
        assert_eq!(addr.directory_address, None);
    }

    #[test]
    fn naming_path_with_kinds_and_address() {
        let addr = NamingAddress::parse("foo.kind1/bar @ file#/tmp/ns.ref").unwrap();
        assert_eq!(
            addr.components,
            vec![
                NameComponent::with_kind("foo", "kind1"),
                NameComponent::id("bar"),
            ]
        );
        assert_eq!(addr.directory_address.as_deref(), Some("file#/tmp/ns.ref"));
    }

    #[test]
    fn address_without_surrounding_whitespace() {
        let addr = NamingAddress::parse("foo@file#/tmp/ns.ref").unwrap();
        assert_eq!(addr.directory_address.as_deref(), Some("file#/tmp/ns.ref"));
    }

    #[test]
    fn escaped_space_stays_in_path() {
        let addr = NamingAddress::parse(r"a\ b").unwrap();
        assert_eq!(addr.components, vec![NameComponent::id("a b")]);
        assert_eq!(addr.directory_address, None);
    }

    #[test]
    fn escaped_dot_survives_the_slash_stage() {
        let addr = NamingAddress::parse(r"a\.b/c").unwrap();
        assert_eq!(
            addr.components,
            vec![NameComponent::id("a.b"), NameComponent::id("c")]
        );
    }

    #[test]
    fn escaped_slash_is_literal_in_id() {
        let addr = NamingAddress::parse(r"a\/b/c").unwrap();
        assert_eq!(
            addr.components,
            vec![NameComponent::id("a/b"), NameComponent::id("c")]
        );
    }

    #[test]
    fn trailing_content_must_start_with_at() {
        let err = NamingAddress::parse("foo bar").unwrap_err();
        assert_eq!(err, ParseError::ExpectedAt);
    }

    #[test]
    fn at_with_nothing_after_fails() {
        assert_eq!(
            NamingAddress::parse("foo @").unwrap_err(),
            ParseError::MissingAddress
        );
        assert_eq!(
            NamingAddress::parse("foo @   ").unwrap_err(),
            ParseError::MissingAddress
        );
    }

    #[test]
    fn empty_path_is_invalid() {
        assert!(matches!(
            NamingAddress::parse("").unwrap_err(),
            ParseError::InvalidName { .. }
        ));
        // Whitespace first means an empty path followed by address text.
        assert!(NamingAddress::parse(" @ file#/tmp/ns.ref").is_err());
    }

    #[test]
    fn too_many_kind_fields_is_invalid() {
        assert!(matches!(
            NamingAddress::parse("a.b.c").unwrap_err(),
            ParseError::InvalidName { .. }
        ));
    }

    #[test]
    fn unterminated_escape_in_path_fails() {
        assert!(matches!(
            NamingAddress::parse("a\\").unwrap_err(),
            ParseError::UnterminatedEscape { .. }
        ));
    }

    #[test]
    fn empty_components_are_preserved() {
        // "foo//bar" carries an empty id in the middle; the directory
        // decides whether to accept it, not the grammar.
        let addr = NamingAddress::parse("foo//bar").unwrap();
        assert_eq!(addr.components.len(), 3);
        assert_eq!(addr.components[1], NameComponent::id(""));
    }

    #[test]
    fn strategy_identifier_extraction() {
        assert_eq!(strategy_identifier("my_strategy"), "my_strategy");
        assert_eq!(strategy_identifier("my_strategy extra args"), "my_strategy");
        // A leading space means the whole body is the identifier.
        assert_eq!(strategy_identifier(" odd"), " odd");
        assert_eq!(strategy_identifier(""), "");
    }

    #[test]
    fn name_component_serde_roundtrip() {
        let c = NameComponent::with_kind("foo", "kind1");
        let json = serde_json::to_string(&c).unwrap();
        let back: NameComponent = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
