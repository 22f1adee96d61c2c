// Expression operators and their expansion rules

use super::encoding::Encoding;

/// The eight RFC 6570 operators plus the default (no operator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `{var}`
    Simple,
    /// `{+var}`
    Reserved,
    /// `{#var}`
    Fragment,
    /// `{.var}`
    Label,
    /// `{/var}`
    PathSegment,
    /// `{;var}`
    PathParameter,
    /// `{?var}`
    Query,
    /// `{&var}`
    QueryContinuation,
}

/// Static expansion metadata for one operator
#[derive(Debug, PartialEq, Eq)]
pub struct OperatorDescriptor {
    /// Emitted before a non-empty expansion
    pub prefix: &'static str,
    /// Joins variables, and elements of exploded values
    pub separator: char,
    /// `name=value` rendering
    pub named: bool,
    /// Emit `name=` even when the value is empty
    pub include_separator_for_empty: bool,
    pub encoding: Encoding,
}

// Indexed by `Operator as usize`
static DESCRIPTORS: [OperatorDescriptor; 8] = [
    OperatorDescriptor {
        prefix: "",
        separator: ',',
        named: false,
        include_separator_for_empty: false,
        encoding: Encoding::Strict,
    },
    OperatorDescriptor {
        prefix: "",
        separator: ',',
        named: false,
        include_separator_for_empty: false,
        encoding: Encoding::Reserved,
    },
    OperatorDescriptor {
        prefix: "#",
        separator: ',',
        named: false,
        include_separator_for_empty: false,
        encoding: Encoding::Reserved,
    },
    OperatorDescriptor {
        prefix: ".",
        separator: '.',
        named: false,
        include_separator_for_empty: false,
        encoding: Encoding::Strict,
    },
    OperatorDescriptor {
        prefix: "/",
        separator: '/',
        named: false,
        include_separator_for_empty: false,
        encoding: Encoding::Strict,
    },
    OperatorDescriptor {
        prefix: ";",
        separator: ';',
        named: true,
        include_separator_for_empty: false,
        encoding: Encoding::Strict,
    },
    OperatorDescriptor {
        prefix: "?",
        separator: '&',
        named: true,
        include_separator_for_empty: true,
        encoding: Encoding::Strict,
    },
    OperatorDescriptor {
        prefix: "&",
        separator: '&',
        named: true,
        include_separator_for_empty: true,
        encoding: Encoding::Strict,
    },
];

impl Operator {
    pub const ALL: [Operator; 8] = [
        Operator::Simple,
        Operator::Reserved,
        Operator::Fragment,
        Operator::Label,
        Operator::PathSegment,
        Operator::PathParameter,
        Operator::Query,
        Operator::QueryContinuation,
    ];

    /// Operator for the first character of an expression body, if it is one
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Operator::Reserved),
            '#' => Some(Operator::Fragment),
            '.' => Some(Operator::Label),
            '/' => Some(Operator::PathSegment),
            ';' => Some(Operator::PathParameter),
            '?' => Some(Operator::Query),
            '&' => Some(Operator::QueryContinuation),
            _ => None,
        }
    }

    /// `None` selects the default operator; a character that is not an
    /// operator gives `None`. Pair with [`Operator::descriptor`] for the
    /// descriptor itself.
    pub fn lookup(ch: Option<char>) -> Option<Self> {
        match ch {
            None => Some(Operator::Simple),
            Some(c) => Self::from_char(c),
        }
    }

    pub fn as_char(self) -> Option<char> {
        match self {
            Operator::Simple => None,
            Operator::Reserved => Some('+'),
            Operator::Fragment => Some('#'),
            Operator::Label => Some('.'),
            Operator::PathSegment => Some('/'),
            Operator::PathParameter => Some(';'),
            Operator::Query => Some('?'),
            Operator::QueryContinuation => Some('&'),
        }
    }

    /// Descriptor of this operator. Total: every operator, the default one
    /// included, has exactly one entry in the constant table.
    pub fn descriptor(self) -> &'static OperatorDescriptor {
        &DESCRIPTORS[self as usize]
    }

    pub fn encode(self, value: &str) -> String {
        self.descriptor().encoding.encode(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_round_trip() {
        for op in Operator::ALL {
            match op.as_char() {
                Some(ch) => assert_eq!(Operator::from_char(ch), Some(op)),
                None => assert_eq!(op, Operator::Simple),
            }
        }
        assert_eq!(Operator::from_char('$'), None);
        assert_eq!(Operator::lookup(None), Some(Operator::Simple));
    }

    #[test]
    fn test_lookup_covers_every_operator_character() {
        let prefixes: Vec<&str> = [None, Some('+'), Some('#'), Some('.'), Some('/'), Some(';'), Some('?'), Some('&')]
            .into_iter()
            .map(|ch| Operator::lookup(ch).map(|op| op.descriptor().prefix))
            .collect::<Option<_>>()
            .unwrap();
        assert_eq!(prefixes, vec!["", "", "#", ".", "/", ";", "?", "&"]);
        assert!(Operator::lookup(Some('=')).is_none());
    }

    #[test]
    fn test_descriptor_table() {
        let table: Vec<(&str, char, bool, bool)> = Operator::ALL
            .iter()
            .map(|op| {
                let d = op.descriptor();
                (d.prefix, d.separator, d.named, d.include_separator_for_empty)
            })
            .collect();

        assert_eq!(
            table,
            vec![
                ("", ',', false, false),
                ("", ',', false, false),
                ("#", ',', false, false),
                (".", '.', false, false),
                ("/", '/', false, false),
                (";", ';', true, false),
                ("?", '&', true, true),
                ("&", '&', true, true),
            ]
        );
    }

    #[test]
    fn test_reserved_operators_use_reserved_encoding() {
        assert_eq!(Operator::Reserved.encode("/foo bar"), "/foo%20bar");
        assert_eq!(Operator::Fragment.encode("/foo"), "/foo");
        assert_eq!(Operator::PathSegment.encode("/foo"), "%2Ffoo");
    }
}
