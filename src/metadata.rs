use crate::encoding::EncodingInfo;
use std::fmt;

/// Result of sniffing a sample.
#[derive(Debug, Clone)]
pub struct Metadata {
    /// The detected dialect.
    pub dialect: Dialect,
    /// Whether the first sampled row looks like a header.
    pub has_header: bool,
    /// Modal number of fields per record in the sample.
    pub num_fields: usize,
    /// Encoding of the sample.
    pub encoding: EncodingInfo,
}

/// Delimiter, quoting and line terminator convention of a delimited file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dialect {
    /// Field delimiter character.
    pub delimiter: u8,
    /// Quote character configuration.
    pub quote: Quote,
    /// Whether a doubled quote inside a quoted field is an escaped quote.
    /// When false, a backslash escapes the quote character instead.
    pub double_quote: bool,
    /// Whether spaces following a delimiter are dropped from the field.
    pub skip_initial_space: bool,
    /// Line terminator observed in the file.
    pub line_terminator: LineTerminator,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: Quote::Some(b'"'),
            double_quote: true,
            skip_initial_space: false,
            line_terminator: LineTerminator::LF,
        }
    }
}

impl Dialect {
    /// Create a new Dialect with doubled-quote escaping enabled.
    pub const fn new(delimiter: u8, quote: Quote, line_terminator: LineTerminator) -> Self {
        Self {
            delimiter,
            quote,
            double_quote: true,
            skip_initial_space: false,
            line_terminator,
        }
    }

    /// Return a copy with doubled-quote escaping switched on or off.
    #[must_use]
    pub const fn with_double_quote(mut self, double_quote: bool) -> Self {
        self.double_quote = double_quote;
        self
    }

    /// Return a copy that drops spaces following each delimiter.
    #[must_use]
    pub const fn with_skip_initial_space(mut self, skip_initial_space: bool) -> Self {
        self.skip_initial_space = skip_initial_space;
        self
    }

    /// Build a `csv::ReaderBuilder` for this dialect.
    ///
    /// Headers are never consumed by the csv crate and rows may vary in width.
    /// Initial spaces are not handled here; readers strip them per field.
    /// The csv crate's CRLF terminator accepts `\r`, `\n` and `\r\n`, so it is
    /// used for every [`LineTerminator`].
    pub(crate) fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .double_quote(self.double_quote)
            .terminator(csv::Terminator::CRLF);

        match self.quote.char() {
            None => {
                builder.quoting(false);
            }
            Some(q) => {
                builder.quoting(true).quote(q);
            }
        }
        if !self.double_quote {
            builder.escape(Some(b'\\'));
        }

        builder
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "delimiter={:?} quote={} terminator={}",
            self.delimiter as char,
            self.quote,
            self.line_terminator.as_str()
        )
    }
}

/// Quote character configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quote {
    /// No quoting.
    None,
    /// Quote with the specified character.
    Some(u8),
}

impl Default for Quote {
    fn default() -> Self {
        Quote::Some(b'"')
    }
}

impl Quote {
    /// Returns the quote character if set.
    pub fn char(&self) -> Option<u8> {
        match self {
            Quote::None => None,
            Quote::Some(c) => Some(*c),
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quote::None => write!(f, "none"),
            Quote::Some(c) => write!(f, "{:?}", *c as char),
        }
    }
}

/// Line terminator sequences.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineTerminator {
    /// Unix-style line ending (\n).
    #[default]
    LF,
    /// Windows-style line ending (\r\n).
    CRLF,
    /// Old Mac-style line ending (\r).
    CR,
}

impl LineTerminator {
    /// Returns the escaped string representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            LineTerminator::LF => "\\n",
            LineTerminator::CRLF => "\\r\\n",
            LineTerminator::CR => "\\r",
        }
    }
}

/// Whether the first retained line is a header.
///
/// `Unspecified` defers to detection; the two other variants always win over
/// whatever detection would have decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Header {
    /// Let the sniffer decide.
    #[default]
    Unspecified,
    /// The first retained line is a header and is skipped.
    Present,
    /// The first retained line is data.
    Absent,
}

impl Header {
    /// Resolve to a boolean, using `detected` only when unspecified.
    pub const fn resolve(self, detected: bool) -> bool {
        match self {
            Header::Unspecified => detected,
            Header::Present => true,
            Header::Absent => false,
        }
    }

    /// Returns true unless this is `Unspecified`.
    pub const fn is_specified(self) -> bool {
        !matches!(self, Header::Unspecified)
    }
}

impl From<bool> for Header {
    fn from(has_header: bool) -> Self {
        if has_header {
            Header::Present
        } else {
            Header::Absent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_resolution() {
        assert!(Header::Unspecified.resolve(true));
        assert!(!Header::Unspecified.resolve(false));
        assert!(Header::Present.resolve(false));
        assert!(!Header::Absent.resolve(true));
        assert_eq!(Header::from(true), Header::Present);
        assert!(!Header::default().is_specified());
    }

    #[test]
    fn test_dialect_display() {
        let dialect = Dialect::new(b';', Quote::None, LineTerminator::CRLF);
        assert_eq!(dialect.to_string(), "delimiter=';' quote=none terminator=\\r\\n");
    }

    #[test]
    fn test_reader_builder_backslash_escape() {
        let dialect = Dialect::default().with_double_quote(false);
        assert!(!dialect.double_quote);
        let mut reader = dialect
            .reader_builder()
            .from_reader(&b"\"say \\\"hi\\\"\",x\n"[..]);
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "say \"hi\"");
    }

    #[test]
    fn test_quote_char() {
        assert_eq!(Quote::Some(b'\'').char(), Some(b'\''));
        assert_eq!(Quote::None.char(), None);
        assert!(Dialect::default().with_skip_initial_space(true).skip_initial_space);
    }

    #[test]
    fn test_reader_builder_respects_quote() {
        let dialect = Dialect::new(b'|', Quote::Some(b'\''), LineTerminator::LF);
        let mut reader = dialect.reader_builder().from_reader(&b"'a|b'|c\n"[..]);
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "a|b");
        assert_eq!(&record[1], "c");
    }
}
