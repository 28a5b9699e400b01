//! Candidate dialects tried by the sniffer.

use crate::metadata::{Dialect, LineTerminator, Quote};

/// Delimiters to test, most common first.
/// Colon is left out because it shows up in time values (HH:MM).
pub const DELIMITERS: &[u8] = b",;\t| ^~#&";

/// Quote configurations to test.
pub const QUOTES: &[Quote] = &[Quote::Some(b'"'), Quote::Some(b'\''), Quote::None];

/// Build the candidate list, honouring a forced delimiter and/or quote.
pub fn candidate_dialects(
    line_terminator: LineTerminator,
    forced_delimiter: Option<u8>,
    forced_quote: Option<Quote>,
) -> Vec<Dialect> {
    let delimiters: &[u8] = match forced_delimiter.as_ref() {
        Some(delimiter) => std::slice::from_ref(delimiter),
        None => DELIMITERS,
    };
    let quotes: &[Quote] = match forced_quote.as_ref() {
        Some(quote) => std::slice::from_ref(quote),
        None => QUOTES,
    };

    delimiters
        .iter()
        .flat_map(|&delimiter| {
            quotes
                .iter()
                .map(move |&quote| Dialect::new(delimiter, quote, line_terminator))
        })
        .collect()
}

/// Detect the most likely line terminator from data.
pub fn detect_line_terminator(data: &[u8]) -> LineTerminator {
    let (mut crlf, mut lf, mut cr) = (0usize, 0usize, 0usize);

    let mut bytes = data.iter().peekable();
    while let Some(&b) = bytes.next() {
        match b {
            b'\r' if bytes.peek() == Some(&&b'\n') => {
                bytes.next();
                crlf += 1;
            }
            b'\r' => cr += 1,
            b'\n' => lf += 1,
            _ => {}
        }
    }

    if crlf > 0 && crlf >= lf && crlf >= cr {
        LineTerminator::CRLF
    } else if lf >= cr {
        LineTerminator::LF
    } else {
        LineTerminator::CR
    }
}

/// Whether `quote` is escaped by doubling it.
///
/// Only a sample that backslash-escapes the quote character and never doubles
/// it says otherwise.
pub fn detect_double_quote(data: &[u8], quote: Quote) -> bool {
    let Some(q) = quote.char() else {
        return true;
    };
    let (mut doubled, mut backslashed) = (false, false);
    let mut i = 0;
    while i + 1 < data.len() {
        match (data[i], data[i + 1]) {
            (b'\\', next) if next == q => {
                backslashed = true;
                i += 2;
            }
            (a, b) if a == q && b == q => {
                doubled = true;
                i += 2;
            }
            _ => i += 1,
        }
    }
    doubled || !backslashed
}
