//! Dialect and header detection.
//!
//! The sniffer reads a small sample, parses it with every candidate dialect
//! and keeps the one whose table looks most regular. Header detection then
//! runs on the winning table.

mod candidates;
mod cell;
mod header;
mod score;
mod table;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::encoding::{detect_encoding, skip_bom};
use crate::error::{ParserError, Result};
use crate::metadata::{Dialect, Metadata, Quote};
use crate::sample::{SampleSize, read_sample};

use candidates::{candidate_dialects, detect_double_quote, detect_line_terminator};
use header::detect_header;
use score::{find_best, score_all};
use table::parse_table;

/// Infers the dialect and header presence of a delimited file.
///
/// # Example
///
/// ```no_run
/// use csv_fieldmap::{SampleSize, Sniffer};
///
/// let mut sniffer = Sniffer::new();
/// sniffer.sample_size(SampleSize::Bytes(4096));
///
/// let metadata = sniffer.sniff_path("data.csv").unwrap();
/// println!("Delimiter: {}", metadata.dialect.delimiter as char);
/// println!("Has header: {}", metadata.has_header);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Sniffer {
    sample_size: SampleSize,
    forced_delimiter: Option<u8>,
    forced_quote: Option<Quote>,
}

impl Sniffer {
    /// Create a new Sniffer with default settings (1024 byte sample).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sample size for sniffing.
    pub fn sample_size(&mut self, sample_size: SampleSize) -> &mut Self {
        self.sample_size = sample_size;
        self
    }

    /// Force a specific delimiter (skip delimiter detection).
    pub fn delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.forced_delimiter = Some(delimiter);
        self
    }

    /// Force a specific quote character.
    pub fn quote(&mut self, quote: Quote) -> &mut Self {
        self.forced_quote = Some(quote);
        self
    }

    /// Sniff the file at `path`. The file handle is closed before returning.
    pub fn sniff_path<P: AsRef<Path>>(&self, path: P) -> Result<Metadata> {
        let file = File::open(path.as_ref())?;
        self.sniff_reader(file)
    }

    /// Sniff a sample taken from `reader`.
    pub fn sniff_reader<R: Read>(&self, reader: R) -> Result<Metadata> {
        let sample = read_sample(reader, self.sample_size)?;
        self.sniff_bytes(&sample)
    }

    /// Sniff an in-memory sample.
    pub fn sniff_bytes(&self, data: &[u8]) -> Result<Metadata> {
        let encoding = detect_encoding(data);
        let data = skip_bom(data);

        if data.iter().all(u8::is_ascii_whitespace) {
            return Err(ParserError::DetectionFailed("sample is empty".to_string()));
        }

        let line_terminator = detect_line_terminator(data);
        let dialects =
            candidate_dialects(line_terminator, self.forced_delimiter, self.forced_quote);

        let max_rows = self.sample_size.records().unwrap_or(0);
        let (scores, mut tables) = score_all(data, &dialects, max_rows);

        let best = find_best(&scores)
            .ok_or_else(|| ParserError::DetectionFailed("no candidate parsed".to_string()))?;
        let score = &scores[best];
        if score.num_fields < 2 {
            return Err(ParserError::DetectionFailed(
                "could not determine delimiter".to_string(),
            ));
        }

        let table = tables.swap_remove(best);
        let dialect = score
            .dialect
            .with_double_quote(detect_double_quote(data, score.dialect.quote))
            .with_skip_initial_space(table.has_initial_space());
        let table = if dialect == score.dialect {
            table
        } else {
            parse_table(data, &dialect, max_rows)
        };
        let has_header = detect_header(&table);

        tracing::debug!(
            dialect = %dialect,
            double_quote = dialect.double_quote,
            skip_initial_space = dialect.skip_initial_space,
            gamma = score.gamma,
            fields = score.num_fields,
            rows = score.num_rows,
            has_header,
            "sniffed dialect"
        );

        Ok(Metadata {
            dialect,
            has_header,
            num_fields: score.num_fields,
            encoding,
        })
    }
}

/// Detect whether the first retained record of a sample is a header.
///
/// Records before the first one whose first field matches `keyword` (ignoring
/// case) are dropped, then `line_skip` more. A keyword that does not occur in
/// the sample means no header.
pub(crate) fn sniff_header(
    data: &[u8],
    dialect: &Dialect,
    keyword: &str,
    line_skip: usize,
) -> bool {
    let table = parse_table(skip_bom(data), dialect, 0);

    let start = if keyword.is_empty() {
        0
    } else {
        let keyword = keyword.to_lowercase();
        let found = table
            .rows
            .iter()
            .position(|row| row.first().is_some_and(|f| f.to_lowercase() == keyword));
        match found {
            Some(i) => i,
            None => return false,
        }
    };

    detect_header(&table.without_leading(start + line_skip))
}
