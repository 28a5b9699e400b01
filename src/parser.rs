//! The row-decoding pipeline: detection, skipping and projection.

use std::fmt;
use std::fs::File;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::encoding::{EncodingInfo, detect_encoding};
use crate::error::{ParserError, Result};
use crate::field_map::{FieldMap, ProjectedRow};
use crate::metadata::{Dialect, Header};
use crate::sample::{SampleSize, read_sample};
use crate::skip::{self, SkipPlan, SkipReport};
use crate::sniff::{Sniffer, sniff_header};
use crate::source::{ReadMode, RowSource};

/// Configures and opens a [`Parser`].
///
/// # Example
///
/// ```no_run
/// use csv_fieldmap::{FieldMap, Parser};
///
/// let fields = FieldMap::new([("state", 1), ("streetAddress", 5)]).unwrap();
/// let parser = Parser::builder("facilities.csv", fields)
///     .has_header(true)
///     .first_row_keyword("Fcilty_typ")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ParserBuilder {
    path: PathBuf,
    field_map: FieldMap,
    dialect: Option<Dialect>,
    header: Header,
    line_skip: usize,
    keyword: String,
    read_mode: ReadMode,
    sample_size: SampleSize,
}

impl ParserBuilder {
    fn new(path: PathBuf, field_map: FieldMap) -> Self {
        Self {
            path,
            field_map,
            dialect: None,
            header: Header::Unspecified,
            line_skip: 0,
            keyword: String::new(),
            read_mode: ReadMode::Text,
            sample_size: SampleSize::default(),
        }
    }

    /// Use `dialect` instead of detecting one.
    pub fn dialect(&mut self, dialect: Dialect) -> &mut Self {
        self.dialect = Some(dialect);
        self
    }

    /// Declare whether the file has a header row, overriding detection.
    pub fn has_header(&mut self, has_header: bool) -> &mut Self {
        self.header = Header::from(has_header);
        self
    }

    /// Set the header mode directly.
    pub fn header(&mut self, header: Header) -> &mut Self {
        self.header = header;
        self
    }

    /// Discard `n` records after the keyword scan and before the header.
    pub fn line_skip(&mut self, n: usize) -> &mut Self {
        self.line_skip = n;
        self
    }

    /// Discard every record before the first one whose first field equals
    /// `keyword`, ignoring case. An empty keyword disables the scan.
    pub fn first_row_keyword(&mut self, keyword: &str) -> &mut Self {
        keyword.clone_into(&mut self.keyword);
        self
    }

    pub fn read_mode(&mut self, read_mode: ReadMode) -> &mut Self {
        self.read_mode = read_mode;
        self
    }

    /// Sample used for detection (default: 1024 bytes).
    pub fn sample_size(&mut self, sample_size: SampleSize) -> &mut Self {
        self.sample_size = sample_size;
        self
    }

    /// Detect what is missing, open the file and skip to the first data row.
    pub fn build(&self) -> Result<Parser> {
        if self.keyword.contains(['\n', '\r']) {
            return Err(ParserError::InvalidConfig(
                "first row keyword must not contain a line break".to_string(),
            ));
        }

        let (dialect, detected_header, encoding) = self.detect()?;
        let has_header = self.header.resolve(detected_header);

        let mut source = RowSource::open(&self.path, &dialect, self.read_mode, encoding.encoding)?;
        let skipped = skip::apply(
            &mut source,
            &SkipPlan {
                path: &self.path,
                dialect: &dialect,
                mode: self.read_mode,
                encoding: encoding.encoding,
                line_skip: self.line_skip,
                keyword: &self.keyword,
                has_header,
            },
        )?;

        Ok(Parser {
            path: self.path.clone(),
            field_map: self.field_map.clone(),
            dialect,
            has_header,
            read_mode: self.read_mode,
            encoding,
            skipped,
            source,
        })
    }

    /// Returns the dialect, the detected header flag and the sample encoding.
    ///
    /// The header flag describes the first record left after the keyword
    /// scan and the fixed skip.
    fn detect(&self) -> Result<(Dialect, bool, EncodingInfo)> {
        let sample = read_sample(File::open(&self.path)?, self.sample_size)?;

        let (dialect, encoding, sniffed_header) = match self.dialect {
            None => {
                let mut sniffer = Sniffer::new();
                sniffer.sample_size(self.sample_size);
                let metadata = sniffer.sniff_bytes(&sample)?;
                (metadata.dialect, metadata.encoding, Some(metadata.has_header))
            }
            Some(dialect) => (dialect, detect_encoding(&sample), None),
        };

        let leading_skipped = !self.keyword.is_empty() || self.line_skip > 0;
        let detected = match sniffed_header {
            _ if self.header.is_specified() => false,
            Some(has_header) if !leading_skipped => has_header,
            _ => sniff_header(&sample, &dialect, &self.keyword, self.line_skip),
        };

        Ok((dialect, detected, encoding))
    }
}

/// An opened file, positioned on its first data row.
///
/// Consume it with [`Parser::rows`] (or a `for` loop) to get the projected
/// rows.
///
/// ```no_run
/// use csv_fieldmap::{FieldMap, Parser};
///
/// let fields = FieldMap::new([("name", 0), ("city", 2)])?;
/// for row in Parser::builder("people.csv", fields).build()? {
///     let row = row?;
///     println!("{}", row.get("name").unwrap_or("<absent>"));
/// }
/// # Ok::<(), csv_fieldmap::ParserError>(())
/// ```
pub struct Parser {
    path: PathBuf,
    field_map: FieldMap,
    dialect: Dialect,
    has_header: bool,
    read_mode: ReadMode,
    encoding: EncodingInfo,
    skipped: SkipReport,
    source: RowSource,
}

impl Parser {
    /// Start configuring a parser for the file at `path`.
    pub fn builder<P: AsRef<Path>>(path: P, field_map: FieldMap) -> ParserBuilder {
        ParserBuilder::new(path.as_ref().to_path_buf(), field_map)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn field_map(&self) -> &FieldMap {
        &self.field_map
    }

    /// Dialect in effect, supplied or detected.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Resolved header flag.
    pub fn has_header(&self) -> bool {
        self.has_header
    }

    pub fn read_mode(&self) -> ReadMode {
        self.read_mode
    }

    /// Encoding detected from the sample.
    pub fn encoding(&self) -> &EncodingInfo {
        &self.encoding
    }

    /// Records discarded before the first data row.
    pub fn skipped(&self) -> SkipReport {
        self.skipped
    }

    /// Consume the parser and iterate over its data rows.
    pub fn rows(self) -> Rows {
        Rows {
            field_map: self.field_map,
            source: self.source,
            record: StringRecord::new(),
            done: false,
        }
    }
}

impl IntoIterator for Parser {
    type Item = Result<ProjectedRow>;
    type IntoIter = Rows;

    fn into_iter(self) -> Rows {
        self.rows()
    }
}

impl fmt::Display for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("path", &self.path)
            .field("field_map", &self.field_map)
            .field("dialect", &self.dialect)
            .field("has_header", &self.has_header)
            .field("read_mode", &self.read_mode)
            .field("encoding", &self.encoding.encoding.name())
            .field("skipped", &self.skipped)
            .finish_non_exhaustive()
    }
}

/// Lazy sequence of projected rows.
///
/// Yields `None` at end of input. After an error or the end, it keeps
/// returning `None`.
pub struct Rows {
    field_map: FieldMap,
    source: RowSource,
    record: StringRecord,
    done: bool,
}

impl Rows {
    pub fn field_map(&self) -> &FieldMap {
        &self.field_map
    }
}

impl Iterator for Rows {
    type Item = Result<ProjectedRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.source.read(&mut self.record) {
            Ok(true) => Some(Ok(self.field_map.project(&self.record))),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Rows {}

impl fmt::Debug for Rows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rows")
            .field("field_map", &self.field_map)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
