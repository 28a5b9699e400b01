//! csv-fieldmap: read delimited files as rows of named fields
//!
//! Given a path and a [`FieldMap`] assigning logical names to column indices,
//! a [`Parser`] detects the file's dialect and header row, skips any leading
//! junk lines and yields every data row as a [`ProjectedRow`].
//!
//! # Quick Start
//!
//! ```no_run
//! use csv_fieldmap::{FieldMap, Parser};
//!
//! let fields = FieldMap::new([("state", 1), ("streetAddress", 5)])?;
//!
//! // Dialect and header are detected from the first 1024 bytes
//! let parser = Parser::builder("facilities.csv", fields).build()?;
//! println!("Delimiter: {:?}", parser.dialect().delimiter as char);
//!
//! for row in parser.rows() {
//!     let row = row?;
//!     println!("{:?} {:?}", row.get("state"), row.get("streetAddress"));
//! }
//! # Ok::<(), csv_fieldmap::ParserError>(())
//! ```
//!
//! # Skipping leading lines
//!
//! Files exported by other tools often start with title lines. Records are
//! discarded in a fixed order: everything before the first record whose first
//! field matches the keyword, then a fixed number of records, then the header
//! row when there is one.
//!
//! ```no_run
//! use csv_fieldmap::{FieldMap, Parser, ReadMode};
//!
//! let fields = FieldMap::new([("facilityName", 2)])?;
//! let parser = Parser::builder("export.csv", fields)
//!     .first_row_keyword("Fcilty_typ")
//!     .has_header(true)
//!     .read_mode(ReadMode::Bytes)
//!     .build()?;
//! println!("skipped {} records", parser.skipped().total());
//! # Ok::<(), csv_fieldmap::ParserError>(())
//! ```
//!
//! # Dialect detection
//!
//! The [`Sniffer`] parses the sample with every candidate delimiter and quote
//! character, scores each resulting table on how uniform its rows are and how
//! consistent the value types of its columns are, and keeps the best one. It
//! can be used on its own:
//!
//! ```no_run
//! use csv_fieldmap::{SampleSize, Sniffer};
//!
//! let mut sniffer = Sniffer::new();
//! sniffer.sample_size(SampleSize::Records(50));
//! let metadata = sniffer.sniff_path("data.csv")?;
//! println!("{} (header: {})", metadata.dialect, metadata.has_header);
//! # Ok::<(), csv_fieldmap::ParserError>(())
//! ```

mod encoding;
mod error;
mod field_map;
mod field_type;
mod metadata;
mod parser;
mod sample;
mod skip;
mod sniff;
mod source;

pub use error::{ParserError, Result};
pub use field_map::{FieldMap, ProjectedRow};
pub use metadata::{Dialect, Header, LineTerminator, Metadata, Quote};
pub use parser::{Parser, ParserBuilder, Rows};
pub use sample::SampleSize;
pub use skip::SkipReport;
pub use sniff::Sniffer;
pub use source::ReadMode;

// Re-export for advanced usage
pub use encoding::{EncodingInfo, detect_encoding, is_utf8};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api() {
        let _sniffer = Sniffer::new();
        let _sample = SampleSize::Records(100);
        let _quote = Quote::Some(b'"');
        let _header = Header::Unspecified;
        let _mode = ReadMode::Bytes;
        let _report = SkipReport::default();
        let _map = FieldMap::new([("a", 0)]).unwrap();
    }

    #[test]
    fn test_sniff_simple_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6\n";
        let metadata = Sniffer::new().sniff_bytes(data).unwrap();

        assert_eq!(metadata.dialect.delimiter, b',');
        assert_eq!(metadata.num_fields, 3);
        assert!(metadata.encoding.is_utf8);
    }

    #[test]
    fn test_encoding_helpers() {
        assert!(is_utf8(b"plain ascii"));
        assert!(!detect_encoding(b"caf\xE9 cr\xE8me br\xFBl\xE9e").is_utf8);
    }
}
