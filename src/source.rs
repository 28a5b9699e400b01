//! Record-level access to a delimited file.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::{ByteRecord, StringRecord};
use encoding_rs::Encoding;

use crate::encoding::{decode_field, has_utf8_bom};
use crate::error::Result;
use crate::metadata::Dialect;

/// How record bytes are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Records must be valid UTF-8; invalid input fails the row.
    #[default]
    Text,
    /// Records are read as raw bytes and each field is decoded with the
    /// encoding detected from the sample. Undecodable bytes become U+FFFD.
    Bytes,
}

/// A cursor over the records of one file.
///
/// Each instance owns its own file handle, so two sources over the same path
/// advance independently.
pub(crate) struct RowSource {
    reader: csv::Reader<BufReader<File>>,
    mode: ReadMode,
    encoding: &'static Encoding,
    skip_initial_space: bool,
    raw: ByteRecord,
    scratch: StringRecord,
}

impl RowSource {
    /// Open `path` for reading with `dialect`. A leading UTF-8 BOM is skipped.
    pub fn open(
        path: &Path,
        dialect: &Dialect,
        mode: ReadMode,
        encoding: &'static Encoding,
    ) -> Result<Self> {
        let mut file = BufReader::new(File::open(path)?);
        if has_utf8_bom(file.fill_buf()?) {
            file.consume(3);
        }

        Ok(Self {
            reader: dialect.reader_builder().from_reader(file),
            mode,
            encoding,
            skip_initial_space: dialect.skip_initial_space,
            raw: ByteRecord::new(),
            scratch: StringRecord::new(),
        })
    }

    /// Read the next record into `record`. Returns `false` at end of input.
    pub fn read(&mut self, record: &mut StringRecord) -> Result<bool> {
        let more = match self.mode {
            ReadMode::Text => self.reader.read_record(record)?,
            ReadMode::Bytes => {
                let more = self.reader.read_byte_record(&mut self.raw)?;
                if more {
                    record.clear();
                    for field in &self.raw {
                        record.push_field(&decode_field(field, self.encoding));
                    }
                }
                more
            }
        };
        if more && self.skip_initial_space {
            self.strip_initial_space(record);
        }
        Ok(more)
    }

    /// Drop the spaces that follow each delimiter.
    fn strip_initial_space(&mut self, record: &mut StringRecord) {
        self.scratch.clear();
        for (i, field) in record.iter().enumerate() {
            if i == 0 {
                self.scratch.push_field(field);
            } else {
                self.scratch.push_field(field.trim_start_matches(' '));
            }
        }
        std::mem::swap(record, &mut self.scratch);
    }

    /// Discard the next record without decoding it. Returns `false` at end of
    /// input.
    pub fn skip(&mut self) -> Result<bool> {
        Ok(self.reader.read_byte_record(&mut self.raw)?)
    }

    /// Read the next record and return its first field, decoded leniently.
    /// `None` at end of input.
    pub fn next_first_field(&mut self) -> Result<Option<Cow<'_, str>>> {
        if !self.reader.read_byte_record(&mut self.raw)? {
            return Ok(None);
        }
        let first = self.raw.get(0).unwrap_or_default();
        Ok(Some(match self.mode {
            ReadMode::Text => String::from_utf8_lossy(first),
            ReadMode::Bytes => decode_field(first, self.encoding),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_and_skip() {
        let file = temp_file(b"a,b\n1,2\n3,4\n");
        let mut source =
            RowSource::open(file.path(), &Dialect::default(), ReadMode::Text, encoding_rs::UTF_8)
                .unwrap();

        assert!(source.skip().unwrap());
        let mut record = StringRecord::new();
        assert!(source.read(&mut record).unwrap());
        assert_eq!(record, vec!["1", "2"]);
        assert!(source.read(&mut record).unwrap());
        assert!(!source.read(&mut record).unwrap());
        assert!(!source.skip().unwrap());
    }

    #[test]
    fn test_bom_is_skipped() {
        let file = temp_file(b"\xEF\xBB\xBFid,name\n");
        let mut source =
            RowSource::open(file.path(), &Dialect::default(), ReadMode::Text, encoding_rs::UTF_8)
                .unwrap();

        let mut record = StringRecord::new();
        assert!(source.read(&mut record).unwrap());
        assert_eq!(&record[0], "id");
    }

    #[test]
    fn test_byte_mode_decodes_fields() {
        let file = temp_file(b"caf\xE9,cr\xE8me\n");
        let mut source = RowSource::open(
            file.path(),
            &Dialect::default(),
            ReadMode::Bytes,
            encoding_rs::WINDOWS_1252,
        )
        .unwrap();

        let mut record = StringRecord::new();
        assert!(source.read(&mut record).unwrap());
        assert_eq!(record, vec!["café", "crème"]);
    }

    #[test]
    fn test_initial_space_is_stripped() {
        let file = temp_file(b" id,  name, city\n");
        let dialect = Dialect::default().with_skip_initial_space(true);
        let mut source =
            RowSource::open(file.path(), &dialect, ReadMode::Text, encoding_rs::UTF_8).unwrap();

        let mut record = StringRecord::new();
        assert!(source.read(&mut record).unwrap());
        assert_eq!(record, vec![" id", "name", "city"]);
    }

    #[test]
    fn test_text_mode_rejects_invalid_utf8() {
        let file = temp_file(b"caf\xE9,x\n");
        let mut source =
            RowSource::open(file.path(), &Dialect::default(), ReadMode::Text, encoding_rs::UTF_8)
                .unwrap();

        let mut record = StringRecord::new();
        assert!(source.read(&mut record).is_err());
    }

    #[test]
    fn test_first_field() {
        let file = temp_file(b"junk line\nKey,1\n");
        let mut source =
            RowSource::open(file.path(), &Dialect::default(), ReadMode::Text, encoding_rs::UTF_8)
                .unwrap();

        assert_eq!(source.next_first_field().unwrap().as_deref(), Some("junk line"));
        assert_eq!(source.next_first_field().unwrap().as_deref(), Some("Key"));
        assert!(source.next_first_field().unwrap().is_none());
    }
}
