use std::io::{self, BufRead, BufReader, Read};

/// Sample size configuration for sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSize {
    /// Sample a specific number of records (lines).
    Records(usize),
    /// Sample a specific number of bytes.
    Bytes(usize),
    /// Read the entire file.
    ///
    /// # Warning
    ///
    /// This loads the entire file into memory. Prefer [`SampleSize::Bytes`]
    /// for large files.
    All,
}

impl Default for SampleSize {
    fn default() -> Self {
        SampleSize::Bytes(1024)
    }
}

impl SampleSize {
    /// Returns the number of records to sample, or None for other modes.
    pub fn records(&self) -> Option<usize> {
        match self {
            SampleSize::Records(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number of bytes to sample, or None for other modes.
    pub fn bytes(&self) -> Option<usize> {
        match self {
            SampleSize::Bytes(n) => Some(*n),
            _ => None,
        }
    }
}

/// Read a sample from `reader` according to `size`.
///
/// A byte-limited sample that stops in the middle of a line loses that
/// trailing fragment, as long as a complete line precedes it.
pub(crate) fn read_sample<R: Read>(reader: R, size: SampleSize) -> io::Result<Vec<u8>> {
    match size {
        SampleSize::Bytes(n) => {
            let mut buffer = Vec::with_capacity(n);
            let bytes_read = reader.take(n as u64).read_to_end(&mut buffer)?;
            if bytes_read == n {
                trim_partial_line(&mut buffer);
            }
            Ok(buffer)
        }
        SampleSize::All => {
            let mut buffer = Vec::new();
            BufReader::new(reader).read_to_end(&mut buffer)?;
            Ok(buffer)
        }
        SampleSize::Records(n) => {
            let mut reader = BufReader::new(reader);
            let mut buffer = Vec::new();
            for _ in 0..n {
                if reader.read_until(b'\n', &mut buffer)? == 0 {
                    break;
                }
            }
            Ok(buffer)
        }
    }
}

/// Drop everything after the last line terminator, if there is one.
fn trim_partial_line(buffer: &mut Vec<u8>) {
    if matches!(buffer.last(), Some(b'\n' | b'\r')) {
        return;
    }
    if let Some(pos) = buffer.iter().rposition(|&b| b == b'\n' || b == b'\r') {
        buffer.truncate(pos + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one_kilobyte() {
        assert_eq!(SampleSize::default(), SampleSize::Bytes(1024));
        assert_eq!(SampleSize::default().bytes(), Some(1024));
        assert_eq!(SampleSize::Records(5).records(), Some(5));
    }

    #[test]
    fn test_byte_sample_drops_partial_line() {
        let data = b"a,b\n1,2\n3,4\n";
        let sample = read_sample(&data[..], SampleSize::Bytes(10)).unwrap();
        assert_eq!(sample, b"a,b\n1,2\n");
    }

    #[test]
    fn test_byte_sample_keeps_single_partial_line() {
        let data = b"abcdefghij";
        let sample = read_sample(&data[..], SampleSize::Bytes(4)).unwrap();
        assert_eq!(sample, b"abcd");
    }

    #[test]
    fn test_short_input_is_untouched() {
        let data = b"a,b\n1,2";
        let sample = read_sample(&data[..], SampleSize::Bytes(1024)).unwrap();
        assert_eq!(sample, data);
    }

    #[test]
    fn test_record_sample() {
        let data = b"a,b\n1,2\n3,4\n5,6\n";
        let sample = read_sample(&data[..], SampleSize::Records(2)).unwrap();
        assert_eq!(sample, b"a,b\n1,2\n");
    }
}
