//! Encoding detection for samples and field decoding in byte mode.

use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use simdutf8::compat::from_utf8;

/// Check if the given bytes are valid UTF-8.
///
/// A multi-byte sequence cut off at the very end of the data still counts as
/// valid, since samples are read with a byte limit.
pub fn is_utf8(data: &[u8]) -> bool {
    match from_utf8(data) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}

/// Check if the data starts with a UTF-8 BOM (EF BB BF).
pub fn has_utf8_bom(data: &[u8]) -> bool {
    data.starts_with(&[0xEF, 0xBB, 0xBF])
}

/// Skip the UTF-8 BOM if present and return the remaining data.
pub fn skip_bom(data: &[u8]) -> &[u8] {
    if has_utf8_bom(data) { &data[3..] } else { data }
}

/// Information about the detected encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodingInfo {
    /// Whether the data is valid UTF-8.
    pub is_utf8: bool,
    /// Whether a UTF-8 BOM was present.
    pub has_bom: bool,
    /// Encoding used to decode fields in byte mode.
    pub encoding: &'static Encoding,
}

impl Default for EncodingInfo {
    fn default() -> Self {
        Self {
            is_utf8: true,
            has_bom: false,
            encoding: encoding_rs::UTF_8,
        }
    }
}

/// Detect the encoding of a sample.
///
/// Valid UTF-8 is reported as UTF-8; anything else is handed to chardetng
/// (Windows-125x, ISO-8859 variants, GBK, Shift_JIS and friends).
pub fn detect_encoding(data: &[u8]) -> EncodingInfo {
    let has_bom = has_utf8_bom(data);
    let data = skip_bom(data);

    if is_utf8(data) {
        return EncodingInfo {
            is_utf8: true,
            has_bom,
            encoding: encoding_rs::UTF_8,
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(data, true);
    let encoding = detector.guess(None, true);

    EncodingInfo {
        is_utf8: false,
        has_bom,
        encoding,
    }
}

/// Decode one raw field with `encoding`. Undecodable bytes become U+FFFD.
pub fn decode_field<'a>(bytes: &'a [u8], encoding: &'static Encoding) -> Cow<'a, str> {
    if encoding == encoding_rs::UTF_8 {
        return String::from_utf8_lossy(bytes);
    }
    encoding.decode_without_bom_handling(bytes).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_utf8() {
        assert!(is_utf8(b"Hello, World!"));
        assert!(is_utf8("こんにちは".as_bytes()));
        assert!(is_utf8(b""));
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(!is_utf8(&[0xFF, 0xFE, b'a']));
        assert!(!is_utf8(&[0x80, 0x81, 0x82]));
    }

    #[test]
    fn test_truncated_sequence_counts_as_utf8() {
        let text = "Zoë".as_bytes();
        assert!(is_utf8(&text[..text.len() - 1]));
    }

    #[test]
    fn test_utf8_bom() {
        let with_bom = [0xEF, 0xBB, 0xBF, b'a', b'b', b'c'];
        assert!(has_utf8_bom(&with_bom));
        assert!(!has_utf8_bom(b"abc"));
        assert_eq!(skip_bom(&with_bom), b"abc");
        assert_eq!(skip_bom(b"abc"), b"abc");
    }

    #[test]
    fn test_detect_encoding() {
        let info = detect_encoding(b"Hello");
        assert!(info.is_utf8);
        assert!(!info.has_bom);
        assert_eq!(info.encoding, encoding_rs::UTF_8);

        let info = detect_encoding(&[0xEF, 0xBB, 0xBF, b'H', b'i']);
        assert!(info.is_utf8);
        assert!(info.has_bom);
    }

    #[test]
    fn test_detect_and_decode_latin1() {
        // windows-1252 text
        let data: &[u8] = b"Caf\xE9;Cr\xE8me\nna\xEFve;d\xE9j\xE0\n";
        let info = detect_encoding(data);
        assert!(!info.is_utf8);
        assert_ne!(info.encoding, encoding_rs::UTF_8);
        assert_eq!(decode_field(b"Caf\xE9", encoding_rs::WINDOWS_1252), "Café");
    }

    #[test]
    fn test_decode_utf8_lossy() {
        assert_eq!(decode_field(b"ok", encoding_rs::UTF_8), "ok");
        assert_eq!(decode_field(b"a\xFFb", encoding_rs::UTF_8), "a\u{FFFD}b");
    }
}
