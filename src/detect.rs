//! TIFF format detection and signature validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Byte order declared by a TIFF header.
///
/// Resolved once at startup via [`ByteOrder::host`] and passed into the
/// validator, rather than re-read from process state on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ByteOrder {
    /// Intel order, `II*\0` signature.
    Little,
    /// Motorola order, `MM\0*` signature.
    Big,
}

impl ByteOrder {
    /// The byte order of the host this process runs on.
    pub fn host() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }

    /// The 4-byte magic number a TIFF header carries in this order.
    pub fn signature(self) -> [u8; 4] {
        match self {
            ByteOrder::Little => TIFF_MAGIC_LE,
            ByteOrder::Big => TIFF_MAGIC_BE,
        }
    }
}

impl std::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ByteOrder::Little => write!(f, "little-endian"),
            ByteOrder::Big => write!(f, "big-endian"),
        }
    }
}

/// TIFF format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiffFormat {
    /// Byte order declared by the file header.
    pub byte_order: ByteOrder,
}

impl std::fmt::Display for TiffFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TIFF ({})", self.byte_order)
    }
}

/// Little-endian TIFF magic bytes: "II*\0"
const TIFF_MAGIC_LE: [u8; 4] = [0x49, 0x49, 0x2A, 0x00];
/// Big-endian TIFF magic bytes: "MM\0*"
const TIFF_MAGIC_BE: [u8; 4] = [0x4D, 0x4D, 0x00, 0x2A];

/// Upper bound on the header read; the signature lives in the first 4 bytes
/// and nothing past this offset is ever needed.
const HEADER_READ_LIMIT: u64 = 352;

/// Detect TIFF format from a file path.
///
/// Reads at most the first [`HEADER_READ_LIMIT`] bytes of the file, fewer
/// if the file is shorter — never the whole file.
///
/// # Arguments
/// * `path` - Path to the candidate file
///
/// # Returns
/// * `Ok(TiffFormat)` if the file starts with a TIFF signature
/// * `Err(Error::UnknownFormat)` if the leading bytes match neither order
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<TiffFormat> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_READ_LIMIT as usize);
    file.take(HEADER_READ_LIMIT).read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect TIFF format from bytes.
///
/// # Arguments
/// * `data` - Byte slice containing at least the first 4 bytes of the file
///
/// # Returns
/// * `Ok(TiffFormat)` if the data starts with a TIFF magic number
/// * `Err(Error::UnknownFormat)` otherwise, including short input
pub fn detect_format_from_bytes(data: &[u8]) -> Result<TiffFormat> {
    if data.len() < TIFF_MAGIC_LE.len() {
        return Err(Error::UnknownFormat);
    }

    if data.starts_with(&TIFF_MAGIC_LE) {
        return Ok(TiffFormat {
            byte_order: ByteOrder::Little,
        });
    }
    if data.starts_with(&TIFF_MAGIC_BE) {
        return Ok(TiffFormat {
            byte_order: ByteOrder::Big,
        });
    }

    Err(Error::UnknownFormat)
}

/// Check whether a file is a TIFF in the expected byte order.
///
/// Purely content-based: the file extension plays no part here. Read
/// failures and signature mismatches both yield `false` and are reported
/// through the log channel; no error escapes this boundary.
///
/// # Arguments
/// * `path` - Path to the file
/// * `expected` - Byte order the signature must declare
pub fn is_tiff<P: AsRef<Path>>(path: P, expected: ByteOrder) -> bool {
    let path = path.as_ref();
    match detect_format_from_path(path) {
        Ok(format) if format.byte_order == expected => true,
        Ok(format) => {
            log::warn!(
                "{} is signed as {}, expected {} byte order",
                path.display(),
                format,
                expected
            );
            false
        }
        Err(e) => {
            log::warn!("{} is not signed as TIFF: {}", path.display(), e);
            false
        }
    }
}

/// Check whether bytes carry a TIFF signature in the expected byte order.
pub fn is_tiff_bytes(data: &[u8], expected: ByteOrder) -> bool {
    matches!(detect_format_from_bytes(data), Ok(format) if format.byte_order == expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_little_endian() {
        let data = b"II\x2a\x00\x08\x00\x00\x00";
        let format = detect_format_from_bytes(data).unwrap();
        assert_eq!(format.byte_order, ByteOrder::Little);
    }

    #[test]
    fn test_detect_big_endian() {
        let data = b"MM\x00\x2a\x00\x00\x00\x08";
        let format = detect_format_from_bytes(data).unwrap();
        assert_eq!(format.byte_order, ByteOrder::Big);
    }

    #[test]
    fn test_detect_invalid_format() {
        let data = b"\x89PNG\r\n\x1a\n";
        let result = detect_format_from_bytes(data);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_too_short() {
        assert!(matches!(
            detect_format_from_bytes(b"II*"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            detect_format_from_bytes(b""),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_is_tiff_bytes_respects_expected_order() {
        assert!(is_tiff_bytes(b"II\x2a\x00rest", ByteOrder::Little));
        assert!(!is_tiff_bytes(b"II\x2a\x00rest", ByteOrder::Big));
        assert!(is_tiff_bytes(b"MM\x00\x2arest", ByteOrder::Big));
        assert!(!is_tiff_bytes(b"Not a TIFF", ByteOrder::Little));
    }

    #[test]
    fn test_format_display() {
        let format = detect_format_from_bytes(b"II\x2a\x00\x08\x00\x00\x00").unwrap();
        assert_eq!(format.to_string(), "TIFF (little-endian)");
        let format = detect_format_from_bytes(b"MM\x00\x2a\x00\x00\x00\x08").unwrap();
        assert_eq!(format.to_string(), "TIFF (big-endian)");
    }

    #[test]
    fn test_signature_constants() {
        assert_eq!(ByteOrder::Little.signature(), *b"II\x2a\x00");
        assert_eq!(ByteOrder::Big.signature(), *b"MM\x00\x2a");
    }
}
