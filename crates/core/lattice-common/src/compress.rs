//! Gzip helpers for text payloads.

use crate::{LatticeError, LatticeResult};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Compresses text to gzip bytes.
pub fn compress_text(text: &str) -> LatticeResult<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    Ok(encoder.finish()?)
}

/// Decompresses gzip bytes back to text.
pub fn decompress_text(bytes: &[u8]) -> LatticeResult<String> {
    let mut decoder = GzDecoder::new(bytes);
    let mut text = String::new();
    decoder
        .read_to_string(&mut text)
        .map_err(|e| LatticeError::invalid_input(format!("not valid gzip text: {e}")))?;
    Ok(text)
}

/// Compresses text and encodes the result as base64 for transport in
/// text-only payloads.
pub fn compress_to_base64(text: &str) -> LatticeResult<String> {
    use base64::Engine;
    Ok(base64::engine::general_purpose::STANDARD.encode(compress_text(text)?))
}

/// Decodes base64 gzip data back to text.
pub fn decompress_from_base64(encoded: &str) -> LatticeResult<String> {
    use base64::Engine;
    let bytes = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
    decompress_text(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let text = "the same phrase repeated ".repeat(40);
        let compressed = compress_text(&text).unwrap();
        assert!(compressed.len() < text.len());
        assert_eq!(decompress_text(&compressed).unwrap(), text);
    }

    #[test]
    fn test_empty_text() {
        let compressed = compress_text("").unwrap();
        assert_eq!(decompress_text(&compressed).unwrap(), "");
    }

    #[test]
    fn test_invalid_gzip_rejected() {
        assert!(matches!(
            decompress_text(b"definitely not gzip"),
            Err(LatticeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_base64_round_trip() {
        let text = "payload for transport";
        let encoded = compress_to_base64(text).unwrap();
        assert_eq!(decompress_from_base64(&encoded).unwrap(), text);
    }
}
