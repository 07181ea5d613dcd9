//! Text encoding detection for byte buffers and files.
//!
//! Detection is two-staged: a byte-order-mark check first, then a
//! statistical heuristic over a bounded sample. The heuristic only aims to
//! tell the common Unicode variants apart from a caller-supplied default
//! (western, ASCII-compatible) encoding; it is not a general charset
//! sniffer. The UTF-8 stage keys on multi-byte sequences that encode the
//! accented characters of the Latin-1 / Windows-1252 upper range, so it
//! only works for western text.

use crate::{LatticeError, LatticeResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::trace;

/// Sample window used when detecting from a file.
pub const DEFAULT_SAMPLE_SIZE: usize = 0x10000;

// Heuristic tuning constants. All of them are arbitrary, inherited
// thresholds, not derived contracts.
const NULL_RATIO_LOW: f64 = 0.2;
const NULL_RATIO_HIGH: f64 = 0.6;
const SUSPICIOUS_SEQUENCES_PER: f64 = 500_000.0;
const ASCII_BULK_RATIO: f64 = 0.8;

/// Encodings the detector can identify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// UTF-8
    Utf8,
    /// UTF-16 little-endian
    Utf16Le,
    /// UTF-16 big-endian
    Utf16Be,
    /// UTF-32 little-endian
    Utf32Le,
    /// UTF-32 big-endian
    Utf32Be,
    /// UTF-7 (BOM detection only)
    Utf7,
}

impl TextEncoding {
    /// The byte-order mark identifying this encoding.
    #[must_use]
    pub const fn bom(self) -> &'static [u8] {
        match self {
            TextEncoding::Utf8 => &[0xEF, 0xBB, 0xBF],
            TextEncoding::Utf16Le => &[0xFF, 0xFE],
            TextEncoding::Utf16Be => &[0xFE, 0xFF],
            TextEncoding::Utf32Le => &[0xFF, 0xFE, 0x00, 0x00],
            TextEncoding::Utf32Be => &[0x00, 0x00, 0xFE, 0xFF],
            TextEncoding::Utf7 => &[0x2B, 0x2F, 0x76],
        }
    }

    /// Canonical name of the encoding.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Utf16Le => "UTF-16LE",
            TextEncoding::Utf16Be => "UTF-16BE",
            TextEncoding::Utf32Le => "UTF-32LE",
            TextEncoding::Utf32Be => "UTF-32BE",
            TextEncoding::Utf7 => "UTF-7",
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a detection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    /// Detected encoding, `None` when no heuristic triggered.
    pub encoding: Option<TextEncoding>,
    /// Whether the input started with a byte-order mark.
    pub has_bom: bool,
}

/// Identifies an encoding from a leading byte-order mark.
///
/// UTF-16 LE is only reported when the prefix is not actually a UTF-32 LE
/// mark (`FF FE 00 00`).
#[must_use]
pub fn detect_bom(bytes: &[u8]) -> Option<TextEncoding> {
    if bytes.len() < 2 {
        return None;
    }

    if bytes[0] == 0xFF
        && bytes[1] == 0xFE
        && (bytes.len() < 4 || bytes[2] != 0 || bytes[3] != 0)
    {
        return Some(TextEncoding::Utf16Le);
    }

    if bytes[0] == 0xFE && bytes[1] == 0xFF {
        return Some(TextEncoding::Utf16Be);
    }

    if bytes.len() < 3 {
        return None;
    }

    if bytes[..3] == [0xEF, 0xBB, 0xBF] {
        return Some(TextEncoding::Utf8);
    }

    if bytes[..3] == [0x2B, 0x2F, 0x76] {
        return Some(TextEncoding::Utf7);
    }

    if bytes.len() < 4 {
        return None;
    }

    if bytes[..4] == [0xFF, 0xFE, 0x00, 0x00] {
        return Some(TextEncoding::Utf32Le);
    }

    if bytes[..4] == [0x00, 0x00, 0xFE, 0xFF] {
        return Some(TextEncoding::Utf32Be);
    }

    None
}

/// Detects the encoding of a text sample: BOM first, heuristics second.
#[must_use]
pub fn detect(bytes: &[u8]) -> Detection {
    if let Some(encoding) = detect_bom(bytes) {
        return Detection { encoding: Some(encoding), has_bom: true };
    }

    Detection { encoding: detect_by_heuristics(bytes), has_bom: false }
}

/// Detects the encoding of a file, sampling the default window size.
pub fn detect_file<P: AsRef<Path>>(path: P) -> LatticeResult<Detection> {
    detect_file_with_sample(path, DEFAULT_SAMPLE_SIZE)
}

/// Detects the encoding of a file from a bounded leading sample.
pub fn detect_file_with_sample<P: AsRef<Path>>(path: P, sample_size: usize) -> LatticeResult<Detection> {
    let mut file = File::open(path.as_ref())
        .map_err(|e| LatticeError::not_found(format!("{}: {e}", path.as_ref().display())))?;

    let mut sample = vec![0u8; sample_size];
    let mut filled = 0;
    while filled < sample.len() {
        let n = file.read(&mut sample[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    sample.truncate(filled);

    Ok(detect(&sample))
}

/// Decodes text bytes to a `String`, stripping any BOM and falling back to
/// `default` when detection is inconclusive.
pub fn decode_string(bytes: &[u8], default: TextEncoding) -> LatticeResult<String> {
    let detection = detect(bytes);
    let encoding = detection.encoding.unwrap_or(default);
    let body = if detection.has_bom {
        &bytes[encoding.bom().len()..]
    } else {
        bytes
    };

    match encoding {
        TextEncoding::Utf8 => {
            let (text, _, _) = encoding_rs::UTF_8.decode(body);
            Ok(text.into_owned())
        }
        TextEncoding::Utf16Le => {
            let (text, _, _) = encoding_rs::UTF_16LE.decode(body);
            Ok(text.into_owned())
        }
        TextEncoding::Utf16Be => {
            let (text, _, _) = encoding_rs::UTF_16BE.decode(body);
            Ok(text.into_owned())
        }
        TextEncoding::Utf32Le => decode_utf32(body, u32::from_le_bytes),
        TextEncoding::Utf32Be => decode_utf32(body, u32::from_be_bytes),
        TextEncoding::Utf7 => Err(LatticeError::encoding("UTF-7 decoding is not supported")),
    }
}

/// Encodes text with an optional leading BOM. Only the UTF-8/UTF-16
/// variants are supported as encode targets.
pub fn encode_text(text: &str, encoding: TextEncoding, with_bom: bool) -> LatticeResult<Vec<u8>> {
    let mut out = Vec::new();
    if with_bom {
        out.extend_from_slice(encoding.bom());
    }

    match encoding {
        TextEncoding::Utf8 => out.extend_from_slice(text.as_bytes()),
        TextEncoding::Utf16Le => {
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
        }
        TextEncoding::Utf16Be => {
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_be_bytes());
            }
        }
        other => {
            return Err(LatticeError::encoding(format!("{other} is not supported as an encode target")));
        }
    }

    Ok(out)
}

fn decode_utf32(body: &[u8], read: fn([u8; 4]) -> u32) -> LatticeResult<String> {
    if body.len() % 4 != 0 {
        return Err(LatticeError::encoding("UTF-32 input length must be a multiple of 4"));
    }

    body.chunks_exact(4)
        .map(|chunk| {
            let code = read([chunk[0], chunk[1], chunk[2], chunk[3]]);
            char::from_u32(code)
                .ok_or_else(|| LatticeError::encoding(format!("invalid UTF-32 code point {code:#x}")))
        })
        .collect()
}

/// Statistical detection over a BOM-less sample.
///
/// Walks the sample once, counting binary null positions, probable
/// US-ASCII bytes, and multi-byte UTF-8 sequences from the upper ranges of
/// Windows-1252.
fn detect_by_heuristics(sample: &[u8]) -> Option<TextEncoding> {
    if sample.is_empty() {
        return None;
    }

    let mut even_nulls: u64 = 0;
    let mut odd_nulls: u64 = 0;
    let mut suspicious_sequences: u64 = 0;
    let mut suspicious_bytes: u64 = 0;
    let mut likely_ascii: u64 = 0;

    let mut pos = 0;
    let mut skip = 0usize;
    while pos < sample.len() {
        if sample[pos] == 0 {
            if pos % 2 == 0 {
                even_nulls += 1;
            } else {
                odd_nulls += 1;
            }
        }

        if is_common_ascii(sample[pos]) {
            likely_ascii += 1;
        }

        if skip == 0 {
            let len = suspicious_utf8_sequence_len(sample, pos);
            if len > 0 {
                suspicious_sequences += 1;
                suspicious_bytes += len as u64;
                skip = len - 1;
            }
        } else {
            skip -= 1;
        }

        pos += 1;
    }

    let len = sample.len() as f64;

    // UTF-16 LE: for western text, nulls land almost exclusively on odd
    // positions (high bytes of a little-endian code unit).
    if (even_nulls as f64) * 2.0 / len < NULL_RATIO_LOW
        && (odd_nulls as f64) * 2.0 / len > NULL_RATIO_HIGH
    {
        trace!(even_nulls, odd_nulls, "null parity suggests UTF-16 LE");
        return Some(TextEncoding::Utf16Le);
    }

    // UTF-16 BE: mirrored null distribution.
    if (odd_nulls as f64) * 2.0 / len < NULL_RATIO_LOW
        && (even_nulls as f64) * 2.0 / len > NULL_RATIO_HIGH
    {
        trace!(even_nulls, odd_nulls, "null parity suggests UTF-16 BE");
        return Some(TextEncoding::Utf16Be);
    }

    // UTF-8: the sample must be structurally valid UTF-8, and the density
    // of suspicious upper-range sequences must exceed chance for western
    // text, with the bulk of the remaining bytes plain US-ASCII.
    if is_plausible_utf8(sample)
        && (suspicious_sequences as f64) * SUSPICIOUS_SEQUENCES_PER / len >= 1.0
        && (sample.len() as u64 == suspicious_bytes
            || (likely_ascii as f64) / (len - suspicious_bytes as f64) >= ASCII_BULK_RATIO)
    {
        trace!(suspicious_sequences, likely_ascii, "sequence density suggests UTF-8");
        return Some(TextEncoding::Utf8);
    }

    None
}

fn is_common_ascii(b: u8) -> bool {
    matches!(b, 0x0A | 0x0D | 0x09) || (0x20..=0x7E).contains(&b)
}

/// Structural UTF-8 validity per the W3C (Martin Duerst) pattern: in the
/// ASCII range only TAB/LF/CR and printable characters are accepted, which
/// rules out most binary data.
fn is_plausible_utf8(sample: &[u8]) -> bool {
    let mut i = 0;
    while i < sample.len() {
        let b = sample[i];
        let rest = &sample[i + 1..];

        let seq_len = match b {
            0x09 | 0x0A | 0x0D | 0x20..=0x7E => 1,
            0xC2..=0xDF => {
                if matches!(rest.first(), Some(0x80..=0xBF)) { 2 } else { return false }
            }
            0xE0 => {
                if matches!(rest.first(), Some(0xA0..=0xBF))
                    && matches!(rest.get(1), Some(0x80..=0xBF))
                {
                    3
                } else {
                    return false;
                }
            }
            0xE1..=0xEC | 0xEE | 0xEF => {
                if matches!(rest.first(), Some(0x80..=0xBF))
                    && matches!(rest.get(1), Some(0x80..=0xBF))
                {
                    3
                } else {
                    return false;
                }
            }
            0xED => {
                if matches!(rest.first(), Some(0x80..=0x9F))
                    && matches!(rest.get(1), Some(0x80..=0xBF))
                {
                    3
                } else {
                    return false;
                }
            }
            0xF0 => {
                if matches!(rest.first(), Some(0x90..=0xBF))
                    && matches!(rest.get(1), Some(0x80..=0xBF))
                    && matches!(rest.get(2), Some(0x80..=0xBF))
                {
                    4
                } else {
                    return false;
                }
            }
            0xF1..=0xF3 => {
                if matches!(rest.first(), Some(0x80..=0xBF))
                    && matches!(rest.get(1), Some(0x80..=0xBF))
                    && matches!(rest.get(2), Some(0x80..=0xBF))
                {
                    4
                } else {
                    return false;
                }
            }
            0xF4 => {
                if matches!(rest.first(), Some(0x80..=0x8F))
                    && matches!(rest.get(1), Some(0x80..=0xBF))
                    && matches!(rest.get(2), Some(0x80..=0xBF))
                {
                    4
                } else {
                    return false;
                }
            }
            _ => return false,
        };

        i += seq_len;
    }

    true
}

/// Length of a "suspicious" UTF-8 sequence at `pos`: the two/three-byte
/// encodings of accented characters, quotes, dashes and currency signs
/// from the upper ranges of Latin-1 / Windows-1252.
fn suspicious_utf8_sequence_len(sample: &[u8], pos: usize) -> usize {
    let b0 = sample[pos];
    let b1 = match sample.get(pos + 1) {
        Some(b) => *b,
        None => return 0,
    };

    match b0 {
        0xC2 => match b1 {
            0x81 | 0x8D | 0x8F | 0x90 | 0x9D => 2,
            0xA0..=0xBF => 2,
            _ => 0,
        },
        0xC3 => match b1 {
            0x80..=0xBF => 2,
            _ => 0,
        },
        0xC5 => match b1 {
            0x92 | 0x93 | 0xA0 | 0xA1 | 0xB8 | 0xBD | 0xBE => 2,
            _ => 0,
        },
        0xC6 => match b1 {
            0x92 => 2,
            _ => 0,
        },
        0xCB => match b1 {
            0x86 | 0x9C => 2,
            _ => 0,
        },
        0xE2 => {
            let b2 = match sample.get(pos + 2) {
                Some(b) => *b,
                None => return 0,
            };
            match (b1, b2) {
                (0x80, 0x93 | 0x94) => 3,
                (0x80, 0x98 | 0x99 | 0x9A) => 3,
                (0x80, 0x9C | 0x9D | 0x9E) => 3,
                (0x80, 0xA0 | 0xA1 | 0xA2) => 3,
                (0x80, 0xA6) => 3,
                (0x80, 0xB0) => 3,
                (0x80, 0xB9 | 0xBA) => 3,
                (0x82, 0xAC) => 3,
                (0x84, 0xA2) => 3,
                _ => 0,
            }
        }
        _ => 0,
    }
}
