//! zlib compression of snippet text before sealing
//!
//! Level 7 is part of the wire contract: envelopes written by any client must
//! inflate on every other client. Where the compressed bytes sit relative to
//! the serialized snippet differs between envelope versions (see `cipher`);
//! the codec itself is version-independent.

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};

use snip_core::{SnipError, SnipResult};

const COMPRESSION_LEVEL: u32 = 7;

pub fn compress(text: &str) -> SnipResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(COMPRESSION_LEVEL));
    encoder.write_all(text.as_bytes())?;
    Ok(encoder.finish()?)
}

pub fn decompress(bytes: &[u8]) -> SnipResult<String> {
    let mut decoder = ZlibDecoder::new(bytes);
    let mut inflated = Vec::new();
    decoder
        .read_to_end(&mut inflated)
        .map_err(|e| SnipError::Encoding(format!("inflate: {e}")))?;
    String::from_utf8(inflated).map_err(|e| SnipError::Encoding(format!("inflated text: {e}")))
}

/// Raw-bytes variant for the legacy v1 framing, where the entire serialized
/// snippet is compressed rather than just its text field.
pub fn decompress_bytes(bytes: &[u8]) -> SnipResult<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(bytes);
    let mut inflated = Vec::new();
    decoder
        .read_to_end(&mut inflated)
        .map_err(|e| SnipError::Encoding(format!("inflate: {e}")))?;
    Ok(inflated)
}

pub fn compress_bytes(bytes: &[u8]) -> SnipResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(COMPRESSION_LEVEL));
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_roundtrip() {
        let text = "fn main() { println!(\"hello\"); }\n";
        let packed = compress(text).unwrap();
        assert_eq!(decompress(&packed).unwrap(), text);
    }

    #[test]
    fn test_repetitive_text_shrinks() {
        let text = "abcabcabc".repeat(200);
        let packed = compress(&text).unwrap();
        assert!(packed.len() < text.len());
    }

    #[test]
    fn test_garbage_fails_closed() {
        assert!(decompress(b"definitely not zlib").is_err());
    }

    #[test]
    fn test_non_utf8_payload_is_an_encoding_error() {
        let packed = compress_bytes(&[0xff, 0xfe, 0x00, 0x80]).unwrap();
        let err = decompress(&packed).unwrap_err();
        assert!(matches!(err, SnipError::Encoding(_)));
    }
}
