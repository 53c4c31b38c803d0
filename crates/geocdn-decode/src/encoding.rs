//! Gzip transfer encoding.

use std::io::{Read, Write};

use flate2::{Compression, read::MultiGzDecoder, write::GzEncoder};

use crate::{DecodeError, DecodeResult, FeatureCollection, parse_feature_collection};

/// How a payload is encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Gzip-compressed JSON, served with a `.gz` suffix.
    Gzip,
    /// Plain JSON.
    Identity,
}

impl Encoding {
    /// File suffix appended to the base path for this encoding.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Gzip => ".gz",
            Self::Identity => "",
        }
    }
}

/// Inflate a gzip stream into UTF-8 text.
///
/// Concatenated gzip members are inflated in sequence, as `gunzip` does.
pub fn decompress(data: &[u8]) -> DecodeResult<String> {
    let mut text = String::new();
    MultiGzDecoder::new(data)
        .read_to_string(&mut text)
        .map_err(|e| DecodeError::Decompress {
            detail: e.to_string(),
        })?;
    Ok(text)
}

/// Gzip-compress a document at the default compression level.
pub fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Decode a payload into a feature collection according to its encoding.
pub fn decode_feature_collection(
    data: &[u8],
    encoding: Encoding,
) -> DecodeResult<FeatureCollection> {
    match encoding {
        Encoding::Gzip => {
            let text = decompress(data)?;
            parse_feature_collection(text.as_bytes())
        }
        Encoding::Identity => parse_feature_collection(data),
    }
}
