//! Decode GeoJSON feature collections served by the carto data CDN.
//!
//! This crate provides pure synchronous decoding functions. Payloads are
//! either gzip-compressed (`.geojson.gz`) or plain JSON (`.geojson`); both
//! end up as a [`FeatureCollection`]. Nothing here touches the network.
//!
//! # Design principles
//!
//! - **Synchronous**: No async, no threading primitives
//! - **Opaque payloads**: Only parse failures are errors; feature shape is not validated
//! - **Distinguishable failures**: Decompression and parse errors are separate variants

mod encoding;
mod error;
mod feature;

pub use encoding::{Encoding, compress, decode_feature_collection, decompress};
pub use error::{DecodeError, DecodeResult};
pub use feature::{Feature, FeatureCollection};

/// Parse a feature collection from a plain JSON document.
pub fn parse_feature_collection(data: &[u8]) -> DecodeResult<FeatureCollection> {
    serde_json::from_slice(data).map_err(|e| DecodeError::Parse {
        detail: e.to_string(),
    })
}
