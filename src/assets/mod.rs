//! Image sources, decoding and the background loader.

/// Decoded premultiplied rasters.
pub mod image;
/// Off-thread fetch and decode.
pub mod loader;
/// Source string resolution (data URLs, files, URLs).
pub mod source;
