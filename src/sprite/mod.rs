//! Animated images as packed sprite strips.
//!
//! [`decode::decode_sprite`] turns GIF/WebP/APNG bytes into one horizontal strip with a single
//! mean frame delay; [`player::SpriteAnimation`] steps through it on paint.

/// Frame decoding and strip packing.
pub mod decode;
/// Playback state.
pub mod player;
