use std::{borrow::Cow, collections::HashMap, path::Path};

use base64::Engine as _;

use crate::{
    assets::source::decode_data_url,
    foundation::{
        core::Rgba8,
        error::{ThemeError, ThemeResult},
    },
    scene::node::TextStyle,
};

/// RGBA8 brush color carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrush {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<Rgba8> for TextBrush {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

#[derive(Clone)]
struct RegisteredFont {
    family: String,
    data: vello_cpu::peniko::FontData,
}

/// Shaped text ready to draw.
pub struct TextBlock {
    /// Parley layout with line breaks applied.
    pub layout: parley::Layout<TextBrush>,
    /// Font the glyph ids refer to.
    pub font: vello_cpu::peniko::FontData,
    /// Widest line advance.
    pub width: f64,
    /// Total height of all lines.
    pub height: f64,
}

/// Fonts available to text nodes, keyed by the family names scene documents use.
pub struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    families: HashMap<String, RegisteredFont>,
    default: Option<RegisteredFont>,
    warned_no_font: bool,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("families", &self.families.keys().collect::<Vec<_>>())
            .field("has_default", &self.default.is_some())
            .finish()
    }
}

impl FontBook {
    /// Empty book; text is skipped until a font is registered.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
            default: None,
            warned_no_font: false,
        }
    }

    fn register_bytes(&mut self, bytes: Vec<u8>) -> ThemeResult<RegisteredFont> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ThemeError::decode("no font families registered from font bytes"))?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ThemeError::decode("registered font family has no name"))?
            .to_string();
        Ok(RegisteredFont {
            family,
            data: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0),
        })
    }

    /// Register raw font bytes under `alias` (the family name documents refer to).
    pub fn register(&mut self, alias: &str, bytes: Vec<u8>) -> ThemeResult<()> {
        let font = self.register_bytes(bytes)?;
        tracing::debug!(alias, family = %font.family, "font registered");
        self.families.insert(alias.to_ascii_lowercase(), font);
        Ok(())
    }

    /// Register a document-embedded font (data URL, hex or base64 payload).
    pub fn register_encoded(&mut self, alias: &str, payload: &str) -> ThemeResult<()> {
        let bytes = decode_font_payload(payload)?;
        self.register(alias, bytes)
    }

    /// Fallback font for families nobody registered.
    pub fn set_default(&mut self, bytes: Vec<u8>) -> ThemeResult<()> {
        self.default = Some(self.register_bytes(bytes)?);
        Ok(())
    }

    /// Load the fallback font from a file.
    pub fn set_default_from_file(&mut self, path: &Path) -> ThemeResult<()> {
        let bytes = std::fs::read(path).map_err(|e| {
            ThemeError::io(format!("failed to read font '{}': {e}", path.display()))
        })?;
        self.set_default(bytes)
    }

    /// True when `family` resolves to a registered font.
    pub fn has_family(&self, family: &str) -> bool {
        self.families.contains_key(&family.to_ascii_lowercase())
    }

    /// True when any text can be drawn at all.
    pub fn has_any_font(&self) -> bool {
        self.default.is_some() || !self.families.is_empty()
    }

    /// Shape `text` with `style`, wrapping at `max_width` when given.
    ///
    /// Returns `None` (warning once) when no font is available.
    pub fn layout(
        &mut self,
        text: &str,
        style: &TextStyle,
        max_width: Option<f64>,
    ) -> Option<TextBlock> {
        let font = self
            .families
            .get(&style.font_family.to_ascii_lowercase())
            .or(self.default.as_ref())
            .or_else(|| self.families.values().next())
            .cloned();
        let Some(font) = font else {
            if !self.warned_no_font {
                tracing::warn!("no font available, text nodes are not drawn");
                self.warned_no_font = true;
            }
            return None;
        };
        let size = style.font_size as f32;
        if !size.is_finite() || size <= 0.0 {
            return None;
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(font.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrush::from(
            style.fill,
        )));
        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(max_width.map(|w| w as f32));

        let width = layout
            .lines()
            .map(|l| f64::from(l.metrics().advance))
            .fold(0.0, f64::max);
        let height = f64::from(layout.height());
        Some(TextBlock {
            layout,
            font: font.data,
            width,
            height,
        })
    }
}

/// Decode an embedded font: `data:` URL, hex digits, or standard base64.
pub fn decode_font_payload(payload: &str) -> ThemeResult<Vec<u8>> {
    let s = payload.trim();
    if s.starts_with("data:") {
        return decode_data_url(s).map(|(_, bytes)| bytes);
    }
    if !s.is_empty() && s.len() % 2 == 0 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Ok(s
            .as_bytes()
            .chunks_exact(2)
            .map(|p| (hex_val(p[0]) << 4) | hex_val(p[1]))
            .collect());
    }
    base64::engine::general_purpose::STANDARD
        .decode(s)
        .map_err(|e| ThemeError::decode(format!("font payload is neither hex nor base64: {e}")))
}

fn hex_val(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
