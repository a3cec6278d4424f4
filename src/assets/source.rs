use std::path::{Path, PathBuf};

use base64::Engine as _;

use crate::foundation::error::{ThemeError, ThemeResult};

/// Where the bytes of an image node come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetSource {
    /// Inline `data:` URL payload.
    Inline {
        /// Declared MIME type (may be empty).
        mime: String,
        /// Decoded payload.
        bytes: Vec<u8>,
    },
    /// File on disk (relative sources already joined to the assets root).
    File(PathBuf),
    /// `http(s)://` URL.
    Remote(String),
}

impl AssetSource {
    /// Classify a source string.
    pub fn parse(src: &str, assets_root: &Path) -> ThemeResult<Self> {
        let src = src.trim();
        if src.is_empty() {
            return Err(ThemeError::io("empty asset source"));
        }
        if src.starts_with("data:") {
            let (mime, bytes) = decode_data_url(src)?;
            return Ok(Self::Inline { mime, bytes });
        }
        let lower = src.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(Self::Remote(src.to_owned()));
        }
        if let Some(path) = src.strip_prefix("file://") {
            return Ok(Self::File(PathBuf::from(path)));
        }
        if is_absolute(src) {
            return Ok(Self::File(PathBuf::from(src)));
        }
        let norm = normalize_rel_path(src)?;
        Ok(Self::File(assets_root.join(Path::new(&norm))))
    }

    /// Fetch the raw bytes.
    pub fn read(self) -> ThemeResult<Vec<u8>> {
        match self {
            Self::Inline { bytes, .. } => Ok(bytes),
            Self::File(path) => std::fs::read(&path)
                .map_err(|e| ThemeError::io(format!("read asset '{}': {e}", path.display()))),
            Self::Remote(url) => fetch_remote(&url),
        }
    }
}

/// Resolve and read a source string in one step.
pub fn load_source_bytes(src: &str, assets_root: &Path) -> ThemeResult<Vec<u8>> {
    AssetSource::parse(src, assets_root)?.read()
}

fn is_absolute(src: &str) -> bool {
    if src.starts_with('/') || src.starts_with('\\') {
        return true;
    }
    let b = src.as_bytes();
    b.len() >= 3 && b[0].is_ascii_alphabetic() && b[1] == b':' && (b[2] == b'/' || b[2] == b'\\')
}

/// Normalize and validate theme-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects parent
/// traversals (`..`).
pub fn normalize_rel_path(source: &str) -> ThemeResult<String> {
    let s = source.replace('\\', "/");
    if s.is_empty() {
        return Err(ThemeError::io("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ThemeError::io("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ThemeError::io("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

/// Split a `data:` URL into MIME type and decoded payload.
pub fn decode_data_url(url: &str) -> ThemeResult<(String, Vec<u8>)> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| ThemeError::io("not a data url"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ThemeError::io("data url is missing ','"))?;

    let mut parts = meta.split(';');
    let mime = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
    let is_base64 = parts.any(|p| p.trim().eq_ignore_ascii_case("base64"));

    let bytes = if is_base64 {
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        base64::engine::general_purpose::STANDARD
            .decode(cleaned.as_bytes())
            .map_err(|e| ThemeError::io(format!("invalid base64 payload: {e}")))?
    } else {
        percent_decode(payload)
    };
    Ok((mime, bytes))
}

fn percent_decode(s: &str) -> Vec<u8> {
    let b = s.as_bytes();
    let mut out = Vec::with_capacity(b.len());
    let mut i = 0;
    while i < b.len() {
        if b[i] == b'%' && i + 2 < b.len() {
            let hex = std::str::from_utf8(&b[i + 1..i + 3]).ok();
            if let Some(v) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(v);
                i += 3;
                continue;
            }
        }
        out.push(b[i]);
        i += 1;
    }
    out
}

#[cfg(feature = "remote")]
fn fetch_remote(url: &str) -> ThemeResult<Vec<u8>> {
    let resp = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ThemeError::io(format!("fetch '{url}': {e}")))?;
    let bytes = resp
        .bytes()
        .map_err(|e| ThemeError::io(format!("read body of '{url}': {e}")))?;
    Ok(bytes.to_vec())
}

#[cfg(not(feature = "remote"))]
fn fetch_remote(url: &str) -> ThemeResult<Vec<u8>> {
    Err(ThemeError::io(format!(
        "cannot fetch '{url}': built without the `remote` feature"
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
