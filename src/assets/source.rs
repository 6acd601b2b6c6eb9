use std::{borrow::Cow, path::PathBuf, sync::Arc};

use anyhow::Context;

use crate::foundation::error::{PixelSlideError, PixelSlideResult};

/// Where the bytes of a transition image come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// A complete `data:<mime>;base64,<payload>` URI.
    DataUri(String),
    /// A file on disk.
    Path(PathBuf),
    /// Encoded image bytes already in memory.
    Bytes(Arc<Vec<u8>>),
}

impl ImageSource {
    /// Interpret a slide `image` field.
    ///
    /// Values that already carry a `data:` prefix are used as-is; anything else is a bare base64
    /// payload and is assumed to be JPEG.
    pub fn from_slide_image(image: &str) -> PixelSlideResult<Self> {
        let image = image.trim();
        if image.is_empty() {
            return Err(PixelSlideError::validation("slide image must be non-empty"));
        }
        if image.starts_with("data:") {
            Ok(Self::DataUri(image.to_string()))
        } else {
            Ok(Self::DataUri(format!("data:image/jpeg;base64,{image}")))
        }
    }

    /// Encoded bytes for this source. Reads the file for [`ImageSource::Path`].
    pub fn bytes(&self) -> PixelSlideResult<Cow<'_, [u8]>> {
        match self {
            Self::DataUri(uri) => decode_data_uri(uri).map(Cow::Owned),
            Self::Path(path) => std::fs::read(path)
                .with_context(|| format!("read image '{}'", path.display()))
                .map(Cow::Owned)
                .map_err(PixelSlideError::from),
            Self::Bytes(bytes) => Ok(Cow::Borrowed(bytes.as_slice())),
        }
    }

    /// Short label for logs; never includes the payload.
    pub fn describe(&self) -> String {
        match self {
            Self::DataUri(uri) => {
                let header = uri.split(',').next().unwrap_or("data:");
                format!("{header} ({} bytes)", uri.len())
            }
            Self::Path(path) => path.display().to_string(),
            Self::Bytes(bytes) => format!("inline ({} bytes)", bytes.len()),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Arc::new(bytes))
    }
}

fn decode_data_uri(uri: &str) -> PixelSlideResult<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| PixelSlideError::validation("data uri must start with 'data:'"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| PixelSlideError::validation("data uri is missing ','"))?;
    if !header.ends_with(";base64") {
        return Err(PixelSlideError::validation(format!(
            "data uri '{header}' is not base64 encoded"
        )));
    }

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    base64::decode(compact.as_bytes())
        .map_err(|e| PixelSlideError::validation(format!("invalid base64 payload: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
