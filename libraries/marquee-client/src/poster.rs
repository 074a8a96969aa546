//! Poster images encoded as `data:` URIs.

use crate::error::{ClientError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use mime_guess::mime;
use std::path::Path;
use tracing::debug;

/// Largest poster accepted, in bytes.
pub const MAX_POSTER_BYTES: u64 = 5 * 1024 * 1024;

/// Read an image file and encode it as a `data:<mime>;base64,...` URI.
pub async fn load_poster(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ClientError::FileNotFound(path.display().to_string()));
    }

    let mime_type = mime_guess::from_path(path).first_or_octet_stream();
    if mime_type.type_() != mime::IMAGE {
        return Err(ClientError::InvalidInput(format!(
            "{} is not an image ({})",
            path.display(),
            mime_type
        )));
    }

    let size = tokio::fs::metadata(path).await?.len();
    if size > MAX_POSTER_BYTES {
        return Err(ClientError::InvalidInput(format!(
            "Poster is {} bytes; the limit is {}",
            size, MAX_POSTER_BYTES
        )));
    }

    let contents = tokio::fs::read(path).await?;
    debug!(file = %path.display(), size, mime = %mime_type, "Poster loaded");

    Ok(format!(
        "data:{};base64,{}",
        mime_type.essence_str(),
        STANDARD.encode(contents)
    ))
}
