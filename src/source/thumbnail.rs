use iced::widget::image::Handle;
use tokio::task;

use super::listing;
use crate::error::ThumbnailError;
use crate::state::data::ImageId;

/// Decoded thumbnail pixels, ready to hand to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailPixels {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major
    pub rgba: Vec<u8>,
}

impl ThumbnailPixels {
    pub fn into_handle(self) -> Handle {
        Handle::from_rgba(self.width, self.height, self.rgba)
    }
}

/// Load the image behind `id` and shrink it to fit `size` x `size`.
///
/// Remote identifiers are downloaded (capped at `max_bytes`), local ones
/// read from disk. Decoding runs on a blocking thread.
pub async fn load_thumbnail(
    id: ImageId,
    size: u32,
    max_bytes: usize,
) -> Result<Handle, ThumbnailError> {
    let bytes = if id.is_remote() {
        listing::fetch_bytes_with(listing::client()?, id.as_str(), max_bytes).await?
    } else {
        tokio::fs::read(id.as_str())
            .await
            .map_err(|e| ThumbnailError::Io {
                path: id.to_string(),
                message: e.to_string(),
            })?
    };

    let pixels = task::spawn_blocking(move || decode_thumbnail(&bytes, size))
        .await
        .map_err(|e| ThumbnailError::Task(e.to_string()))??;

    tracing::debug!("Thumbnail ready for {id} ({}x{})", pixels.width, pixels.height);
    Ok(pixels.into_handle())
}

/// Decode an encoded image and downscale it, keeping the aspect ratio.
/// Images already smaller than `size` are left at their own size.
pub fn decode_thumbnail(bytes: &[u8], size: u32) -> Result<ThumbnailPixels, ThumbnailError> {
    let img = image::load_from_memory(bytes).map_err(|e| ThumbnailError::Decode(e.to_string()))?;

    let img = if img.width() > size || img.height() > size {
        img.thumbnail(size, size)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    Ok(ThumbnailPixels {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}
