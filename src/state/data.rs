/// Shared data structures for the application state
///
/// These types flow between the gallery controller, the image
/// sources and the UI layer.
use std::fmt;

use iced::widget::image;

use crate::error::FetchError;

/// Opaque identifier of a gallery image
///
/// Either a remote URL or an absolute path to a local file. Used both as
/// the display source and as the key of the tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier points at an HTTP(S) resource
    pub fn is_remote(&self) -> bool {
        self.0.starts_with("http://") || self.0.starts_with("https://")
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ImageId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Progress of the remote listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    /// The request failed; distinct from a successful but empty listing
    Failed(FetchError),
}

/// Drag gesture as seen by the gallery
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(ImageId),
}

/// Generation number handed out when a listing request starts
///
/// Results carrying an older ticket belong to a superseded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(pub(crate) u64);

/// Per-tile flags exposed to the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileState {
    /// The tile is part of the selection
    pub checked: bool,
    /// The tile is the source of the drag in progress
    pub dragging: bool,
}

/// Thumbnail cache entry for a tile
#[derive(Debug, Clone)]
pub enum Thumbnail {
    Loading,
    Ready(image::Handle),
    Failed,
}
