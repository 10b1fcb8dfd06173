/// Image sources
///
/// This module handles:
/// - Fetching the remote image listing (listing.rs)
/// - Downloading or reading images and shrinking them to thumbnails (thumbnail.rs)
/// - Importing image files from a local folder (folder.rs)

pub mod folder;
pub mod listing;
pub mod thumbnail;
