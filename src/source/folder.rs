use std::path::{Path, PathBuf};

use tokio::task;
use walkdir::WalkDir;

use crate::error::ImportError;
use crate::state::data::ImageId;

/// Extensions the gallery can decode
const IMAGE_EXTENSIONS: [&str; 9] = [
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff", "ico",
];

/// Ask the user for a folder to import. `None` when the dialog is dismissed.
pub async fn pick_folder() -> Option<PathBuf> {
    rfd::AsyncFileDialog::new()
        .set_title("Select Folder with Images")
        .pick_folder()
        .await
        .map(|handle| handle.path().to_path_buf())
}

/// Scan `folder` recursively for image files on a blocking thread
pub async fn scan_folder(folder: PathBuf) -> Result<Vec<ImageId>, ImportError> {
    task::spawn_blocking(move || collect_images(&folder))
        .await
        .map_err(|e| ImportError::Task(e.to_string()))
}

/// Walk the directory tree and return every image file, sorted by path
fn collect_images(folder: &Path) -> Vec<ImageId> {
    tracing::info!("Scanning folder: {}", folder.display());

    let mut paths: Vec<PathBuf> = WalkDir::new(folder)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_image(path))
        .collect();
    paths.sort();

    tracing::info!("Found {} images in {}", paths.len(), folder.display());
    paths
        .into_iter()
        .map(|path| ImageId::new(path.to_string_lossy().into_owned()))
        .collect()
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}
