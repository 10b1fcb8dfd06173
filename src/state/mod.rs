/// State management module
///
/// This module handles all application state, including:
/// - The gallery controller: order, selection, drag (gallery.rs)
/// - Shared data structures (data.rs)
/// - User settings loaded from settings.toml (settings.rs)

pub mod data;
pub mod gallery;
pub mod settings;
