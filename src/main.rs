use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use iced::widget::image::Handle;
use iced::widget::{column, scrollable, stack};
use iced::{
    event, keyboard, mouse, task, time, touch, window, Element, Event, Padding, Point, Size,
    Subscription, Task, Theme,
};

mod dnd;
mod error;
mod logging;
mod source;
mod state;
mod ui;

use dnd::{ActivationConstraint, GridLayout, Outcome, Pointer, PointerSensor};
use error::{FetchError, ImportError, ThumbnailError};
use state::data::{ImageId, LoadState, LoadTicket, Thumbnail};
use state::gallery::Gallery;
use state::settings::Settings;
use ui::grid::GRID_PADDING;
use ui::header::{HeaderInfo, HEADER_HEIGHT};

const INITIAL_WINDOW: Size = Size::new(1100.0, 760.0);
/// Width reserved on the right for the vertical scrollbar
const SCROLLBAR_ALLOWANCE: f32 = 16.0;
const ANIMATION_INTERVAL: Duration = Duration::from_millis(50);
const SPINNER_STEP: f32 = 0.35;

/// Main application state
struct GalleryGrid {
    settings: Settings,
    /// Order, selection and drag state
    gallery: Gallery,
    /// Lazily loaded thumbnails, keyed by image
    thumbnails: HashMap<ImageId, Thumbnail>,
    sensor: PointerSensor,
    /// Last pointer position in window coordinates
    pointer_position: Point,
    window_size: Size,
    scroll_offset: f32,
    viewport_height: Option<f32>,
    /// Scroll offset held while a touch drag is active
    pinned_scroll: Option<f32>,
    /// Folder import that finished while the listing was loading
    pending_import: Vec<ImageId>,
    /// Aborts the in-flight listing request when dropped
    listing_task: Option<task::Handle>,
    spinner_phase: f32,
    /// Status message to display to the user
    status: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// The listing request finished
    ListingLoaded(LoadTicket, Result<Vec<ImageId>, FetchError>),
    /// User asked to fetch the listing again
    Reload,
    ToggleSelection(ImageId),
    ToggleSelectAll,
    DeleteSelected,
    /// User clicked the upload placeholder
    AddFolder,
    FolderPicked(Option<PathBuf>),
    FolderScanned(Result<Vec<ImageId>, ImportError>),
    ThumbnailLoaded(ImageId, Result<Handle, ThumbnailError>),
    Scrolled(scrollable::Viewport),
    Input(Input),
    /// Animation and touch-hold timer
    Tick,
}

/// Raw pointer, keyboard and window input relevant to dragging
#[derive(Debug, Clone, Copy)]
enum Input {
    /// A pointer went down; mouse presses carry no position
    Pressed(Pointer, Option<Point>),
    Moved(Pointer, Point),
    Released(Pointer),
    Cancelled,
    Resized(Size),
}

impl GalleryGrid {
    /// Create a new instance of the application and start loading the listing
    fn new() -> (Self, Task<Message>) {
        let (settings, warning) = state::settings::load();
        if let Some(warning) = warning {
            tracing::warn!("Using default settings: {warning}");
        }

        let mut app = GalleryGrid::with_settings(settings);
        let task = app.start_listing();
        (app, task)
    }

    fn with_settings(settings: Settings) -> Self {
        GalleryGrid {
            sensor: PointerSensor::new(ActivationConstraint::from(settings.drag)),
            settings,
            gallery: Gallery::new(),
            thumbnails: HashMap::new(),
            pointer_position: Point::ORIGIN,
            window_size: INITIAL_WINDOW,
            scroll_offset: 0.0,
            viewport_height: None,
            pinned_scroll: None,
            pending_import: Vec::new(),
            listing_task: None,
            spinner_phase: 0.0,
            status: None,
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ListingLoaded(ticket, result) => {
                if !self.gallery.finish_load(ticket, result) {
                    return Task::none();
                }
                self.listing_task = None;
                self.cancel_drag();
                if !self.pending_import.is_empty() {
                    let queued = std::mem::take(&mut self.pending_import);
                    return self.import(queued);
                }
                self.prune_thumbnails();
                self.request_visible_thumbnails()
            }
            Message::Reload => {
                self.cancel_drag();
                self.status = None;
                self.start_listing()
            }
            Message::ToggleSelection(id) => {
                self.gallery.toggle_selection(&id);
                Task::none()
            }
            Message::ToggleSelectAll => {
                self.gallery.toggle_select_all();
                Task::none()
            }
            Message::DeleteSelected => {
                let removed = self.gallery.delete_selected();
                tracing::info!("Deleted {removed} images");
                if self.gallery.active_drag().is_none() {
                    self.cancel_drag();
                }
                self.prune_thumbnails();
                self.request_visible_thumbnails()
            }
            Message::AddFolder => {
                Task::perform(source::folder::pick_folder(), Message::FolderPicked)
            }
            Message::FolderPicked(Some(folder)) => {
                self.status = Some(format!("Importing from {}...", folder.display()));
                Task::perform(source::folder::scan_folder(folder), Message::FolderScanned)
            }
            Message::FolderPicked(None) => Task::none(),
            Message::FolderScanned(Ok(found)) => {
                // A finishing load replaces the sequence; hold the import until then
                if self.gallery.is_loading() {
                    tracing::info!(
                        "Queueing {} imported images until loading finishes",
                        found.len()
                    );
                    self.pending_import.extend(found);
                    self.status = Some("Import will finish once images have loaded.".to_string());
                    return Task::none();
                }
                self.import(found)
            }
            Message::FolderScanned(Err(err)) => {
                tracing::error!("Folder import failed: {err}");
                self.status = Some(format!("Import failed: {err}"));
                Task::none()
            }
            Message::ThumbnailLoaded(id, result) => {
                // The image may have been deleted while its thumbnail was loading
                if !self.gallery.items().contains(&id) {
                    return Task::none();
                }
                let thumbnail = match result {
                    Ok(handle) => Thumbnail::Ready(handle),
                    Err(err) => {
                        tracing::warn!("Thumbnail failed for {id}: {err}");
                        Thumbnail::Failed
                    }
                };
                self.thumbnails.insert(id, thumbnail);
                Task::none()
            }
            Message::Scrolled(viewport) => self.scrolled(
                viewport.absolute_offset().y,
                viewport.bounds().height,
                Instant::now(),
            ),
            Message::Input(input) => self.handle_input(input, Instant::now()),
            Message::Tick => self.tick(Instant::now()),
        }
    }

    fn tick(&mut self, now: Instant) -> Task<Message> {
        self.spinner_phase = (self.spinner_phase + SPINNER_STEP) % std::f32::consts::TAU;
        let outcome = self.sensor.tick(now);
        self.apply(outcome)
    }

    /// The grid scrolled to `offset`
    ///
    /// Touch scrolling follows the finger, so an active touch drag keeps the
    /// grid at the offset it had when the drag started.
    fn scrolled(&mut self, offset: f32, height: f32, now: Instant) -> Task<Message> {
        self.viewport_height = Some(height);

        if let Some(pinned) = self.pinned_scroll.filter(|_| self.sensor.is_active()) {
            self.scroll_offset = pinned;
            if (offset - pinned).abs() < 0.5 {
                return Task::none();
            }
            return scrollable::scroll_to(
                ui::grid::grid_id(),
                scrollable::AbsoluteOffset { x: 0.0, y: pinned },
            );
        }
        self.scroll_offset = offset;

        // Scrolling under a stationary pointer still moves the drag
        let dragged = match self.sensor.pointer() {
            Some(pointer) => {
                let position = self.content_point(self.pointer_position);
                let outcome = self.sensor.moved(pointer, position, now);
                self.apply(outcome)
            }
            None => Task::none(),
        };
        Task::batch([dragged, self.request_visible_thumbnails()])
    }

    /// Append imported images and report the result
    fn import(&mut self, found: Vec<ImageId>) -> Task<Message> {
        let (added, skipped) = self.gallery.add_images(found);
        tracing::info!("Import summary: {added} new, {skipped} skipped");
        self.status = Some(format!(
            "Import complete! Added {added} images, skipped {skipped} duplicates."
        ));
        self.prune_thumbnails();
        self.request_visible_thumbnails()
    }

    fn handle_input(&mut self, input: Input, now: Instant) -> Task<Message> {
        match input {
            Input::Pressed(pointer, position) => {
                let position = position.unwrap_or(self.pointer_position);
                self.pointer_position = position;
                if self.gallery.is_loading() {
                    return Task::none();
                }
                let Some(index) = self.hit_test(position) else {
                    return Task::none();
                };
                let id = self.gallery.items()[index].clone();
                let point = self.content_point(position);
                let outcome = self.sensor.press(id, pointer, point, now);
                self.apply(outcome)
            }
            Input::Moved(pointer, position) => {
                if pointer == Pointer::Mouse || self.sensor.pointer() == Some(pointer) {
                    self.pointer_position = position;
                }
                let point = self.content_point(position);
                let outcome = self.sensor.moved(pointer, point, now);
                self.apply(outcome)
            }
            Input::Released(pointer) => {
                let outcome = self.sensor.release(pointer);
                self.apply(outcome)
            }
            Input::Cancelled => {
                let outcome = self.sensor.cancel();
                self.apply(outcome)
            }
            Input::Resized(size) => {
                self.window_size = size;
                self.request_visible_thumbnails()
            }
        }
    }

    /// Forward a sensor outcome to the gallery
    fn apply(&mut self, outcome: Option<Outcome>) -> Task<Message> {
        match outcome {
            Some(Outcome::Activated(id)) => {
                tracing::debug!("Drag started: {id}");
                if matches!(self.sensor.pointer(), Some(Pointer::Touch(_))) {
                    self.pinned_scroll = Some(self.scroll_offset);
                }
                self.gallery.drag_start(id);
            }
            Some(Outcome::Dropped { id, delta }) => {
                self.pinned_scroll = None;
                let layout = self.layout();
                let items = self.gallery.items();
                let over = items
                    .iter()
                    .position(|item| *item == id)
                    .and_then(|index| {
                        layout.closest_center(layout.translated(index, delta), items.len())
                    })
                    .map(|index| items[index].clone());

                if self.gallery.drag_end(&id, over.as_ref()) {
                    tracing::debug!("Moved {id} to the position of {over:?}");
                    return self.request_visible_thumbnails();
                }
            }
            Some(Outcome::Cancelled) => {
                tracing::debug!("Drag cancelled");
                self.pinned_scroll = None;
                self.gallery.drag_cancel();
            }
            None => {}
        }
        Task::none()
    }

    fn cancel_drag(&mut self) {
        self.sensor.cancel();
        self.pinned_scroll = None;
        self.gallery.drag_cancel();
    }

    /// Issue a new listing request, superseding any request in flight
    fn start_listing(&mut self) -> Task<Message> {
        let ticket = self.gallery.begin_load();
        let url = self.settings.source.listing_url();

        let (task, handle) = Task::perform(source::listing::fetch_listing(url), move |result| {
            Message::ListingLoaded(ticket, result)
        })
        .abortable();
        // Replacing the handle aborts the previous request
        self.listing_task = Some(handle.abort_on_drop());
        task
    }

    fn layout(&self) -> GridLayout {
        let width = self.window_size.width - 2.0 * GRID_PADDING - SCROLLBAR_ALLOWANCE;
        GridLayout::new(
            width,
            self.settings.grid.tile_size,
            self.settings.grid.spacing,
        )
    }

    /// Convert a window position into grid content coordinates
    fn content_point(&self, position: Point) -> Point {
        Point::new(
            position.x - GRID_PADDING,
            position.y - HEADER_HEIGHT - GRID_PADDING + self.scroll_offset,
        )
    }

    /// Index of the tile under a window position
    fn hit_test(&self, position: Point) -> Option<usize> {
        if position.y < HEADER_HEIGHT
            || position.x > self.window_size.width - SCROLLBAR_ALLOWANCE
        {
            return None;
        }
        self.layout()
            .index_at(self.content_point(position), self.gallery.items().len())
    }

    /// Start loading thumbnails for tiles in or near the viewport
    fn request_visible_thumbnails(&mut self) -> Task<Message> {
        let items = self.gallery.items();
        if items.is_empty() {
            return Task::none();
        }

        let layout = self.layout();
        let height = self
            .viewport_height
            .unwrap_or(self.window_size.height - HEADER_HEIGHT);
        let top = (self.scroll_offset - GRID_PADDING).max(0.0);
        let range = layout.visible_range(
            top,
            height,
            self.settings.thumbnails.preload_buffer,
            items.len(),
        );

        let missing: Vec<ImageId> = items[range]
            .iter()
            .filter(|id| !self.thumbnails.contains_key(*id))
            .cloned()
            .collect();
        if missing.is_empty() {
            return Task::none();
        }
        tracing::debug!("Requesting {} thumbnails", missing.len());

        let size = self.settings.thumbnails.size;
        let max_bytes = self.settings.thumbnails.max_download_bytes;
        let tasks: Vec<Task<Message>> = missing
            .into_iter()
            .map(|id| {
                self.thumbnails.insert(id.clone(), Thumbnail::Loading);
                Task::perform(
                    source::thumbnail::load_thumbnail(id.clone(), size, max_bytes),
                    move |result| Message::ThumbnailLoaded(id.clone(), result),
                )
            })
            .collect();
        Task::batch(tasks)
    }

    /// Drop cached thumbnails of images no longer in the gallery
    fn prune_thumbnails(&mut self) {
        let live: HashSet<&ImageId> = self.gallery.items().iter().collect();
        self.thumbnails.retain(|id, _| live.contains(id));
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let header = ui::header::header(HeaderInfo {
            selected: self.gallery.selected_count(),
            total: self.gallery.items().len(),
            all_selected: self.gallery.all_selected(),
            loading: self.gallery.is_loading(),
            status: self.status.as_deref(),
        });

        let tile_size = self.settings.grid.tile_size;
        let body = match self.gallery.load_state() {
            LoadState::Loading => ui::grid::loading(self.spinner_phase),
            LoadState::Failed(err) => ui::grid::failed(err, tile_size),
            LoadState::Loaded if self.gallery.items().is_empty() => ui::grid::empty(tile_size),
            LoadState::Loaded => ui::grid::grid(
                &self.gallery,
                &self.thumbnails,
                &self.layout(),
                self.spinner_phase,
            ),
        };

        let content = column![header, body];
        match self.drag_overlay() {
            Some(overlay) => stack![content, overlay].into(),
            None => content.into(),
        }
    }

    /// Floating copy of the dragged tile, positioned under the pointer
    fn drag_overlay(&self) -> Option<Element<'_, Message>> {
        let id = self.gallery.active_drag()?;
        let delta = self.sensor.delta()?;
        let index = self.gallery.items().iter().position(|item| item == id)?;

        let layout = self.layout();
        let bounds = layout.translated(index, delta);
        let offset = Padding {
            top: (bounds.y + HEADER_HEIGHT + GRID_PADDING - self.scroll_offset).max(0.0),
            right: 0.0,
            bottom: 0.0,
            left: (bounds.x + GRID_PADDING).max(0.0),
        };

        Some(ui::tile::floating(
            self.thumbnails.get(id),
            layout.tile_size(),
            self.spinner_phase,
            offset,
        ))
    }

    fn subscription(&self) -> Subscription<Message> {
        let input = event::listen_with(map_event).map(Message::Input);

        let animating = self.gallery.is_loading()
            || self.sensor.awaiting_delay()
            || self
                .thumbnails
                .values()
                .any(|thumbnail| matches!(thumbnail, Thumbnail::Loading));

        if animating {
            Subscription::batch([input, time::every(ANIMATION_INTERVAL).map(|_| Message::Tick)])
        } else {
            input
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Translate runtime events into drag input.
///
/// Mouse presses already handled by a widget (checkboxes, buttons, the
/// scrollbar) are skipped. Touch presses are always forwarded since the
/// scrollable claims them for touch scrolling; the hold delay decides.
fn map_event(event: Event, status: event::Status, _window: window::Id) -> Option<Input> {
    match event {
        Event::Mouse(mouse::Event::CursorMoved { position }) => {
            Some(Input::Moved(Pointer::Mouse, position))
        }
        Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left))
            if status == event::Status::Ignored =>
        {
            Some(Input::Pressed(Pointer::Mouse, None))
        }
        Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
            Some(Input::Released(Pointer::Mouse))
        }
        Event::Mouse(mouse::Event::CursorLeft) => Some(Input::Cancelled),
        Event::Touch(touch::Event::FingerPressed { id, position }) => {
            Some(Input::Pressed(Pointer::Touch(id), Some(position)))
        }
        Event::Touch(touch::Event::FingerMoved { id, position }) => {
            Some(Input::Moved(Pointer::Touch(id), position))
        }
        Event::Touch(touch::Event::FingerLifted { id, .. }) => {
            Some(Input::Released(Pointer::Touch(id)))
        }
        Event::Touch(touch::Event::FingerLost { .. }) => Some(Input::Cancelled),
        Event::Keyboard(keyboard::Event::KeyPressed {
            key: keyboard::Key::Named(keyboard::key::Named::Escape),
            ..
        }) => Some(Input::Cancelled),
        Event::Window(window::Event::Resized(size)) => Some(Input::Resized(size)),
        Event::Window(window::Event::Unfocused) => Some(Input::Cancelled),
        _ => None,
    }
}

fn main() -> iced::Result {
    if let Err(err) = logging::init() {
        eprintln!("⚠️  Logging disabled: {err}");
    }

    iced::application("Gallery Grid", GalleryGrid::update, GalleryGrid::view)
        .subscription(GalleryGrid::subscription)
        .theme(GalleryGrid::theme)
        .window_size(INITIAL_WINDOW)
        .centered()
        .run_with(GalleryGrid::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::touch::Finger;

    const FINGER: Pointer = Pointer::Touch(Finger(3));

    fn image(index: usize) -> ImageId {
        ImageId::from(format!("/img/{index}.png"))
    }

    /// App with `count` images loaded into a 1100px wide window (4 columns)
    fn loaded(count: usize) -> GalleryGrid {
        let mut app = GalleryGrid::with_settings(Settings::default());
        let ticket = app.gallery.begin_load();
        let _ = app.update(Message::ListingLoaded(ticket, Ok((0..count).map(image).collect())));
        app
    }

    #[test]
    fn test_mouse_drag_reorders_onto_nearest_tile() {
        let mut app = loaded(8);
        let now = Instant::now();

        let _ = app.handle_input(Input::Moved(Pointer::Mouse, Point::new(100.0, 100.0)), now);
        let _ = app.handle_input(Input::Pressed(Pointer::Mouse, None), now);
        assert_eq!(app.gallery.active_drag(), Some(&image(0)));

        // One tile pitch to the right
        let _ = app.handle_input(Input::Moved(Pointer::Mouse, Point::new(312.0, 100.0)), now);
        let _ = app.handle_input(Input::Released(Pointer::Mouse), now);

        assert_eq!(app.gallery.active_drag(), None);
        assert_eq!(app.gallery.items()[0], image(1));
        assert_eq!(app.gallery.items()[1], image(0));
    }

    #[test]
    fn test_touch_drag_keeps_scroll_pinned() {
        let mut app = loaded(40);
        let start = Instant::now();
        let _ = app.scrolled(500.0, 600.0, start);

        let _ = app.handle_input(Input::Pressed(FINGER, Some(Point::new(100.0, 200.0))), start);
        let _ = app.tick(start + Duration::from_millis(300));
        assert_eq!(app.gallery.active_drag(), Some(&image(8)));

        // The scrollable follows the finger; the grid stays where it was
        let later = start + Duration::from_millis(350);
        let _ = app.scrolled(200.0, 600.0, later);
        let _ = app.handle_input(Input::Moved(FINGER, Point::new(100.0, 500.0)), later);
        assert_eq!(app.scroll_offset, 500.0);
        assert_eq!(app.sensor.delta(), Some(iced::Vector::new(0.0, 300.0)));

        let _ = app.handle_input(Input::Released(FINGER), later);
        assert_eq!(app.gallery.items()[12], image(8));
        assert_eq!(app.pinned_scroll, None);

        let _ = app.scrolled(200.0, 600.0, later);
        assert_eq!(app.scroll_offset, 200.0);
    }

    #[test]
    fn test_late_thumbnail_for_deleted_image_is_discarded() {
        let mut app = loaded(4);
        assert!(app.thumbnails.contains_key(&image(2)));

        let _ = app.update(Message::ToggleSelection(image(2)));
        let _ = app.update(Message::DeleteSelected);
        assert!(!app.thumbnails.contains_key(&image(2)));

        let _ = app.update(Message::ThumbnailLoaded(
            image(2),
            Err(ThumbnailError::Decode("truncated".to_string())),
        ));
        assert!(!app.thumbnails.contains_key(&image(2)));

        let _ = app.update(Message::ThumbnailLoaded(
            image(1),
            Err(ThumbnailError::Decode("truncated".to_string())),
        ));
        assert!(matches!(app.thumbnails.get(&image(1)), Some(Thumbnail::Failed)));
    }

    #[test]
    fn test_reload_cancels_drag_and_ignores_stale_result() {
        let mut app = loaded(4);
        let now = Instant::now();
        let press = Input::Pressed(Pointer::Mouse, Some(Point::new(100.0, 100.0)));
        let _ = app.handle_input(press, now);
        assert!(app.sensor.is_active());

        let stale = app.gallery.begin_load();
        let _ = app.update(Message::Reload);
        assert!(app.sensor.is_idle());
        assert_eq!(app.gallery.active_drag(), None);
        assert!(app.gallery.is_loading());

        let _ = app.update(Message::ListingLoaded(stale, Ok(vec![image(9)])));
        assert!(app.gallery.is_loading());
    }

    #[test]
    fn test_import_during_load_is_applied_after_it() {
        let mut app = loaded(2);
        let ticket = app.gallery.begin_load();

        let local = ImageId::from("/photos/beach.jpg");
        let _ = app.update(Message::FolderScanned(Ok(vec![local.clone()])));
        assert_eq!(app.pending_import.len(), 1);

        let _ = app.update(Message::ListingLoaded(ticket, Ok((0..3).map(image).collect())));
        assert!(app.pending_import.is_empty());
        assert_eq!(app.gallery.items().len(), 4);
        assert_eq!(app.gallery.items()[3], local);
        assert!(app.status.as_deref().is_some_and(|s| s.contains("Added 1")));
    }
}
