use std::collections::HashSet;

use super::data::{DragState, ImageId, LoadState, LoadTicket, TileState};
use crate::error::FetchError;

/// The Gallery owns all interactive state: display order, selection,
/// the drag gesture and the progress of the listing request.
///
/// Every operation except loading is a total in-memory mutation.
#[derive(Debug)]
pub struct Gallery {
    items: Vec<ImageId>,
    selection: HashSet<ImageId>,
    drag: DragState,
    load: LoadState,
    generation: u64,
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new()
    }
}

impl Gallery {
    /// Create an empty gallery waiting for its first listing
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selection: HashSet::new(),
            drag: DragState::Idle,
            load: LoadState::Loading,
            generation: 0,
        }
    }

    /// Images in display order
    pub fn items(&self) -> &[ImageId] {
        &self.items
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn is_loading(&self) -> bool {
        self.load == LoadState::Loading
    }

    #[cfg(test)]
    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Identifier of the image being dragged, if any
    pub fn active_drag(&self) -> Option<&ImageId> {
        match &self.drag {
            DragState::Dragging(id) => Some(id),
            DragState::Idle => None,
        }
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    pub fn is_selected(&self, id: &ImageId) -> bool {
        self.selection.contains(id)
    }

    /// Whether every image is currently selected. Computed, never cached.
    pub fn all_selected(&self) -> bool {
        !self.items.is_empty() && self.selection.len() == self.items.len()
    }

    /// Flags the rendering layer needs for one tile
    pub fn tile_state(&self, id: &ImageId) -> TileState {
        TileState {
            checked: self.is_selected(id),
            dragging: self.active_drag() == Some(id),
        }
    }

    // ========== Loading ==========

    /// Mark a new listing request as started and return its ticket
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.load = LoadState::Loading;
        LoadTicket(self.generation)
    }

    /// Apply the outcome of a listing request.
    ///
    /// Returns false when the ticket belongs to a superseded request, in
    /// which case nothing changes.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<ImageId>, FetchError>,
    ) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(
                ticket = ticket.0,
                current = self.generation,
                "Ignoring stale listing result"
            );
            return false;
        }

        match result {
            Ok(items) => {
                tracing::info!("Loaded {} images", items.len());
                self.items = items;
                self.load = LoadState::Loaded;
            }
            Err(err) => {
                tracing::error!("Error fetching images: {err}");
                self.items.clear();
                self.load = LoadState::Failed(err);
            }
        }
        self.prune_selection();
        true
    }

    /// Append images that are not already in the gallery.
    ///
    /// Returns `(added, skipped)`.
    pub fn add_images(&mut self, ids: impl IntoIterator<Item = ImageId>) -> (usize, usize) {
        let mut known: HashSet<ImageId> = self.items.iter().cloned().collect();
        let mut added = 0;
        let mut skipped = 0;

        for id in ids {
            if known.insert(id.clone()) {
                self.items.push(id);
                added += 1;
            } else {
                skipped += 1;
            }
        }

        if added > 0 && self.load != LoadState::Loading {
            self.load = LoadState::Loaded;
        }
        (added, skipped)
    }

    // ========== Selection ==========

    /// Add the image to the selection, or remove it if already selected.
    /// Identifiers not present in the gallery are ignored.
    pub fn toggle_selection(&mut self, id: &ImageId) {
        if !self.selection.remove(id) && self.items.contains(id) {
            self.selection.insert(id.clone());
        }
    }

    /// Replace the selection with every image currently in the gallery
    pub fn select_all(&mut self) {
        self.selection = self.items.iter().cloned().collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Clear when everything is selected, otherwise select everything
    pub fn toggle_select_all(&mut self) {
        if self.all_selected() {
            self.clear_selection();
        } else {
            self.select_all();
        }
    }

    /// Remove every selected image and empty the selection.
    ///
    /// Returns the number of images removed.
    pub fn delete_selected(&mut self) -> usize {
        let before = self.items.len();
        let selection = &self.selection;
        self.items.retain(|id| !selection.contains(id));
        self.selection.clear();

        if let DragState::Dragging(id) = &self.drag {
            if !self.items.contains(id) {
                self.drag = DragState::Idle;
            }
        }

        before - self.items.len()
    }

    // ========== Drag and drop ==========

    pub fn drag_start(&mut self, id: ImageId) {
        self.drag = DragState::Dragging(id);
    }

    /// Finish a drag gesture, moving `active` to the position of `over`.
    ///
    /// Returns true when the order changed. The drag state is always reset.
    pub fn drag_end(&mut self, active: &ImageId, over: Option<&ImageId>) -> bool {
        self.drag = DragState::Idle;

        let Some(over) = over else {
            return false;
        };
        if active == over {
            return false;
        }

        let from = self.items.iter().position(|id| id == active);
        let to = self.items.iter().position(|id| id == over);
        match (from, to) {
            (Some(from), Some(to)) => {
                move_item(&mut self.items, from, to);
                self.prune_selection();
                true
            }
            _ => false,
        }
    }

    pub fn drag_cancel(&mut self) {
        self.drag = DragState::Idle;
    }

    fn prune_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let live: HashSet<&ImageId> = self.items.iter().collect();
        self.selection.retain(|id| live.contains(id));
    }
}

/// Move the element at `from` to `to`, shifting the elements in between.
fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<ImageId> {
        names.iter().map(|name| ImageId::from(*name)).collect()
    }

    fn loaded(names: &[&str]) -> Gallery {
        let mut gallery = Gallery::new();
        let ticket = gallery.begin_load();
        assert!(gallery.finish_load(ticket, Ok(ids(names))));
        gallery
    }

    #[test]
    fn test_new_gallery_is_loading_and_empty() {
        let gallery = Gallery::new();
        assert!(gallery.is_loading());
        assert!(gallery.items().is_empty());
        assert!(!gallery.all_selected());
        assert_eq!(gallery.drag_state(), &DragState::Idle);
    }

    #[test]
    fn test_load_success_replaces_items() {
        let gallery = loaded(&["a", "b", "c"]);
        assert_eq!(gallery.items(), ids(&["a", "b", "c"]).as_slice());
        assert_eq!(gallery.load_state(), &LoadState::Loaded);
    }

    #[test]
    fn test_load_failure_leaves_gallery_empty() {
        let mut gallery = Gallery::new();
        let ticket = gallery.begin_load();
        gallery.finish_load(ticket, Err(FetchError::Status(503)));

        assert!(gallery.items().is_empty());
        assert!(!gallery.is_loading());
        assert_eq!(gallery.load_state(), &LoadState::Failed(FetchError::Status(503)));
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut gallery = Gallery::new();
        let first = gallery.begin_load();
        let second = gallery.begin_load();

        assert!(!gallery.finish_load(first, Ok(ids(&["old"]))));
        assert!(gallery.is_loading());
        assert!(gallery.items().is_empty());

        assert!(gallery.finish_load(second, Ok(ids(&["new"]))));
        assert_eq!(gallery.items(), ids(&["new"]).as_slice());
    }

    #[test]
    fn test_reload_prunes_selection() {
        let mut gallery = loaded(&["a", "b", "c"]);
        gallery.toggle_selection(&"a".into());
        gallery.toggle_selection(&"c".into());

        let ticket = gallery.begin_load();
        gallery.finish_load(ticket, Ok(ids(&["c", "d"])));

        assert_eq!(gallery.selected_count(), 1);
        assert!(gallery.is_selected(&"c".into()));
    }

    #[test]
    fn test_toggle_selection_odd_counts_remain() {
        let mut gallery = loaded(&["a", "b", "c", "d"]);
        let toggles = ["a", "b", "a", "c", "b", "b", "d", "d", "d"];
        for name in toggles {
            gallery.toggle_selection(&name.into());
        }

        // a: 2, b: 3, c: 1, d: 3
        let mut selected: Vec<&str> = gallery
            .items()
            .iter()
            .filter(|id| gallery.is_selected(id))
            .map(|id| id.as_str())
            .collect();
        selected.sort();
        assert_eq!(selected, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_toggle_unknown_id_is_ignored() {
        let mut gallery = loaded(&["a"]);
        gallery.toggle_selection(&"ghost".into());
        assert_eq!(gallery.selected_count(), 0);
    }

    #[test]
    fn test_all_selected_is_derived() {
        let mut gallery = loaded(&["a", "b"]);
        gallery.toggle_selection(&"a".into());
        assert!(!gallery.all_selected());
        gallery.toggle_selection(&"b".into());
        assert!(gallery.all_selected());
        gallery.toggle_selection(&"a".into());
        assert!(!gallery.all_selected());
    }

    #[test]
    fn test_toggle_select_all_after_manual_changes() {
        let mut gallery = loaded(&["a", "b", "c"]);

        gallery.toggle_select_all();
        assert!(gallery.all_selected());

        // Manually deselecting one means the next toggle selects everything again
        gallery.toggle_selection(&"b".into());
        gallery.toggle_select_all();
        assert!(gallery.all_selected());

        gallery.toggle_select_all();
        assert_eq!(gallery.selected_count(), 0);
    }

    #[test]
    fn test_select_all_is_idempotent() {
        let mut gallery = loaded(&["a", "b"]);
        gallery.select_all();
        gallery.select_all();
        assert_eq!(gallery.selected_count(), 2);
    }

    #[test]
    fn test_select_all_then_delete_empties_gallery() {
        let mut gallery = loaded(&["a", "b", "c"]);
        gallery.toggle_select_all();
        assert_eq!(gallery.delete_selected(), 3);
        assert!(gallery.items().is_empty());
        assert_eq!(gallery.selected_count(), 0);
    }

    #[test]
    fn test_delete_selected_preserves_order() {
        let mut gallery = loaded(&["a", "b", "c", "d", "e"]);
        gallery.toggle_selection(&"b".into());
        gallery.toggle_selection(&"d".into());

        assert_eq!(gallery.delete_selected(), 2);
        assert_eq!(gallery.items(), ids(&["a", "c", "e"]).as_slice());
        assert_eq!(gallery.selected_count(), 0);
    }

    #[test]
    fn test_delete_with_empty_selection_is_noop() {
        let mut gallery = loaded(&["a", "b"]);
        assert_eq!(gallery.delete_selected(), 0);
        assert_eq!(gallery.items(), ids(&["a", "b"]).as_slice());
    }

    #[test]
    fn test_drag_end_moves_and_shifts() {
        let mut gallery = loaded(&["A", "B", "C", "D"]);
        gallery.drag_start("A".into());
        assert_eq!(gallery.active_drag(), Some(&ImageId::from("A")));

        assert!(gallery.drag_end(&"A".into(), Some(&"C".into())));
        assert_eq!(gallery.items(), ids(&["B", "C", "A", "D"]).as_slice());
        assert_eq!(gallery.drag_state(), &DragState::Idle);

        gallery.toggle_selection(&"B".into());
        gallery.toggle_selection(&"D".into());
        gallery.delete_selected();
        assert_eq!(gallery.items(), ids(&["C", "A"]).as_slice());
        assert_eq!(gallery.selected_count(), 0);
    }

    #[test]
    fn test_drag_end_backwards() {
        let mut gallery = loaded(&["A", "B", "C", "D", "E"]);
        gallery.drag_start("D".into());
        assert!(gallery.drag_end(&"D".into(), Some(&"B".into())));
        assert_eq!(gallery.items(), ids(&["A", "D", "B", "C", "E"]).as_slice());
    }

    #[test]
    fn test_drag_end_matches_remove_insert_for_all_pairs() {
        let names = ["a", "b", "c", "d", "e"];
        for from in 0..names.len() {
            for to in 0..names.len() {
                let mut gallery = loaded(&names);
                let active = ImageId::from(names[from]);
                let over = ImageId::from(names[to]);
                gallery.drag_start(active.clone());
                gallery.drag_end(&active, Some(&over));

                let mut expected = ids(&names);
                let item = expected.remove(from);
                expected.insert(to, item);
                assert_eq!(gallery.items(), expected.as_slice(), "from {from} to {to}");
            }
        }
    }

    #[test]
    fn test_drag_end_on_self_is_noop() {
        let mut gallery = loaded(&["A", "B"]);
        gallery.drag_start("A".into());
        assert!(!gallery.drag_end(&"A".into(), Some(&"A".into())));
        assert_eq!(gallery.items(), ids(&["A", "B"]).as_slice());
        assert_eq!(gallery.drag_state(), &DragState::Idle);
    }

    #[test]
    fn test_drag_end_without_target_clears_drag() {
        let mut gallery = loaded(&["A", "B"]);
        gallery.drag_start("A".into());
        assert!(!gallery.drag_end(&"A".into(), None));
        assert_eq!(gallery.drag_state(), &DragState::Idle);
    }

    #[test]
    fn test_drag_end_unknown_ids_clears_drag() {
        let mut gallery = loaded(&["A", "B"]);
        gallery.drag_start("ghost".into());
        assert!(!gallery.drag_end(&"ghost".into(), Some(&"A".into())));
        assert_eq!(gallery.items(), ids(&["A", "B"]).as_slice());
        assert_eq!(gallery.drag_state(), &DragState::Idle);
    }

    #[test]
    fn test_drag_cancel_keeps_order() {
        let mut gallery = loaded(&["A", "B"]);
        gallery.drag_start("B".into());
        assert!(gallery.tile_state(&"B".into()).dragging);
        gallery.drag_cancel();
        assert_eq!(gallery.drag_state(), &DragState::Idle);
        assert_eq!(gallery.items(), ids(&["A", "B"]).as_slice());
    }

    #[test]
    fn test_tile_state_reflects_selection() {
        let mut gallery = loaded(&["A", "B"]);
        gallery.toggle_selection(&"A".into());
        assert_eq!(
            gallery.tile_state(&"A".into()),
            TileState { checked: true, dragging: false }
        );
        assert_eq!(gallery.tile_state(&"B".into()), TileState::default());
    }

    #[test]
    fn test_add_images_skips_duplicates() {
        let mut gallery = loaded(&["a"]);
        let (added, skipped) = gallery.add_images(ids(&["a", "b", "b", "c"]));
        assert_eq!((added, skipped), (2, 2));
        assert_eq!(gallery.items(), ids(&["a", "b", "c"]).as_slice());
    }

    #[test]
    fn test_add_images_recovers_from_failed_load() {
        let mut gallery = Gallery::new();
        let ticket = gallery.begin_load();
        gallery.finish_load(ticket, Err(FetchError::Network("offline".into())));

        gallery.add_images(ids(&["/tmp/a.jpg"]));
        assert_eq!(gallery.load_state(), &LoadState::Loaded);
        assert_eq!(gallery.items().len(), 1);
    }
}
