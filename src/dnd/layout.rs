use std::ops::Range;

use iced::{Point, Rectangle, Size, Vector};

/// Geometry of the tile grid in content coordinates
///
/// Tiles are fixed-size squares laid out left to right, top to bottom. The
/// origin is the top-left corner of the first tile; the view renders rows
/// from the same column count so hit-testing matches what is on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    columns: usize,
    tile: f32,
    spacing: f32,
}

impl GridLayout {
    /// Fit as many columns as possible into `available_width`, at least one
    pub fn new(available_width: f32, tile: f32, spacing: f32) -> Self {
        let pitch = tile + spacing;
        let columns = if pitch > 0.0 && available_width.is_finite() {
            ((available_width + spacing) / pitch).floor().max(1.0) as usize
        } else {
            1
        };
        Self {
            columns,
            tile,
            spacing,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn tile_size(&self) -> f32 {
        self.tile
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    fn pitch(&self) -> f32 {
        self.tile + self.spacing
    }

    /// Bounds of the tile at `index`
    pub fn rect(&self, index: usize) -> Rectangle {
        let column = index % self.columns;
        let row = index / self.columns;
        Rectangle::new(
            Point::new(column as f32 * self.pitch(), row as f32 * self.pitch()),
            Size::new(self.tile, self.tile),
        )
    }

    /// Index of the tile under `point`, if any. Gaps hit nothing.
    pub fn index_at(&self, point: Point, count: usize) -> Option<usize> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let column = (point.x / self.pitch()) as usize;
        let row = (point.y / self.pitch()) as usize;
        if column >= self.columns {
            return None;
        }
        let index = row * self.columns + column;
        (index < count && self.rect(index).contains(point)).then_some(index)
    }

    /// Tile whose center is nearest to the center of `dragged`
    pub fn closest_center(&self, dragged: Rectangle, count: usize) -> Option<usize> {
        let target = dragged.center();
        (0..count)
            .map(|index| (index, self.rect(index).center().distance(target)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    /// Bounds of tile `index` moved by `delta`
    pub fn translated(&self, index: usize, delta: Vector) -> Rectangle {
        self.rect(index) + delta
    }

    /// Indices of tiles intersecting the window `[top - buffer, top + height + buffer]`
    pub fn visible_range(&self, top: f32, height: f32, buffer: f32, count: usize) -> Range<usize> {
        if count == 0 {
            return 0..0;
        }
        let start = (top - buffer).max(0.0);
        let end = (top + height + buffer).max(0.0);

        let first_row = (start / self.pitch()).floor() as usize;
        let last_row = (end / self.pitch()).floor() as usize;

        let first = (first_row * self.columns).min(count);
        let last = ((last_row + 1) * self.columns).min(count);
        first..last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> GridLayout {
        // 3 columns of 100px tiles with 10px gaps: 3 * 100 + 2 * 10 = 320
        GridLayout::new(330.0, 100.0, 10.0)
    }

    #[test]
    fn test_columns_fit_width() {
        assert_eq!(layout().columns(), 3);
        assert_eq!(GridLayout::new(320.0, 100.0, 10.0).columns(), 3);
        assert_eq!(GridLayout::new(319.0, 100.0, 10.0).columns(), 2);
        assert_eq!(GridLayout::new(20.0, 100.0, 10.0).columns(), 1);
    }

    #[test]
    fn test_rect_positions() {
        let layout = layout();
        assert_eq!(layout.rect(0), Rectangle::new(Point::ORIGIN, Size::new(100.0, 100.0)));
        assert_eq!(layout.rect(4).position(), Point::new(110.0, 110.0));
    }

    #[test]
    fn test_index_at() {
        let layout = layout();
        assert_eq!(layout.index_at(Point::new(50.0, 50.0), 5), Some(0));
        assert_eq!(layout.index_at(Point::new(150.0, 150.0), 5), Some(4));
        // Gap between tiles
        assert_eq!(layout.index_at(Point::new(105.0, 50.0), 5), None);
        // Past the last tile
        assert_eq!(layout.index_at(Point::new(250.0, 150.0), 5), None);
        // Right of the last column
        assert_eq!(layout.index_at(Point::new(400.0, 50.0), 5), None);
        assert_eq!(layout.index_at(Point::new(-1.0, 50.0), 5), None);
    }

    #[test]
    fn test_closest_center_without_movement_is_self() {
        let layout = layout();
        let dragged = layout.translated(2, Vector::new(0.0, 0.0));
        assert_eq!(layout.closest_center(dragged, 6), Some(2));
    }

    #[test]
    fn test_closest_center_after_movement() {
        let layout = layout();
        // Move tile 0 most of the way onto tile 2
        let dragged = layout.translated(0, Vector::new(200.0, 5.0));
        assert_eq!(layout.closest_center(dragged, 6), Some(2));

        // And one row down
        let dragged = layout.translated(0, Vector::new(100.0, 120.0));
        assert_eq!(layout.closest_center(dragged, 6), Some(4));
    }

    #[test]
    fn test_closest_center_empty() {
        let layout = layout();
        assert_eq!(layout.closest_center(layout.rect(0), 0), None);
    }

    #[test]
    fn test_visible_range() {
        let layout = layout();
        // Rows are 110px apart; a 100px window at the top sees row 0 only
        assert_eq!(layout.visible_range(0.0, 100.0, 0.0, 30), 0..3);
        // Scrolled to row 2 with a buffer reaching rows 1 and 3
        assert_eq!(layout.visible_range(220.0, 100.0, 100.0, 30), 3..12);
        assert_eq!(layout.visible_range(0.0, 10_000.0, 0.0, 7), 0..7);
        assert_eq!(layout.visible_range(0.0, 100.0, 0.0, 0), 0..0);
    }
}
