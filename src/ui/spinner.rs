/// Loading spinner drawn on a canvas
/// The caller advances `phase` on each animation tick
use std::f32::consts::PI;

use iced::widget::canvas::{self, path::Arc, Path, Stroke};
use iced::{Color, Element, Length, Radians, Rectangle};

use crate::Message;

/// Sweep of the visible arc
const ARC_SWEEP: f32 = 1.5 * PI;
const LINE_WIDTH: f32 = 3.0;

#[derive(Debug, Clone, Copy)]
pub struct Spinner {
    /// Rotation of the arc in radians
    pub phase: f32,
}

impl canvas::Program<Message> for Spinner {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let radius = bounds.width.min(bounds.height) / 2.0 - LINE_WIDTH;
        if radius <= 0.0 {
            return vec![frame.into_geometry()];
        }
        let center = frame.center();

        let track = Path::circle(center, radius);
        frame.stroke(
            &track,
            Stroke::default()
                .with_color(Color::from_rgba(0.5, 0.5, 0.5, 0.3))
                .with_width(LINE_WIDTH),
        );

        let arc = Path::new(|builder| {
            builder.arc(Arc {
                center,
                radius,
                start_angle: Radians(self.phase),
                end_angle: Radians(self.phase + ARC_SWEEP),
            });
        });
        frame.stroke(
            &arc,
            Stroke::default()
                .with_color(theme.palette().primary)
                .with_width(LINE_WIDTH),
        );

        vec![frame.into_geometry()]
    }
}

pub fn spinner<'a>(phase: f32, size: f32) -> Element<'a, Message> {
    iced::widget::canvas(Spinner { phase })
        .width(Length::Fixed(size))
        .height(Length::Fixed(size))
        .into()
}
