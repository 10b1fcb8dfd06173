/// Pointer sensor for drag gestures
///
/// Turns raw mouse and touch input into drag activation, drop and cancel
/// outcomes. Positions are in grid content coordinates, so scrolling while
/// dragging is reported as a move.
use std::time::{Duration, Instant};

use iced::touch::Finger;
use iced::{Point, Vector};

use crate::state::data::ImageId;
use crate::state::settings::DragSettings;

/// Which pointer drives a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    Mouse,
    Touch(Finger),
}

/// Conditions a pending gesture must meet before it becomes a drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationConstraint {
    /// Minimum travel for the mouse; `0` activates on press
    pub mouse_distance: f32,
    /// Hold time required for touch
    pub touch_delay: Duration,
    /// Travel allowed during the touch hold before the gesture is abandoned
    pub touch_tolerance: f32,
}

impl From<DragSettings> for ActivationConstraint {
    fn from(settings: DragSettings) -> Self {
        Self {
            mouse_distance: settings.mouse_distance,
            touch_delay: settings.touch_delay(),
            touch_tolerance: settings.touch_tolerance,
        }
    }
}

/// What a sensor transition means for the gallery
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The gesture became a drag of `id`
    Activated(ImageId),
    /// The drag of `id` was released after moving by `delta`
    Dropped { id: ImageId, delta: Vector },
    /// The drag in progress was aborted
    Cancelled,
}

#[derive(Debug, Clone, Default)]
enum SensorState {
    #[default]
    Idle,
    Pending {
        id: ImageId,
        pointer: Pointer,
        origin: Point,
        since: Instant,
    },
    Active {
        id: ImageId,
        pointer: Pointer,
        origin: Point,
        current: Point,
    },
}

#[derive(Debug, Clone)]
pub struct PointerSensor {
    constraint: ActivationConstraint,
    state: SensorState,
}

impl PointerSensor {
    pub fn new(constraint: ActivationConstraint) -> Self {
        Self {
            constraint,
            state: SensorState::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, SensorState::Idle)
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SensorState::Active { .. })
    }

    /// True while a touch hold is waiting for its delay to elapse
    pub fn awaiting_delay(&self) -> bool {
        matches!(
            self.state,
            SensorState::Pending {
                pointer: Pointer::Touch(_),
                ..
            }
        )
    }

    /// Pointer driving the current gesture
    pub fn pointer(&self) -> Option<Pointer> {
        match &self.state {
            SensorState::Idle => None,
            SensorState::Pending { pointer, .. } | SensorState::Active { pointer, .. } => {
                Some(*pointer)
            }
        }
    }

    /// Offset of the active drag from where it started
    pub fn delta(&self) -> Option<Vector> {
        match &self.state {
            SensorState::Active {
                origin, current, ..
            } => Some(*current - *origin),
            _ => None,
        }
    }

    /// A pointer went down on the tile `id`
    pub fn press(
        &mut self,
        id: ImageId,
        pointer: Pointer,
        position: Point,
        now: Instant,
    ) -> Option<Outcome> {
        if !self.is_idle() {
            return None;
        }

        if pointer == Pointer::Mouse && self.constraint.mouse_distance <= 0.0 {
            self.state = SensorState::Active {
                id: id.clone(),
                pointer,
                origin: position,
                current: position,
            };
            return Some(Outcome::Activated(id));
        }

        self.state = SensorState::Pending {
            id,
            pointer,
            origin: position,
            since: now,
        };
        None
    }

    /// The pointer moved to `position`
    pub fn moved(&mut self, pointer: Pointer, position: Point, now: Instant) -> Option<Outcome> {
        if self.pointer() != Some(pointer) {
            return None;
        }

        match &mut self.state {
            SensorState::Idle => None,
            SensorState::Active { current, .. } => {
                *current = position;
                None
            }
            SensorState::Pending {
                id, origin, since, ..
            } => {
                let travelled = origin.distance(position);
                match pointer {
                    Pointer::Mouse => {
                        if travelled >= self.constraint.mouse_distance {
                            let id = id.clone();
                            let origin = *origin;
                            Some(self.activate(id, pointer, origin, position))
                        } else {
                            None
                        }
                    }
                    Pointer::Touch(_) => {
                        if travelled > self.constraint.touch_tolerance {
                            self.state = SensorState::Idle;
                            None
                        } else if now.duration_since(*since) >= self.constraint.touch_delay {
                            let id = id.clone();
                            let origin = *origin;
                            Some(self.activate(id, pointer, origin, position))
                        } else {
                            None
                        }
                    }
                }
            }
        }
    }

    /// Time passed without input; activates a touch hold whose delay elapsed
    pub fn tick(&mut self, now: Instant) -> Option<Outcome> {
        match &self.state {
            SensorState::Pending {
                id,
                pointer: pointer @ Pointer::Touch(_),
                origin,
                since,
            } if now.duration_since(*since) >= self.constraint.touch_delay => {
                let (id, pointer, origin) = (id.clone(), *pointer, *origin);
                Some(self.activate(id, pointer, origin, origin))
            }
            _ => None,
        }
    }

    /// The pointer was lifted
    pub fn release(&mut self, pointer: Pointer) -> Option<Outcome> {
        if self.pointer() != Some(pointer) {
            return None;
        }

        match std::mem::take(&mut self.state) {
            SensorState::Active {
                id,
                origin,
                current,
                ..
            } => Some(Outcome::Dropped {
                id,
                delta: current - origin,
            }),
            _ => None,
        }
    }

    /// Abort whatever gesture is in progress
    pub fn cancel(&mut self) -> Option<Outcome> {
        match std::mem::take(&mut self.state) {
            SensorState::Active { .. } => Some(Outcome::Cancelled),
            _ => None,
        }
    }

    fn activate(
        &mut self,
        id: ImageId,
        pointer: Pointer,
        origin: Point,
        current: Point,
    ) -> Outcome {
        self.state = SensorState::Active {
            id: id.clone(),
            pointer,
            origin,
            current,
        };
        Outcome::Activated(id)
    }
}
