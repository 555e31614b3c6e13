use bevy::prelude::*;

/// Logical pointer buttons, indexed like DOM `MouseEvent.button`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Set of held pointer buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ButtonMask(u8);

impl ButtonMask {
    pub const NONE: Self = Self(0);
    pub const PRIMARY: Self = Self(1);
    pub const SECONDARY: Self = Self(2);
    pub const MIDDLE: Self = Self(4);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn from_button(button: PointerButton) -> Self {
        match button {
            PointerButton::Primary => Self::PRIMARY,
            PointerButton::Middle => Self::MIDDLE,
            PointerButton::Secondary => Self::SECONDARY,
        }
    }

    /// Build from a DOM-style live `buttons` bitmask.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0b111)
    }
}

/// Platform-neutral input events in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInputEvent {
    PointerDown {
        button: PointerButton,
        position: Vec2,
    },
    PointerUp {
        button: PointerButton,
        position: Vec2,
    },
    /// `buttons` is the live held mask at the time of the move.
    PointerMove {
        position: Vec2,
        delta: Vec2,
        buttons: ButtonMask,
    },
    /// Positive scrolls away from the content (zoom out).
    Wheel {
        delta_y: f32,
    },
    TouchStart {
        id: u64,
        position: Vec2,
    },
    TouchMove {
        id: u64,
        position: Vec2,
    },
    TouchEnd {
        id: u64,
    },
    Resize {
        width: f32,
        height: f32,
    },
}

/// Camera-facing result of an input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerGesture {
    Drag { delta: Vec2, buttons: ButtonMask },
    Scroll { delta: f32 },
    Pinch { delta: f32 },
    Resize { aspect: f32 },
}

/// What the camera and picker read each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSnapshot {
    /// Viewport-local cursor position in pixels.
    pub cursor: Vec2,
    pub buttons: ButtonMask,
}

/// Single writer of the pointer snapshot.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    snapshot: PointerSnapshot,
    viewport_origin: Vec2,
    viewport_size: Vec2,
    /// Active touches in start order.
    touches: Vec<(u64, Vec2)>,
    previous_pinch_distance: Option<f32>,
    primary_pressed: bool,
}

impl InputState {
    pub fn new(viewport_size: Vec2) -> Self {
        Self {
            viewport_size,
            ..default()
        }
    }

    pub fn snapshot(&self) -> PointerSnapshot {
        self.snapshot
    }

    pub fn viewport_size(&self) -> Vec2 {
        self.viewport_size
    }

    pub fn viewport_origin(&self) -> Vec2 {
        self.viewport_origin
    }

    pub fn previous_pinch_distance(&self) -> Option<f32> {
        self.previous_pinch_distance
    }

    /// Place the viewport on screen. Cursor positions are reported relative
    /// to `origin`. Kept in step with the camera by `sync_viewport_rect`.
    pub fn set_viewport(&mut self, origin: Vec2, size: Vec2) {
        self.viewport_origin = origin;
        self.viewport_size = size;
    }

    /// True once per primary press (mouse down or first finger). Reading it
    /// clears the edge.
    pub fn take_primary_press(&mut self) -> bool {
        std::mem::take(&mut self.primary_pressed)
    }

    /// Apply one event, appending any camera gestures it produces.
    pub fn handle(&mut self, event: &RawInputEvent, gestures: &mut Vec<PointerGesture>) {
        match *event {
            RawInputEvent::PointerDown { button, position } => {
                self.snapshot.cursor = self.to_local(position);
                self.snapshot.buttons = self.snapshot.buttons.with(ButtonMask::from_button(button));
                if button == PointerButton::Primary {
                    self.primary_pressed = true;
                }
            }
            RawInputEvent::PointerUp { button, position } => {
                self.snapshot.cursor = self.to_local(position);
                self.snapshot.buttons = self
                    .snapshot
                    .buttons
                    .without(ButtonMask::from_button(button));
            }
            RawInputEvent::PointerMove {
                position,
                delta,
                buttons,
            } => {
                // The live mask wins over tracked state, healing missed ups.
                self.snapshot.buttons = buttons;
                self.snapshot.cursor = self.to_local(position);
                if !buttons.is_empty() && delta != Vec2::ZERO {
                    gestures.push(PointerGesture::Drag { delta, buttons });
                }
            }
            RawInputEvent::Wheel { delta_y } => {
                if delta_y != 0.0 {
                    gestures.push(PointerGesture::Scroll { delta: delta_y });
                }
            }
            RawInputEvent::TouchStart { id, position } => self.touch_start(id, position),
            RawInputEvent::TouchMove { id, position } => self.touch_move(id, position, gestures),
            RawInputEvent::TouchEnd { id } => self.touch_end(id),
            RawInputEvent::Resize { width, height } => {
                self.viewport_size = Vec2::new(width, height);
                if width > 0.0 && height > 0.0 {
                    gestures.push(PointerGesture::Resize {
                        aspect: width / height,
                    });
                }
            }
        }
    }

    fn to_local(&self, position: Vec2) -> Vec2 {
        position - self.viewport_origin
    }

    fn touch_start(&mut self, id: u64, position: Vec2) {
        if self.touches.len() >= 2 || self.touches.iter().any(|(known, _)| *known == id) {
            return;
        }
        self.touches.push((id, self.to_local(position)));

        match self.touches.as_slice() {
            [(_, only)] => {
                self.snapshot.cursor = *only;
                self.snapshot.buttons = ButtonMask::PRIMARY;
                self.primary_pressed = true;
            }
            [(_, a), (_, b)] => {
                self.snapshot.cursor = (*a + *b) * 0.5;
                self.snapshot.buttons = ButtonMask::MIDDLE;
                self.previous_pinch_distance = Some(a.distance(*b));
            }
            _ => {}
        }
    }

    fn touch_move(&mut self, id: u64, position: Vec2, gestures: &mut Vec<PointerGesture>) {
        let local = self.to_local(position);
        let Some(index) = self.touches.iter().position(|(known, _)| *known == id) else {
            return;
        };
        let previous_cursor = self.snapshot.cursor;
        self.touches[index].1 = local;

        match self.touches.as_slice() {
            [(_, only)] => {
                self.snapshot.cursor = *only;
            }
            [(_, a), (_, b)] => {
                self.snapshot.cursor = (*a + *b) * 0.5;
                let distance = a.distance(*b);
                if let Some(previous) = self.previous_pinch_distance {
                    let delta = distance - previous;
                    if delta != 0.0 {
                        gestures.push(PointerGesture::Pinch { delta });
                    }
                }
                self.previous_pinch_distance = Some(distance);
            }
            _ => return,
        }

        let delta = self.snapshot.cursor - previous_cursor;
        if !self.snapshot.buttons.is_empty() && delta != Vec2::ZERO {
            gestures.push(PointerGesture::Drag {
                delta,
                buttons: self.snapshot.buttons,
            });
        }
    }

    fn touch_end(&mut self, id: u64) {
        self.touches.retain(|(known, _)| *known != id);
        self.snapshot.buttons = ButtonMask::NONE;
        self.previous_pinch_distance = None;
    }
}
