use bevy::input::ButtonState;
use bevy::input::mouse::{MouseButtonInput, MouseScrollUnit, MouseWheel};
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use constants::input::WHEEL_LINE_TO_PIXELS;

use super::pointer_state::{ButtonMask, InputState, PointerButton, RawInputEvent};

/// Raw events gathered this frame, drained by the frame orchestrator.
#[derive(Resource, Default, Debug)]
pub struct InputQueue {
    events: Vec<RawInputEvent>,
}

impl InputQueue {
    pub fn push(&mut self, event: RawInputEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, RawInputEvent> {
        self.events.drain(..)
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Middle => Some(PointerButton::Middle),
        MouseButton::Right => Some(PointerButton::Secondary),
        _ => None,
    }
}

fn live_mask(mouse: &ButtonInput<MouseButton>) -> ButtonMask {
    let mut mask = ButtonMask::NONE;
    if mouse.pressed(MouseButton::Left) {
        mask = mask.with(ButtonMask::PRIMARY);
    }
    if mouse.pressed(MouseButton::Right) {
        mask = mask.with(ButtonMask::SECONDARY);
    }
    if mouse.pressed(MouseButton::Middle) {
        mask = mask.with(ButtonMask::MIDDLE);
    }
    mask
}

/// Undo this frame's button transitions on the end-of-frame mask.
fn mask_before(live: ButtonMask, transitions: &[(PointerButton, ButtonState)]) -> ButtonMask {
    transitions
        .iter()
        .rev()
        .fold(live, |mask, &(button, state)| match state {
            ButtonState::Pressed => mask.without(ButtonMask::from_button(button)),
            ButtonState::Released => mask.with(ButtonMask::from_button(button)),
        })
}

/// Queue the current window size so the camera and picker start with the
/// real viewport.
pub fn seed_viewport(mut queue: ResMut<InputQueue>, windows: Query<&Window, With<PrimaryWindow>>) {
    if let Ok(window) = windows.single() {
        queue.push(RawInputEvent::Resize {
            width: window.width(),
            height: window.height(),
        });
    }
}

/// Translate bevy window input into platform-neutral queue entries.
pub fn collect_input_events(
    mut queue: ResMut<InputQueue>,
    mut resized: EventReader<WindowResized>,
    mut button_events: EventReader<MouseButtonInput>,
    mut cursor_moved: EventReader<CursorMoved>,
    mut wheel_events: EventReader<MouseWheel>,
    mut touch_events: EventReader<TouchInput>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    for event in resized.read() {
        queue.push(RawInputEvent::Resize {
            width: event.width,
            height: event.height,
        });
    }

    let cursor = windows
        .single()
        .ok()
        .and_then(Window::cursor_position)
        .unwrap_or_default();

    let transitions: Vec<(PointerButton, ButtonState)> = button_events
        .read()
        .filter_map(|event| pointer_button(event.button).map(|button| (button, event.state)))
        .collect();

    // Moves are queued ahead of this frame's presses and releases, carrying
    // the mask from before them, so a move never drags with a button that
    // went down after it.
    let buttons = mask_before(live_mask(&mouse), &transitions);
    for event in cursor_moved.read() {
        queue.push(RawInputEvent::PointerMove {
            position: event.position,
            delta: event.delta.unwrap_or_default(),
            buttons,
        });
    }

    for (button, state) in transitions {
        queue.push(match state {
            ButtonState::Pressed => RawInputEvent::PointerDown {
                button,
                position: cursor,
            },
            ButtonState::Released => RawInputEvent::PointerUp {
                button,
                position: cursor,
            },
        });
    }

    for event in wheel_events.read() {
        // Bevy reports scrolling up as positive; the camera expects DOM sign.
        let pixels = match event.unit {
            MouseScrollUnit::Line => event.y * WHEEL_LINE_TO_PIXELS,
            MouseScrollUnit::Pixel => event.y,
        };
        queue.push(RawInputEvent::Wheel { delta_y: -pixels });
    }

    for event in touch_events.read() {
        queue.push(match event.phase {
            TouchPhase::Started => RawInputEvent::TouchStart {
                id: event.id,
                position: event.position,
            },
            TouchPhase::Moved => RawInputEvent::TouchMove {
                id: event.id,
                position: event.position,
            },
            TouchPhase::Ended | TouchPhase::Canceled => RawInputEvent::TouchEnd { id: event.id },
        });
    }
}

/// Fit the pointer viewport to the area the city camera draws into.
pub fn sync_viewport_rect(
    mut input: ResMut<InputState>,
    cameras: Query<&Camera, With<Camera3d>>,
) {
    let Some(rect) = cameras
        .iter()
        .find_map(Camera::logical_viewport_rect)
    else {
        return;
    };
    if input.viewport_origin() != rect.min || input.viewport_size() != rect.size() {
        input.set_viewport(rect.min, rect.size());
    }
}
