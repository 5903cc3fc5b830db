use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect};

/// Represents the location where an input event occurred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// The position in screen coordinates
    pub position: Pos2,
    /// Whether this position is within the canvas bounds
    pub is_in_canvas: bool,
}

/// Keyboard shortcuts the drawing surface reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// `C` or Enter
    CloseShape,
    Escape,
    /// Ctrl+Z, or Cmd+Z on macOS
    Undo,
}

impl KeyAction {
    pub fn from_key(key: Key, modifiers: Modifiers) -> Option<Self> {
        match key {
            Key::Z if modifiers.command => Some(Self::Undo),
            Key::C | Key::Enter if !modifiers.command && !modifiers.alt => Some(Self::CloseShape),
            Key::Escape => Some(Self::Escape),
            _ => None,
        }
    }
}

/// Represents different types of input events that can occur on the canvas
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse button was pressed
    PointerDown {
        location: InputLocation,
        button: PointerButton,
    },
    /// Mouse button was released
    PointerUp {
        location: InputLocation,
        button: PointerButton,
    },
    /// Second release of a double-click
    DoubleClick {
        location: InputLocation,
        button: PointerButton,
    },
    /// Mouse moved (with or without buttons pressed)
    PointerMove { location: InputLocation },
    /// Mouse left the application window
    PointerLeave,
    /// Scroll wheel; positive `delta` zooms in
    Wheel { location: InputLocation, delta: f32 },
    Key(KeyAction),
}

const BUTTONS: [PointerButton; 3] = [PointerButton::Primary, PointerButton::Secondary, PointerButton::Middle];

/// Handles converting raw egui input into our domain-specific InputEvents
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process raw egui input and generate our InputEvents.
    ///
    /// Presses, double-clicks and wheel steps only count inside `canvas`;
    /// moves and releases are always reported so drags can leave the canvas.
    /// Keys are skipped while a text field has focus.
    pub fn process_input(&mut self, ctx: &Context, canvas: Rect) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let wants_keyboard = ctx.wants_keyboard_input();

        ctx.input(|input| {
            let hover = input.pointer.hover_pos();
            let location = |pos: Pos2| InputLocation {
                position: pos,
                is_in_canvas: canvas.contains(pos),
            };

            match hover {
                Some(pos) => {
                    if Some(pos) != self.last_pointer_pos {
                        events.push(InputEvent::PointerMove { location: location(pos) });
                    }
                    self.last_pointer_pos = Some(pos);
                }
                None => {
                    if self.last_pointer_pos.take().is_some() {
                        events.push(InputEvent::PointerLeave);
                    }
                }
            }

            if let Some(pos) = hover.or(self.last_pointer_pos) {
                let loc = location(pos);
                for button in BUTTONS {
                    if input.pointer.button_pressed(button) && loc.is_in_canvas {
                        events.push(InputEvent::PointerDown { location: loc, button });
                    }
                    if input.pointer.button_released(button) {
                        events.push(InputEvent::PointerUp { location: loc, button });
                    }
                    if input.pointer.button_double_clicked(button) && loc.is_in_canvas {
                        events.push(InputEvent::DoubleClick { location: loc, button });
                    }
                }

                let scroll = input.raw_scroll_delta.y;
                if scroll != 0.0 && loc.is_in_canvas {
                    events.push(InputEvent::Wheel { location: loc, delta: scroll });
                }
            }

            if !wants_keyboard {
                for event in &input.events {
                    if let egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        modifiers,
                        ..
                    } = event
                    {
                        if let Some(action) = KeyAction::from_key(*key, *modifiers) {
                            events.push(InputEvent::Key(action));
                        }
                    }
                }
            }
        });

        events
    }
}
