use bevy::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
    };

    pub fn any(&self) -> bool {
        self.ctrl || self.shift || self.alt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    pub fn sign(self) -> f64 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
        }
    }
}

/// Keys the measurement tools react to; everything else maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKey {
    Escape,
    Backspace,
    /// Align a distance measurement to the surface under the pointer.
    E,
    /// Help overlay toggle (with Ctrl+Alt).
    H,
    NumpadPlus,
    NumpadMinus,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputKind {
    PointerMove,
    Press(PointerButton),
    Scroll(ScrollDirection),
    Key(ToolKey),
}

/// One input sample as seen by the measurement tools.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolEvent {
    pub kind: InputKind,
    /// Pointer position in window coordinates at the time of the event.
    pub cursor: Vec2,
    pub modifiers: Modifiers,
}

impl ToolEvent {
    pub fn new(kind: InputKind, cursor: Vec2, modifiers: Modifiers) -> Self {
        Self {
            kind,
            cursor,
            modifiers,
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(
            self.kind,
            InputKind::PointerMove | InputKind::Press(_) | InputKind::Scroll(_)
        )
    }

    /// Scroll direction for wheel input and the numpad +/- equivalents.
    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        match self.kind {
            InputKind::Scroll(direction) => Some(direction),
            InputKind::Key(ToolKey::NumpadPlus) => Some(ScrollDirection::Up),
            InputKind::Key(ToolKey::NumpadMinus) => Some(ScrollDirection::Down),
            _ => None,
        }
    }

    /// Camera navigation input: middle mouse, wheel and numpad zoom.
    pub fn is_navigation(&self) -> bool {
        matches!(self.kind, InputKind::Press(PointerButton::Middle))
            || self.scroll_direction().is_some()
    }
}

/// What the host should do with an event after the tool has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Consumed, the tool keeps running.
    Running,
    /// Not consumed, let the host handle it (navigation, UI).
    PassThrough,
    /// The measurement was completed and its geometry stays in the scene.
    Finished,
    /// The measurement was abandoned and its geometry removed.
    Cancelled,
}

impl Flow {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }
}
