//! Windowing-agnostic input events consumed by [`crate::scene::Scene`].

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    /// Rotates (arcball).
    Primary,
    /// Pans along X.
    Secondary,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    /// Toggle animation.
    A,
    /// Toggle projection mode.
    P,
    X,
    Y,
    Z,
    /// Zoom in.
    Digit1,
    /// Zoom out.
    Digit2,
    /// Reset view.
    R,
    Other,
}

/// Cursor coordinates are window pixels with the origin at the top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    CursorMoved { x: f32, y: f32 },
    MousePressed { button: MouseButton, x: f32, y: f32 },
    MouseReleased { button: MouseButton, x: f32, y: f32 },
    /// Vertical scroll; positive is away from the user.
    Scroll { delta_y: f32 },
    KeyPressed { key: Key, shift: bool },
    Resized { width: u32, height: u32 },
}
