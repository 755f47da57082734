//! Input and feedback systems shared by every screen.

/// Cursor shape requests, applied to the window and forwarded to the page.
pub mod cursor_hint;

/// Click, drag and double-click recognition for the left mouse button.
pub mod pointer;
