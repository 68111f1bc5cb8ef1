pub mod commands;
pub mod marker;
pub mod theme;
pub mod types;

pub use commands::{RenderCommand, TextAlign};
pub use marker::MarkerPosition;
pub use theme::ThemeToken;
pub use types::{Color, Point, Rect};
