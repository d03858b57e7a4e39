pub mod renderer;
pub mod theme;

pub use renderer::{Renderer, SessionInfo};
pub use theme::Theme;
