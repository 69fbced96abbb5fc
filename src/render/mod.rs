//! Terminal rendering: escape-aware width handling, layout, colouring and
//! the screen writer.

pub mod ansi;
pub mod layout;
pub mod palette;
pub mod presenter;
pub mod screen;

pub use layout::{render_width, terminal_width};
pub use palette::Palette;
pub use presenter::{Health, LineKind, Presenter, WatchInfo, summarize};
pub use screen::Screen;
