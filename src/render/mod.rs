pub mod renderer;

pub use renderer::{CellKind, Palette, Renderer, View, cell_kind};
