pub mod grid_view;
pub mod layout;

pub use grid_view::{GridView, ImageLibrary};
pub use layout::Layout;
