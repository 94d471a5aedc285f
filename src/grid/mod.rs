pub mod images;
pub mod model;

pub use images::{ImageId, ImagePools};
pub use model::{Cell, CellView, Grid};
