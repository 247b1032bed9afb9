pub mod image;
pub mod mask;
pub mod polygons;
pub mod tables;

pub use image::read_tiff;
pub use mask::mask_for_polygons;
pub use tables::{ClassId, Dataset, GridSize, WktTable};
