mod components;
mod errors;

pub use components::{mask_for_polygons, read_tiff, ClassId, Dataset, GridSize, WktTable};
pub use errors::{PolymaskError, Result};
