use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use log::debug;
use once_cell::sync::OnceCell;

use crate::errors::{PolymaskError, Result};

const GRID_SIZES_CSV: &str = "grid_sizes.csv";
const TRAIN_WKT_CSV: &str = "train_wkt_v4.csv";

/// Class index of a ground truth annotation.
pub type ClassId = u32;

/// Ground truth WKT text keyed by image, then by class.
pub type WktTable = HashMap<String, HashMap<ClassId, String>>;

/// Geo-referenced extents of an image bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSize {
    pub x_max: f64,
    pub y_min: f64,
}

/// Handle to a dataset directory.
///
/// The two metadata tables are read in full on first use and retained for
/// the lifetime of the handle. A `&Dataset` may be shared across threads;
/// the cells serialize first access.
#[derive(Debug)]
pub struct Dataset {
    pub(crate) root: PathBuf,
    grid_sizes: OnceCell<HashMap<String, GridSize>>,
    wkt_data: OnceCell<WktTable>,
}

impl Dataset {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            grid_sizes: OnceCell::new(),
            wkt_data: OnceCell::new(),
        }
    }

    /// Bounding box extents of `image_id` from `grid_sizes.csv`.
    pub fn x_max_y_min(&self, image_id: &str) -> Result<GridSize> {
        let table = self
            .grid_sizes
            .get_or_try_init(|| read_grid_sizes(self.root.join(GRID_SIZES_CSV)))?;
        table
            .get(image_id)
            .copied()
            .ok_or_else(|| PolymaskError::UnknownImage(image_id.to_string()))
    }

    /// Full ground truth table from `train_wkt_v4.csv`.
    ///
    /// Unlike [`Dataset::x_max_y_min`] this takes no identifier; callers do
    /// the nested lookup, and an absent image means "no annotations".
    pub fn wkt_data(&self) -> Result<&WktTable> {
        self.wkt_data
            .get_or_try_init(|| read_wkt_table(self.root.join(TRAIN_WKT_CSV)))
    }
}

fn read_grid_sizes<P: AsRef<Path>>(path: P) -> Result<HashMap<String, GridSize>> {
    let mut reader = csv::Reader::from_path(&path)?;
    let mut table = HashMap::new();
    for row in reader.deserialize() {
        let (image_id, x_max, y_min): (String, f64, f64) = row?;
        table.insert(image_id, GridSize { x_max, y_min });
    }
    debug!(
        "loaded {} grid size entries from {}",
        table.len(),
        path.as_ref().display()
    );
    Ok(table)
}

fn read_wkt_table<P: AsRef<Path>>(path: P) -> Result<WktTable> {
    let mut reader = csv::Reader::from_path(&path)?;
    let mut table = WktTable::new();
    let mut rows = 0usize;
    for row in reader.deserialize() {
        let (image_id, class, wkt): (String, ClassId, String) = row?;
        table.entry(image_id).or_default().insert(class, wkt);
        rows += 1;
    }
    debug!(
        "loaded {} annotations for {} images from {}",
        rows,
        table.len(),
        path.as_ref().display()
    );
    Ok(table)
}
