use std::{fs::File, io::BufReader, path::Path};

use log::debug;
use ndarray::Array3;
use tiff::decoder::{Decoder, DecodingResult, Limits};

use crate::{
    components::tables::Dataset,
    errors::{PolymaskError, Result},
};

const THREE_BAND_DIR: &str = "three_band";

impl Dataset {
    /// Reads the three band scene for `image_id` from the dataset root.
    pub fn load_image(&self, image_id: &str) -> Result<Array3<u16>> {
        read_tiff(
            self.root
                .join(THREE_BAND_DIR)
                .join(format!("{image_id}.tif")),
        )
    }
}

/// Decodes a multi band TIFF into a `(band, width, height)` array.
///
/// 8 bit samples are widened to `u16`; other sample formats are rejected.
pub fn read_tiff<P: AsRef<Path>>(path: P) -> Result<Array3<u16>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file))?.with_limits(Limits::unlimited());
    let (width, height) = decoder.dimensions()?;
    let (width, height) = (width as usize, height as usize);
    let data = match decoder.read_image()? {
        DecodingResult::U16(data) => data,
        DecodingResult::U8(data) => data.into_iter().map(u16::from).collect(),
        _ => return Err(PolymaskError::UnsupportedSampleFormat(path.to_path_buf())),
    };
    if width == 0 || height == 0 || data.len() % (width * height) != 0 {
        return Err(ndarray::ShapeError::from_kind(ndarray::ErrorKind::IncompatibleShape).into());
    }
    let bands = data.len() / (width * height);
    debug!("decoded {} ({bands} bands, {width}x{height})", path.display());

    // samples come interleaved row major; the dataset convention is band first
    let array = Array3::from_shape_vec((height, width, bands), data)?;
    Ok(array.permuted_axes([2, 1, 0]))
}
