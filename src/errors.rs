use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, PolymaskError>;

#[derive(thiserror::Error, Debug)]
pub enum PolymaskError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Tiff(#[from] tiff::TiffError),
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
    #[error("image `{0}` has no grid size entry")]
    UnknownImage(String),
    #[error("invalid WKT: {0}")]
    Wkt(String),
    #[error("expected POLYGON or MULTIPOLYGON, got {0}")]
    NotAreal(&'static str),
    #[error("unsupported sample format in `{}`", .0.display())]
    UnsupportedSampleFormat(PathBuf),
}
