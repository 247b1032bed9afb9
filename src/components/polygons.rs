use std::collections::HashMap;

use geo::{AffineOps, AffineTransform, Geometry, MultiPolygon};
use ndarray::Array3;
use wkt::TryFromWkt;

use crate::{
    components::tables::{ClassId, Dataset},
    errors::{PolymaskError, Result},
};

impl Dataset {
    /// Ground truth polygons for `image_id`, rescaled onto the pixel grid of
    /// `raster`.
    ///
    /// An image without annotations yields an empty map; only an image
    /// missing from `grid_sizes.csv` is an error.
    pub fn load_polygons(
        &self,
        image_id: &str,
        raster: &Array3<u16>,
    ) -> Result<HashMap<ClassId, MultiPolygon<f64>>> {
        let (_, w, h) = raster.dim();
        let (w, h) = (w as f64, h as f64);
        // the reference grid spans one unit more than the pixel grid
        let w_ = w * w / (w + 1.);
        let h_ = h * h / (h + 1.);

        let grid_size = self.x_max_y_min(image_id)?;
        let x_scaler = w_ / grid_size.x_max;
        // y_min < 0 by convention, so this flips geo y into row space
        let y_scaler = h_ / grid_size.y_min;
        let scale = AffineTransform::scale(x_scaler, y_scaler, (0., 0.));

        let Some(classes) = self.wkt_data()?.get(image_id) else {
            return Ok(HashMap::new());
        };
        classes
            .iter()
            .map(|(&class, raw)| {
                multi_polygon_from_wkt(raw)
                    .map(|polygons| (class, polygons.affine_transform(&scale)))
            })
            .collect()
    }
}

pub(crate) fn multi_polygon_from_wkt(raw: &str) -> Result<MultiPolygon<f64>> {
    let geometry =
        Geometry::try_from_wkt_str(raw).map_err(|err| PolymaskError::Wkt(err.to_string()))?;
    match geometry {
        Geometry::MultiPolygon(polygons) => Ok(polygons),
        Geometry::Polygon(polygon) => Ok(MultiPolygon(vec![polygon])),
        other => Err(PolymaskError::NotAreal(match other {
            Geometry::Point(_) => "POINT",
            Geometry::MultiPoint(_) => "MULTIPOINT",
            Geometry::LineString(_) => "LINESTRING",
            Geometry::MultiLineString(_) => "MULTILINESTRING",
            Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
            _ => "an unsupported geometry",
        })),
    }
}
