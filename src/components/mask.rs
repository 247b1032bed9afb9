use geo::{LineString, MultiPolygon};
use itertools::Itertools;
use ndarray::Array2;

/// Rasterizes `polygons` into a 0/1 mask of `shape` (`(height, width)`).
///
/// Polygons must already be in pixel coordinates. All exteriors are filled
/// first, then every hole is carved, so a hole always wins over an
/// overlapping exterior whatever the input order.
pub fn mask_for_polygons(shape: (usize, usize), polygons: &MultiPolygon<f64>) -> Array2<u8> {
    let mut mask = Array2::zeros(shape);
    if polygons.0.is_empty() {
        return mask;
    }
    let exteriors: Vec<_> = polygons
        .iter()
        .map(|polygon| rounded_ring(polygon.exterior()))
        .collect();
    let interiors: Vec<_> = polygons
        .iter()
        .flat_map(|polygon| polygon.interiors().iter().map(rounded_ring))
        .collect();
    for ring in &exteriors {
        fill_ring(&mut mask, ring, 1);
    }
    for ring in &interiors {
        fill_ring(&mut mask, ring, 0);
    }
    mask
}

/// Nearest integer coordinates of a ring, rounding halves away from zero.
fn rounded_ring(ring: &LineString<f64>) -> Vec<(i64, i64)> {
    ring.coords()
        .map(|coord| (coord.x.round() as i64, coord.y.round() as i64))
        .collect()
}

/// Even-odd scanline fill of one closed ring.
///
/// An edge crosses row `y` when `min(y0, y1) <= y < max(y0, y1)`; each
/// sorted crossing pair fills the closed column span
/// `ceil(xa) ..= floor(xb)`. Horizontal edges never cross. Spans outside
/// the raster are clipped.
fn fill_ring(mask: &mut Array2<u8>, ring: &[(i64, i64)], value: u8) {
    let (height, width) = mask.dim();
    if ring.len() < 3 || height == 0 || width == 0 {
        return;
    }
    let y_lo = ring.iter().map(|&(_, y)| y).min().unwrap().max(0);
    let y_hi = ring
        .iter()
        .map(|&(_, y)| y)
        .max()
        .unwrap()
        .min(height as i64 - 1);

    let mut crossings = Vec::new();
    for y in y_lo..=y_hi {
        crossings.clear();
        for (&(x0, y0), &(x1, y1)) in ring.iter().circular_tuple_windows() {
            if (y0 <= y) != (y1 <= y) {
                let t = (y - y0) as f64 / (y1 - y0) as f64;
                crossings.push(x0 as f64 + t * (x1 - x0) as f64);
            }
        }
        crossings.sort_unstable_by(f64::total_cmp);
        for (xa, xb) in crossings.iter().tuples() {
            let start = (xa.ceil() as i64).max(0);
            let end = (xb.floor() as i64).min(width as i64 - 1);
            for x in start..=end {
                mask[[y as usize, x as usize]] = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Polygon;
    use rstest::rstest;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> LineString<f64> {
        LineString::from(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)])
    }

    #[rstest]
    fn empty_collection_gives_zero_mask() {
        let mask = mask_for_polygons((5, 7), &MultiPolygon(vec![]));
        assert_eq!(mask.dim(), (5, 7));
        assert!(mask.iter().all(|&v| v == 0));
    }

    #[rstest]
    fn fills_a_square() {
        let polygons = MultiPolygon(vec![Polygon::new(square(1., 1., 4., 4.), vec![])]);
        let mask = mask_for_polygons((6, 6), &polygons);

        // rows [1, 4), columns [1, 4] under the pinned boundary convention
        for y in 0..6 {
            for x in 0..6 {
                let expected = (1..4).contains(&y) && (1..=4).contains(&x);
                assert_eq!(mask[[y, x]] == 1, expected, "pixel ({x}, {y})");
            }
        }
    }

    #[rstest]
    fn rounds_half_away_from_zero() {
        // left edge at x = 2.5 rounds to 3, not 2
        let polygons = MultiPolygon(vec![Polygon::new(square(2.5, 0., 5., 2.), vec![])]);
        let mask = mask_for_polygons((3, 7), &polygons);
        assert_eq!(mask[[0, 2]], 0);
        assert_eq!(mask[[0, 3]], 1);

        // 4.5454.. is nearer to 5 than to 4
        let polygons = MultiPolygon(vec![Polygon::new(square(4.545_454_5, 0., 6., 2.), vec![])]);
        let mask = mask_for_polygons((3, 8), &polygons);
        assert_eq!(mask[[0, 4]], 0);
        assert_eq!(mask[[0, 5]], 1);
    }

    #[rstest]
    fn holes_carve_after_all_fills(#[values(false, true)] reversed: bool) {
        let plain = Polygon::new(square(0., 0., 9., 9.), vec![]);
        let holed = Polygon::new(
            square(5., 5., 15., 15.),
            vec![square(6., 6., 8., 8.)],
        );
        let mut polygons = vec![plain, holed];
        if reversed {
            polygons.reverse();
        }
        let mask = mask_for_polygons((20, 20), &MultiPolygon(polygons));

        // the hole overlaps the plain polygon's interior and still wins
        assert_eq!(mask[[7, 7]], 0);
        assert_eq!(mask[[5, 7]], 1);
        assert_eq!(mask[[8, 7]], 1);
    }

    #[rstest]
    fn rasterization_is_idempotent() {
        let polygons = MultiPolygon(vec![
            Polygon::new(square(0., 0., 9., 9.), vec![square(2., 2., 4., 4.)]),
            Polygon::new(square(5., 5., 15., 15.), vec![]),
        ]);
        let first = mask_for_polygons((20, 20), &polygons);
        let second = mask_for_polygons((20, 20), &polygons);
        assert_eq!(first, second);
    }

    #[rstest]
    fn clips_geometry_outside_the_raster() {
        let polygons = MultiPolygon(vec![Polygon::new(square(-5., -5., 3., 3.), vec![])]);
        let mask = mask_for_polygons((4, 4), &polygons);

        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(mask[[y, x]] == 1, y < 3, "pixel ({x}, {y})");
            }
        }
    }
}
