//! Ring reconstruction from Overpass vertex lists and point-in-area tests.

use footprint_core::{Coordinate, Geometry, Ring};
use geo::{Contains, LineString, MultiPolygon, Point, Polygon};

use crate::overpass::types::LatLon;

/// Fewest positions a closed ring can have and still enclose an area.
pub const MIN_RING_POSITIONS: usize = 4;

/// Appends the first position when the ring is open. Closed and empty rings
/// are returned unchanged.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn close_ring(mut ring: Ring) -> Ring {
    if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
        if first != last {
            ring.push(first);
        }
    }
    ring
}

/// Builds a closed `[lon, lat]` ring from a vertex list. `None` when empty.
#[must_use]
pub fn ring_from_points(points: &[LatLon]) -> Option<Ring> {
    if points.is_empty() {
        return None;
    }
    Some(close_ring(points.iter().map(|p| [p.lon, p.lat]).collect()))
}

#[must_use]
pub fn is_degenerate(ring: &Ring) -> bool {
    ring.len() < MIN_RING_POSITIONS
}

fn to_line_string(ring: &Ring) -> LineString<f64> {
    LineString::from(ring.iter().map(|p| (p[0], p[1])).collect::<Vec<_>>())
}

fn to_polygon(rings: &[Ring]) -> Option<Polygon<f64>> {
    let (exterior, interiors) = rings.split_first()?;
    Some(Polygon::new(
        to_line_string(exterior),
        interiors.iter().map(to_line_string).collect(),
    ))
}

/// Whether `geometry` strictly contains `coordinate`. Points on a boundary
/// are outside.
#[must_use]
pub fn contains(geometry: &Geometry, coordinate: Coordinate) -> bool {
    let point = Point::new(coordinate.longitude, coordinate.latitude);
    match geometry {
        Geometry::Polygon(rings) => to_polygon(rings).is_some_and(|p| p.contains(&point)),
        Geometry::MultiPolygon(polygons) => {
            MultiPolygon::new(polygons.iter().filter_map(|p| to_polygon(p)).collect())
                .contains(&point)
        }
    }
}

/// Index of the first geometry containing `coordinate`, scanning in order.
#[must_use]
pub fn first_containing<'a>(
    geometries: impl IntoIterator<Item = &'a Geometry>,
    coordinate: Coordinate,
) -> Option<usize> {
    geometries.into_iter().position(|g| contains(g, coordinate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Ring {
        vec![
            [x, y],
            [x + size, y],
            [x + size, y + size],
            [x, y + size],
            [x, y],
        ]
    }

    #[test]
    fn close_ring_appends_first_position_when_open() {
        let open = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];
        let closed = close_ring(open);
        assert_eq!(closed.len(), 4);
        assert_eq!(closed.first(), closed.last());
    }

    #[test]
    fn close_ring_is_idempotent() {
        let ring = square(0.0, 0.0, 1.0);
        assert_eq!(close_ring(ring.clone()), ring);
        assert_eq!(close_ring(close_ring(ring.clone())), ring);
        assert!(close_ring(Vec::new()).is_empty());
    }

    #[test]
    fn ring_from_points_uses_lon_lat_order() {
        let points = [
            LatLon { lat: 51.0, lon: -0.1 },
            LatLon { lat: 51.0, lon: -0.2 },
            LatLon { lat: 51.1, lon: -0.2 },
        ];
        let ring = ring_from_points(&points).unwrap();
        assert_eq!(ring[0], [-0.1, 51.0]);
        assert_eq!(ring.last(), Some(&[-0.1, 51.0]));
        assert!(ring_from_points(&[]).is_none());
    }

    #[test]
    fn degenerate_rings_have_fewer_than_four_positions() {
        assert!(is_degenerate(&vec![[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]]));
        assert!(!is_degenerate(&square(0.0, 0.0, 1.0)));
    }

    #[test]
    fn polygon_holes_exclude_points() {
        let geometry = Geometry::Polygon(vec![square(0.0, 0.0, 10.0), square(4.0, 4.0, 2.0)]);
        assert!(contains(&geometry, Coordinate::new(1.0, 1.0)));
        assert!(!contains(&geometry, Coordinate::new(5.0, 5.0)));
    }

    #[test]
    fn multipolygon_contains_point_in_any_member() {
        let geometry = Geometry::MultiPolygon(vec![
            vec![square(0.0, 0.0, 1.0)],
            vec![square(5.0, 5.0, 1.0)],
        ]);
        assert!(contains(&geometry, Coordinate::new(5.5, 5.5)));
        assert!(!contains(&geometry, Coordinate::new(3.0, 3.0)));
    }

    #[test]
    fn first_containing_picks_earliest_match() {
        let outer = Geometry::Polygon(vec![square(0.0, 0.0, 10.0)]);
        let inner = Geometry::Polygon(vec![square(4.0, 4.0, 2.0)]);
        let elsewhere = Geometry::Polygon(vec![square(20.0, 20.0, 1.0)]);
        let point = Coordinate::new(5.0, 5.0);

        assert_eq!(
            first_containing(&[elsewhere.clone(), inner.clone(), outer.clone()], point),
            Some(1)
        );
        assert_eq!(first_containing(&[outer, inner], point), Some(0));
        assert_eq!(first_containing(&[elsewhere], point), None);
    }
}
