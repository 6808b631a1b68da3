use super::*;
use crate::draw::*;

use flo_curves::geo::*;

///
/// Tests which side of the line from `p1` to `p2` a point is on (positive for left, negative for right)
///
#[inline]
fn is_left(p1: Coord2, p2: Coord2, point: Coord2) -> f64 {
    (p2.x() - p1.x()) * (point.y() - p1.y()) - (point.x() - p1.x()) * (p2.y() - p1.y())
}

///
/// Iterates over the edges of a polyline, treating it as closed
///
fn closed_edges<'a>(line: &'a Polyline) -> impl 'a + Iterator<Item=(Coord2, Coord2)> {
    let count = line.points.len();

    (0..count).map(move |idx| (line.points[idx], line.points[(idx+1) % count]))
}

///
/// Computes the winding number of a set of polylines around a point
///
/// Every polyline is treated as closed. Edges that go upwards past the point add one and edges that go
/// downwards subtract one.
///
pub fn winding_number(polylines: &[Polyline], point: Coord2) -> i32 {
    let mut winding = 0;

    for line in polylines.iter() {
        for (p1, p2) in closed_edges(line) {
            if p1.y() <= point.y() {
                if p2.y() > point.y() && is_left(p1, p2, point) > 0.0 {
                    winding += 1;
                }
            } else if p2.y() <= point.y() && is_left(p1, p2, point) < 0.0 {
                winding -= 1;
            }
        }
    }

    winding
}

///
/// Counts how many edges a ray from the point towards positive x crosses
///
pub fn crossing_count(polylines: &[Polyline], point: Coord2) -> usize {
    let mut count = 0;

    for line in polylines.iter() {
        for (p1, p2) in closed_edges(line) {
            if (p1.y() > point.y()) != (p2.y() > point.y()) {
                let crossing_x = p1.x() + (point.y() - p1.y()) * (p2.x() - p1.x()) / (p2.y() - p1.y());

                if point.x() < crossing_x {
                    count += 1;
                }
            }
        }
    }

    count
}

///
/// True if a point is inside the area described by a set of polylines, using a particular fill rule
///
pub fn polylines_contain_point(polylines: &[Polyline], point: Coord2, fill_mode: FillMode) -> bool {
    match fill_mode {
        FillMode::NonZero   => winding_number(polylines, point) != 0,
        FillMode::EvenOdd   => crossing_count(polylines, point) % 2 == 1,
    }
}
