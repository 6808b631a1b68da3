use flo_curves::geo::*;
use flo_curves::bezier::*;

///
/// The largest distance that a flattened curve should be from the real curve when no tolerance is specified
///
pub const DEFAULT_FLATNESS: f64 = 0.25;

/// Upper limit on the number of lines used to approximate a single curve
const MAX_SUBDIVISIONS: usize = 1024;

///
/// Works out how many lines are needed so that a curve is approximated to within a certain tolerance
///
/// This uses the largest second difference of the control polygon as a bound for how far the curve can
/// deviate from a line.
///
pub fn curve_subdivisions(start: Coord2, cp1: Coord2, cp2: Coord2, end: Coord2, tolerance: f64) -> usize {
    let dd1         = start - cp1*2.0 + cp2;
    let dd2         = cp1 - cp2*2.0 + end;
    let max_dd      = dd1.magnitude().max(dd2.magnitude());

    if max_dd <= 0.0 || !max_dd.is_finite() {
        1
    } else {
        let tolerance   = if tolerance > 0.0 { tolerance } else { DEFAULT_FLATNESS };
        let count       = (0.75 * max_dd / tolerance).sqrt().ceil() as usize;

        count.max(1).min(MAX_SUBDIVISIONS)
    }
}

///
/// Adds the points that approximate a bezier curve to a list (the start point is not added, the end point always is)
///
pub fn flatten_curve(start: Coord2, (cp1, cp2): (Coord2, Coord2), end: Coord2, tolerance: f64, points: &mut Vec<Coord2>) {
    let subdivisions    = curve_subdivisions(start, cp1, cp2, end, tolerance);
    let curve           = Curve::from_points(start, (cp1, cp2), end);

    for step in 1..subdivisions {
        let t = (step as f64) / (subdivisions as f64);
        points.push(curve.point_at_pos(t));
    }

    points.push(end);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn straight_curve_is_single_line() {
        let mut points = vec![];
        flatten_curve(Coord2(0.0, 0.0), (Coord2(10.0, 0.0), Coord2(20.0, 0.0)), Coord2(30.0, 0.0), 0.25, &mut points);

        assert!(points == vec![Coord2(30.0, 0.0)], "{:?}", points);
    }

    #[test]
    fn tighter_tolerance_means_more_points() {
        let mut coarse  = vec![];
        let mut fine    = vec![];
        let curve       = (Coord2(0.0, 0.0), (Coord2(0.0, 100.0), Coord2(100.0, 100.0)), Coord2(100.0, 0.0));

        flatten_curve(curve.0, curve.1, curve.2, 1.0, &mut coarse);
        flatten_curve(curve.0, curve.1, curve.2, 0.01, &mut fine);

        assert!(fine.len() > coarse.len(), "{} {}", fine.len(), coarse.len());
        assert!(*fine.last().unwrap() == Coord2(100.0, 0.0));
    }

    #[test]
    fn flattened_points_are_near_curve() {
        // Quarter circle approximation: every point should be close to radius 100
        let kappa       = 0.5522847498 * 100.0;
        let mut points  = vec![];
        flatten_curve(Coord2(100.0, 0.0), (Coord2(100.0, kappa), Coord2(kappa, 100.0)), Coord2(0.0, 100.0), 0.1, &mut points);

        for point in points {
            let radius = point.magnitude();
            assert!((radius - 100.0).abs() < 0.1, "{:?} {}", point, radius);
        }
    }
}
