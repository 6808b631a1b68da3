use super::*;

use flo_curves::geo::*;

///
/// The tension used for cardinal splines when none is specified
///
pub const DEFAULT_CURVE_TENSION: f64 = 0.5;

///
/// Generates the bezier section between p1 and p2 of a cardinal spline passing through p0, p1, p2 and p3
///
#[inline]
fn cardinal_section(p0: Coord2, p1: Coord2, p2: Coord2, p3: Coord2, scale: f64) -> CubicSection {
    let cp1 = p1 + (p2 - p0) * scale;
    let cp2 = p2 - (p3 - p1) * scale;

    (p1, (cp1, cp2), p2)
}

///
/// Converts a cardinal spline through a set of points into bezier curves
///
/// The curve passes through every point. Higher tension values produce rounder curves, and a tension of 0
/// produces straight lines. The first and last points are used as their own neighbours, so a curve through
/// two points is a straight section.
///
pub fn cardinal_spline_to_curves(points: &[Coord2], tension: f64) -> Vec<CubicSection> {
    let scale   = tension / 3.0;
    let count   = points.len();

    if count < 2 {
        return vec![];
    }

    (0..(count-1))
        .map(|idx| {
            let p0 = points[idx.saturating_sub(1)];
            let p1 = points[idx];
            let p2 = points[idx+1];
            let p3 = points[(idx+2).min(count-1)];

            cardinal_section(p0, p1, p2, p3, scale)
        })
        .collect()
}

///
/// Converts a closed cardinal spline into bezier curves
///
/// Neighbouring points wrap around, and there is a final section joining the last point back to the first.
///
pub fn closed_cardinal_spline_to_curves(points: &[Coord2], tension: f64) -> Vec<CubicSection> {
    let scale   = tension / 3.0;
    let count   = points.len();

    if count < 2 {
        return vec![];
    }

    (0..count)
        .map(|idx| {
            let p0 = points[(idx + count - 1) % count];
            let p1 = points[idx];
            let p2 = points[(idx+1) % count];
            let p3 = points[(idx+2) % count];

            cardinal_section(p0, p1, p2, p3, scale)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn curve_passes_through_points() {
        let points = vec![Coord2(0.0, 0.0), Coord2(10.0, 20.0), Coord2(30.0, 5.0), Coord2(40.0, 40.0)];
        let curves = cardinal_spline_to_curves(&points, 0.7);

        assert!(curves.len() == 3);
        for (idx, (start, _, end)) in curves.iter().enumerate() {
            assert!(*start == points[idx]);
            assert!(*end == points[idx+1]);
        }
    }

    #[test]
    fn two_points_is_straight() {
        let curves = cardinal_spline_to_curves(&[Coord2(0.0, 0.0), Coord2(30.0, 0.0)], 0.5);

        assert!(curves.len() == 1);
        let (_, (cp1, cp2), _) = curves[0];
        assert!((cp1.x() - 5.0).abs() < 1e-9 && cp1.y() == 0.0, "{:?}", cp1);
        assert!((cp2.x() - 25.0).abs() < 1e-9 && cp2.y() == 0.0, "{:?}", cp2);
    }

    #[test]
    fn zero_tension_puts_control_points_on_ends() {
        let curves = cardinal_spline_to_curves(&[Coord2(0.0, 0.0), Coord2(10.0, 10.0), Coord2(20.0, 0.0)], 0.0);

        for (start, (cp1, cp2), end) in curves {
            assert!(cp1 == start && cp2 == end);
        }
    }

    #[test]
    fn closed_curve_returns_to_start() {
        let points = vec![Coord2(0.0, 0.0), Coord2(10.0, 0.0), Coord2(5.0, 10.0)];
        let curves = closed_cardinal_spline_to_curves(&points, 0.5);

        assert!(curves.len() == 3);
        assert!(curves[2].2 == points[0]);

        // Neighbours wrap around, so the first control point uses the last point
        let expected_cp1 = points[0] + (points[1] - points[2]) * (0.5/3.0);
        assert!((curves[0].1).0 == expected_cp1);
    }
}
