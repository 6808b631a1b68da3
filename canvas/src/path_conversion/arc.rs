use super::*;
use crate::geometry::*;

use flo_curves::geo::*;
use smallvec::*;

use std::f64::consts::{PI, FRAC_PI_2};

///
/// Wraps an angle into the range -PI..PI
///
#[inline]
fn wrap_angle(radians: f64) -> f64 {
    radians - (2.0*PI) * (radians / (2.0*PI)).round()
}

///
/// Converts an angle measured from the center of an ellipse into the parameter of the point at that angle
///
/// For a circle these are the same. The result stays on the same turn as the input angle, so angles beyond
/// 360 degrees are preserved.
///
fn ellipse_parameter(radius_x: f64, radius_y: f64, radians: f64) -> f64 {
    if radius_x == radius_y || radius_x == 0.0 || radius_y == 0.0 {
        radians
    } else {
        let (sin, cos)  = snapped_sin_cos(radians);
        let parameter   = (radius_x * sin).atan2(radius_y * cos);

        radians + wrap_angle(parameter - radians)
    }
}

///
/// Generates the bezier curve approximating the section of an ellipse between two parameters
///
/// The section should be no larger than a quarter of the ellipse.
///
fn ellipse_section(center: Coord2, radius_x: f64, radius_y: f64, t1: f64, t2: f64) -> CubicSection {
    let kappa           = 4.0/3.0 * ((t2-t1)/4.0).tan();
    let (sin1, cos1)    = snapped_sin_cos(t1);
    let (sin2, cos2)    = snapped_sin_cos(t2);

    let start           = Coord2(center.x() + radius_x*cos1, center.y() + radius_y*sin1);
    let end             = Coord2(center.x() + radius_x*cos2, center.y() + radius_y*sin2);
    let cp1             = Coord2(start.x() - kappa*radius_x*sin1, start.y() + kappa*radius_y*cos1);
    let cp2             = Coord2(end.x() + kappa*radius_x*sin2, end.y() - kappa*radius_y*cos2);

    (start, (cp1, cp2), end)
}

///
/// Converts an arc of the ellipse that fits in a rectangle into a series of bezier curves
///
/// Angles are in degrees, measured clockwise from the x axis (with the y axis pointing down the page). The arc
/// is split wherever it crosses a quadrant boundary so every section is at most 90 degrees. A sweep of 360
/// degrees or more generates a complete ellipse made of four quarter sections.
///
pub fn arc_to_curves(bounds: Rect, start_degrees: f64, sweep_degrees: f64) -> SmallVec<[CubicSection; 5]> {
    let radius_x        = bounds.width / 2.0;
    let radius_y        = bounds.height / 2.0;
    let center          = bounds.center();

    let start           = ellipse_parameter(radius_x, radius_y, start_degrees.to_radians());
    let direction       = if sweep_degrees < 0.0 { -1.0 } else { 1.0 };
    let mut curves      = smallvec![];

    if sweep_degrees.abs() >= 360.0 {
        // Full ellipse: four quarters
        for quarter in 0..4 {
            let t1 = start + direction * FRAC_PI_2 * (quarter as f64);
            let t2 = start + direction * FRAC_PI_2 * ((quarter+1) as f64);

            curves.push(ellipse_section(center, radius_x, radius_y, t1, t2));
        }

        return curves;
    }

    let end             = ellipse_parameter(radius_x, radius_y, (start_degrees + sweep_degrees).to_radians());
    let mut pos         = start;

    loop {
        let remaining = (end - pos) * direction;
        if remaining <= 1e-12 { break; }

        // The next quadrant boundary in the direction of the sweep
        let boundary = if direction > 0.0 {
            ((pos / FRAC_PI_2) + 1e-9).floor() + 1.0
        } else {
            ((pos / FRAC_PI_2) - 1e-9).ceil() - 1.0
        } * FRAC_PI_2;

        let next = if (boundary - pos) * direction < remaining - 1e-9 { boundary } else { end };

        curves.push(ellipse_section(center, radius_x, radius_y, pos, next));
        pos = next;
    }

    curves
}

///
/// The point on the edge of an ellipse at a particular angle (in degrees)
///
pub fn ellipse_point(bounds: Rect, degrees: f64) -> Coord2 {
    let radius_x    = bounds.width / 2.0;
    let radius_y    = bounds.height / 2.0;
    let center      = bounds.center();
    let parameter   = ellipse_parameter(radius_x, radius_y, degrees.to_radians());
    let (sin, cos)  = snapped_sin_cos(parameter);

    Coord2(center.x() + radius_x*cos, center.y() + radius_y*sin)
}
