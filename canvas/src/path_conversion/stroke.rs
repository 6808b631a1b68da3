use super::*;
use crate::draw::*;

use flo_curves::geo::*;
use smallvec::*;

use std::f64::consts::{PI};

///
/// Describes the stroke that should be converted into an outline
///
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct StrokeOptions {
    pub width:          f64,
    pub line_cap:       LineCap,
    pub line_join:      LineJoin,
    pub miter_limit:    f64,

    /// Maximum distance between a curved part of the outline and the true curve
    pub tolerance:      f64,
}

impl StrokeOptions {
    ///
    /// Stroke options that will produce the outline of a line drawn with a pen
    ///
    pub fn from_pen(pen: &Pen, tolerance: f64) -> StrokeOptions {
        StrokeOptions {
            width:          pen.width,
            line_cap:       pen.line_cap,
            line_join:      pen.line_join,
            miter_limit:    pen.miter_limit,
            tolerance:      tolerance,
        }
    }
}

///
/// Returns the unit vector and length of the line between two points
///
#[inline]
fn direction(from: Coord2, to: Coord2) -> (Coord2, f64) {
    let offset = to - from;
    let length = offset.magnitude();

    if length > 0.0 {
        (offset * (1.0/length), length)
    } else {
        (Coord2(0.0, 0.0), 0.0)
    }
}

///
/// Signed area of a polygon (used to give every generated polygon the same orientation)
///
fn signed_area(points: &[Coord2]) -> f64 {
    let count = points.len();

    (0..count)
        .map(|idx| {
            let p1 = points[idx];
            let p2 = points[(idx+1) % count];

            p1.x()*p2.y() - p2.x()*p1.y()
        })
        .sum::<f64>() / 2.0
}

///
/// A regular polygon approximating a circle, accurate to within the tolerance
///
fn circle_polygon(center: Coord2, radius: f64, tolerance: f64) -> Vec<Coord2> {
    let tolerance   = tolerance.max(1e-6).min(radius);
    let angle_step  = 2.0 * (1.0 - tolerance/radius).acos();
    let count       = if angle_step > 0.0 { (2.0*PI / angle_step).ceil() as usize } else { 8 };
    let count       = count.max(8).min(256);

    (0..count)
        .map(|idx| {
            let angle       = (idx as f64) * 2.0 * PI / (count as f64);
            let (sin, cos)  = angle.sin_cos();

            Coord2(center.x() + radius*cos, center.y() + radius*sin)
        })
        .collect()
}

///
/// Generates the polygon that fills in the join between two lines at a vertex
///
fn join_polygon(vertex: Coord2, incoming: Coord2, outgoing: Coord2, half_width: f64, options: &StrokeOptions) -> Option<Vec<Coord2>> {
    let cross   = incoming.x()*outgoing.y() - incoming.y()*outgoing.x();
    let dot     = incoming.dot(&outgoing);

    // Lines that continue in the same direction need no join
    if cross.abs() < 1e-12 && dot > 0.0 {
        return None;
    }

    // The outer side of the join is the side opposite the direction of the turn
    let side        = if cross > 0.0 { -1.0 } else { 1.0 };
    let outer_in    = Coord2(-incoming.y(), incoming.x()) * (side * half_width);
    let outer_out   = Coord2(-outgoing.y(), outgoing.x()) * (side * half_width);
    let bevel       = vec![vertex, vertex + outer_in, vertex + outer_out];

    match options.line_join {
        LineJoin::Bevel     => Some(bevel),
        LineJoin::Round     => Some(circle_polygon(vertex, half_width, options.tolerance)),

        LineJoin::Miter     => {
            let bisector    = outer_in + outer_out;
            let bisect_len  = bisector.magnitude();

            if bisect_len < 1e-12 {
                return Some(bevel);
            }

            // Ratio of the miter length to the line width is 1/cos(half the angle between the offsets)
            let cos_half    = bisector.dot(&outer_in) / (bisect_len * half_width);
            if cos_half <= 0.0 || 1.0/cos_half > options.miter_limit {
                Some(bevel)
            } else {
                let miter_point = vertex + bisector * (half_width / (cos_half * bisect_len));
                Some(vec![vertex, vertex + outer_in, miter_point, vertex + outer_out])
            }
        }
    }
}

///
/// Generates the polygon for the cap at the end of a line (`outward` points away from the line)
///
fn cap_polygon(point: Coord2, outward: Coord2, half_width: f64, options: &StrokeOptions) -> Option<Vec<Coord2>> {
    match options.line_cap {
        LineCap::Butt       => None,
        LineCap::Round      => Some(circle_polygon(point, half_width, options.tolerance)),

        LineCap::Square     => {
            let normal      = Coord2(-outward.y(), outward.x()) * half_width;
            let extend      = outward * half_width;

            Some(vec![point + normal, point + normal + extend, point - normal + extend, point - normal])
        }
    }
}

///
/// Converts a polyline into a set of polygons that together cover the area a stroke along it would paint
///
/// Every polygon has the same orientation, so the union is the area that the non-zero fill rule reports as
/// being inside.
///
pub fn stroke_polyline(line: &Polyline, options: &StrokeOptions) -> Vec<Vec<Coord2>> {
    let half_width  = if options.width > 0.0 { options.width / 2.0 } else { 0.5 };
    let mut result  = vec![];

    // Remove repeated points as they have no direction
    let mut points: SmallVec<[Coord2; 16]> = smallvec![];
    for point in line.points.iter() {
        if points.last().map(|last: &Coord2| last.distance_to(point) > 1e-12).unwrap_or(true) {
            points.push(*point);
        }
    }

    if line.closed && points.len() > 2 && points[0].distance_to(&points[points.len()-1]) <= 1e-12 {
        points.pop();
    }

    if points.is_empty() {
        return result;
    }

    if points.len() == 1 {
        // A single point only has caps (this is how dots are drawn)
        let cap = match options.line_cap {
            LineCap::Butt       => None,
            LineCap::Round      => Some(circle_polygon(points[0], half_width, options.tolerance)),
            LineCap::Square     => {
                let p = points[0];
                Some(vec![
                    Coord2(p.x()-half_width, p.y()-half_width), Coord2(p.x()+half_width, p.y()-half_width),
                    Coord2(p.x()+half_width, p.y()+half_width), Coord2(p.x()-half_width, p.y()+half_width),
                ])
            }
        };

        result.extend(cap);
    } else {
        let closed      = line.closed && points.len() > 2;
        let edge_count  = if closed { points.len() } else { points.len()-1 };
        let edges       = (0..edge_count)
            .map(|idx| (points[idx], points[(idx+1) % points.len()]))
            .collect::<Vec<_>>();

        // Each edge is a rectangle
        for (from, to) in edges.iter() {
            let (dir, _)    = direction(*from, *to);
            let normal      = Coord2(-dir.y(), dir.x()) * half_width;

            result.push(vec![*from + normal, *to + normal, *to - normal, *from - normal]);
        }

        // Joins between edges
        let join_count = if closed { edges.len() } else { edges.len()-1 };
        for idx in 0..join_count {
            let (from, vertex)  = edges[idx];
            let (_, next)       = edges[(idx+1) % edges.len()];
            let (incoming, _)   = direction(from, vertex);
            let (outgoing, _)   = direction(vertex, next);

            result.extend(join_polygon(vertex, incoming, outgoing, half_width, options));
        }

        // Caps at the ends of open lines
        if !closed {
            let (first_dir, _)  = direction(edges[0].0, edges[0].1);
            let (last_dir, _)   = direction(edges[edges.len()-1].0, edges[edges.len()-1].1);

            result.extend(cap_polygon(points[0], first_dir * -1.0, half_width, options));
            result.extend(cap_polygon(points[points.len()-1], last_dir, half_width, options));
        }
    }

    // Give everything the same orientation
    for polygon in result.iter_mut() {
        if signed_area(polygon) < 0.0 {
            polygon.reverse();
        }
    }

    result
}

///
/// Generates the outlines of the area covered by drawing a set of polylines with a pen
///
/// Dash patterns in the pen are multiples of the pen width (a zero-width pen draws a one-unit hairline).
/// The result is a set of closed polygons that should be filled using the non-zero rule.
///
pub fn widen_polylines(polylines: &[Polyline], pen: &Pen, tolerance: f64) -> Vec<Polyline> {
    let options     = StrokeOptions::from_pen(pen, tolerance);
    let dash_scale  = if pen.width > 0.0 { pen.width } else { 1.0 };
    let pattern     = pen.dash_pattern.iter().map(|length| length * dash_scale).collect::<Vec<_>>();
    let offset      = pen.dash_offset * dash_scale;

    polylines.iter()
        .flat_map(|line| {
            if pen.is_dashed() {
                polyline_to_dashes(line, &pattern, offset)
            } else {
                vec![line.clone()]
            }
        })
        .flat_map(|line| stroke_polyline(&line, &options))
        .map(|points| Polyline { points: points, closed: true })
        .collect()
}
