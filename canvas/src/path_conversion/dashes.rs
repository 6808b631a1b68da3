use super::*;

use flo_curves::geo::*;

///
/// Splits a polyline into dashes using a dash pattern
///
/// The pattern alternates between the lengths of dashes and the lengths of gaps, and repeats until the line is
/// finished. Closed lines are treated as a line that finishes back at the start. The offset moves the start of
/// the line into the pattern.
///
pub fn polyline_to_dashes(line: &Polyline, dash_pattern: &[f64], pattern_offset: f64) -> Vec<Polyline> {
    let total_length: f64 = dash_pattern.iter().sum();

    if dash_pattern.is_empty() || total_length <= 0.0 || line.points.is_empty() {
        return vec![Polyline { points: line.points.clone(), closed: line.closed }];
    }

    // Work out where in the pattern we start
    let mut pattern_idx         = 0;
    let mut draw_dash           = true;
    let mut remaining_length    = dash_pattern[0];
    let mut remaining_offset    = pattern_offset.rem_euclid(total_length * (if dash_pattern.len() % 2 == 1 { 2.0 } else { 1.0 }));

    while remaining_offset > 0.0 {
        if remaining_length > remaining_offset {
            remaining_length -= remaining_offset;
            break;
        }

        remaining_offset    -= remaining_length;
        pattern_idx         = (pattern_idx + 1) % dash_pattern.len();
        remaining_length    = dash_pattern[pattern_idx];
        draw_dash           = !draw_dash;
    }

    // Iterate over the edges, including the closing edge if there is one
    let mut points      = line.points.clone();
    if line.closed {
        points.push(line.points[0]);
    }

    let mut dashes      = vec![];
    let mut current     = if draw_dash { vec![points[0]] } else { vec![] };

    for (from, to) in points.iter().zip(points.iter().skip(1)) {
        let edge_length = from.distance_to(to);
        let mut pos     = 0.0;

        while edge_length - pos > remaining_length {
            // The current dash or gap finishes part-way along this edge
            pos                 += remaining_length;
            let split_point     = *from + (*to - *from) * (pos / edge_length);

            if draw_dash {
                current.push(split_point);
                dashes.push(Polyline { points: current, closed: false });
                current = vec![];
            } else {
                current = vec![split_point];
            }

            draw_dash           = !draw_dash;
            pattern_idx         = (pattern_idx + 1) % dash_pattern.len();
            remaining_length    = dash_pattern[pattern_idx];
        }

        // Rest of the edge is in the current dash or gap
        remaining_length -= edge_length - pos;
        if draw_dash {
            current.push(*to);
        }
    }

    if draw_dash && current.len() > 1 {
        dashes.push(Polyline { points: current, closed: false });
    }

    dashes
}
