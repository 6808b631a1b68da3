mod arc;
mod cardinal;
mod flatten;
mod dashes;
mod stroke;
mod winding;

pub use self::arc::*;
pub use self::cardinal::*;
pub use self::flatten::*;
pub use self::dashes::*;
pub use self::stroke::*;
pub use self::winding::*;

use flo_curves::geo::*;

///
/// A cubic bezier section: start point, control points and end point
///
pub type CubicSection = (Coord2, (Coord2, Coord2), Coord2);

///
/// A flattened section of a path: the points along it and whether or not it is closed
///
#[derive(Clone, PartialEq, Debug)]
pub struct Polyline {
    pub points: Vec<Coord2>,
    pub closed: bool,
}
