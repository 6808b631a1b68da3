//!
//! Descriptions of how geometry should be painted
//!

use crate::color::*;
use crate::error::*;

///
/// Possible way to join lines
///
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel
}

///
/// How to cap lines
///
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub enum LineCap {
    Butt,
    Round,
    Square
}

///
/// How a path should determine if a point is inside it or not
///
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum FillMode {
    /// A point is inside if the edges around it wind a non-zero number of times
    NonZero,

    /// A point is inside if a ray from it crosses an odd number of edges
    EvenOdd
}

///
/// How a new clipping path is combined with the existing one
///
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum CombineMode {
    /// The new path replaces the clipping region set since the last save
    Replace,

    /// The clipping region becomes the intersection of the current region and the new path
    Intersect
}

///
/// Describes how the outline of a shape is drawn
///
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Pen {
    pub color:          Color,

    /// Width of the line in user units (0 is the thinnest line the device can draw)
    pub width:          f64,

    pub line_cap:       LineCap,
    pub line_join:      LineJoin,
    pub miter_limit:    f64,

    /// Alternating dash and gap lengths, as multiples of the line width (empty for a solid line)
    pub dash_pattern:   Vec<f64>,

    /// Distance into the dash pattern where the line starts, as a multiple of the line width
    pub dash_offset:    f64,
}

///
/// Describes how the interior of a shape is filled
///
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum Brush {
    /// Fill with a single colour
    Solid(Color)
}

impl Pen {
    ///
    /// Creates a solid pen of the specified colour and width
    ///
    pub fn new(color: Color, width: f64) -> Pen {
        Pen {
            color:          color,
            width:          width,
            line_cap:       LineCap::Butt,
            line_join:      LineJoin::Miter,
            miter_limit:    10.0,
            dash_pattern:   vec![],
            dash_offset:    0.0,
        }
    }

    pub fn with_line_cap(mut self, cap: LineCap) -> Pen {
        self.line_cap = cap;
        self
    }

    pub fn with_line_join(mut self, join: LineJoin) -> Pen {
        self.line_join = join;
        self
    }

    pub fn with_miter_limit(mut self, limit: f64) -> Pen {
        self.miter_limit = limit;
        self
    }

    pub fn with_dash_pattern(mut self, pattern: Vec<f64>, offset: f64) -> Pen {
        self.dash_pattern   = pattern;
        self.dash_offset    = offset;
        self
    }

    ///
    /// True if this pen draws a dashed line
    ///
    pub fn is_dashed(&self) -> bool {
        self.dash_pattern.iter().any(|len| *len > 0.0)
    }

    ///
    /// Checks that this pen can be used to draw something
    ///
    pub fn validate(&self) -> CanvasResult<()> {
        check_finite("pen width", &[self.width, self.miter_limit, self.dash_offset])?;
        check_finite("dash pattern", &self.dash_pattern)?;

        if self.width < 0.0 {
            Err(CanvasError::ArgumentError(format!("pen width cannot be negative (found {})", self.width)))
        } else if self.dash_pattern.iter().any(|len| *len < 0.0) {
            Err(CanvasError::ArgumentError(format!("dash lengths cannot be negative (found {:?})", self.dash_pattern)))
        } else {
            Ok(())
        }
    }
}

impl Default for Pen {
    fn default() -> Pen {
        Pen::new(Color::BLACK, 1.0)
    }
}

impl Brush {
    ///
    /// A brush that fills with a solid colour
    ///
    pub fn solid(color: Color) -> Brush {
        Brush::Solid(color)
    }

    ///
    /// The colour used by this brush
    ///
    pub fn color(&self) -> Color {
        match self {
            Brush::Solid(color) => *color
        }
    }
}

///
/// Checks that at least one of a pen or a brush is present for a combined stroke and fill operation
///
pub (crate) fn check_paint(pen: Option<&Pen>, brush: Option<&Brush>) -> CanvasResult<()> {
    if pen.is_none() && brush.is_none() {
        return Err(CanvasError::MissingPaintSpec);
    }

    if let Some(pen) = pen {
        pen.validate()?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn negative_width_is_invalid() {
        assert!(matches!(Pen::new(Color::BLACK, -1.0).validate(), Err(CanvasError::ArgumentError(_))));
    }

    #[test]
    fn need_pen_or_brush() {
        assert!(check_paint(None, None) == Err(CanvasError::MissingPaintSpec));
        assert!(check_paint(Some(&Pen::default()), None).is_ok());
        assert!(check_paint(None, Some(&Brush::solid(Color::WHITE))).is_ok());
    }

    #[test]
    fn zero_dashes_are_solid() {
        assert!(!Pen::default().with_dash_pattern(vec![0.0, 0.0], 0.0).is_dashed());
        assert!(Pen::default().with_dash_pattern(vec![3.0, 1.0], 0.0).is_dashed());
    }
}
