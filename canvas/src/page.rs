use crate::error::*;
use crate::geometry::*;
use crate::transform::*;

///
/// The unit used for coordinates on a page
///
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PageUnit {
    /// 1/72 of an inch
    Point,

    Inch,
    Millimeter,
    Centimeter,

    /// 1/96 of an inch
    DeviceIndependentPixel,
}

///
/// The direction that the y axis points on the page
///
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PageDirection {
    /// The origin is at the top of the page and y increases towards the bottom
    Downwards,

    /// The origin is at the bottom of the page and y increases towards the top (not implemented)
    Upwards,
}

///
/// Where the origin of the device that the page is being drawn on is found
///
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum DeviceOrigin {
    /// Device coordinates start at the top-left and y increases downwards (typical for screens)
    TopLeft,

    /// Device coordinates start at the bottom-left and y increases upwards (typical for page description languages)
    BottomLeft,
}

///
/// Settings describing the page that a `RenderDispatcher` draws on
///
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct PageSettings {
    /// Width of the page, in page units
    pub width:      f64,

    /// Height of the page, in page units
    pub height:     f64,

    /// The units used for drawing on this page
    pub unit:       PageUnit,

    /// The direction of the y axis
    pub direction:  PageDirection,

    /// The origin of the device coordinate system
    pub origin:     DeviceOrigin,
}

impl PageUnit {
    ///
    /// The number of points (1/72 of an inch) in one of this unit
    ///
    pub fn points_per_unit(&self) -> f64 {
        match self {
            PageUnit::Point                     => 1.0,
            PageUnit::Inch                      => 72.0,
            PageUnit::Millimeter                => 72.0 / 25.4,
            PageUnit::Centimeter                => 72.0 / 2.54,
            PageUnit::DeviceIndependentPixel    => 72.0 / 96.0,
        }
    }

    ///
    /// Converts a value in this unit into another unit
    ///
    pub fn convert(&self, value: f64, to_unit: PageUnit) -> f64 {
        value * self.points_per_unit() / to_unit.points_per_unit()
    }
}

impl PageSettings {
    ///
    /// A page of the specified size, measured in points, with the y axis pointing down the page
    ///
    pub fn new(width: f64, height: f64) -> PageSettings {
        PageSettings {
            width:      width,
            height:     height,
            unit:       PageUnit::Point,
            direction:  PageDirection::Downwards,
            origin:     DeviceOrigin::TopLeft,
        }
    }

    /// An A4 page, measured in points
    pub fn a4() -> PageSettings {
        PageSettings::new(595.0, 842.0)
    }

    pub fn with_unit(mut self, unit: PageUnit) -> PageSettings {
        self.unit = unit;
        self
    }

    pub fn with_direction(mut self, direction: PageDirection) -> PageSettings {
        self.direction = direction;
        self
    }

    pub fn with_origin(mut self, origin: DeviceOrigin) -> PageSettings {
        self.origin = origin;
        self
    }

    ///
    /// The size of the page in page units
    ///
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    ///
    /// The size of the page in points
    ///
    pub fn size_in_points(&self) -> Size {
        let scale = self.unit.points_per_unit();
        Size::new(self.width * scale, self.height * scale)
    }

    ///
    /// Checks that these settings describe a page that can be drawn on
    ///
    pub fn validate(&self) -> CanvasResult<()> {
        if !self.width.is_finite() || !self.height.is_finite() || self.width <= 0.0 || self.height <= 0.0 {
            return Err(CanvasError::ArgumentError(format!("page size must be positive (found {}x{})", self.width, self.height)));
        }

        match self.direction {
            PageDirection::Downwards    => Ok(()),
            PageDirection::Upwards      => Err(CanvasError::NotSupported("upwards page direction is not implemented".to_string())),
        }
    }

    ///
    /// Computes the matrix that maps page-unit coordinates onto the device (in points)
    ///
    pub fn default_view_matrix(&self) -> CanvasResult<AffineTransform> {
        self.validate()?;

        let scale   = self.unit.points_per_unit();
        let view    = match self.origin {
            DeviceOrigin::TopLeft       => AffineTransform::scaling(scale, scale),
            DeviceOrigin::BottomLeft    => {
                let mut view = AffineTransform::scaling(scale, -scale);
                view.translate(0.0, self.size_in_points().height, MatrixOrder::Append);
                view
            }
        };

        Ok(view)
    }
}

impl Default for PageSettings {
    fn default() -> PageSettings {
        PageSettings::a4()
    }
}
