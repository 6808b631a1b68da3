use crate::error::*;
use crate::geometry::*;
use crate::page::*;

///
/// Identifier for an image
///
/// Decoding the image is the responsibility of whatever receives the drawing instructions: the canvas only
/// tracks its identity and its size.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub u64);

///
/// Describes an image that can be drawn on the page
///
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct ImageSource {
    pub id:             ImageId,
    pub pixel_width:    u32,
    pub pixel_height:   u32,
    pub horizontal_dpi: f64,
    pub vertical_dpi:   f64,
}

impl ImageSource {
    ///
    /// Creates an image description at the default resolution of 96 dpi
    ///
    pub fn new(id: ImageId, pixel_width: u32, pixel_height: u32) -> ImageSource {
        ImageSource {
            id:             id,
            pixel_width:    pixel_width,
            pixel_height:   pixel_height,
            horizontal_dpi: 96.0,
            vertical_dpi:   96.0,
        }
    }

    pub fn with_resolution(mut self, horizontal_dpi: f64, vertical_dpi: f64) -> ImageSource {
        self.horizontal_dpi = horizontal_dpi;
        self.vertical_dpi   = vertical_dpi;
        self
    }

    ///
    /// Fails if the resolution of this image is not usable
    ///
    pub fn validate(&self) -> CanvasResult<()> {
        check_finite("image resolution", &[self.horizontal_dpi, self.vertical_dpi])?;

        if self.horizontal_dpi <= 0.0 || self.vertical_dpi <= 0.0 {
            Err(CanvasError::ArgumentError(format!("image resolution must be positive (found {}x{})", self.horizontal_dpi, self.vertical_dpi)))
        } else {
            Ok(())
        }
    }

    ///
    /// The size of this image when drawn at its natural resolution, in points
    ///
    pub fn natural_size_in_points(&self) -> Size {
        Size::new((self.pixel_width as f64) * 72.0 / self.horizontal_dpi, (self.pixel_height as f64) * 72.0 / self.vertical_dpi)
    }

    ///
    /// The size of this image when drawn at its natural resolution, in a particular page unit
    ///
    pub fn natural_size(&self, unit: PageUnit) -> Size {
        let points = self.natural_size_in_points();

        Size::new(PageUnit::Point.convert(points.width, unit), PageUnit::Point.convert(points.height, unit))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn natural_size_uses_resolution() {
        let image   = ImageSource::new(ImageId(1), 96, 192);
        let size    = image.natural_size_in_points();

        assert!((size.width - 72.0).abs() < 1e-9 && (size.height - 144.0).abs() < 1e-9, "{:?}", size);

        let inches  = image.with_resolution(300.0, 300.0).natural_size(PageUnit::Inch);
        assert!((inches.width - 0.32).abs() < 1e-9 && (inches.height - 0.64).abs() < 1e-9, "{:?}", inches);
    }

    #[test]
    fn zero_resolution_is_invalid() {
        let image = ImageSource::new(ImageId(1), 10, 10).with_resolution(0.0, 96.0);

        assert!(image.validate().is_err());
    }
}
