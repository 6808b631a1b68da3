use crate::error::*;
use crate::geometry::*;

use flo_curves::geo::*;

///
/// The possible styles of a font
///
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub enum FontStyle {
    Normal,
    Italic,
    Oblique
}

///
/// The properties to use when selecting a font face
///
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct FontProperties {
    pub style: FontStyle,
    pub weight: u32
}

///
/// A font: a family name, a size in page units and the properties used to select the face
///
/// Loading and shaping the font is the job of whatever is rendering the text: this only identifies it.
///
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Font {
    pub family:     String,
    pub size:       f64,
    pub properties: FontProperties,
}

///
/// How text is aligned along a line
///
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum StringAlignment {
    /// Text starts at the left edge of the layout rectangle
    Near,

    /// Text is centered in the layout rectangle
    Center,

    /// Text ends at the right edge of the layout rectangle
    Far
}

///
/// How text is positioned vertically in its layout rectangle
///
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LineAlignment {
    Near,
    Center,
    Far,

    /// The top of the layout rectangle is the baseline of the text (the rectangle must have zero height)
    BaseLine
}

///
/// Describes how a string is laid out relative to its layout rectangle
///
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct StringFormat {
    pub alignment:      StringAlignment,
    pub line_alignment: LineAlignment,
}

///
/// The vertical metrics of a font face, in font design units
///
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct FontLineMetrics {
    /// Distance from the baseline to the top of the cell
    pub cell_ascent:    f64,

    /// Distance from the baseline to the bottom of the cell
    pub cell_descent:   f64,

    /// Distance between the baselines of two lines of text
    pub cell_space:     f64,

    pub units_per_em:   f64,
}

///
/// Supplies the sizes of text drawn in a particular font
///
/// Sizes are in the same units as the size of the font.
///
pub trait FontMetrics {
    ///
    /// Measures the size of the area covered by some text
    ///
    fn measure(&self, text: &str, font: &Font, format: &StringFormat) -> Size;

    ///
    /// Retrieves the line metrics for a font
    ///
    fn line_metrics(&self, font: &Font) -> FontLineMetrics;
}

///
/// Font metrics where every character has the same advance (useful when no real font information is available)
///
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct MonospaceMetrics {
    /// Width of every character, as a fraction of the em size
    pub advance:        f64,

    pub line_metrics:   FontLineMetrics,
}

impl Default for FontStyle {
    fn default() -> FontStyle { FontStyle::Normal }
}

impl Default for FontProperties {
    fn default() -> FontProperties { FontProperties { style: FontStyle::default(), weight: 400 } }
}

impl FontProperties {
    ///
    /// Returns an updated font properties object with a new weight
    ///
    pub fn with_weight(mut self, new_weight: u32) -> FontProperties {
        self.weight = new_weight;
        self
    }

    ///
    /// Returns an updated font properties object with a new style
    ///
    pub fn with_style(mut self, new_style: FontStyle) -> FontProperties {
        self.style = new_style;
        self
    }
}

impl Font {
    ///
    /// Creates a font with the default properties
    ///
    pub fn new<Family: Into<String>>(family: Family, size: f64) -> Font {
        Font {
            family:     family.into(),
            size:       size,
            properties: FontProperties::default(),
        }
    }

    pub fn with_properties(mut self, properties: FontProperties) -> Font {
        self.properties = properties;
        self
    }

    ///
    /// Fails if the size of this font can't be used to draw anything
    ///
    pub fn validate(&self) -> CanvasResult<()> {
        if !self.size.is_finite() || self.size <= 0.0 {
            Err(CanvasError::ArgumentError(format!("font size must be positive (found {})", self.size)))
        } else {
            Ok(())
        }
    }
}

impl Default for StringFormat {
    fn default() -> StringFormat {
        StringFormat {
            alignment:      StringAlignment::Near,
            line_alignment: LineAlignment::Near,
        }
    }
}

impl StringFormat {
    pub fn new(alignment: StringAlignment, line_alignment: LineAlignment) -> StringFormat {
        StringFormat { alignment, line_alignment }
    }
}

impl FontLineMetrics {
    ///
    /// The distance between lines of text for a font, in the same units as the font size
    ///
    pub fn line_space(&self, font: &Font) -> f64 {
        font.size * self.cell_space / self.units_per_em
    }

    ///
    /// The distance from the top of a line to its baseline, in the same units as the font size
    ///
    pub fn ascent(&self, font: &Font) -> f64 {
        self.line_space(font) * self.cell_ascent / self.cell_space
    }
}

impl Default for MonospaceMetrics {
    fn default() -> MonospaceMetrics {
        MonospaceMetrics {
            advance:        0.6,
            line_metrics:   FontLineMetrics { cell_ascent: 800.0, cell_descent: 200.0, cell_space: 1150.0, units_per_em: 1000.0 },
        }
    }
}

impl FontMetrics for MonospaceMetrics {
    fn measure(&self, text: &str, font: &Font, _format: &StringFormat) -> Size {
        let line_space  = self.line_metrics.line_space(font);
        let lines       = text.lines().collect::<Vec<_>>();
        let longest     = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);

        Size::new((longest as f64) * self.advance * font.size, (lines.len().max(1) as f64) * line_space)
    }

    fn line_metrics(&self, _font: &Font) -> FontLineMetrics {
        self.line_metrics
    }
}

///
/// Works out where the baseline of the first line of some text starts, given its layout rectangle
///
/// `text_size` is the measured size of the text. The ascent of the font is `line_space * cell_ascent / cell_space`.
///
pub fn text_origin(layout: Rect, text_size: Size, font: &Font, format: &StringFormat, metrics: &FontLineMetrics) -> CanvasResult<Point> {
    if metrics.cell_space <= 0.0 || metrics.units_per_em <= 0.0 {
        return Err(CanvasError::ArgumentError("font line metrics must have a positive line spacing and em size".into()));
    }

    let ascent  = metrics.ascent(font);

    let x       = match format.alignment {
        StringAlignment::Near       => layout.left(),
        StringAlignment::Center     => layout.left() + (layout.width - text_size.width) / 2.0,
        StringAlignment::Far        => layout.right() - text_size.width,
    };

    let y       = match format.line_alignment {
        LineAlignment::Near         => layout.top() + ascent,
        LineAlignment::Center       => layout.top() + (layout.height - text_size.height) / 2.0 + ascent,
        LineAlignment::Far          => layout.bottom() - text_size.height + ascent,

        LineAlignment::BaseLine     => {
            if layout.height != 0.0 {
                return Err(CanvasError::InvalidState("baseline alignment can only be used with a layout rectangle of zero height".into()));
            }

            layout.top()
        }
    };

    Ok(Coord2(x, y))
}

#[cfg(test)]
mod test {
    use super::*;

    fn metrics() -> FontLineMetrics {
        FontLineMetrics { cell_ascent: 800.0, cell_descent: 200.0, cell_space: 1000.0, units_per_em: 1000.0 }
    }

    #[test]
    fn near_alignment_puts_baseline_at_ascent() {
        let font    = Font::new("Helvetica", 10.0);
        let origin  = text_origin(Rect::new(0.0, 0.0, 100.0, 50.0), Size::new(30.0, 10.0), &font, &StringFormat::default(), &metrics()).unwrap();

        assert!((origin.x() - 0.0).abs() < 1e-9 && (origin.y() - 8.0).abs() < 1e-9, "{:?}", origin);
    }

    #[test]
    fn center_and_far_alignment() {
        let font    = Font::new("Helvetica", 10.0);
        let layout  = Rect::new(0.0, 0.0, 100.0, 50.0);
        let size    = Size::new(30.0, 10.0);

        let center  = text_origin(layout, size, &font, &StringFormat::new(StringAlignment::Center, LineAlignment::Center), &metrics()).unwrap();
        let far     = text_origin(layout, size, &font, &StringFormat::new(StringAlignment::Far, LineAlignment::Far), &metrics()).unwrap();

        assert!((center.x() - 35.0).abs() < 1e-9 && (center.y() - 28.0).abs() < 1e-9, "{:?}", center);
        assert!((far.x() - 70.0).abs() < 1e-9 && (far.y() - 48.0).abs() < 1e-9, "{:?}", far);
    }

    #[test]
    fn baseline_needs_zero_height() {
        let font    = Font::new("Helvetica", 10.0);
        let format  = StringFormat::new(StringAlignment::Near, LineAlignment::BaseLine);

        let anchor  = text_origin(Rect::new(5.0, 20.0, 0.0, 0.0), Size::new(30.0, 10.0), &font, &format, &metrics());
        let rect    = text_origin(Rect::new(5.0, 20.0, 100.0, 10.0), Size::new(30.0, 10.0), &font, &format, &metrics());

        assert!(anchor == Ok(Coord2(5.0, 20.0)), "{:?}", anchor);
        assert!(matches!(rect, Err(CanvasError::InvalidState(_))), "{:?}", rect);
    }

    #[test]
    fn monospace_measures_longest_line() {
        let metrics = MonospaceMetrics::default();
        let size    = metrics.measure("abc\nabcdef", &Font::new("Courier", 10.0), &StringFormat::default());

        assert!((size.width - 36.0).abs() < 1e-9, "{:?}", size);
        assert!((size.height - 23.0).abs() < 1e-9, "{:?}", size);
    }

    #[test]
    fn font_size_must_be_positive() {
        assert!(Font::new("Helvetica", 0.0).validate().is_err());
        assert!(Font::new("Helvetica", 12.0).validate().is_ok());
    }
}
