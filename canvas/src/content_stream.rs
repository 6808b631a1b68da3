use crate::color::*;
use crate::draw::*;
use crate::font::*;
use crate::geometry::*;
use crate::graphics_state::*;
use crate::page::*;
use crate::path::*;
use crate::path_conversion::*;
use crate::sink::*;
use crate::texture::*;
use crate::transform::*;

use flo_curves::geo::*;
use itertools::*;
use tracing::{trace, warn};

///
/// The drawing state that the content stream has set up (None for values that have not been written yet)
///
#[derive(Clone, PartialEq, Debug, Default)]
struct PaintState {
    stroke_color:   Option<Color>,
    fill_color:     Option<Color>,
    line_width:     Option<f64>,
    line_cap:       Option<LineCap>,
    line_join:      Option<LineJoin>,
    miter_limit:    Option<f64>,
    dash:           Option<(Vec<f64>, f64)>,
}

///
/// State that is saved by the `q` operator and restored by `Q`
///
#[derive(Clone, Debug)]
struct SavedState {
    paint:          PaintState,
    user_transform: AffineTransform,
    clipped:        bool,
}

///
/// A recorder that writes PDF-style page content operators
///
/// Only the changes to the pen and brush are written, and the state that is tracked follows the `q`/`Q`
/// operators the same way the graphics state in a PDF viewer does. Alpha values are ignored, as these need
/// resources outside of the content stream.
///
pub struct ContentStreamRecorder {
    content:        String,
    paint:          PaintState,

    /// The user transform, which is needed to convert appended transforms to `cm` operations
    user_transform: AffineTransform,

    /// True if a clip path has been set since the last `q`
    clipped:        bool,
    stack:          Vec<SavedState>,

    /// Text is flipped back the right way up when the page's y axis points downwards
    flip_text:      bool,
    closed:         bool,
}

///
/// Formats a number in the way PDF content expects (no exponent and no trailing zeros)
///
fn number(value: f64) -> String {
    let rounded = (value * 10000.0).round() / 10000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text    = format!("{:.4}", rounded);
    let text    = text.trim_end_matches('0').trim_end_matches('.');

    text.to_string()
}

///
/// Escapes text to be written as a PDF string
///
fn escape_string(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '('     => "\\(".to_string(),
            ')'     => "\\)".to_string(),
            '\\'    => "\\\\".to_string(),
            '\n'    => "\\n".to_string(),
            '\r'    => "\\r".to_string(),
            other   => other.to_string(),
        })
        .collect()
}

///
/// Name used for a font resource
///
fn font_resource_name(font: &Font) -> String {
    font.family.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

impl ContentStreamRecorder {
    ///
    /// Creates a new, empty content stream
    ///
    pub fn new() -> ContentStreamRecorder {
        ContentStreamRecorder {
            content:        String::new(),
            paint:          PaintState::default(),
            user_transform: AffineTransform::identity(),
            clipped:        false,
            stack:          vec![],
            flip_text:      false,
            closed:         false,
        }
    }

    ///
    /// The content that has been written so far
    ///
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    ///
    /// Writes a line of operators
    ///
    fn write_line(&mut self, line: &str) {
        if self.closed {
            trace!(line, "Ignoring content written after the stream was closed");
            return;
        }

        self.content.push_str(line);
        self.content.push('\n');
    }

    fn write_points(&mut self, coords: &[Point], operator: &str) {
        let mut line = coords.iter().map(|p| format!("{} {}", number(p.x()), number(p.y()))).join(" ");
        line.push(' ');
        line.push_str(operator);

        self.write_line(&line);
    }

    fn write_matrix(&mut self, transform: &AffineTransform) {
        let elements    = transform.elements();
        let line        = format!("{} cm", elements.iter().map(|val| number(*val)).join(" "));

        self.write_line(&line);
    }

    fn push_state(&mut self) {
        self.stack.push(SavedState { paint: self.paint.clone(), user_transform: self.user_transform, clipped: self.clipped });
        self.clipped = false;
        self.write_line("q");
    }

    fn pop_state(&mut self) {
        match self.stack.pop() {
            Some(state) => {
                self.paint          = state.paint;
                self.user_transform = state.user_transform;
                self.clipped        = state.clipped;
                self.write_line("Q");
            }

            None => {
                warn!("Restore with no matching save in a content stream");
            }
        }
    }

    fn color_operator(color: &Color, rgb_op: &str, gray_op: &str) -> String {
        match color {
            Color::Gray(gray, _)        => format!("{} {}", number(*gray as f64), gray_op),
            Color::Rgba(r, g, b, _)     => format!("{} {} {} {}", number(*r as f64), number(*g as f64), number(*b as f64), rgb_op),
        }
    }

    ///
    /// Writes the operators needed to change the stroke state to match a pen
    ///
    fn use_pen(&mut self, pen: &Pen) {
        if self.paint.stroke_color != Some(pen.color) {
            let line = Self::color_operator(&pen.color, "RG", "G");
            self.write_line(&line);
            self.paint.stroke_color = Some(pen.color);
        }

        if self.paint.line_width != Some(pen.width) {
            self.write_line(&format!("{} w", number(pen.width)));
            self.paint.line_width = Some(pen.width);
        }

        if self.paint.line_cap != Some(pen.line_cap) {
            let cap = match pen.line_cap { LineCap::Butt => 0, LineCap::Round => 1, LineCap::Square => 2 };
            self.write_line(&format!("{} J", cap));
            self.paint.line_cap = Some(pen.line_cap);
        }

        if self.paint.line_join != Some(pen.line_join) {
            let join = match pen.line_join { LineJoin::Miter => 0, LineJoin::Round => 1, LineJoin::Bevel => 2 };
            self.write_line(&format!("{} j", join));
            self.paint.line_join = Some(pen.line_join);
        }

        if pen.line_join == LineJoin::Miter && self.paint.miter_limit != Some(pen.miter_limit) {
            self.write_line(&format!("{} M", number(pen.miter_limit.max(1.0))));
            self.paint.miter_limit = Some(pen.miter_limit);
        }

        // Dash patterns are in multiples of the line width in pens, but absolute in the content stream
        let scale   = if pen.width > 0.0 { pen.width } else { 1.0 };
        let dash    = (pen.dash_pattern.iter().map(|len| len * scale).collect::<Vec<_>>(), pen.dash_offset * scale);
        if self.paint.dash.as_ref() != Some(&dash) {
            let line = format!("[{}] {} d", dash.0.iter().map(|len| number(*len)).join(" "), number(dash.1));
            self.write_line(&line);
            self.paint.dash = Some(dash);
        }
    }

    fn use_brush(&mut self, brush: &Brush) {
        let color = brush.color();

        if self.paint.fill_color != Some(color) {
            let line = Self::color_operator(&color, "rg", "g");
            self.write_line(&line);
            self.paint.fill_color = Some(color);
        }
    }

    ///
    /// Sets up the pen and brush (this must happen before the path is written)
    ///
    fn use_paint(&mut self, pen: Option<&Pen>, brush: Option<&Brush>) {
        if let Some(brush) = brush  { self.use_brush(brush); }
        if let Some(pen) = pen      { self.use_pen(pen); }
    }

    ///
    /// Writes the operator that paints the current path
    ///
    fn paint(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, fill_mode: FillMode) {
        let even_odd = fill_mode == FillMode::EvenOdd;
        let operator = match (pen.is_some(), brush.is_some(), even_odd) {
            (true, true, false)     => "B",
            (true, true, true)      => "B*",
            (false, true, false)    => "f",
            (false, true, true)     => "f*",
            (true, false, _)        => "S",
            (false, false, _)       => "n",
        };

        self.write_line(operator);
    }

    fn write_sections(&mut self, sections: &[CubicSection]) {
        if let Some((start, _, _)) = sections.first() {
            self.write_points(&[*start], "m");
        }

        for (_, (cp1, cp2), end) in sections.iter() {
            self.write_points(&[*cp1, *cp2, *end], "c");
        }
    }

    fn write_path(&mut self, path: &Path) {
        for subpath in path.subpaths() {
            self.write_points(&[subpath.start()], "m");

            for segment in subpath.segments() {
                match segment {
                    PathSegment::Line(end)                      => self.write_points(&[*end], "l"),
                    PathSegment::BezierCurve((cp1, cp2), end)   => self.write_points(&[*cp1, *cp2, *end], "c"),
                }
            }

            if subpath.is_closed() {
                self.write_line("h");
            }
        }
    }
}

impl Default for ContentStreamRecorder {
    fn default() -> ContentStreamRecorder {
        ContentStreamRecorder::new()
    }
}

impl RecorderSink for ContentStreamRecorder {
    fn begin_page(&mut self, _settings: &PageSettings, default_view: &AffineTransform) {
        self.flip_text = default_view.determinant() < 0.0;

        if !default_view.is_identity() {
            self.write_matrix(default_view);
        }
    }

    fn save(&mut self, _token: StateToken) {
        self.push_state();
    }

    fn restore(&mut self, _token: StateToken) {
        self.pop_state();
    }

    fn begin_container(&mut self, _token: ContainerToken, source: Rect, dest: Rect, _unit: PageUnit) {
        self.push_state();

        match container_transform(dest, source) {
            Ok(mapping) => {
                // Containers prepend their mapping, which is what cm does
                self.write_matrix(&mapping);
                self.user_transform.prepend(&mapping);
            }

            Err(err) => {
                warn!(?err, "Could not map container");
            }
        }
    }

    fn end_container(&mut self, _token: ContainerToken) {
        self.pop_state();
    }

    fn add_transform(&mut self, transform: &AffineTransform, order: MatrixOrder) {
        match order {
            MatrixOrder::Prepend => {
                self.write_matrix(transform);
            }

            MatrixOrder::Append => {
                // cm can only prepend: appending M to U is the same as prepending U.M.inverse(U)
                match self.user_transform.inverted() {
                    Ok(inverse) => {
                        let delta = AffineTransform::multiply(&AffineTransform::multiply(&self.user_transform, transform, MatrixOrder::Append), &inverse, MatrixOrder::Append);
                        self.write_matrix(&delta);
                    }

                    Err(_) => {
                        // Everything drawn under a singular transform is degenerate, and stays that way until the state is restored
                        trace!("Not writing an appended transform to a singular user transform");
                    }
                }
            }
        }

        self.user_transform.multiply_by(transform, order);
    }

    fn draw_line(&mut self, pen: &Pen, from: Point, to: Point) {
        self.use_pen(pen);
        self.write_points(&[from], "m");
        self.write_points(&[to], "l");
        self.paint(Some(pen), None, FillMode::NonZero);
    }

    fn draw_lines(&mut self, pen: &Pen, points: &[Point]) {
        if let Some(first) = points.first() {
            self.use_pen(pen);
            self.write_points(&[*first], "m");
            for point in points.iter().skip(1) {
                self.write_points(&[*point], "l");
            }

            self.paint(Some(pen), None, FillMode::NonZero);
        }
    }

    fn draw_bezier(&mut self, pen: &Pen, start: Point, cp1: Point, cp2: Point, end: Point) {
        self.use_pen(pen);
        self.write_sections(&[(start, (cp1, cp2), end)]);
        self.paint(Some(pen), None, FillMode::NonZero);
    }

    fn draw_beziers(&mut self, pen: &Pen, points: &[Point]) {
        if let Some(first) = points.first() {
            self.use_pen(pen);
            self.write_points(&[*first], "m");
            for curve in points[1..].chunks(3) {
                self.write_points(curve, "c");
            }

            self.paint(Some(pen), None, FillMode::NonZero);
        }
    }

    fn draw_rectangle(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, rect: Rect) {
        self.draw_rectangles(pen, brush, &[rect]);
    }

    fn draw_rectangles(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, rects: &[Rect]) {
        if rects.is_empty() { return; }

        self.use_paint(pen, brush);

        for rect in rects.iter() {
            let line = format!("{} {} {} {} re", number(rect.x), number(rect.y), number(rect.width), number(rect.height));
            self.write_line(&line);
        }

        self.paint(pen, brush, FillMode::NonZero);
    }

    fn draw_ellipse(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, bounds: Rect) {
        self.use_paint(pen, brush);
        self.write_sections(&arc_to_curves(bounds, 0.0, 360.0));
        self.write_line("h");
        self.paint(pen, brush, FillMode::NonZero);
    }

    fn draw_polygon(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, points: &[Point], fill_mode: FillMode) {
        if let Some(first) = points.first() {
            self.use_paint(pen, brush);
            self.write_points(&[*first], "m");
            for point in points.iter().skip(1) {
                self.write_points(&[*point], "l");
            }
            self.write_line("h");

            self.paint(pen, brush, fill_mode);
        }
    }

    fn draw_pie(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, bounds: Rect, start_degrees: f64, sweep_degrees: f64) {
        let mut pie = Path::with_fill_mode(FillMode::NonZero);

        match pie.add_pie(bounds, start_degrees, sweep_degrees) {
            Ok(())      => self.draw_path(pen, brush, &pie),
            Err(err)    => warn!(?err, "Could not generate pie"),
        }
    }

    fn draw_path(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, path: &Path) {
        if path.is_empty() { return; }

        self.use_paint(pen, brush);
        self.write_path(path);
        self.paint(pen, brush, path.fill_mode());
    }

    fn draw_image(&mut self, image: &ImageSource, dest: Rect) {
        // Images fill the unit square, with the first row at the top
        let placement = AffineTransform::new(dest.width, 0.0, 0.0, -dest.height, dest.x, dest.y + dest.height);

        self.write_line("q");
        self.write_matrix(&placement);
        self.write_line(&format!("/Im{} Do", image.id.0));
        self.write_line("Q");
    }

    fn draw_string(&mut self, text: &str, font: &Font, brush: &Brush, origin: Point) {
        self.use_brush(brush);

        let flip    = if self.flip_text { "-1" } else { "1" };
        let line    = format!("BT /{} {} Tf 1 0 0 {} {} {} Tm ({}) Tj ET", font_resource_name(font), number(font.size), flip, number(origin.x()), number(origin.y()), escape_string(text));

        self.write_line(&line);
    }

    fn set_clip(&mut self, path: &Path, combine: CombineMode) {
        if combine == CombineMode::Replace && self.clipped {
            // Content streams can only make the clip region smaller
            warn!("A clip region replaced without a restore will be intersected with the previous region in a content stream");
        }

        self.write_path(path);
        self.write_line(match path.fill_mode() {
            FillMode::NonZero   => "W n",
            FillMode::EvenOdd   => "W* n",
        });
        self.clipped = true;
    }

    fn write_comment(&mut self, text: &str) {
        for line in text.lines() {
            let comment = format!("% {}", line);
            self.write_line(&comment);
        }
    }

    fn close(&mut self) {
        while !self.stack.is_empty() {
            self.pop_state();
        }

        self.closed = true;
    }
}
