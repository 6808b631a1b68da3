use crate::draw::*;
use crate::font::*;
use crate::geometry::*;
use crate::graphics_state::*;
use crate::page::*;
use crate::path::*;
use crate::sink::*;
use crate::texture::*;
use crate::transform::*;

use flo_curves::geo::*;

///
/// A point in a recording
///
pub type RecordedPoint = (f64, f64);

///
/// An instruction sent to a recorder sink, in a form that can be stored or serialized
///
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum RecordedDraw {
    /// A new page with its default view matrix
    BeginPage(PageSettings, AffineTransform),

    Save(StateToken),
    Restore(StateToken),
    BeginContainer(ContainerToken, Rect, Rect, PageUnit),
    EndContainer(ContainerToken),
    AddTransform(AffineTransform, MatrixOrder),

    Line(Pen, RecordedPoint, RecordedPoint),
    Lines(Pen, Vec<RecordedPoint>),
    Bezier(Pen, RecordedPoint, RecordedPoint, RecordedPoint, RecordedPoint),
    Beziers(Pen, Vec<RecordedPoint>),
    Rectangle(Option<Pen>, Option<Brush>, Rect),
    Rectangles(Option<Pen>, Option<Brush>, Vec<Rect>),
    Ellipse(Option<Pen>, Option<Brush>, Rect),
    Polygon(Option<Pen>, Option<Brush>, Vec<RecordedPoint>, FillMode),
    Pie(Option<Pen>, Option<Brush>, Rect, f64, f64),
    Path(Option<Pen>, Option<Brush>, FillMode, Vec<PathOp>),
    Image(ImageSource, Rect),
    String(String, Font, Brush, RecordedPoint),

    Clip(FillMode, Vec<PathOp>, CombineMode),
    Comment(String),
    Close,
}

#[inline]
fn point(point: Point) -> RecordedPoint {
    (point.x(), point.y())
}

#[inline]
fn points(points: &[Point]) -> Vec<RecordedPoint> {
    points.iter().map(|p| point(*p)).collect()
}

impl RecordedDraw {
    ///
    /// True if this instruction paints something on the page
    ///
    pub fn is_drawing(&self) -> bool {
        use self::RecordedDraw::*;

        match self {
            Line(..) | Lines(..) | Bezier(..) | Beziers(..) | Rectangle(..) | Rectangles(..) | Ellipse(..) |
            Polygon(..) | Pie(..) | Path(..) | Image(..) | String(..)  => true,

            BeginPage(..) | Save(_) | Restore(_) | BeginContainer(..) | EndContainer(_) |
            AddTransform(..) | Clip(..) | Comment(_) | Close            => false,
        }
    }
}

///
/// A vector of recorded instructions can be used as a recorder
///
impl RecorderSink for Vec<RecordedDraw> {
    #[inline] fn begin_page(&mut self, settings: &PageSettings, default_view: &AffineTransform) { self.push(RecordedDraw::BeginPage(*settings, *default_view)); }

    #[inline] fn save(&mut self, token: StateToken)                             { self.push(RecordedDraw::Save(token)); }
    #[inline] fn restore(&mut self, token: StateToken)                          { self.push(RecordedDraw::Restore(token)); }
    #[inline] fn begin_container(&mut self, token: ContainerToken, source: Rect, dest: Rect, unit: PageUnit) { self.push(RecordedDraw::BeginContainer(token, source, dest, unit)); }
    #[inline] fn end_container(&mut self, token: ContainerToken)                { self.push(RecordedDraw::EndContainer(token)); }
    #[inline] fn add_transform(&mut self, transform: &AffineTransform, order: MatrixOrder) { self.push(RecordedDraw::AddTransform(*transform, order)); }

    #[inline] fn draw_line(&mut self, pen: &Pen, from: Point, to: Point)        { self.push(RecordedDraw::Line(pen.clone(), point(from), point(to))); }
    #[inline] fn draw_lines(&mut self, pen: &Pen, line_points: &[Point])        { self.push(RecordedDraw::Lines(pen.clone(), points(line_points))); }
    #[inline] fn draw_bezier(&mut self, pen: &Pen, start: Point, cp1: Point, cp2: Point, end: Point) { self.push(RecordedDraw::Bezier(pen.clone(), point(start), point(cp1), point(cp2), point(end))); }
    #[inline] fn draw_beziers(&mut self, pen: &Pen, curve_points: &[Point])     { self.push(RecordedDraw::Beziers(pen.clone(), points(curve_points))); }
    #[inline] fn draw_rectangle(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, rect: Rect) { self.push(RecordedDraw::Rectangle(pen.cloned(), brush.cloned(), rect)); }
    #[inline] fn draw_rectangles(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, rects: &[Rect]) { self.push(RecordedDraw::Rectangles(pen.cloned(), brush.cloned(), rects.to_vec())); }
    #[inline] fn draw_ellipse(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, bounds: Rect) { self.push(RecordedDraw::Ellipse(pen.cloned(), brush.cloned(), bounds)); }
    #[inline] fn draw_polygon(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, polygon: &[Point], fill_mode: FillMode) { self.push(RecordedDraw::Polygon(pen.cloned(), brush.cloned(), points(polygon), fill_mode)); }
    #[inline] fn draw_pie(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, bounds: Rect, start_degrees: f64, sweep_degrees: f64) { self.push(RecordedDraw::Pie(pen.cloned(), brush.cloned(), bounds, start_degrees, sweep_degrees)); }
    #[inline] fn draw_path(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, path: &Path) { self.push(RecordedDraw::Path(pen.cloned(), brush.cloned(), path.fill_mode(), path.to_path_ops())); }
    #[inline] fn draw_image(&mut self, image: &ImageSource, dest: Rect)         { self.push(RecordedDraw::Image(*image, dest)); }
    #[inline] fn draw_string(&mut self, text: &str, font: &Font, brush: &Brush, origin: Point) { self.push(RecordedDraw::String(text.to_string(), font.clone(), brush.clone(), point(origin))); }

    #[inline] fn set_clip(&mut self, path: &Path, combine: CombineMode)         { self.push(RecordedDraw::Clip(path.fill_mode(), path.to_path_ops(), combine)); }
    #[inline] fn write_comment(&mut self, text: &str)                           { self.push(RecordedDraw::Comment(text.to_string())); }
    #[inline] fn close(&mut self)                                               { self.push(RecordedDraw::Close); }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color::*;

    #[test]
    fn records_in_order() {
        let mut recording: Vec<RecordedDraw> = vec![];
        let pen = Pen::new(Color::BLACK, 2.0);

        recording.save(StateToken(1));
        recording.draw_line(&pen, Coord2(0.0, 0.0), Coord2(10.0, 10.0));
        recording.restore(StateToken(1));

        assert!(recording == vec![
            RecordedDraw::Save(StateToken(1)),
            RecordedDraw::Line(pen.clone(), (0.0, 0.0), (10.0, 10.0)),
            RecordedDraw::Restore(StateToken(1)),
        ], "{:?}", recording);
        assert!(recording[1].is_drawing() && !recording[0].is_drawing());
    }

    #[test]
    fn recording_serializes() {
        let mut recording: Vec<RecordedDraw> = vec![];
        let mut path = Path::new();
        path.add_ellipse(Rect::new(0.0, 0.0, 10.0, 20.0)).unwrap();

        recording.begin_page(&PageSettings::a4(), &AffineTransform::identity());
        recording.add_transform(&AffineTransform::rotation(30.0), MatrixOrder::Prepend);
        recording.draw_path(None, Some(&Brush::solid(Color::WHITE)), &path);
        recording.write_comment("done");

        let json    = serde_json::to_string(&recording).unwrap();
        let decoded = serde_json::from_str::<Vec<RecordedDraw>>(&json).unwrap();

        assert!(decoded == recording, "{}", json);
    }
}
