use crate::draw::*;
use crate::error::*;
use crate::geometry::*;
use crate::transform::*;
use crate::path_conversion::*;

use flo_curves::geo::*;

///
/// A segment of a subpath, continuing from the end of the previous segment (or the start of the subpath)
///
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PathSegment {
    /// Straight line to a point
    Line(Point),

    /// Cubic bezier curve with two control points to an end point
    BezierCurve((Point, Point), Point),
}

///
/// A connected sequence of segments that share a start point (a 'figure')
///
#[derive(Clone, PartialEq, Debug)]
pub struct Subpath {
    start:      Point,
    segments:   Vec<PathSegment>,
    closed:     bool,
}

///
/// Operations that define paths, in a form that can be serialized
///
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub enum PathOp {
    /// Move to a new point (starting a new subpath)
    Move(f64, f64),

    /// Line to point
    Line(f64, f64),

    /// Bezier curve to point
    BezierCurve(((f64, f64), (f64, f64)), (f64, f64)),

    /// Closes the current subpath
    ClosePath,
}

///
/// A path made up of lines and bezier curves, along with the fill rule that determines its interior
///
/// Shape primitives are converted to lines and curves as they are added: arcs and ellipses become bezier
/// sections, and cardinal splines become one bezier section between each pair of points.
///
#[derive(Clone, PartialEq, Debug)]
pub struct Path {
    subpaths:           Vec<Subpath>,
    fill_mode:          FillMode,

    /// Set when the next primitive should begin a new subpath
    start_new_figure:   bool,
}

impl PathSegment {
    ///
    /// The point at the end of this segment
    ///
    #[inline]
    pub fn end_point(&self) -> Point {
        match self {
            PathSegment::Line(end)              => *end,
            PathSegment::BezierCurve(_, end)    => *end,
        }
    }

    fn transform(&self, transform: &AffineTransform) -> PathSegment {
        match self {
            PathSegment::Line(end)                  => PathSegment::Line(transform.transform_point(*end)),
            PathSegment::BezierCurve((cp1, cp2), end) => PathSegment::BezierCurve((transform.transform_point(*cp1), transform.transform_point(*cp2)), transform.transform_point(*end)),
        }
    }
}

impl Subpath {
    #[inline] pub fn start(&self) -> Point                  { self.start }
    #[inline] pub fn segments(&self) -> &[PathSegment]      { &self.segments }
    #[inline] pub fn is_closed(&self) -> bool               { self.closed }

    ///
    /// The point where this subpath currently finishes
    ///
    pub fn end_point(&self) -> Point {
        self.segments.last()
            .map(|segment| segment.end_point())
            .unwrap_or(self.start)
    }

    ///
    /// Converts this subpath to a list of points, replacing curves with lines
    ///
    pub fn to_polyline(&self, tolerance: f64) -> Polyline {
        let mut points  = vec![self.start];
        let mut last    = self.start;

        for segment in self.segments.iter() {
            match segment {
                PathSegment::Line(end)                      => points.push(*end),
                PathSegment::BezierCurve((cp1, cp2), end)   => flatten_curve(last, (*cp1, *cp2), *end, tolerance, &mut points),
            }

            last = segment.end_point();
        }

        Polyline { points: points, closed: self.closed }
    }

    ///
    /// Creates a copy of this subpath that runs in the opposite direction
    ///
    fn reversed(&self) -> Subpath {
        let mut segments    = vec![];
        let mut prev_points = vec![self.start];
        prev_points.extend(self.segments.iter().map(|segment| segment.end_point()));

        for (idx, segment) in self.segments.iter().enumerate().rev() {
            let previous = prev_points[idx];

            segments.push(match segment {
                PathSegment::Line(_)                    => PathSegment::Line(previous),
                PathSegment::BezierCurve((cp1, cp2), _) => PathSegment::BezierCurve((*cp2, *cp1), previous),
            });
        }

        Subpath {
            start:      self.end_point(),
            segments:   segments,
            closed:     self.closed,
        }
    }
}

impl Path {
    ///
    /// Creates a new, empty path, using the even-odd fill rule
    ///
    pub fn new() -> Path {
        Path::with_fill_mode(FillMode::EvenOdd)
    }

    ///
    /// Creates a new, empty path with a particular fill rule
    ///
    pub fn with_fill_mode(fill_mode: FillMode) -> Path {
        Path {
            subpaths:           vec![],
            fill_mode:          fill_mode,
            start_new_figure:   true,
        }
    }

    #[inline] pub fn fill_mode(&self) -> FillMode                   { self.fill_mode }
    #[inline] pub fn set_fill_mode(&mut self, fill_mode: FillMode)  { self.fill_mode = fill_mode; }
    #[inline] pub fn subpaths(&self) -> &[Subpath]                  { &self.subpaths }

    ///
    /// True if this path has no points in it
    ///
    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    ///
    /// The number of points (including control points) used to describe this path
    ///
    pub fn point_count(&self) -> usize {
        self.subpaths.iter()
            .map(|subpath| {
                1 + subpath.segments.iter().map(|segment| match segment {
                    PathSegment::Line(_)            => 1,
                    PathSegment::BezierCurve(_, _)  => 3,
                }).sum::<usize>()
            })
            .sum()
    }

    ///
    /// The point where the current figure ends, or None if the next primitive will start a new figure
    ///
    pub fn current_point(&self) -> Option<Point> {
        if self.start_new_figure {
            return None;
        }

        self.subpaths.last()
            .filter(|subpath| !subpath.closed)
            .map(|subpath| subpath.end_point())
    }

    ///
    /// The next primitive will start a new figure without closing the current one
    ///
    pub fn start_figure(&mut self) {
        self.start_new_figure = true;
    }

    ///
    /// Closes the current figure, connecting its end point back to its start, and starts a new one
    ///
    /// Does nothing if the current figure has no segments.
    ///
    pub fn close_figure(&mut self) {
        if self.start_new_figure { return; }

        if let Some(subpath) = self.subpaths.last_mut() {
            if !subpath.closed && !subpath.segments.is_empty() {
                subpath.closed          = true;
                self.start_new_figure   = true;
            }
        }
    }

    ///
    /// Closes every open figure in this path
    ///
    pub fn close_all_figures(&mut self) {
        for subpath in self.subpaths.iter_mut() {
            if !subpath.segments.is_empty() {
                subpath.closed = true;
            }
        }

        self.start_new_figure = true;
    }

    ///
    /// Starts a new figure at the specified point
    ///
    pub fn move_to(&mut self, point: Point) -> CanvasResult<()> {
        check_points("move_to point", &[point])?;

        // An empty open figure has its start point replaced rather than being left behind
        match self.subpaths.last_mut() {
            Some(subpath) if !subpath.closed && subpath.segments.is_empty() => {
                subpath.start = point;
            }

            _ => {
                self.subpaths.push(Subpath { start: point, segments: vec![], closed: false });
            }
        }

        self.start_new_figure = false;
        Ok(())
    }

    ///
    /// Makes sure the current figure ends at the specified point, adding a connecting line if it doesn't
    ///
    fn ensure_start(&mut self, point: Point) -> CanvasResult<()> {
        match self.current_point() {
            None                                            => self.move_to(point),
            Some(current) if points_close(current, point)   => Ok(()),
            Some(_)                                         => self.push_segment(PathSegment::Line(point)),
        }
    }

    ///
    /// Adds a segment to the current figure (which must exist)
    ///
    fn push_segment(&mut self, segment: PathSegment) -> CanvasResult<()> {
        if self.current_point().is_none() {
            return Err(CanvasError::InvalidState("the path has no current point".into()));
        }

        match self.subpaths.last_mut() {
            Some(subpath)   => { subpath.segments.push(segment); Ok(()) }
            None            => Err(CanvasError::InvalidState("the path has no current point".into())),
        }
    }

    ///
    /// Adds a set of bezier sections to the current figure, connecting it to the first of them
    ///
    fn push_sections(&mut self, sections: &[CubicSection]) -> CanvasResult<()> {
        if let Some((start, _, _)) = sections.first() {
            self.ensure_start(*start)?;
        }

        for (_, (cp1, cp2), end) in sections.iter() {
            self.push_segment(PathSegment::BezierCurve((*cp1, *cp2), *end))?;
        }

        Ok(())
    }

    ///
    /// Adds a line from the current point to the specified point (or moves to the point if there's no current point)
    ///
    pub fn line_to(&mut self, point: Point) -> CanvasResult<()> {
        check_points("line_to point", &[point])?;

        if self.current_point().is_none() {
            self.move_to(point)
        } else {
            self.push_segment(PathSegment::Line(point))
        }
    }

    ///
    /// Adds a bezier curve from the current point
    ///
    pub fn bezier_curve_to(&mut self, cp1: Point, cp2: Point, end: Point) -> CanvasResult<()> {
        check_points("bezier points", &[cp1, cp2, end])?;
        self.push_segment(PathSegment::BezierCurve((cp1, cp2), end))
    }

    ///
    /// Adds a line between two points, connecting it to the current figure
    ///
    pub fn add_line(&mut self, from: Point, to: Point) -> CanvasResult<()> {
        check_points("line points", &[from, to])?;

        self.ensure_start(from)?;
        self.push_segment(PathSegment::Line(to))
    }

    ///
    /// Adds a series of connected lines
    ///
    pub fn add_lines(&mut self, points: &[Point]) -> CanvasResult<()> {
        if points.is_empty() {
            return Err(CanvasError::GeometryError("at least one point is needed to add lines".into()));
        }
        check_points("line points", points)?;

        self.ensure_start(points[0])?;
        for point in points.iter().skip(1) {
            self.push_segment(PathSegment::Line(*point))?;
        }

        Ok(())
    }

    ///
    /// Adds a bezier curve from `start` to `end`, connecting it to the current figure
    ///
    pub fn add_bezier(&mut self, start: Point, cp1: Point, cp2: Point, end: Point) -> CanvasResult<()> {
        check_points("bezier points", &[start, cp1, cp2, end])?;
        self.push_sections(&[(start, (cp1, cp2), end)])
    }

    ///
    /// Adds a series of connected bezier curves: a start point followed by three points for every curve
    ///
    pub fn add_beziers(&mut self, points: &[Point]) -> CanvasResult<()> {
        if points.len() < 4 || (points.len()-1) % 3 != 0 {
            return Err(CanvasError::GeometryError(format!("bezier point lists must have 1+3n points (found {})", points.len())));
        }
        check_points("bezier points", points)?;

        let sections = points[1..].chunks(3)
            .scan(points[0], |start, curve| {
                let section = (*start, (curve[0], curve[1]), curve[2]);
                *start      = curve[2];
                Some(section)
            })
            .collect::<Vec<_>>();

        self.push_sections(&sections)
    }

    ///
    /// Adds an arc of the ellipse that fits the bounding rectangle (angles in degrees, clockwise from the x axis)
    ///
    /// If the current figure does not end where the arc starts, a line is added to join them. A sweep of
    /// 360 degrees or more adds a complete ellipse.
    ///
    pub fn add_arc(&mut self, bounds: Rect, start_degrees: f64, sweep_degrees: f64) -> CanvasResult<()> {
        bounds.check_finite("arc bounds")?;
        check_finite("arc angles", &[start_degrees, sweep_degrees])?;

        let sections = arc_to_curves(bounds, start_degrees, sweep_degrees);
        if sections.is_empty() {
            self.ensure_start(ellipse_point(bounds, start_degrees))
        } else {
            self.push_sections(&sections)
        }
    }

    ///
    /// Adds a cardinal spline that passes through every point in a list
    ///
    pub fn add_curve(&mut self, points: &[Point], tension: f64) -> CanvasResult<()> {
        if points.len() < 2 {
            return Err(CanvasError::GeometryError(format!("a curve needs at least 2 points (found {})", points.len())));
        }
        check_points("curve points", points)?;
        check_finite("curve tension", &[tension])?;

        self.push_sections(&cardinal_spline_to_curves(points, tension))
    }

    ///
    /// Adds a closed cardinal spline as a new figure
    ///
    pub fn add_closed_curve(&mut self, points: &[Point], tension: f64) -> CanvasResult<()> {
        if points.len() < 2 {
            return Err(CanvasError::GeometryError(format!("a closed curve needs at least 2 points (found {})", points.len())));
        }
        check_points("curve points", points)?;
        check_finite("curve tension", &[tension])?;

        self.start_figure();
        self.push_sections(&closed_cardinal_spline_to_curves(points, tension))?;
        self.close_figure();

        Ok(())
    }

    ///
    /// Adds a rectangle as a new closed figure (running clockwise from the top-left corner)
    ///
    pub fn add_rectangle(&mut self, rect: Rect) -> CanvasResult<()> {
        rect.check_finite("rectangle")?;

        self.start_figure();
        self.move_to(Coord2(rect.left(), rect.top()))?;
        self.push_segment(PathSegment::Line(Coord2(rect.right(), rect.top())))?;
        self.push_segment(PathSegment::Line(Coord2(rect.right(), rect.bottom())))?;
        self.push_segment(PathSegment::Line(Coord2(rect.left(), rect.bottom())))?;
        self.close_figure();

        Ok(())
    }

    pub fn add_rectangles(&mut self, rects: &[Rect]) -> CanvasResult<()> {
        rects.iter().try_for_each(|rect| self.add_rectangle(*rect))
    }

    ///
    /// Adds a rectangle with rounded corners as a new closed figure
    ///
    /// The corners are quarter ellipses with the specified radii (limited to half the size of the rectangle).
    /// The figure runs clockwise, starting at the top edge.
    ///
    pub fn add_rounded_rectangle(&mut self, rect: Rect, radius_x: f64, radius_y: f64) -> CanvasResult<()> {
        rect.check_finite("rectangle")?;
        check_finite("corner radius", &[radius_x, radius_y])?;

        if radius_x < 0.0 || radius_y < 0.0 {
            return Err(CanvasError::ArgumentError(format!("corner radii cannot be negative (found {}, {})", radius_x, radius_y)));
        }

        let rx = radius_x.min(rect.width.abs()/2.0);
        let ry = radius_y.min(rect.height.abs()/2.0);

        if rx == 0.0 || ry == 0.0 {
            return self.add_rectangle(rect);
        }

        let corner = |x: f64, y: f64| Rect::new(x, y, rx*2.0, ry*2.0);

        self.start_figure();
        self.move_to(Coord2(rect.left() + rx, rect.top()))?;
        self.add_arc(corner(rect.right() - rx*2.0, rect.top()), 270.0, 90.0)?;
        self.add_arc(corner(rect.right() - rx*2.0, rect.bottom() - ry*2.0), 0.0, 90.0)?;
        self.add_arc(corner(rect.left(), rect.bottom() - ry*2.0), 90.0, 90.0)?;
        self.add_arc(corner(rect.left(), rect.top()), 180.0, 90.0)?;
        self.close_figure();

        Ok(())
    }

    ///
    /// Adds an ellipse that fits a rectangle as a new closed figure
    ///
    pub fn add_ellipse(&mut self, bounds: Rect) -> CanvasResult<()> {
        bounds.check_finite("ellipse bounds")?;

        self.start_figure();
        self.push_sections(&arc_to_curves(bounds, 0.0, 360.0))?;
        self.close_figure();

        Ok(())
    }

    ///
    /// Adds a polygon as a new closed figure
    ///
    pub fn add_polygon(&mut self, points: &[Point]) -> CanvasResult<()> {
        if points.len() < 2 {
            return Err(CanvasError::GeometryError(format!("a polygon needs at least 2 points (found {})", points.len())));
        }
        check_points("polygon points", points)?;

        self.start_figure();
        self.add_lines(points)?;
        self.close_figure();

        Ok(())
    }

    ///
    /// Adds a pie shape (an arc joined to the center of its ellipse) as a new closed figure
    ///
    pub fn add_pie(&mut self, bounds: Rect, start_degrees: f64, sweep_degrees: f64) -> CanvasResult<()> {
        bounds.check_finite("pie bounds")?;
        check_finite("pie angles", &[start_degrees, sweep_degrees])?;

        self.start_figure();
        self.move_to(bounds.center())?;
        self.add_arc(bounds, start_degrees, sweep_degrees)?;
        self.close_figure();

        Ok(())
    }

    ///
    /// Appends the figures from another path to this one
    ///
    /// If `connect` is true and both the current figure and the first figure of the other path are open, the
    /// first figure continues the current one.
    ///
    pub fn add_path(&mut self, other: &Path, connect: bool) -> CanvasResult<()> {
        for (idx, subpath) in other.subpaths.iter().enumerate() {
            if idx == 0 && connect && !subpath.closed && self.current_point().is_some() {
                self.ensure_start(subpath.start)?;
                for segment in subpath.segments.iter() {
                    self.push_segment(*segment)?;
                }
            } else {
                self.subpaths.push(subpath.clone());
            }
        }

        if !other.subpaths.is_empty() {
            self.start_new_figure = other.start_new_figure;
        }

        Ok(())
    }

    ///
    /// Applies a transformation to every point in this path
    ///
    pub fn transform(&mut self, transform: &AffineTransform) {
        if transform.is_identity() { return; }

        for subpath in self.subpaths.iter_mut() {
            subpath.start       = transform.transform_point(subpath.start);
            subpath.segments    = subpath.segments.iter().map(|segment| segment.transform(transform)).collect();
        }
    }

    ///
    /// Reverses the direction of every figure in this path (and the order of the figures)
    ///
    pub fn reverse(&mut self) {
        self.subpaths = self.subpaths.iter().rev().map(|subpath| subpath.reversed()).collect();
    }

    ///
    /// The figures in this path as lists of points, with curves approximated by lines
    ///
    pub fn polylines(&self, tolerance: f64) -> Vec<Polyline> {
        self.subpaths.iter()
            .map(|subpath| subpath.to_polyline(tolerance))
            .collect()
    }

    ///
    /// Replaces every curve in this path with lines that are within `tolerance` of the curve, after applying an optional transform
    ///
    pub fn flatten(&mut self, transform: Option<&AffineTransform>, tolerance: f64) {
        if let Some(transform) = transform {
            self.transform(transform);
        }

        let polylines   = self.polylines(tolerance);
        self.subpaths   = polylines.into_iter()
            .map(|line| Subpath::from_polyline(line))
            .collect();
    }

    ///
    /// Replaces this path with the outline of the area that drawing it with a pen would cover
    ///
    /// The transform is applied before the outline is generated, so the pen width is in the units of the
    /// transformed path. The result uses the non-zero fill rule.
    ///
    pub fn widen(&mut self, pen: &Pen, transform: Option<&AffineTransform>, tolerance: f64) -> CanvasResult<()> {
        pen.validate()?;

        if let Some(transform) = transform {
            self.transform(transform);
        }

        let outline         = widen_polylines(&self.polylines(tolerance), pen, tolerance);
        self.subpaths       = outline.into_iter()
            .map(|line| Subpath::from_polyline(line))
            .collect();
        self.fill_mode      = FillMode::NonZero;
        self.start_new_figure = true;

        Ok(())
    }

    ///
    /// True if a point is inside this path (every figure is treated as closed)
    ///
    pub fn contains(&self, point: Point) -> bool {
        polylines_contain_point(&self.polylines(DEFAULT_FLATNESS), point, self.fill_mode)
    }

    ///
    /// The bounding box of this path (curves are measured using their flattened form), or None if it's empty
    ///
    pub fn bounds(&self) -> Option<Rect> {
        let polylines   = self.polylines(DEFAULT_FLATNESS);
        let mut points  = polylines.iter().flat_map(|line| line.points.iter());
        let first       = points.next()?;

        Some(points.fold(Rect::new(first.x(), first.y(), 0.0, 0.0), |bounds, point| bounds.union_point(*point)))
    }

    ///
    /// Converts this path into a list of path operations
    ///
    pub fn to_path_ops(&self) -> Vec<PathOp> {
        let mut ops = vec![];

        for subpath in self.subpaths.iter() {
            ops.push(PathOp::Move(subpath.start.x(), subpath.start.y()));

            for segment in subpath.segments.iter() {
                ops.push(match segment {
                    PathSegment::Line(end)                      => PathOp::Line(end.x(), end.y()),
                    PathSegment::BezierCurve((cp1, cp2), end)   => PathOp::BezierCurve(((cp1.x(), cp1.y()), (cp2.x(), cp2.y())), (end.x(), end.y())),
                });
            }

            if subpath.closed {
                ops.push(PathOp::ClosePath);
            }
        }

        ops
    }

    ///
    /// Creates a path from a list of path operations
    ///
    pub fn from_path_ops<'a, OpIter: IntoIterator<Item=&'a PathOp>>(ops: OpIter, fill_mode: FillMode) -> CanvasResult<Path> {
        let mut path = Path::with_fill_mode(fill_mode);

        for op in ops {
            match op {
                PathOp::Move(x, y)                              => { path.start_figure(); path.move_to(Coord2(*x, *y))?; }
                PathOp::Line(x, y)                              => path.line_to(Coord2(*x, *y))?,
                PathOp::BezierCurve(((x1, y1), (x2, y2)), (x, y)) => path.bezier_curve_to(Coord2(*x1, *y1), Coord2(*x2, *y2), Coord2(*x, *y))?,
                PathOp::ClosePath                               => path.close_figure(),
            }
        }

        Ok(path)
    }
}

impl Subpath {
    fn from_polyline(line: Polyline) -> Subpath {
        let mut points  = line.points.into_iter();
        let start       = points.next().unwrap_or(Coord2(0.0, 0.0));

        Subpath {
            start:      start,
            segments:   points.map(|point| PathSegment::Line(point)).collect(),
            closed:     line.closed,
        }
    }
}

impl Default for Path {
    fn default() -> Path {
        Path::new()
    }
}
