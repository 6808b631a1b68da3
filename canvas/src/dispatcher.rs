use crate::draw::*;
use crate::error::*;
use crate::font::*;
use crate::geometry::*;
use crate::graphics_state::*;
use crate::page::*;
use crate::path::*;
use crate::sink::*;
use crate::texture::*;
use crate::transform::*;

use flo_curves::geo::*;
use tracing::{debug, trace, warn};

use std::thread;

///
/// Sends drawing instructions for a page to an interactive surface and/or a recorder
///
/// The dispatcher tracks the user transform and the stack of saved states. Every primitive is validated
/// before anything is sent on: the surface receives it along with the effective transform (the page's default
/// view matrix combined with the user transform), and the recorder receives it in user space (it is given
/// the default view matrix when it is attached, and every change to the user transform after that).
///
/// A dispatcher with no sinks attached still tracks the transform and state, which is useful for measuring
/// and testing.
///
pub struct RenderDispatcher {
    settings:           PageSettings,

    /// Maps page units to the device (fixed when the dispatcher is created)
    default_view:       AffineTransform,

    /// The saved states, with the native surface's saved state (if there is a surface)
    states:             GraphicsStateStack<Option<SurfaceStateId>>,

    surface:            Option<Box<dyn SurfaceSink>>,
    recorder:           Option<Box<dyn RecorderSink>>,
    font_metrics:       Box<dyn FontMetrics>,

    disposed:           bool,
}

impl RenderDispatcher {
    ///
    /// Creates a dispatcher for a page with the specified settings
    ///
    pub fn new(settings: PageSettings) -> CanvasResult<RenderDispatcher> {
        settings.validate()?;
        let default_view = settings.default_view_matrix()?;

        debug!(?settings, ?default_view, "Created render dispatcher");

        Ok(RenderDispatcher {
            settings:           settings,
            default_view:       default_view,
            states:             GraphicsStateStack::new(),
            surface:            None,
            recorder:           None,
            font_metrics:       Box::new(MonospaceMetrics::default()),
            disposed:           false,
        })
    }

    ///
    /// Attaches an interactive surface to this dispatcher
    ///
    pub fn with_surface<Surface: 'static+SurfaceSink>(mut self, surface: Surface) -> RenderDispatcher {
        self.surface = Some(Box::new(surface));
        self
    }

    ///
    /// Attaches a recorder to this dispatcher
    ///
    /// The recorder is sent the default view matrix, along with the current user transform if it's not the identity.
    ///
    pub fn with_recorder<Recorder: 'static+RecorderSink>(mut self, recorder: Recorder) -> RenderDispatcher {
        let mut recorder: Box<dyn RecorderSink> = Box::new(recorder);

        recorder.begin_page(&self.settings, &self.default_view);
        if !self.states.transform().is_identity() {
            recorder.add_transform(self.states.transform(), MatrixOrder::Prepend);
        }

        self.recorder = Some(recorder);
        self
    }

    ///
    /// Sets the collaborator used to measure text
    ///
    pub fn with_font_metrics<Metrics: 'static+FontMetrics>(mut self, metrics: Metrics) -> RenderDispatcher {
        self.font_metrics = Box::new(metrics);
        self
    }

    #[inline] pub fn settings(&self) -> &PageSettings                   { &self.settings }
    #[inline] pub fn default_view_matrix(&self) -> &AffineTransform     { &self.default_view }
    #[inline] pub fn is_disposed(&self) -> bool                         { self.disposed }

    ///
    /// Fails if this dispatcher has been disposed
    ///
    fn check_active(&self) -> CanvasResult<()> {
        if self.disposed {
            Err(CanvasError::InvalidState("the graphics object has been disposed".into()))
        } else {
            Ok(())
        }
    }

    ///
    /// Returns the surface along with the transform that primitives sent to it should use
    ///
    fn active_surface(&self) -> Option<(&dyn SurfaceSink, AffineTransform)> {
        let surface = self.surface.as_ref()?;

        Some((surface.as_ref(), self.effective_transform()))
    }

    ///
    /// Sends a path to the surface, filling before stroking
    ///
    fn paint_surface_path(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, path: &Path) {
        if let Some((surface, transform)) = self.active_surface() {
            surface.paint_path(&transform, path, pen, brush);
        }
    }

    ///
    /// Validates the paint for a drawing operation
    ///
    fn check_paint(&self, pen: Option<&Pen>, brush: Option<&Brush>) -> CanvasResult<()> {
        self.check_active()?;
        check_paint(pen, brush)
    }

    // ---- Transforms ----

    ///
    /// The current user transform
    ///
    pub fn transform(&self) -> AffineTransform {
        *self.states.transform()
    }

    ///
    /// The transform from user space to the device (the default view matrix applied after the user transform)
    ///
    pub fn effective_transform(&self) -> AffineTransform {
        AffineTransform::multiply(self.states.transform(), &self.default_view, MatrixOrder::Append)
    }

    ///
    /// Combines a transform with the user transform
    ///
    pub fn multiply_transform(&mut self, transform: &AffineTransform, order: MatrixOrder) -> CanvasResult<()> {
        self.check_active()?;
        check_finite("transform", &transform.elements())?;

        self.states.multiply_transform(transform, order);
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.add_transform(transform, order);
        }

        trace!(?transform, ?order, "Transform");
        Ok(())
    }

    ///
    /// Replaces the user transform
    ///
    /// The recorder is sent the change needed to get from the old transform to the new one, so this fails if
    /// the current user transform is not invertible.
    ///
    pub fn set_transform(&mut self, transform: &AffineTransform) -> CanvasResult<()> {
        self.check_active()?;
        check_finite("transform", &transform.elements())?;

        let inverse = self.states.transform().inverted()?;
        let delta   = AffineTransform::multiply(&inverse, transform, MatrixOrder::Append);

        self.multiply_transform(&delta, MatrixOrder::Append)?;
        self.states.set_transform(*transform);

        Ok(())
    }

    pub fn reset_transform(&mut self) -> CanvasResult<()> {
        self.set_transform(&AffineTransform::identity())
    }

    pub fn translate_transform(&mut self, dx: f64, dy: f64, order: MatrixOrder) -> CanvasResult<()> {
        self.multiply_transform(&AffineTransform::translation(dx, dy), order)
    }

    pub fn scale_transform(&mut self, sx: f64, sy: f64, order: MatrixOrder) -> CanvasResult<()> {
        self.multiply_transform(&AffineTransform::scaling(sx, sy), order)
    }

    pub fn scale_at_transform(&mut self, sx: f64, sy: f64, center: Point, order: MatrixOrder) -> CanvasResult<()> {
        self.multiply_transform(&AffineTransform::scaling_at(sx, sy, center), order)
    }

    ///
    /// Rotates the user transform (angle in degrees)
    ///
    pub fn rotate_transform(&mut self, degrees: f64, order: MatrixOrder) -> CanvasResult<()> {
        self.multiply_transform(&AffineTransform::rotation(degrees), order)
    }

    pub fn rotate_at_transform(&mut self, degrees: f64, center: Point, order: MatrixOrder) -> CanvasResult<()> {
        self.multiply_transform(&AffineTransform::rotation_at(degrees, center), order)
    }

    pub fn skew_transform(&mut self, x_degrees: f64, y_degrees: f64, order: MatrixOrder) -> CanvasResult<()> {
        self.multiply_transform(&AffineTransform::skewing(x_degrees, y_degrees), order)
    }

    // ---- State ----

    ///
    /// Tells the sinks about states that have been removed from the stack
    ///
    fn unwind_states(&mut self, popped: Vec<GraphicsState<Option<SurfaceStateId>>>) {
        for state in popped {
            if let (Some(surface), Some(surface_state)) = (self.surface.as_ref(), state.external()) {
                surface.restore_state(*surface_state);
            }

            if let Some(recorder) = self.recorder.as_mut() {
                match (state.state_token(), state.container_token()) {
                    (Some(token), _)    => recorder.restore(token),
                    (_, Some(token))    => recorder.end_container(token),
                    (None, None)        => { }
                }
            }
        }
    }

    ///
    /// Saves the current state, returning a token that can be passed to `restore()`
    ///
    pub fn save(&mut self) -> CanvasResult<StateToken> {
        self.check_active()?;

        let surface_state   = self.surface.as_ref().map(|surface| surface.save_state());
        let token           = self.states.save(surface_state);

        if let Some(recorder) = self.recorder.as_mut() {
            recorder.save(token);
        }

        trace!(?token, depth = self.states.depth(), "Save");
        Ok(token)
    }

    ///
    /// Restores a saved state, along with every state saved after it
    ///
    pub fn restore(&mut self, token: StateToken) -> CanvasResult<()> {
        self.check_active()?;

        let popped = self.states.restore(token)?;
        self.unwind_states(popped);

        trace!(?token, depth = self.states.depth(), "Restore");
        Ok(())
    }

    ///
    /// Restores the most recently saved state (or closes the most recently opened container)
    ///
    pub fn restore_last(&mut self) -> CanvasResult<()> {
        self.check_active()?;

        let popped = self.states.restore_last()?;
        self.unwind_states(vec![popped]);

        Ok(())
    }

    ///
    /// Opens a container that maps the source rectangle (in `unit`) onto the destination rectangle
    ///
    pub fn begin_container(&mut self, dest: Rect, source: Rect, unit: PageUnit) -> CanvasResult<ContainerToken> {
        self.check_active()?;

        if unit != self.settings.unit {
            return Err(CanvasError::NotSupported(format!("containers must use the page unit ({:?}, found {:?})", self.settings.unit, unit)));
        }

        // Check the rectangles before the native state is saved
        container_transform(dest, source)?;

        let surface_state   = self.surface.as_ref().map(|surface| surface.save_state());
        let token           = self.states.begin_container(dest, source, surface_state)?;

        if let Some(recorder) = self.recorder.as_mut() {
            recorder.begin_container(token, source, dest, unit);
        }

        debug!(?token, ?source, ?dest, "Begin container");
        Ok(token)
    }

    ///
    /// Closes a container (and any state saved inside it)
    ///
    pub fn end_container(&mut self, token: ContainerToken) -> CanvasResult<()> {
        self.check_active()?;

        let popped = self.states.end_container(token)?;
        self.unwind_states(popped);

        debug!(?token, "End container");
        Ok(())
    }

    // ---- Drawing ----

    pub fn draw_line(&mut self, pen: &Pen, from: Point, to: Point) -> CanvasResult<()> {
        self.check_paint(Some(pen), None)?;
        check_points("line", &[from, to])?;

        trace!(?from, ?to, "Draw line");

        if let Some((surface, transform)) = self.active_surface() {
            surface.draw_line(&transform, from, to, pen);
        }
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.draw_line(pen, from, to);
        }

        Ok(())
    }

    ///
    /// Draws a series of connected lines
    ///
    pub fn draw_lines(&mut self, pen: &Pen, points: &[Point]) -> CanvasResult<()> {
        self.check_paint(Some(pen), None)?;
        if points.len() < 2 {
            return Err(CanvasError::GeometryError(format!("drawing lines needs at least 2 points (found {})", points.len())));
        }

        let mut path = Path::new();
        path.add_lines(points)?;

        trace!(count = points.len(), "Draw lines");

        self.paint_surface_path(Some(pen), None, &path);
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.draw_lines(pen, points);
        }

        Ok(())
    }

    pub fn draw_bezier(&mut self, pen: &Pen, start: Point, cp1: Point, cp2: Point, end: Point) -> CanvasResult<()> {
        self.check_paint(Some(pen), None)?;

        let mut path = Path::new();
        path.add_bezier(start, cp1, cp2, end)?;

        trace!(?start, ?end, "Draw bezier");

        self.paint_surface_path(Some(pen), None, &path);
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.draw_bezier(pen, start, cp1, cp2, end);
        }

        Ok(())
    }

    ///
    /// Draws a series of connected bezier curves (a start point followed by 3 points for every curve)
    ///
    pub fn draw_beziers(&mut self, pen: &Pen, points: &[Point]) -> CanvasResult<()> {
        self.check_paint(Some(pen), None)?;

        let mut path = Path::new();
        path.add_beziers(points)?;

        trace!(count = points.len(), "Draw beziers");

        self.paint_surface_path(Some(pen), None, &path);
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.draw_beziers(pen, points);
        }

        Ok(())
    }

    ///
    /// Draws a cardinal spline through a set of points
    ///
    pub fn draw_curve(&mut self, pen: &Pen, points: &[Point], tension: f64) -> CanvasResult<()> {
        self.check_paint(Some(pen), None)?;

        let mut path = Path::new();
        path.add_curve(points, tension)?;

        self.draw_path_unchecked(Some(pen), None, &path);
        Ok(())
    }

    ///
    /// Draws and/or fills a closed cardinal spline through a set of points
    ///
    pub fn draw_closed_curve(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, points: &[Point], tension: f64, fill_mode: FillMode) -> CanvasResult<()> {
        self.check_paint(pen, brush)?;

        let mut path = Path::with_fill_mode(fill_mode);
        path.add_closed_curve(points, tension)?;

        self.draw_path_unchecked(pen, brush, &path);
        Ok(())
    }

    ///
    /// Draws an arc of the ellipse that fits a rectangle (angles in degrees)
    ///
    pub fn draw_arc(&mut self, pen: &Pen, bounds: Rect, start_degrees: f64, sweep_degrees: f64) -> CanvasResult<()> {
        self.check_paint(Some(pen), None)?;

        let mut path = Path::new();
        path.add_arc(bounds, start_degrees, sweep_degrees)?;

        self.draw_path_unchecked(Some(pen), None, &path);
        Ok(())
    }

    pub fn draw_rectangle(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, rect: Rect) -> CanvasResult<()> {
        self.draw_rectangles(pen, brush, &[rect])
    }

    pub fn draw_rectangles(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, rects: &[Rect]) -> CanvasResult<()> {
        self.check_paint(pen, brush)?;

        let mut path = Path::with_fill_mode(FillMode::NonZero);
        path.add_rectangles(rects)?;

        trace!(count = rects.len(), "Draw rectangles");

        self.paint_surface_path(pen, brush, &path);
        if let Some(recorder) = self.recorder.as_mut() {
            if rects.len() == 1 {
                recorder.draw_rectangle(pen, brush, rects[0]);
            } else {
                recorder.draw_rectangles(pen, brush, rects);
            }
        }

        Ok(())
    }

    pub fn draw_rounded_rectangle(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, rect: Rect, radius_x: f64, radius_y: f64) -> CanvasResult<()> {
        self.check_paint(pen, brush)?;

        let mut path = Path::with_fill_mode(FillMode::NonZero);
        path.add_rounded_rectangle(rect, radius_x, radius_y)?;

        self.draw_path_unchecked(pen, brush, &path);
        Ok(())
    }

    pub fn draw_ellipse(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, bounds: Rect) -> CanvasResult<()> {
        self.check_paint(pen, brush)?;

        let mut path = Path::with_fill_mode(FillMode::NonZero);
        path.add_ellipse(bounds)?;

        trace!(?bounds, "Draw ellipse");

        self.paint_surface_path(pen, brush, &path);
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.draw_ellipse(pen, brush, bounds);
        }

        Ok(())
    }

    pub fn draw_polygon(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, points: &[Point], fill_mode: FillMode) -> CanvasResult<()> {
        self.check_paint(pen, brush)?;

        let mut path = Path::with_fill_mode(fill_mode);
        path.add_polygon(points)?;

        trace!(count = points.len(), ?fill_mode, "Draw polygon");

        self.paint_surface_path(pen, brush, &path);
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.draw_polygon(pen, brush, points, fill_mode);
        }

        Ok(())
    }

    pub fn draw_pie(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, bounds: Rect, start_degrees: f64, sweep_degrees: f64) -> CanvasResult<()> {
        self.check_paint(pen, brush)?;

        let mut path = Path::with_fill_mode(FillMode::NonZero);
        path.add_pie(bounds, start_degrees, sweep_degrees)?;

        trace!(?bounds, start_degrees, sweep_degrees, "Draw pie");

        self.paint_surface_path(pen, brush, &path);
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.draw_pie(pen, brush, bounds, start_degrees, sweep_degrees);
        }

        Ok(())
    }

    ///
    /// Draws and/or fills a path, using the path's fill mode
    ///
    pub fn draw_path(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, path: &Path) -> CanvasResult<()> {
        self.check_paint(pen, brush)?;

        self.draw_path_unchecked(pen, brush, path);
        Ok(())
    }

    fn draw_path_unchecked(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, path: &Path) {
        trace!(subpaths = path.subpaths().len(), fill_mode = ?path.fill_mode(), "Draw path");

        self.paint_surface_path(pen, brush, path);
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.draw_path(pen, brush, path);
        }
    }

    // ---- Text ----

    ///
    /// Measures the size of some text
    ///
    pub fn measure_string(&self, text: &str, font: &Font, format: &StringFormat) -> CanvasResult<Size> {
        self.check_active()?;
        font.validate()?;

        Ok(self.font_metrics.measure(text, font, format))
    }

    ///
    /// Draws some text, laid out relative to a rectangle
    ///
    /// A layout rectangle with no size is used as an anchor point. Baseline alignment can only be used with a
    /// rectangle of zero height.
    ///
    pub fn draw_string(&mut self, text: &str, font: &Font, brush: &Brush, layout: Rect, format: &StringFormat) -> CanvasResult<()> {
        self.check_active()?;
        font.validate()?;
        layout.check_finite("layout rectangle")?;

        let size    = self.font_metrics.measure(text, font, format);
        let metrics = self.font_metrics.line_metrics(font);
        let origin  = text_origin(layout, size, font, format, &metrics)?;

        trace!(text, ?origin, "Draw string");

        if let Some((surface, transform)) = self.active_surface() {
            surface.draw_text(&transform, text, font, origin, brush);
        }
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.draw_string(text, font, brush, origin);
        }

        Ok(())
    }

    // ---- Images ----

    ///
    /// Draws an image, scaled to fit a rectangle
    ///
    pub fn draw_image(&mut self, image: &ImageSource, dest: Rect) -> CanvasResult<()> {
        self.check_active()?;
        image.validate()?;
        dest.check_finite("image destination")?;

        trace!(id = image.id.0, ?dest, "Draw image");

        if let Some((surface, transform)) = self.active_surface() {
            surface.draw_image(&transform, image, dest);
        }
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.draw_image(image, dest);
        }

        Ok(())
    }

    ///
    /// Draws an image at its natural size with its top-left corner at a point
    ///
    pub fn draw_image_at(&mut self, image: &ImageSource, location: Point) -> CanvasResult<()> {
        image.validate()?;

        let size = image.natural_size(self.settings.unit);
        self.draw_image(image, Rect::new(location.x(), location.y(), size.width, size.height))
    }

    // ---- Clipping and comments ----

    ///
    /// Changes the clipping region (the region is restored along with the rest of the state)
    ///
    pub fn set_clip(&mut self, path: &Path, combine: CombineMode) -> CanvasResult<()> {
        self.check_active()?;

        trace!(?combine, "Set clip");

        if let Some((surface, transform)) = self.active_surface() {
            surface.set_clip(&transform, path, combine);
        }
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.set_clip(path, combine);
        }

        Ok(())
    }

    pub fn intersect_clip(&mut self, path: &Path) -> CanvasResult<()> {
        self.set_clip(path, CombineMode::Intersect)
    }

    ///
    /// Writes a comment to the recorder (interactive surfaces ignore comments)
    ///
    pub fn write_comment(&mut self, text: &str) -> CanvasResult<()> {
        self.check_active()?;

        if let Some(recorder) = self.recorder.as_mut() {
            recorder.write_comment(text);
        }

        Ok(())
    }

    // ---- Lifecycle ----

    ///
    /// Finishes with this dispatcher, closing the recorder and releasing the surface
    ///
    /// Any states that are still saved are restored first. Disposing more than once has no effect, but every
    /// other operation fails after this has been called.
    ///
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        if self.states.depth() > 0 {
            warn!(depth = self.states.depth(), "Render dispatcher disposed with unbalanced saves");

            let popped = self.states.clear();
            self.unwind_states(popped);
        }

        if let Some(mut recorder) = self.recorder.take() {
            recorder.close();
        }

        if let Some(surface) = self.surface.take() {
            surface.release();
        }

        self.disposed = true;
        debug!("Disposed render dispatcher");
    }
}

impl Drop for RenderDispatcher {
    fn drop(&mut self) {
        if thread::panicking() {
            // A panic may have poisoned a shared surface or recorder, and a second panic here would abort
            self.disposed = true;
        } else {
            self.dispose();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color::*;
    use crate::recording::*;

    use desync::{Desync};

    use std::sync::*;

    fn recorded() -> (RenderDispatcher, Arc<Desync<Vec<RecordedDraw>>>) {
        let recording   = Arc::new(Desync::new(vec![]));
        let dispatcher  = RenderDispatcher::new(PageSettings::a4()).unwrap().with_recorder(Arc::clone(&recording));

        (dispatcher, recording)
    }

    #[test]
    fn recorder_gets_default_view_first() {
        let (_dispatcher, recording) = recorded();
        let recording = recording.sync(|recording| recording.clone());

        assert!(recording == vec![RecordedDraw::BeginPage(PageSettings::a4(), AffineTransform::identity())], "{:?}", recording);
    }

    #[test]
    fn missing_paint_is_an_error() {
        let (mut dispatcher, _) = recorded();

        assert!(dispatcher.draw_rectangle(None, None, Rect::new(0.0, 0.0, 1.0, 1.0)) == Err(CanvasError::MissingPaintSpec));
    }

    #[test]
    fn non_finite_points_are_rejected() {
        let (mut dispatcher, recording) = recorded();
        let pen = Pen::default();

        assert!(matches!(dispatcher.draw_line(&pen, Coord2(f64::NAN, 0.0), Coord2(1.0, 1.0)), Err(CanvasError::ArgumentError(_))));
        assert!(recording.sync(|recording| recording.len()) == 1);
    }

    #[test]
    fn recorder_gets_transform_deltas() {
        let (mut dispatcher, recording) = recorded();

        dispatcher.translate_transform(10.0, 0.0, MatrixOrder::Prepend).unwrap();
        dispatcher.rotate_transform(90.0, MatrixOrder::Append).unwrap();

        let recording = recording.sync(|recording| recording.clone());
        assert!(recording[1] == RecordedDraw::AddTransform(AffineTransform::translation(10.0, 0.0), MatrixOrder::Prepend), "{:?}", recording);
        assert!(recording[2] == RecordedDraw::AddTransform(AffineTransform::rotation(90.0), MatrixOrder::Append), "{:?}", recording);
    }

    #[test]
    fn set_transform_sends_delta() {
        let (mut dispatcher, recording) = recorded();
        let target = AffineTransform::rotation(30.0);

        dispatcher.scale_transform(2.0, 2.0, MatrixOrder::Append).unwrap();
        dispatcher.set_transform(&target).unwrap();

        assert!(dispatcher.transform() == target);

        // Applying the deltas in order should give the same transform the dispatcher has
        let recording   = recording.sync(|recording| recording.clone());
        let mut replay  = AffineTransform::identity();
        for draw in recording.iter() {
            if let RecordedDraw::AddTransform(transform, order) = draw {
                replay.multiply_by(transform, *order);
            }
        }

        let elements    = replay.elements();
        let expected    = target.elements();
        assert!(elements.iter().zip(expected.iter()).all(|(a, b)| (a-b).abs() < 1e-9), "{:?} {:?}", elements, expected);
    }

    #[test]
    fn restore_tells_recorder_about_every_state() {
        let (mut dispatcher, recording) = recorded();

        let outer       = dispatcher.save().unwrap();
        let container   = dispatcher.begin_container(Rect::new(0.0, 0.0, 100.0, 100.0), Rect::new(0.0, 0.0, 10.0, 10.0), PageUnit::Point).unwrap();
        let inner       = dispatcher.save().unwrap();
        dispatcher.restore(outer).unwrap();

        let recording = recording.sync(|recording| recording.clone());
        assert!(recording[recording.len()-3..] == [RecordedDraw::Restore(inner), RecordedDraw::EndContainer(container), RecordedDraw::Restore(outer)], "{:?}", recording);
        assert!(dispatcher.transform().is_identity());
    }

    #[test]
    fn container_unit_must_match_page() {
        let (mut dispatcher, _) = recorded();
        let result = dispatcher.begin_container(Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(0.0, 0.0, 1.0, 1.0), PageUnit::Inch);

        assert!(matches!(result, Err(CanvasError::NotSupported(_))));
    }

    #[test]
    fn bare_restore_on_empty_stack_fails() {
        let (mut dispatcher, _) = recorded();

        assert!(dispatcher.restore_last().map_err(|err| err.is_invalid_state()) == Err(true));
    }

    #[test]
    fn disposed_dispatcher_rejects_calls() {
        let (mut dispatcher, recording) = recorded();

        dispatcher.save().unwrap();
        dispatcher.dispose();
        dispatcher.dispose();

        assert!(dispatcher.is_disposed());
        assert!(matches!(dispatcher.save(), Err(CanvasError::InvalidState(_))));
        assert!(matches!(dispatcher.draw_line(&Pen::default(), Coord2(0.0, 0.0), Coord2(1.0, 1.0)), Err(CanvasError::InvalidState(_))));

        let recording = recording.sync(|recording| recording.clone());
        assert!(recording.iter().filter(|draw| **draw == RecordedDraw::Close).count() == 1, "{:?}", recording);
        assert!(matches!(recording[recording.len()-2], RecordedDraw::Restore(_)), "{:?}", recording);
    }

    #[test]
    fn baseline_with_height_is_invalid() {
        let (mut dispatcher, _) = recorded();
        let format  = StringFormat::new(StringAlignment::Near, LineAlignment::BaseLine);
        let result  = dispatcher.draw_string("Hello", &Font::new("Helvetica", 12.0), &Brush::solid(Color::BLACK), Rect::new(0.0, 0.0, 100.0, 20.0), &format);

        assert!(matches!(result, Err(CanvasError::InvalidState(_))), "{:?}", result);
    }

    #[test]
    fn image_at_uses_natural_size() {
        let (mut dispatcher, recording) = recorded();
        let image = ImageSource::new(ImageId(3), 96, 48);

        dispatcher.draw_image_at(&image, Coord2(10.0, 20.0)).unwrap();

        let recording = recording.sync(|recording| recording.clone());
        assert!(recording.last() == Some(&RecordedDraw::Image(image, Rect::new(10.0, 20.0, 72.0, 36.0))), "{:?}", recording);
    }

    #[test]
    fn upwards_pages_are_not_supported() {
        let result = RenderDispatcher::new(PageSettings::a4().with_direction(PageDirection::Upwards));

        assert!(matches!(result, Err(CanvasError::NotSupported(_))));
    }
}
