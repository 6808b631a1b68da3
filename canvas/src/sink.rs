//!
//! The targets that a `RenderDispatcher` sends its drawing instructions to
//!
//! There are two kinds of sink. An interactive surface receives geometry in local coordinates along with the
//! effective transform to use for it, and keeps its own native transform and state stack. A recorder receives
//! the default view matrix once, then the same user-space geometry along with every change made to the
//! transform, so it can write out the minimal set of state changes.
//!

use crate::draw::*;
use crate::font::*;
use crate::geometry::*;
use crate::graphics_state::*;
use crate::page::*;
use crate::path::*;
use crate::texture::*;
use crate::transform::*;

use desync::{Desync};

use std::sync::*;

///
/// Identifies a state saved by a native surface
///
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct SurfaceStateId(pub u64);

///
/// A native rendering surface
///
/// Native surfaces are usually not thread-safe and may be shared between several dispatchers, so they are
/// wrapped in a `SharedSurface` which serializes every individual call.
///
pub trait SurfaceBackend : Send {
    /// Sets the transform that maps the coordinates of the following primitives to the device
    fn set_transform(&mut self, transform: &AffineTransform);

    /// Saves the native state (transform and clipping), returning an identifier that can be used to restore it
    fn save_state(&mut self) -> SurfaceStateId;

    /// Restores a state saved by `save_state`
    fn restore_state(&mut self, state: SurfaceStateId);

    fn draw_line(&mut self, from: Point, to: Point, pen: &Pen);
    fn fill_path(&mut self, path: &Path, brush: &Brush);
    fn stroke_path(&mut self, path: &Path, pen: &Pen);
    fn draw_text(&mut self, text: &str, font: &Font, origin: Point, brush: &Brush);
    fn draw_image(&mut self, image: &ImageSource, dest: Rect);
    fn set_clip(&mut self, path: &Path, combine: CombineMode);

    /// Releases the native resources used by this surface (no further calls are made after this)
    fn release(&mut self);
}

///
/// An interactive surface, as seen by the dispatcher
///
/// Drawing calls carry the effective transform for the primitive: a surface may be shared with other
/// dispatchers, so its native transform can't be assumed to still be the one this dispatcher last used.
///
pub trait SurfaceSink {
    fn save_state(&self) -> SurfaceStateId;
    fn restore_state(&self, state: SurfaceStateId);
    fn draw_line(&self, transform: &AffineTransform, from: Point, to: Point, pen: &Pen);

    /// Fills and/or strokes a path (filling first)
    fn paint_path(&self, transform: &AffineTransform, path: &Path, pen: Option<&Pen>, brush: Option<&Brush>);

    fn draw_text(&self, transform: &AffineTransform, text: &str, font: &Font, origin: Point, brush: &Brush);
    fn draw_image(&self, transform: &AffineTransform, image: &ImageSource, dest: Rect);
    fn set_clip(&self, transform: &AffineTransform, path: &Path, combine: CombineMode);
    fn release(&self);
}

///
/// A handle to a native surface that may be shared between several dispatchers (and threads)
///
/// Every call is made with exclusive access to the backend, which is released again as soon as the call
/// completes.
///
pub struct SharedSurface<Backend: 'static+SurfaceBackend> {
    backend: Arc<Desync<Backend>>
}

///
/// Receives the instructions needed to write a persistent copy of what is drawn
///
/// Coordinates are in user space: the recorder is given the default view matrix for the page at the start
/// and is told about every change to the user transform, so the transform it should apply is always the
/// same as the effective transform used by an interactive surface.
///
pub trait RecorderSink {
    fn begin_page(&mut self, settings: &PageSettings, default_view: &AffineTransform);

    fn save(&mut self, token: StateToken);
    fn restore(&mut self, token: StateToken);
    fn begin_container(&mut self, token: ContainerToken, source: Rect, dest: Rect, unit: PageUnit);
    fn end_container(&mut self, token: ContainerToken);
    fn add_transform(&mut self, transform: &AffineTransform, order: MatrixOrder);

    fn draw_line(&mut self, pen: &Pen, from: Point, to: Point);
    fn draw_lines(&mut self, pen: &Pen, points: &[Point]);
    fn draw_bezier(&mut self, pen: &Pen, start: Point, cp1: Point, cp2: Point, end: Point);
    fn draw_beziers(&mut self, pen: &Pen, points: &[Point]);
    fn draw_rectangle(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, rect: Rect);
    fn draw_rectangles(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, rects: &[Rect]);
    fn draw_ellipse(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, bounds: Rect);
    fn draw_polygon(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, points: &[Point], fill_mode: FillMode);
    fn draw_pie(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, bounds: Rect, start_degrees: f64, sweep_degrees: f64);
    fn draw_path(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, path: &Path);
    fn draw_image(&mut self, image: &ImageSource, dest: Rect);
    fn draw_string(&mut self, text: &str, font: &Font, brush: &Brush, origin: Point);

    fn set_clip(&mut self, path: &Path, combine: CombineMode);
    fn write_comment(&mut self, text: &str);

    /// The page is finished
    fn close(&mut self);
}

impl<Backend: 'static+SurfaceBackend> SharedSurface<Backend> {
    ///
    /// Creates a new shared surface from a native backend
    ///
    pub fn new(backend: Backend) -> SharedSurface<Backend> {
        SharedSurface {
            backend: Arc::new(Desync::new(backend))
        }
    }

    ///
    /// Performs an operation with exclusive access to the backend
    ///
    pub fn sync<TFn, TResult>(&self, action: TFn) -> TResult
    where
        TFn:        Send+FnOnce(&mut Backend) -> TResult,
        TResult:    Send {
        self.backend.sync(action)
    }
}

impl<Backend: 'static+SurfaceBackend> Clone for SharedSurface<Backend> {
    fn clone(&self) -> SharedSurface<Backend> {
        SharedSurface {
            backend: Arc::clone(&self.backend)
        }
    }
}

///
/// Each drawing call sets the transform and draws with a single exclusive access to the backend
///
impl<Backend: 'static+SurfaceBackend> SurfaceSink for SharedSurface<Backend> {
    fn save_state(&self) -> SurfaceStateId                                  { self.backend.sync(|backend| backend.save_state()) }
    fn restore_state(&self, state: SurfaceStateId)                          { self.backend.sync(|backend| backend.restore_state(state)) }

    fn draw_line(&self, transform: &AffineTransform, from: Point, to: Point, pen: &Pen) {
        self.backend.sync(|backend| {
            backend.set_transform(transform);
            backend.draw_line(from, to, pen);
        })
    }

    fn paint_path(&self, transform: &AffineTransform, path: &Path, pen: Option<&Pen>, brush: Option<&Brush>) {
        self.backend.sync(|backend| {
            backend.set_transform(transform);

            if let Some(brush) = brush  { backend.fill_path(path, brush); }
            if let Some(pen) = pen      { backend.stroke_path(path, pen); }
        })
    }

    fn draw_text(&self, transform: &AffineTransform, text: &str, font: &Font, origin: Point, brush: &Brush) {
        self.backend.sync(|backend| {
            backend.set_transform(transform);
            backend.draw_text(text, font, origin, brush);
        })
    }

    fn draw_image(&self, transform: &AffineTransform, image: &ImageSource, dest: Rect) {
        self.backend.sync(|backend| {
            backend.set_transform(transform);
            backend.draw_image(image, dest);
        })
    }

    fn set_clip(&self, transform: &AffineTransform, path: &Path, combine: CombineMode) {
        self.backend.sync(|backend| {
            backend.set_transform(transform);
            backend.set_clip(path, combine);
        })
    }

    fn release(&self)                                                       { self.backend.sync(|backend| backend.release()) }
}

///
/// A recorder shared with the code that created it, so the recording can be retrieved after the dispatcher is done with it
///
impl<Recorder: 'static+Send+RecorderSink> RecorderSink for Arc<Desync<Recorder>> {
    fn begin_page(&mut self, settings: &PageSettings, default_view: &AffineTransform) { self.sync(|recorder| recorder.begin_page(settings, default_view)) }

    fn save(&mut self, token: StateToken)                                   { self.sync(|recorder| recorder.save(token)) }
    fn restore(&mut self, token: StateToken)                                { self.sync(|recorder| recorder.restore(token)) }
    fn begin_container(&mut self, token: ContainerToken, source: Rect, dest: Rect, unit: PageUnit) { self.sync(|recorder| recorder.begin_container(token, source, dest, unit)) }
    fn end_container(&mut self, token: ContainerToken)                      { self.sync(|recorder| recorder.end_container(token)) }
    fn add_transform(&mut self, transform: &AffineTransform, order: MatrixOrder) { self.sync(|recorder| recorder.add_transform(transform, order)) }

    fn draw_line(&mut self, pen: &Pen, from: Point, to: Point)              { self.sync(|recorder| recorder.draw_line(pen, from, to)) }
    fn draw_lines(&mut self, pen: &Pen, points: &[Point])                   { self.sync(|recorder| recorder.draw_lines(pen, points)) }
    fn draw_bezier(&mut self, pen: &Pen, start: Point, cp1: Point, cp2: Point, end: Point) { self.sync(|recorder| recorder.draw_bezier(pen, start, cp1, cp2, end)) }
    fn draw_beziers(&mut self, pen: &Pen, points: &[Point])                 { self.sync(|recorder| recorder.draw_beziers(pen, points)) }
    fn draw_rectangle(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, rect: Rect) { self.sync(|recorder| recorder.draw_rectangle(pen, brush, rect)) }
    fn draw_rectangles(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, rects: &[Rect]) { self.sync(|recorder| recorder.draw_rectangles(pen, brush, rects)) }
    fn draw_ellipse(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, bounds: Rect) { self.sync(|recorder| recorder.draw_ellipse(pen, brush, bounds)) }
    fn draw_polygon(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, points: &[Point], fill_mode: FillMode) { self.sync(|recorder| recorder.draw_polygon(pen, brush, points, fill_mode)) }
    fn draw_pie(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, bounds: Rect, start_degrees: f64, sweep_degrees: f64) { self.sync(|recorder| recorder.draw_pie(pen, brush, bounds, start_degrees, sweep_degrees)) }
    fn draw_path(&mut self, pen: Option<&Pen>, brush: Option<&Brush>, path: &Path) { self.sync(|recorder| recorder.draw_path(pen, brush, path)) }
    fn draw_image(&mut self, image: &ImageSource, dest: Rect)               { self.sync(|recorder| recorder.draw_image(image, dest)) }
    fn draw_string(&mut self, text: &str, font: &Font, brush: &Brush, origin: Point) { self.sync(|recorder| recorder.draw_string(text, font, brush, origin)) }

    fn set_clip(&mut self, path: &Path, combine: CombineMode)               { self.sync(|recorder| recorder.set_clip(path, combine)) }
    fn write_comment(&mut self, text: &str)                                 { self.sync(|recorder| recorder.write_comment(text)) }
    fn close(&mut self)                                                     { self.sync(|recorder| recorder.close()) }
}
