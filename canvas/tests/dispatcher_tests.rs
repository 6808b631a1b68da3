use page_canvas::*;

use desync::{Desync};

use std::sync::*;
use std::panic::{self, AssertUnwindSafe};

///
/// What a test surface was asked to do
///
#[derive(Clone, PartialEq, Debug)]
enum SurfaceCall {
    SetTransform(AffineTransform),
    Save(SurfaceStateId),
    Restore(SurfaceStateId),
    Line,
    Fill,
    Stroke,
    Text(String, Coord2),
    Image(ImageId),
    Clip(CombineMode),
    Release,
}

///
/// Surface backend that records the calls made to it
///
#[derive(Default)]
struct TestSurface {
    calls:      Vec<SurfaceCall>,
    next_state: u64,
}

impl SurfaceBackend for TestSurface {
    fn set_transform(&mut self, transform: &AffineTransform) { self.calls.push(SurfaceCall::SetTransform(*transform)); }

    fn save_state(&mut self) -> SurfaceStateId {
        self.next_state += 1;
        let state = SurfaceStateId(self.next_state);

        self.calls.push(SurfaceCall::Save(state));
        state
    }

    fn restore_state(&mut self, state: SurfaceStateId)                              { self.calls.push(SurfaceCall::Restore(state)); }
    fn draw_line(&mut self, _from: Coord2, _to: Coord2, _pen: &Pen)                 { self.calls.push(SurfaceCall::Line); }
    fn fill_path(&mut self, _path: &Path, _brush: &Brush)                           { self.calls.push(SurfaceCall::Fill); }
    fn stroke_path(&mut self, _path: &Path, _pen: &Pen)                             { self.calls.push(SurfaceCall::Stroke); }
    fn draw_text(&mut self, text: &str, _font: &Font, origin: Coord2, _brush: &Brush) { self.calls.push(SurfaceCall::Text(text.to_string(), origin)); }
    fn draw_image(&mut self, image: &ImageSource, _dest: Rect)                      { self.calls.push(SurfaceCall::Image(image.id)); }
    fn set_clip(&mut self, _path: &Path, combine: CombineMode)                      { self.calls.push(SurfaceCall::Clip(combine)); }
    fn release(&mut self)                                                           { self.calls.push(SurfaceCall::Release); }
}

fn surface_calls(surface: &SharedSurface<TestSurface>) -> Vec<SurfaceCall> {
    surface.sync(|surface| surface.calls.clone())
}

#[test]
pub fn fill_happens_before_stroke() {
    let surface         = SharedSurface::new(TestSurface::default());
    let mut dispatcher  = RenderDispatcher::new(PageSettings::a4()).unwrap().with_surface(surface.clone());

    dispatcher.draw_rectangle(Some(&Pen::default()), Some(&Brush::solid(Color::WHITE)), Rect::new(10.0, 10.0, 20.0, 20.0)).unwrap();

    let calls = surface_calls(&surface);
    assert!(calls == vec![SurfaceCall::SetTransform(AffineTransform::identity()), SurfaceCall::Fill, SurfaceCall::Stroke], "{:?}", calls);
}

#[test]
pub fn every_draw_sets_the_surface_transform() {
    let surface         = SharedSurface::new(TestSurface::default());
    let mut dispatcher  = RenderDispatcher::new(PageSettings::a4()).unwrap().with_surface(surface.clone());
    let pen             = Pen::default();

    dispatcher.draw_line(&pen, Coord2(0.0, 0.0), Coord2(10.0, 10.0)).unwrap();
    dispatcher.scale_transform(2.0, 2.0, MatrixOrder::Append).unwrap();
    dispatcher.draw_line(&pen, Coord2(0.0, 0.0), Coord2(10.0, 10.0)).unwrap();

    let calls = surface_calls(&surface);
    assert!(calls == vec![
        SurfaceCall::SetTransform(AffineTransform::identity()),
        SurfaceCall::Line,
        SurfaceCall::SetTransform(AffineTransform::scaling(2.0, 2.0)),
        SurfaceCall::Line,
    ], "{:?}", calls);
}

#[test]
pub fn dispatchers_sharing_a_surface_each_use_their_own_transform() {
    let surface         = SharedSurface::new(TestSurface::default());
    let mut first       = RenderDispatcher::new(PageSettings::a4()).unwrap().with_surface(surface.clone());
    let mut second      = RenderDispatcher::new(PageSettings::a4()).unwrap().with_surface(surface.clone());
    let pen             = Pen::default();

    first.translate_transform(100.0, 0.0, MatrixOrder::Append).unwrap();

    first.draw_line(&pen, Coord2(0.0, 0.0), Coord2(1.0, 1.0)).unwrap();
    second.draw_line(&pen, Coord2(0.0, 0.0), Coord2(1.0, 1.0)).unwrap();
    first.draw_line(&pen, Coord2(0.0, 0.0), Coord2(1.0, 1.0)).unwrap();

    // The transform in force when each line was drawn
    let calls       = surface_calls(&surface);
    let mut current = None;
    let mut drawn   = vec![];
    for call in calls.iter() {
        match call {
            SurfaceCall::SetTransform(transform)    => current = Some(*transform),
            SurfaceCall::Line                       => drawn.push(current),
            _                                       => { }
        }
    }

    let translated = Some(AffineTransform::translation(100.0, 0.0));
    assert!(drawn == vec![translated, Some(AffineTransform::identity()), translated], "{:?}", calls);
}

#[test]
pub fn surface_gets_effective_transform() {
    let surface         = SharedSurface::new(TestSurface::default());
    let settings        = PageSettings::new(8.5, 11.0).with_unit(PageUnit::Inch);
    let mut dispatcher  = RenderDispatcher::new(settings).unwrap().with_surface(surface.clone());

    dispatcher.translate_transform(1.0, 2.0, MatrixOrder::Append).unwrap();
    dispatcher.draw_ellipse(None, Some(&Brush::solid(Color::BLACK)), Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();

    let calls = surface_calls(&surface);
    assert!(calls[0] == SurfaceCall::SetTransform(AffineTransform::new(72.0, 0.0, 0.0, 72.0, 72.0, 144.0)), "{:?}", calls);
}

#[test]
pub fn restore_unwinds_surface_states() {
    let surface         = SharedSurface::new(TestSurface::default());
    let mut dispatcher  = RenderDispatcher::new(PageSettings::a4()).unwrap().with_surface(surface.clone());

    let first   = dispatcher.save().unwrap();
    dispatcher.rotate_transform(45.0, MatrixOrder::Prepend).unwrap();
    let _second = dispatcher.save().unwrap();
    dispatcher.restore(first).unwrap();

    assert!(dispatcher.transform().is_identity());

    let calls = surface_calls(&surface);
    assert!(calls == vec![
        SurfaceCall::Save(SurfaceStateId(1)),
        SurfaceCall::Save(SurfaceStateId(2)),
        SurfaceCall::Restore(SurfaceStateId(2)),
        SurfaceCall::Restore(SurfaceStateId(1)),
    ], "{:?}", calls);

    // Drawing after a restore sets the transform on the surface again
    dispatcher.draw_line(&Pen::default(), Coord2(0.0, 0.0), Coord2(1.0, 1.0)).unwrap();
    let calls = surface_calls(&surface);
    assert!(calls[4] == SurfaceCall::SetTransform(AffineTransform::identity()), "{:?}", calls);
}

#[test]
pub fn save_and_restore_stay_balanced() {
    let recording       = Arc::new(Desync::new(Vec::<RecordedDraw>::new()));
    let mut dispatcher  = RenderDispatcher::new(PageSettings::a4()).unwrap().with_recorder(Arc::clone(&recording));
    let pen             = Pen::default();

    let outer       = dispatcher.save().unwrap();
    dispatcher.translate_transform(5.0, 5.0, MatrixOrder::Prepend).unwrap();
    let container   = dispatcher.begin_container(Rect::new(0.0, 0.0, 200.0, 200.0), Rect::new(0.0, 0.0, 100.0, 100.0), PageUnit::Point).unwrap();
    dispatcher.draw_line(&pen, Coord2(0.0, 0.0), Coord2(10.0, 0.0)).unwrap();
    let inner       = dispatcher.save().unwrap();
    dispatcher.draw_line(&pen, Coord2(0.0, 0.0), Coord2(10.0, 0.0)).unwrap();

    dispatcher.restore(inner).unwrap();
    dispatcher.end_container(container).unwrap();
    dispatcher.restore(outer).unwrap();
    dispatcher.dispose();

    let recording   = recording.sync(|recording| recording.clone());
    let mut depth   = 0i32;
    for draw in recording.iter() {
        match draw {
            RecordedDraw::Save(_) | RecordedDraw::BeginContainer(..)    => depth += 1,
            RecordedDraw::Restore(_) | RecordedDraw::EndContainer(_)    => depth -= 1,
            _                                                           => { }
        }

        assert!(depth >= 0, "{:?}", recording);
    }

    assert!(depth == 0, "{:?}", recording);
    assert!(recording.last() == Some(&RecordedDraw::Close), "{:?}", recording);
}

#[test]
pub fn restoring_an_unknown_token_fails() {
    let mut dispatcher  = RenderDispatcher::new(PageSettings::a4()).unwrap();
    let token           = dispatcher.save().unwrap();

    dispatcher.restore(token).unwrap();
    let result = dispatcher.restore(token);

    assert!(matches!(result, Err(CanvasError::InvalidState(_))), "{:?}", result);
}

#[test]
pub fn token_from_another_dispatcher_is_rejected() {
    let mut first       = RenderDispatcher::new(PageSettings::a4()).unwrap();
    let mut second      = RenderDispatcher::new(PageSettings::a4()).unwrap();

    let first_token     = first.save().unwrap();
    let _second_token   = second.save().unwrap();
    let result          = second.restore(first_token);

    assert!(matches!(result, Err(CanvasError::InvalidState(_))), "{:?}", result);
    assert!(first.restore(first_token).is_ok());
}

#[test]
pub fn text_goes_to_both_sinks() {
    let surface         = SharedSurface::new(TestSurface::default());
    let recording       = Arc::new(Desync::new(Vec::<RecordedDraw>::new()));
    let mut dispatcher  = RenderDispatcher::new(PageSettings::a4()).unwrap()
        .with_surface(surface.clone())
        .with_recorder(Arc::clone(&recording));
    let font            = Font::new("Helvetica", 10.0);
    let brush           = Brush::solid(Color::BLACK);

    dispatcher.draw_string("Hi", &font, &brush, Rect::new(20.0, 30.0, 0.0, 0.0), &StringFormat::new(StringAlignment::Near, LineAlignment::BaseLine)).unwrap();

    let calls       = surface_calls(&surface);
    let recording   = recording.sync(|recording| recording.clone());

    assert!(calls.last() == Some(&SurfaceCall::Text("Hi".to_string(), Coord2(20.0, 30.0))), "{:?}", calls);
    assert!(recording.last() == Some(&RecordedDraw::String("Hi".to_string(), font, brush, (20.0, 30.0))), "{:?}", recording);
}

#[test]
pub fn comments_only_go_to_recorder() {
    let surface         = SharedSurface::new(TestSurface::default());
    let recording       = Arc::new(Desync::new(Vec::<RecordedDraw>::new()));
    let mut dispatcher  = RenderDispatcher::new(PageSettings::a4()).unwrap()
        .with_surface(surface.clone())
        .with_recorder(Arc::clone(&recording));

    dispatcher.write_comment("hello").unwrap();

    assert!(surface_calls(&surface).is_empty());
    assert!(recording.sync(|recording| recording.last().cloned()) == Some(RecordedDraw::Comment("hello".to_string())));
}

#[test]
pub fn dispose_releases_surface_once() {
    let surface         = SharedSurface::new(TestSurface::default());
    let mut dispatcher  = RenderDispatcher::new(PageSettings::a4()).unwrap().with_surface(surface.clone());

    dispatcher.dispose();
    dispatcher.dispose();
    drop(dispatcher);

    let calls = surface_calls(&surface);
    assert!(calls == vec![SurfaceCall::Release], "{:?}", calls);
}

#[test]
pub fn drop_during_a_panic_leaves_the_surface_alone() {
    let surface             = SharedSurface::new(TestSurface::default());
    let dispatcher_surface  = surface.clone();

    let result = panic::catch_unwind(AssertUnwindSafe(move || {
        let mut dispatcher = RenderDispatcher::new(PageSettings::a4()).unwrap().with_surface(dispatcher_surface);
        dispatcher.save().unwrap();

        panic!("Drawing failed");
    }));

    assert!(result.is_err());

    // Only the save made it to the surface: the state is not unwound and the surface is not released
    let calls = surface_calls(&surface);
    assert!(calls == vec![SurfaceCall::Save(SurfaceStateId(1))], "{:?}", calls);
}

#[test]
pub fn content_stream_from_dispatcher() {
    let recorder        = Arc::new(Desync::new(ContentStreamRecorder::new()));
    let mut dispatcher  = RenderDispatcher::new(PageSettings::a4()).unwrap().with_recorder(Arc::clone(&recorder));

    let state = dispatcher.save().unwrap();
    dispatcher.translate_transform(10.0, 20.0, MatrixOrder::Prepend).unwrap();
    dispatcher.draw_rectangle(None, Some(&Brush::solid(Color::Gray(0.5, 1.0))), Rect::new(0.0, 0.0, 30.0, 40.0)).unwrap();
    dispatcher.restore(state).unwrap();
    dispatcher.dispose();

    let content = recorder.sync(|recorder| recorder.content().to_string());
    assert!(content == "q\n1 0 0 1 10 20 cm\n0.5 g\n0 0 30 40 re\nf\nQ\n", "{:?}", content);
}
