use page_canvas::*;

use std::f64;

fn star() -> Vec<Coord2> {
    // Five-pointed star drawn in one stroke, so its middle is wound twice
    (0..5).map(|idx| {
        let angle = (idx as f64) * 144.0_f64.to_radians() - f64::consts::FRAC_PI_2;
        Coord2(100.0 + 50.0 * angle.cos(), 100.0 + 50.0 * angle.sin())
    }).collect()
}

#[test]
pub fn star_center_depends_on_fill_mode() {
    let mut non_zero = Path::with_fill_mode(FillMode::NonZero);
    non_zero.add_polygon(&star()).unwrap();

    let mut even_odd = Path::with_fill_mode(FillMode::EvenOdd);
    even_odd.add_polygon(&star()).unwrap();

    assert!(non_zero.contains(Coord2(100.0, 100.0)));
    assert!(!even_odd.contains(Coord2(100.0, 100.0)));

    // Points in the arms of the star are inside either way
    let arm = Coord2(100.0, 60.0);
    assert!(non_zero.contains(arm) && even_odd.contains(arm));
}

#[test]
pub fn figures_stay_separate() {
    let mut path = Path::new();

    path.add_line(Coord2(0.0, 0.0), Coord2(10.0, 0.0)).unwrap();
    path.start_figure();
    path.add_line(Coord2(0.0, 10.0), Coord2(10.0, 10.0)).unwrap();

    assert!(path.subpaths().len() == 2, "{:?}", path.subpaths());
    assert!(path.point_count() == 4, "{}", path.point_count());
}

#[test]
pub fn lines_continue_the_current_figure() {
    let mut path = Path::new();

    path.add_line(Coord2(0.0, 0.0), Coord2(10.0, 0.0)).unwrap();
    path.add_line(Coord2(10.0, 0.0), Coord2(10.0, 10.0)).unwrap();

    assert!(path.subpaths().len() == 1, "{:?}", path.subpaths());
    assert!(path.current_point() == Some(Coord2(10.0, 10.0)));
}

#[test]
pub fn bezier_point_count_is_checked() {
    let mut path = Path::new();
    let result   = path.add_beziers(&[Coord2(0.0, 0.0), Coord2(1.0, 1.0), Coord2(2.0, 2.0)]);

    assert!(matches!(result, Err(CanvasError::GeometryError(_))), "{:?}", result);
    assert!(path.is_empty());
}

#[test]
pub fn transformed_bounds() {
    let mut path = Path::new();
    path.add_rectangle(Rect::new(0.0, 0.0, 10.0, 20.0)).unwrap();
    path.transform(&AffineTransform::translation(5.0, 5.0));

    let bounds = path.bounds().unwrap();
    assert!((bounds.left() - 5.0).abs() < 1e-9 && (bounds.bottom() - 25.0).abs() < 1e-9, "{:?}", bounds);
}

#[test]
pub fn widened_line_covers_its_width() {
    let mut path = Path::new();
    path.add_line(Coord2(0.0, 0.0), Coord2(100.0, 0.0)).unwrap();
    path.widen(&Pen::new(Color::BLACK, 10.0), None, DEFAULT_FLATNESS).unwrap();

    assert!(path.contains(Coord2(50.0, 4.0)));
    assert!(path.contains(Coord2(50.0, -4.0)));
    assert!(!path.contains(Coord2(50.0, 6.0)));
}

#[test]
pub fn path_survives_serialization() {
    let mut path = Path::with_fill_mode(FillMode::NonZero);
    path.add_ellipse(Rect::new(0.0, 0.0, 40.0, 20.0)).unwrap();
    path.add_line(Coord2(0.0, 0.0), Coord2(5.0, 5.0)).unwrap();

    let json    = serde_json::to_string(&path.to_path_ops()).unwrap();
    let ops     = serde_json::from_str::<Vec<PathOp>>(&json).unwrap();
    let decoded = Path::from_path_ops(&ops, FillMode::NonZero).unwrap();

    assert!(decoded.to_path_ops() == path.to_path_ops(), "{}", json);
}
