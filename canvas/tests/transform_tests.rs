use page_canvas::*;

fn close(a: Coord2, b: Coord2) -> bool {
    (a.x() - b.x()).abs() < 1e-9 && (a.y() - b.y()).abs() < 1e-9
}

fn sample_transforms() -> Vec<AffineTransform> {
    vec![
        AffineTransform::identity(),
        AffineTransform::translation(12.0, -3.5),
        AffineTransform::scaling(2.0, 0.25),
        AffineTransform::rotation(37.0),
        AffineTransform::rotation_at(90.0, Coord2(50.0, 20.0)),
        AffineTransform::skewing(20.0, -10.0),
        AffineTransform::new(1.5, 0.2, -0.3, 0.8, 7.0, 9.0),
    ]
}

#[test]
pub fn identity_is_neutral_in_both_orders() {
    let identity = AffineTransform::identity();

    for transform in sample_transforms() {
        assert!(AffineTransform::multiply(&identity, &transform, MatrixOrder::Append) == transform, "{:?}", transform);
        assert!(AffineTransform::multiply(&identity, &transform, MatrixOrder::Prepend) == transform, "{:?}", transform);
        assert!(AffineTransform::multiply(&transform, &identity, MatrixOrder::Append) == transform, "{:?}", transform);
        assert!(AffineTransform::multiply(&transform, &identity, MatrixOrder::Prepend) == transform, "{:?}", transform);
    }
}

#[test]
pub fn inverse_undoes_transform() {
    let points = vec![Coord2(0.0, 0.0), Coord2(1.0, 0.0), Coord2(-20.0, 13.5), Coord2(300.0, 400.0)];

    for transform in sample_transforms() {
        let inverse = transform.inverted().unwrap();

        for point in points.iter() {
            let round_trip = inverse.transform_point(transform.transform_point(*point));
            assert!(close(round_trip, *point), "{:?} {:?} -> {:?}", transform, point, round_trip);
        }
    }
}

#[test]
pub fn singular_transform_is_not_invertible() {
    let singular = AffineTransform::scaling(0.0, 1.0);

    assert!(!singular.is_invertible());
    assert!(singular.inverted() == Err(CanvasError::NotInvertible));
}

#[test]
pub fn append_and_prepend_differ() {
    // Rotate, then translate
    let mut appended = AffineTransform::rotation(90.0);
    appended.translate(10.0, 0.0, MatrixOrder::Append);

    // Translate, then rotate
    let mut prepended = AffineTransform::rotation(90.0);
    prepended.translate(10.0, 0.0, MatrixOrder::Prepend);

    let appended_point  = appended.transform_point(Coord2(1.0, 0.0));
    let prepended_point = prepended.transform_point(Coord2(1.0, 0.0));

    assert!(close(appended_point, Coord2(10.0, 1.0)), "{:?}", appended_point);
    assert!(close(prepended_point, Coord2(0.0, 11.0)), "{:?}", prepended_point);
}

#[test]
pub fn vectors_ignore_translation() {
    let transform   = AffineTransform::translation(100.0, 100.0);
    let vector      = transform.transform_vector(Coord2(3.0, 4.0));

    assert!(close(vector, Coord2(3.0, 4.0)), "{:?}", vector);
}

#[test]
pub fn dispatcher_effective_transform_includes_page_unit() {
    let settings        = PageSettings::new(210.0, 297.0).with_unit(PageUnit::Millimeter);
    let mut dispatcher  = RenderDispatcher::new(settings).unwrap();

    dispatcher.translate_transform(10.0, 0.0, MatrixOrder::Append).unwrap();

    let device_point = dispatcher.effective_transform().transform_point(Coord2(15.4, 0.0));
    assert!(close(device_point, Coord2(72.0, 0.0)), "{:?}", device_point);
}
