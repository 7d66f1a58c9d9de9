use geo::{Coord, MultiPolygon, Rect};
use oasurface::{
    AreaReport, BoundaryPolygon, CandidateLayer, ClassUnions, Crs, SurfaceClass, SurfaceError,
    Tolerance, classify, clip, kernel, report,
};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![Rect::new(Coord { x: x0, y: y0 }, Coord { x: x1, y: y1 }).to_polygon()])
}

fn square_boundary() -> BoundaryPolygon {
    BoundaryPolygon::new(rect(0.0, 0.0, 100.0, 100.0), Crs::BritishNationalGrid).unwrap()
}

/// Clip, classify and account in one go, all inputs already planar.
fn run(
    boundary: &BoundaryPolygon,
    buildings: Vec<MultiPolygon<f64>>,
    car_parks: Vec<MultiPolygon<f64>>,
    greenspace: Vec<MultiPolygon<f64>>,
) -> (ClassUnions, AreaReport) {
    let crs = boundary.crs().clone();
    let buildings = clip(&CandidateLayer::buildings(buildings, crs.clone()), boundary).unwrap();
    let car_parks = clip(&CandidateLayer::car_parks(car_parks, crs.clone()), boundary).unwrap();
    let greenspace = clip(&CandidateLayer::greenspace(greenspace, crs), boundary).unwrap();

    let unions = classify(boundary, &buildings, &car_parks, &greenspace).unwrap();
    let report = report(boundary, &unions).unwrap();
    (unions, report)
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-6, "expected {expected}, got {actual}");
}

/// Overlapping strips: buildings x∈[0,30], car park x∈[25,40], greenspace x∈[32,52].
fn strips() -> (ClassUnions, AreaReport) {
    run(
        &square_boundary(),
        vec![rect(0.0, 0.0, 30.0, 100.0)],
        vec![rect(25.0, 0.0, 40.0, 100.0)],
        vec![rect(32.0, 0.0, 52.0, 100.0)],
    )
}

#[test]
fn overlapping_strips_resolve_by_priority() {
    let (_, report) = strips();

    assert_close(report.boundary_area_m2, 10_000.0);
    assert_close(report.get(SurfaceClass::Building).area_m2, 3_000.0);
    assert_close(report.get(SurfaceClass::CarPark).area_m2, 1_000.0);
    assert_close(report.get(SurfaceClass::Greenspace).area_m2, 1_200.0);
    assert_close(report.get(SurfaceClass::Opportunity).area_m2, 4_800.0);

    assert_close(report.get(SurfaceClass::Building).percentage, 30.0);
    assert_close(report.get(SurfaceClass::CarPark).percentage, 10.0);
    assert_close(report.get(SurfaceClass::Greenspace).percentage, 12.0);
    assert_close(report.get(SurfaceClass::Opportunity).percentage, 48.0);
}

#[test]
fn table_shows_rounded_areas_and_one_decimal_shares() {
    let (_, report) = strips();
    let table = report.to_string();

    assert!(table.contains("Buildings"));
    assert!(table.contains("3,000"));
    assert!(table.contains("30.0%"));
    assert!(table.contains("Car Park"));
    assert!(table.contains("4,800"));
    assert!(table.contains("48.0%"));
}

#[test]
fn class_areas_add_up_to_boundary() {
    let (_, report) = strips();
    assert!(report.is_conserved(&Tolerance::default()));
    assert!(Tolerance::default().approx_eq(report.total_percentage(), 100.0, 100.0));
}

#[test]
fn classes_do_not_overlap() {
    let (unions, _) = strips();
    let classes = unions.iter().collect::<Vec<_>>();

    for (i, (a_class, a)) in classes.iter().enumerate() {
        for (b_class, b) in &classes[i + 1..] {
            let overlap = kernel::area(&kernel::intersection(a, b));
            assert!(overlap < 1e-6, "{a_class} and {b_class} overlap by {overlap} m²");
        }
    }
}

#[test]
fn every_class_stays_inside_boundary() {
    let boundary = square_boundary();
    let (unions, _) = run(
        &boundary,
        vec![rect(-50.0, -50.0, 20.0, 20.0)],
        vec![rect(90.0, 90.0, 150.0, 150.0)],
        vec![rect(-10.0, 40.0, 110.0, 60.0)],
    );

    for (class, shape) in unions.iter() {
        let outside = kernel::area(&kernel::difference(shape, boundary.shape()));
        assert!(outside < 1e-6, "{class} has {outside} m² outside the boundary");
    }
}

#[test]
fn adding_a_building_only_takes_area_from_lower_classes() {
    let boundary = square_boundary();
    let base = run(&boundary, vec![rect(0.0, 0.0, 30.0, 100.0)], vec![rect(25.0, 0.0, 40.0, 100.0)], vec![rect(32.0, 0.0, 52.0, 100.0)]).1;
    let more = run(
        &boundary,
        vec![rect(0.0, 0.0, 30.0, 100.0), rect(45.0, 0.0, 60.0, 50.0)],
        vec![rect(25.0, 0.0, 40.0, 100.0)],
        vec![rect(32.0, 0.0, 52.0, 100.0)],
    ).1;

    let area = |report: &AreaReport, class| report.get(class).area_m2;
    assert!(area(&more, SurfaceClass::Building) > area(&base, SurfaceClass::Building));
    assert!(area(&more, SurfaceClass::CarPark) <= area(&base, SurfaceClass::CarPark) + 1e-9);
    assert!(area(&more, SurfaceClass::Greenspace) < area(&base, SurfaceClass::Greenspace));
    assert!(area(&more, SurfaceClass::Opportunity) < area(&base, SurfaceClass::Opportunity));
    assert!(more.is_conserved(&Tolerance::default()));
}

#[test]
fn empty_car_park_layer_leaves_other_classes_intact() {
    let (unions, report) = run(
        &square_boundary(),
        vec![rect(0.0, 0.0, 30.0, 100.0)],
        vec![],
        vec![rect(32.0, 0.0, 52.0, 100.0)],
    );

    assert!(kernel::is_empty(&unions.car_park));
    assert_eq!(report.get(SurfaceClass::CarPark).area_m2, 0.0);
    assert_eq!(report.get(SurfaceClass::CarPark).percentage, 0.0);
    assert_close(report.get(SurfaceClass::Greenspace).area_m2, 2_000.0);
    assert_close(report.get(SurfaceClass::Opportunity).area_m2, 5_000.0);
}

#[test]
fn greenspace_covering_everything_leaves_no_opportunity() {
    let (unions, report) = run(&square_boundary(), vec![], vec![], vec![rect(-10.0, -10.0, 110.0, 110.0)]);
    assert_close(report.get(SurfaceClass::Greenspace).percentage, 100.0);
    assert!(kernel::area(&unions.opportunity) < 1e-6);
}

#[test]
fn result_does_not_depend_on_input_order() {
    let boundary = square_boundary();
    let mut buildings = (0..12)
        .map(|i| {
            let x = 7.0 * i as f64;
            rect(x, 10.0 + i as f64, x + 9.0, 40.0 + 2.0 * i as f64)
        })
        .collect::<Vec<_>>();
    let mut car_parks = vec![rect(5.0, 30.0, 60.0, 55.0), rect(50.0, 0.0, 95.0, 20.0), rect(70.0, 50.0, 120.0, 70.0)];
    let mut greenspace = vec![rect(-5.0, 60.0, 50.0, 105.0), rect(40.0, 45.0, 80.0, 90.0)];

    let (expected_unions, expected) = run(&boundary, buildings.clone(), car_parks.clone(), greenspace.clone());

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..5 {
        buildings.shuffle(&mut rng);
        car_parks.shuffle(&mut rng);
        greenspace.shuffle(&mut rng);

        let (unions, report) = run(&boundary, buildings.clone(), car_parks.clone(), greenspace.clone());
        for class in SurfaceClass::ALL {
            assert_eq!(report.get(class).area_m2, expected.get(class).area_m2, "{class} area changed");
            assert_eq!(unions.get(class), expected_unions.get(class), "{class} geometry changed");
        }
    }
}

#[test]
fn degenerate_boundary_is_rejected_before_classification() {
    let flat = rect(0.0, 0.0, 100.0, 0.0);
    let err = BoundaryPolygon::new(flat, Crs::BritishNationalGrid).unwrap_err();
    assert!(matches!(err, SurfaceError::InvalidBoundary { .. }));
    assert!(!err.is_user_correctable());
}
