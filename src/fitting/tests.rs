use std::f64::consts::TAU;

use approx::assert_relative_eq;
use nalgebra::Point2;

use crate::curve::BSplineCurve2D;

use super::{FitOptions, FitStatus};

fn unit_circle(count: usize) -> Vec<Point2<f64>> {
    (0..count)
        .map(|i| {
            let t = TAU * i as f64 / (count - 1) as f64;
            Point2::new(t.cos(), t.sin())
        })
        .collect()
}

fn wave(count: usize, noise: f64) -> Vec<Point2<f64>> {
    (0..count)
        .map(|i| {
            let x = i as f64 / (count - 1) as f64;
            let sign = if i % 2 == 0 { 1. } else { -1. };
            Point2::new(x, (x * 6.).sin() * 0.3 + sign * noise)
        })
        .collect()
}

#[test]
fn interpolating_fit() {
    let points = wave(12, 0.);
    let options = FitOptions::default().with_smoothing(0.);
    let fit = BSplineCurve2D::try_smoothing_fit(&points, 3, &options).unwrap();
    assert_eq!(fit.status(), FitStatus::Interpolating);
    assert_eq!(fit.residual(), 0.);
    assert_eq!(fit.curve().control_points().len(), points.len());
    for (u, p) in fit.parameters().iter().zip(points.iter()) {
        assert_relative_eq!(fit.curve().point_at(*u), *p, epsilon = 1e-9);
    }
}

#[test]
fn even_degree_interpolation() {
    let points = wave(9, 0.);
    let options = FitOptions::default().with_smoothing(0.);
    let fit = BSplineCurve2D::try_smoothing_fit(&points, 2, &options).unwrap();
    for (u, p) in fit.parameters().iter().zip(points.iter()) {
        assert_relative_eq!(fit.curve().point_at(*u), *p, epsilon = 1e-9);
    }
}

#[test]
fn collinear_points_give_polynomial() {
    let points: Vec<_> = (0..10).map(|i| Point2::new(i as f64, 2. * i as f64)).collect();
    let fit = BSplineCurve2D::try_smoothing_fit(&points, 3, &FitOptions::default()).unwrap();
    assert_eq!(fit.status(), FitStatus::Polynomial);
    assert_eq!(fit.status().code(), -2);
    assert_eq!(fit.curve().knots().len(), 8);
    assert!(fit.residual() < 1e-12);
}

#[test]
fn unit_circle_fit() {
    let points = unit_circle(200);
    let fit = BSplineCurve2D::try_smoothing_fit(&points, 3, &FitOptions::default()).unwrap();
    assert_eq!(fit.status(), FitStatus::Converged);
    assert!(fit.residual() < 1.001e-6);
    assert_eq!(fit.parameter_range(), (0., 1.));

    let curve = fit.curve();
    for (u, p) in fit.parameters().iter().zip(points.iter()) {
        assert_relative_eq!(curve.point_at(*u), *p, epsilon = 1e-3);
    }
}

#[test]
fn smoothing_search_converges_on_dense_circles() {
    // fp(p) spans several decades over the bracket for these sizes
    let options = FitOptions::default();
    assert_eq!(options.max_iters, 20);
    for count in [150, 200, 250, 300, 400] {
        let fit = BSplineCurve2D::try_smoothing_fit(&unit_circle(count), 3, &options).unwrap();
        assert_eq!(fit.status(), FitStatus::Converged, "{} points", count);
        assert_relative_eq!(fit.residual(), 1e-6, max_relative = 1e-3);
    }
}

#[test]
fn smoothing_meets_bound() {
    let points = wave(60, 0.01);
    let s = 60. * 0.01 * 0.01;
    let options = FitOptions::default().with_smoothing(s);
    let fit = BSplineCurve2D::try_smoothing_fit(&points, 3, &options).unwrap();
    assert!(fit.status().is_success(), "{}", fit.status());
    assert!(fit.residual() <= s * 1.001);

    // the fit follows the underlying wave rather than the noise
    let curve = fit.curve();
    for (u, p) in fit.parameters().iter().zip(points.iter()) {
        let q = curve.point_at(*u);
        assert!((q.y - (p.x * 6.).sin() * 0.3).abs() < 0.05);
    }
}

#[test]
fn deterministic() {
    let points = wave(40, 0.002);
    let options = FitOptions::default().with_smoothing(1e-4);
    let a = BSplineCurve2D::try_smoothing_fit(&points, 3, &options).unwrap();
    let b = BSplineCurve2D::try_smoothing_fit(&points, 3, &options).unwrap();
    assert_eq!(a.curve(), b.curve());
    assert_eq!(a.residual(), b.residual());
}

#[test]
fn invalid_inputs() {
    let points = wave(3, 0.);
    let options = FitOptions::default();
    assert!(BSplineCurve2D::try_smoothing_fit(&points, 3, &options).is_err());
    assert!(BSplineCurve2D::try_smoothing_fit(&wave(10, 0.), 0, &options).is_err());
    assert!(BSplineCurve2D::try_smoothing_fit(&wave(10, 0.), 6, &options).is_err());

    let mut duplicated = wave(10, 0.);
    duplicated[4] = duplicated[3];
    assert!(BSplineCurve2D::try_smoothing_fit(&duplicated, 3, &options).is_err());

    let mut broken = wave(10, 0.);
    broken[2].x = f64::NAN;
    assert!(BSplineCurve2D::try_smoothing_fit(&broken, 3, &options).is_err());

    let negative = FitOptions::default().with_smoothing(-1.);
    assert!(BSplineCurve2D::try_smoothing_fit(&wave(10, 0.), 3, &negative).is_err());
}

#[test]
fn iteration_limit_is_reported() {
    let options = FitOptions::default()
        .with_max_iters(1)
        .with_tolerance(1e-6);
    let fit = BSplineCurve2D::try_smoothing_fit(&unit_circle(200), 3, &options).unwrap();
    assert_eq!(fit.status(), FitStatus::IterationLimit);
    assert!(fit.status().is_warning());
    assert!(fit.residual() > options.smoothing);
}

#[test]
fn status_codes_round_trip() {
    for code in [-2, -1, 0, 2, 3] {
        let status = FitStatus::from_code(code).unwrap();
        assert_eq!(status.code(), code);
        assert_eq!(status.is_success(), code <= 0);
    }
    assert!(FitStatus::from_code(10).is_none());
    assert_eq!(serde_json::to_string(&FitStatus::IterationLimit).unwrap(), "3");
}
