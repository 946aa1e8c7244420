use std::f64::consts::TAU;

use approx::assert_relative_eq;
use nalgebra::Point2;

use crate::curve::{BSplineCurve2D, KnotStyle};
use crate::fitting::FitOptions;
use crate::misc::linspace;

use super::{try_resample, ResampleOptions};

fn ellipse(count: usize, a: f64, b: f64) -> Vec<Point2<f64>> {
    (0..count)
        .map(|i| {
            let t = TAU * i as f64 / (count - 1) as f64;
            Point2::new(a * t.cos(), b * t.sin())
        })
        .collect()
}

/// Boundary of the square [-1, 1]^2 starting and ending at the middle of the bottom edge,
/// sampled every `spacing`
fn square(spacing: f64) -> Vec<Point2<f64>> {
    let vertices: [Point2<f64>; 6] = [
        Point2::new(0., -1.),
        Point2::new(1., -1.),
        Point2::new(1., 1.),
        Point2::new(-1., 1.),
        Point2::new(-1., -1.),
        Point2::new(0., -1.),
    ];
    let mut points: Vec<Point2<f64>> = vertices
        .windows(2)
        .flat_map(|w| {
            let (a, b) = (w[0], w[1]);
            let steps = ((b - a).norm() / spacing).round() as usize;
            (0..steps).map(move |i| a + (b - a) * (i as f64 / steps as f64))
        })
        .collect();
    points.push(vertices[5]);
    points
}

fn mean_nearest_neighbor(points: &[Point2<f64>], selected: impl Fn(&Point2<f64>) -> bool) -> f64 {
    let distances: Vec<f64> = points
        .iter()
        .enumerate()
        .filter(|(_, p)| selected(p))
        .map(|(i, p)| {
            points
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, q)| (p - q).norm())
                .fold(f64::INFINITY, f64::min)
        })
        .collect();
    assert!(!distances.is_empty());
    distances.iter().sum::<f64>() / distances.len() as f64
}

#[test]
fn output_size_is_fixed() {
    for (input, count) in [(20, 64), (200, 64), (35, 7), (500, 128)] {
        let points = ellipse(input, 1., 0.3);
        let options = ResampleOptions::default().with_count(count);
        let resampled = try_resample(&points, &options).unwrap();
        assert_eq!(resampled.len(), count);
        assert_eq!(resampled.xs().len(), count);
        assert_eq!(resampled.ys().len(), count);
        assert_eq!(resampled.parameters().len(), count);
    }
}

#[test]
fn resampling_is_deterministic() {
    let points = ellipse(80, 1., 0.1);
    let options = ResampleOptions::default();
    let a = try_resample(&points, &options).unwrap();
    let b = try_resample(&points, &options).unwrap();
    assert_eq!(a, b);
}

#[test]
fn unit_circle() {
    let points = ellipse(200, 1., 1.);
    let resampled = try_resample(&points, &ResampleOptions::default()).unwrap();
    assert_eq!(resampled.len(), 64);
    assert!(resampled.status().is_success(), "{}", resampled.status());
    assert!(resampled.residual() < 1.001e-6);
    for p in resampled.points() {
        assert_relative_eq!(p.coords.norm(), 1., epsilon = 1e-2);
    }
    // endpoints of the open curve are kept
    assert_relative_eq!(resampled.points()[0], points[0], epsilon = 1e-2);
    assert_relative_eq!(resampled.points()[63], points[199], epsilon = 1e-2);
}

#[test]
fn points_concentrate_where_curvature_is_high() {
    // the tips of a flat ellipse bend 64 times more than its sides
    let points = ellipse(200, 1., 0.25);
    let count = 64;
    let options = ResampleOptions::default()
        .with_count(count)
        .with_curvature_offset(2.);
    let resampled = try_resample(&points, &options).unwrap();

    let fit = BSplineCurve2D::try_smoothing_fit(&points, 3, &FitOptions::default()).unwrap();
    let uniform = fit.curve().points_at(&linspace(0., 1., count));

    let at_tips = |ps: &[Point2<f64>]| ps.iter().filter(|p| p.x.abs() > 0.9).count();
    assert!(
        at_tips(resampled.points()) > at_tips(&uniform),
        "{} <= {}",
        at_tips(resampled.points()),
        at_tips(&uniform)
    );
}

#[test]
fn corners_are_denser_than_edges() {
    let points = square(0.05);
    let options = ResampleOptions::default().with_curvature_offset(1.);
    let resampled = try_resample(&points, &options).unwrap();
    assert_eq!(resampled.len(), 64);

    let near_corner = |p: &Point2<f64>| (p.x.abs() - 1.).abs() < 0.2 && (p.y.abs() - 1.).abs() < 0.2;
    // the bottom edge holds both ends of the open curve
    let near_middle = |p: &Point2<f64>| {
        (p.x.abs() < 0.4 && (p.y - 1.).abs() < 0.1)
            || (p.y.abs() < 0.4 && (p.x.abs() - 1.).abs() < 0.1)
    };
    let corner_spacing = mean_nearest_neighbor(resampled.points(), near_corner);
    let middle_spacing = mean_nearest_neighbor(resampled.points(), near_middle);
    assert!(
        corner_spacing * 2. < middle_spacing,
        "corner {} middle {}",
        corner_spacing,
        middle_spacing
    );
}

#[test]
fn single_point_is_the_start_of_the_curve() {
    let points = ellipse(60, 1., 0.4);
    let resampled = try_resample(&points, &ResampleOptions::default().with_count(1)).unwrap();
    assert_eq!(resampled.len(), 1);
    assert_eq!(resampled.parameters(), &[0.]);
    assert_relative_eq!(resampled.points()[0], points[0], epsilon = 1e-2);
}

#[test]
fn zero_points_are_rejected() {
    let points = ellipse(60, 1., 0.4);
    assert!(try_resample(&points, &ResampleOptions::default().with_count(0)).is_err());
    assert!(try_resample(&points, &ResampleOptions::default().with_resolution(1)).is_err());
    assert!(try_resample(&points, &ResampleOptions::default().with_curvature_offset(-1.)).is_err());
}

#[test]
fn fit_settings_are_forwarded() {
    let points = ellipse(60, 1., 0.4);
    let fit = FitOptions::default()
        .with_knot_style(KnotStyle::Centripetal)
        .with_smoothing(1e-4);
    let options = ResampleOptions::default().with_degree(5).with_fit(fit.clone());
    let resampled = try_resample(&points, &options).unwrap();
    assert_eq!(resampled.len(), 64);

    let direct = BSplineCurve2D::try_smoothing_fit(&points, 5, &fit).unwrap();
    assert_eq!(resampled.residual(), direct.residual());
    assert_eq!(resampled.status(), direct.status());

    assert!(try_resample(&points, &ResampleOptions::default().with_degree(6)).is_err());
}

#[test]
fn curvature_offset_must_be_positive() {
    // straight edges have no curvature, so the profile would be flat there
    let points = square(0.05);
    let options = ResampleOptions::default().with_curvature_offset(0.);
    let error = try_resample(&points, &options).unwrap_err();
    assert!(error.to_string().contains("curvature offset"), "{}", error);
    let options = options.with_curvature_offset(f64::NAN);
    assert!(try_resample(&points, &options).is_err());
    assert!(try_resample(&points, &options.with_curvature_offset(0.1)).is_ok());
}

#[test]
fn large_offset_converges_to_uniform_parameters() {
    let points = ellipse(100, 1., 0.1);
    let count = 32;
    let options = ResampleOptions::default()
        .with_count(count)
        .with_curvature_offset(1e9);
    let resampled = try_resample(&points, &options).unwrap();
    for (u, expected) in resampled.parameters().iter().zip(linspace(0., 1., count)) {
        assert_relative_eq!(*u, expected, epsilon = 1e-5);
    }
}

#[test]
fn fit_failures_are_propagated() {
    let too_few = ellipse(3, 1., 1.);
    assert!(try_resample(&too_few, &ResampleOptions::default()).is_err());

    let mut duplicated = ellipse(30, 1., 0.5);
    duplicated[10] = duplicated[9];
    assert!(try_resample(&duplicated, &ResampleOptions::default()).is_err());
}
