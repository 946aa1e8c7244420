use std::path::Path;

use anyhow::Context;
use nalgebra::Point2;

use crate::misc::FloatingPoint;

/// Read the outline points stored in a coordinate file
///
/// See [`parse_coordinates`] for the accepted layouts.
pub fn read_coordinates<T: FloatingPoint>(path: impl AsRef<Path>) -> anyhow::Result<Vec<Point2<T>>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_coordinates(&content).with_context(|| format!("Invalid coordinate file {}", path.display()))
}

/// Parse the outline points of a coordinate file
///
/// Each data line holds one `x y` pair separated by whitespace or a comma.
/// Blank lines and lines starting with `#` are skipped, every other line that is not a pair of numbers
/// is taken as a header (the name line of a Selig file).
///
/// Files in Lednicer layout, whose first pair gives the number of points of the upper and the lower
/// surface, are reordered into Selig order: trailing edge, upper surface, leading edge, lower surface,
/// trailing edge.
///
/// # Example
/// ```
/// use foilsample::prelude::*;
///
/// let points = parse_coordinates::<f64>("NACA 0006\n1.0 0.0\n0.5 0.03\n0.0 0.0\n0.5 -0.03\n1.0 0.0\n").unwrap();
/// assert_eq!(points.len(), 5);
/// assert_eq!(points[1].y, 0.03);
/// ```
pub fn parse_coordinates<T: FloatingPoint>(content: &str) -> anyhow::Result<Vec<Point2<T>>> {
    let pairs: Vec<(f64, f64)> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_pair)
        .collect();
    anyhow::ensure!(!pairs.is_empty(), "No coordinate pairs found");

    let pairs = match lednicer_counts(pairs[0]) {
        Some((upper, lower)) => reorder_lednicer(&pairs[1..], upper, lower)?,
        None => pairs,
    };

    pairs
        .into_iter()
        .map(|(x, y)| {
            anyhow::ensure!(
                x.is_finite() && y.is_finite(),
                "Coordinates must be finite, got ({}, {})",
                x,
                y
            );
            Ok(Point2::new(T::lit(x), T::lit(y)))
        })
        .collect()
}

fn parse_pair(line: &str) -> Option<(f64, f64)> {
    let mut fields = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|field| !field.is_empty());
    let x = fields.next()?.parse().ok()?;
    let y = fields.next()?.parse().ok()?;
    match fields.next() {
        Some(_) => None,
        None => Some((x, y)),
    }
}

/// Point counts of the upper and lower surfaces if the pair is a Lednicer header
fn lednicer_counts((upper, lower): (f64, f64)) -> Option<(usize, usize)> {
    let is_count = |v: f64| v > 1. && v.fract() == 0. && v < usize::MAX as f64;
    (is_count(upper) && is_count(lower)).then(|| (upper as usize, lower as usize))
}

fn reorder_lednicer(
    pairs: &[(f64, f64)],
    upper: usize,
    lower: usize,
) -> anyhow::Result<Vec<(f64, f64)>> {
    anyhow::ensure!(
        pairs.len() == upper + lower,
        "Expected {} upper and {} lower surface points, found {} pairs",
        upper,
        lower,
        pairs.len()
    );
    let (upper, lower) = pairs.split_at(upper);
    let skip = usize::from(upper.first() == lower.first());
    Ok(upper
        .iter()
        .rev()
        .chain(lower.iter().skip(skip))
        .copied()
        .collect())
}
