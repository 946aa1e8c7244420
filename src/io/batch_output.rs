use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use nalgebra::Point2;
use serde::Serialize;

use crate::misc::FloatingPoint;

/// Row of `[x, y]` pairs, one per resampled point
pub type PointRow = Vec<[f64; 2]>;

/// Convert points into a row of the aggregate point array
pub fn point_row<T: FloatingPoint>(points: &[Point2<T>]) -> PointRow {
    points
        .iter()
        .map(|p| {
            [
                p.x.to_f64().unwrap_or(f64::NAN),
                p.y.to_f64().unwrap_or(f64::NAN),
            ]
        })
        .collect()
}

/// Serialize `value` as JSON into the file at `path`, replacing it if it exists
pub fn write_json<S: Serialize + ?Sized>(path: impl AsRef<Path>, value: &S) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::fitting::FitStatus;

    #[test]
    fn rows_keep_point_order() {
        let row = point_row(&[Point2::new(1f32, 0.5), Point2::new(-0.25, 2.)]);
        assert_eq!(row, vec![[1., 0.5], [-0.25, 2.]]);
    }

    #[test]
    fn json_files() {
        let dir = std::env::temp_dir().join(format!("foilsample-output-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let rows = vec![point_row(&[Point2::new(0., 1.), Point2::new(2., 3.)])];
        write_json(dir.join("points.json"), &rows).unwrap();
        let content = std::fs::read_to_string(dir.join("points.json")).unwrap();
        assert_eq!(content, "[[[0.0,1.0],[2.0,3.0]]]");

        let iers: BTreeMap<String, FitStatus> = [
            ("b".to_string(), FitStatus::NotMonotone),
            ("a".to_string(), FitStatus::Converged),
        ]
        .into_iter()
        .collect();
        write_json(dir.join("iers.json"), &iers).unwrap();
        let content = std::fs::read_to_string(dir.join("iers.json")).unwrap();
        assert_eq!(content, r#"{"a":0,"b":2}"#);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let path = std::env::temp_dir()
            .join(format!("foilsample-missing-{}", std::process::id()))
            .join("out.json");
        assert!(write_json(path, &[1, 2, 3]).is_err());
    }
}
