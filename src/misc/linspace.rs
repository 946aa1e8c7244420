use crate::misc::FloatingPoint;

/// `count` evenly spaced values over the closed interval [start, end]
/// A single sample yields `start`, no sample yields an empty vector
///
/// # Example
/// ```
/// use foilsample::prelude::linspace;
/// assert_eq!(linspace(0., 1., 5), vec![0., 0.25, 0.5, 0.75, 1.]);
/// assert_eq!(linspace(2., 3., 1), vec![2.]);
/// ```
pub fn linspace<T: FloatingPoint>(start: T, end: T, count: usize) -> Vec<T> {
    match count {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / T::from_count(count - 1);
            let mut values: Vec<T> = (0..count)
                .map(|i| start + step * T::from_count(i))
                .collect();
            // pin the last sample to avoid accumulated rounding
            values[count - 1] = end;
            values
        }
    }
}
