use std::fmt;

/// Outcome of a smoothing spline fit, carrying the FITPACK `ier` code
///
/// Codes at or below zero are successful fits, positive codes are soft warnings:
/// the spline is still returned but its residual may miss the requested bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum FitStatus {
    /// The least-squares polynomial already meets the smoothing bound (`-2`)
    Polynomial,
    /// The spline interpolates the data (`-1`)
    Interpolating,
    /// The residual matches the smoothing bound within tolerance (`0`)
    Converged,
    /// The residual does not decrease monotonically with the smoothing parameter (`2`)
    NotMonotone,
    /// The smoothing iteration hit its iteration limit (`3`)
    IterationLimit,
}

impl FitStatus {
    pub fn code(&self) -> i32 {
        match self {
            FitStatus::Polynomial => -2,
            FitStatus::Interpolating => -1,
            FitStatus::Converged => 0,
            FitStatus::NotMonotone => 2,
            FitStatus::IterationLimit => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -2 => Some(FitStatus::Polynomial),
            -1 => Some(FitStatus::Interpolating),
            0 => Some(FitStatus::Converged),
            2 => Some(FitStatus::NotMonotone),
            3 => Some(FitStatus::IterationLimit),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code() <= 0
    }

    pub fn is_warning(&self) -> bool {
        !self.is_success()
    }
}

impl fmt::Display for FitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            FitStatus::Polynomial => "the spline is the weighted least-squares polynomial",
            FitStatus::Interpolating => "the spline is an interpolating spline",
            FitStatus::Converged => "the spline returned has a residual sum close to the bound",
            FitStatus::NotMonotone => "the smoothing bound is too small, theoretically impossible result",
            FitStatus::IterationLimit => "the maximal number of iterations allowed has been reached",
        };
        write!(f, "{} ({})", message, self.code())
    }
}

impl From<FitStatus> for i32 {
    fn from(status: FitStatus) -> Self {
        status.code()
    }
}

impl TryFrom<i32> for FitStatus {
    type Error = String;
    fn try_from(code: i32) -> Result<Self, Self::Error> {
        FitStatus::from_code(code).ok_or_else(|| format!("unknown fit status code {}", code))
    }
}
