use std::fmt;

/// Reasons a set of network parameters is rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidRadix(usize),
    TooFewStages(usize),
    InvalidPsi(usize),
    PsiNotDividing { psi: usize, stage_units: usize },
    TrackCount { name: &'static str, value: usize },
    Overflow { radix: usize, stages: usize },
    /// The `2 x levels x N` words of the store do not fit in a machine word.
    StoreOverflow { levels: usize, coef_nb: usize },
    /// Two clusters of the last stage target the same bank cluster.
    WriteConflict { stage_iter: usize, cluster: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRadix(r) => write!(f, "radix {} is not a power of two >= 2", r),
            ConfigError::TooFewStages(s) => write!(f, "{} stage(s), at least 2 are required", s),
            ConfigError::InvalidPsi(psi) => write!(f, "psi {} is not a power of two", psi),
            ConfigError::PsiNotDividing { psi, stage_units } => {
                write!(f, "psi {} does not divide the {} units of a stage", psi, stage_units)
            }
            ConfigError::TrackCount { name, value } => {
                write!(f, "{} = {} is outside [1, {}]", name, value, crate::MAX_TRACKS)
            }
            ConfigError::Overflow { radix, stages } => {
                write!(f, "{}^{} points do not fit in a machine word", radix, stages)
            }
            ConfigError::StoreOverflow { levels, coef_nb } => {
                write!(f, "store of 2 x {} x {} words does not fit in a machine word", levels, coef_nb)
            }
            ConfigError::WriteConflict { stage_iter, cluster } => write!(
                f,
                "last stage write conflict at stage iteration {} (cluster {})",
                stage_iter, cluster
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetworkError {
    Configuration(ConfigError),
    /// A structural invariant of the network does not hold. Always a bug.
    InvariantViolation(String),
    Bounds {
        what: &'static str,
        value: i64,
        bound: i64,
    },
}

impl NetworkError {
    pub(crate) fn violation<S: Into<String>>(msg: S) -> Self {
        NetworkError::InvariantViolation(msg.into())
    }

    pub(crate) fn bounds(what: &'static str, value: usize, bound: usize) -> Self {
        NetworkError::Bounds {
            what,
            value: value as i64,
            bound: bound as i64,
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::Configuration(e) => write!(f, "invalid configuration: {}", e),
            NetworkError::InvariantViolation(msg) => write!(f, "invariant violation: {}", msg),
            NetworkError::Bounds { what, value, bound } => {
                write!(f, "{} = {} is out of range (bound {})", what, value, bound)
            }
        }
    }
}

impl std::error::Error for NetworkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetworkError::Configuration(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for NetworkError {
    fn from(e: ConfigError) -> Self {
        NetworkError::Configuration(e)
    }
}

pub type Result<T> = std::result::Result<T, NetworkError>;
