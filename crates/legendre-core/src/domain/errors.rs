pub type LegendreResult<T> = Result<T, LegendreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegendreErrorCategory {
    InputValidationError,
    IoSystemError,
    ComputationError,
}

impl LegendreErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::ComputationError => 4,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::ComputationError => "ComputationError",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LegendreError {
    #[error("maximum degree must be >= 0, got {max_degree}")]
    InvalidDegree { max_degree: i32 },
    #[error("angle must be finite, got {angle}")]
    InvalidAngle { angle: f64 },
    #[error("unknown normalization '{name}', expected one of: unnormalized, schmidt, full")]
    UnknownNormalization { name: String },
}

impl LegendreError {
    pub const fn category(&self) -> LegendreErrorCategory {
        match self {
            Self::InvalidDegree { .. }
            | Self::InvalidAngle { .. }
            | Self::UnknownNormalization { .. } => LegendreErrorCategory::InputValidationError,
        }
    }

    pub const fn placeholder(&self) -> &'static str {
        match self {
            Self::InvalidDegree { .. } => "INPUT.LEGENDRE_DEGREE",
            Self::InvalidAngle { .. } => "INPUT.LEGENDRE_ANGLE",
            Self::UnknownNormalization { .. } => "INPUT.LEGENDRE_NORMALIZATION",
        }
    }

    pub const fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder(), self)
    }
}
