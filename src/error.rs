use std::fmt;

/// Pipeline stage in which an error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Lookup,
    Reproject,
    Clip,
    Classify,
    Account,
    Display,
}

impl Stage {
    pub fn to_str(&self) -> &'static str {
        match self {
            Stage::Lookup => "lookup",
            Stage::Reproject => "reproject",
            Stage::Clip => "clip",
            Stage::Classify => "classify",
            Stage::Account => "account",
            Stage::Display => "display",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Which lookup table missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Postcode,
    OutputArea,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKind::Postcode => f.write_str("postcode"),
            LookupKind::OutputArea => f.write_str("output area"),
        }
    }
}

/// Errors raised by the classification core and the boundary resolver.
///
/// Every kind halts the current request. None of them are retried: the
/// computation is deterministic, so the caller must fix the cause first.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    /// A postcode or output-area identifier has no entry in its lookup table.
    #[error("[{stage}] {kind} not found: {key}", stage = Stage::Lookup)]
    LookupMiss { kind: LookupKind, key: String },

    /// An input geometry cannot be processed by the geometry kernel.
    #[error("[{stage}] invalid geometry in {context}: {reason}")]
    Geometry { stage: Stage, context: String, reason: String },

    /// The boundary is missing or has no positive finite area.
    #[error("[{stage}] invalid boundary: {reason}")]
    InvalidBoundary { stage: Stage, reason: String },

    /// A coordinate could not be transformed between reference systems.
    #[error("[{stage}] coordinate transform failed ({from} -> {to}): {reason}")]
    Transform { stage: Stage, from: String, to: String, reason: String },
}

impl SurfaceError {
    /// The stage that raised the error.
    pub fn stage(&self) -> Stage {
        match self {
            SurfaceError::LookupMiss { .. } => Stage::Lookup,
            SurfaceError::Geometry { stage, .. }
            | SurfaceError::InvalidBoundary { stage, .. }
            | SurfaceError::Transform { stage, .. } => *stage,
        }
    }

    /// Lookup misses are the only user-correctable kind.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, SurfaceError::LookupMiss { .. })
    }
}

pub type SurfaceResult<T> = std::result::Result<T, SurfaceError>;
