use std::fmt;
use thiserror::Error;

/// External object the controller cannot work without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    Scorer,
    Camera,
    Goal,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dependency::Scorer => "goal scorer",
            Dependency::Camera => "replay camera",
            Dependency::Goal => "goal",
        })
    }
}

/// Why a tick was skipped. None of these are fatal: the camera keeps its
/// last pose and the next tick tries again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("{} not set", list(.0))]
    MissingDependency(Vec<Dependency>),

    #[error("{0} is no longer available")]
    StaleReference(&'static str),

    #[error("camera does not support target tracking")]
    UnsupportedCamera,
}

impl CameraError {
    /// Stable discriminant, used to rate-limit diagnostics per kind.
    pub(crate) fn kind(&self) -> usize {
        match self {
            CameraError::MissingDependency(_) => 0,
            CameraError::StaleReference(_) => 1,
            CameraError::UnsupportedCamera => 2,
        }
    }
}

fn list(deps: &[Dependency]) -> String {
    deps.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown key or mouse button '{0}'")]
pub struct UnknownBinding(pub String);
