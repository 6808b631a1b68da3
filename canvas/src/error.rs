use thiserror::Error;

///
/// Errors that can be generated by the graphics engine
///
/// Everything except `NotInvertible` indicates that the caller has made a mistake: these are reported
/// at the call that caused them and the engine makes no attempt to recover. `NotInvertible` is a
/// legitimate runtime condition (eg, a transform that scales everything down to zero) that callers
/// may want to handle.
///
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CanvasError {
    /// A primitive was given an invalid input (a non-finite coordinate, a negative size, etc)
    #[error("invalid argument: {0}")]
    ArgumentError(String),

    /// The operation is not valid in the current state (after disposal, unbalanced restore, etc)
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A combined stroke/fill operation was requested with neither a pen nor a brush
    #[error("invalid state: at least one of a pen or a brush must be supplied")]
    MissingPaintSpec,

    /// A matrix with a zero determinant cannot be inverted
    #[error("the matrix is not invertible")]
    NotInvertible,

    /// A configuration that is not implemented (eg, an upwards page direction)
    #[error("not supported: {0}")]
    NotSupported(String),

    /// A point list had the wrong number of points for the requested geometry
    #[error("invalid geometry: {0}")]
    GeometryError(String),
}

impl CanvasError {
    ///
    /// True if this error is one of the 'invalid state' errors
    ///
    pub fn is_invalid_state(&self) -> bool {
        match self {
            CanvasError::InvalidState(_)    => true,
            CanvasError::MissingPaintSpec   => true,
            _                               => false
        }
    }

    ///
    /// True if this error indicates a bug in the caller rather than a runtime condition
    ///
    pub fn is_programming_error(&self) -> bool {
        !matches!(self, CanvasError::NotInvertible)
    }
}

/// Result of an operation on the canvas
pub type CanvasResult<T> = Result<T, CanvasError>;

///
/// Fails with an argument error if any of the supplied values is not finite
///
pub (crate) fn check_finite(what: &str, values: &[f64]) -> CanvasResult<()> {
    if values.iter().all(|val| val.is_finite()) {
        Ok(())
    } else {
        Err(CanvasError::ArgumentError(format!("{} must be finite (found {:?})", what, values)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn only_not_invertible_is_recoverable() {
        assert!(!CanvasError::NotInvertible.is_programming_error());
        assert!(CanvasError::MissingPaintSpec.is_programming_error());
        assert!(CanvasError::GeometryError("x".into()).is_programming_error());
        assert!(CanvasError::NotSupported("x".into()).is_programming_error());
    }

    #[test]
    fn missing_paint_is_invalid_state() {
        assert!(CanvasError::MissingPaintSpec.is_invalid_state());
        assert!(!CanvasError::ArgumentError("x".into()).is_invalid_state());
    }

    #[test]
    fn non_finite_is_rejected() {
        assert!(check_finite("point", &[1.0, 2.0]).is_ok());
        assert!(check_finite("point", &[1.0, f64::NAN]).is_err());
        assert!(check_finite("point", &[f64::INFINITY]).is_err());
    }
}
