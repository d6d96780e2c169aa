use thiserror::Error;

/// Failures raised by wiggle preparation and rendering.
///
/// Validation errors are returned before any computation runs, so a caller
/// never sees a partially rescaled dataset.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WiggleError {
    /// Wrong rank, or an axis whose length disagrees with the sample matrix.
    #[error("shape error: {0}")]
    Shape(String),
    /// A parameter holds a value of the wrong kind (e.g. a non-finite stretch factor).
    #[error("type error: {0}")]
    Type(String),
    /// A drawing backend failed to produce output.
    #[error("failed to render wiggle plot: {0}")]
    Render(String),
}

impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for WiggleError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        WiggleError::Render(format!("{value:?}"))
    }
}

impl From<image::ImageError> for WiggleError {
    fn from(value: image::ImageError) -> Self {
        WiggleError::Render(value.to_string())
    }
}
