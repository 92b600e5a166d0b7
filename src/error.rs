use thiserror::Error;

pub type LabelResult<T> = Result<T, LabelError>;

/// Failures raised while placing value labels.
#[derive(Debug, Error, PartialEq)]
pub enum LabelError {
    /// Anchors, values and regions disagree in length, or the two pixel spaces
    /// use different vertical conventions.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The rendering surface refused to draw a label.
    #[error("failed to draw label: {0}")]
    Render(String),
}
