use thiserror::Error;
use uma_rs::CodegenError;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("{operand} has {found} elements, expected {expected}")]
    ShapeMismatch {
        operand: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{operand} buffer holds {found} elements, device needs at least {needed}")]
    BufferTooSmall {
        operand: &'static str,
        needed: usize,
        found: usize,
    },
    #[error("dimension overflow computing {operand} size")]
    DimensionOverflow { operand: &'static str },
    #[error(transparent)]
    Command(#[from] CodegenError),
}

pub type DeviceResult<T> = Result<T, DeviceError>;
