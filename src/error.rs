// ⚠️ Kernel Errors - typed failures at the edges
// Kernel operations themselves are total; only input parsing can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KernelError {
    /// Color string is not `#RRGGBB`
    #[error("invalid color '{0}': expected #RRGGBB")]
    InvalidColor(String),

    /// Material cell is not `name:area:volume[:class]`
    #[error("invalid material layer '{0}': expected name:area:volume[:class]")]
    InvalidLayer(String),

    /// Element row has no usable id
    #[error("invalid element id '{0}'")]
    InvalidElementId(String),

    /// CLI command not recognised
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}

pub type KernelResult<T> = std::result::Result<T, KernelError>;
