use thiserror::Error;

/// Errors returned while decoding module memory.
///
/// A read past the declared length is the only decode failure; unsupported
/// module types and short-but-valid buffers produce smaller reports instead
/// of errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("read past end of module memory: need {needed} bytes, declared length {declared}")]
    OutOfRange { needed: usize, declared: usize },
}
