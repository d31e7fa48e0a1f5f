use thiserror::Error;

/// Errors that can occur when constructing or driving a bridge.
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors bubbled up from concrete transport drivers.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A frame or remote request was built from invalid parts.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
    /// A transport was constructed from an unusable configuration.
    #[error("invalid link configuration: {0}")]
    Config(String),
    /// A driver-specific fault surfaced through the transport boundary.
    #[error("transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wraps a driver-specific error behind the transport boundary.
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Transport(Box::new(err))
    }
}

/// Errors that occur when assembling frames from invalid parts.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Classic CAN frames carry at most 8 payload bytes.
    #[error("payload too long: {0} bytes, classic CAN frames carry at most 8")]
    PayloadTooLong(usize),
    /// Standard identifiers are 11 bits wide.
    #[error("identifier 0x{0:x} does not fit in 11 bits")]
    StandardIdOutOfRange(u16),
    /// Extended identifiers are 29 bits wide.
    #[error("identifier 0x{0:x} does not fit in 29 bits")]
    ExtendedIdOutOfRange(u32),
}
