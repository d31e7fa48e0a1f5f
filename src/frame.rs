//! The data model shared by all transports: identifiers, payloads, frames,
//! remote transmission requests, and the [`Event`] union a listener yields.

use std::fmt;

use crate::error::FrameError;

/// A CAN arbitration identifier, either 11-bit standard or 29-bit extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Id {
    /// An 11-bit identifier (`0..=0x7ff`).
    Standard(u16),
    /// A 29-bit identifier (`0..=0x1fff_ffff`).
    Extended(u32),
}

impl Id {
    /// Largest valid standard identifier.
    pub const STANDARD_MAX: u16 = 0x7ff;
    /// Largest valid extended identifier.
    pub const EXTENDED_MAX: u32 = 0x1fff_ffff;

    /// Whether this is a 29-bit extended identifier.
    pub const fn is_extended(&self) -> bool {
        matches!(self, Id::Extended(_))
    }

    /// The raw identifier bits, regardless of width.
    pub const fn raw(&self) -> u32 {
        match *self {
            Id::Standard(id) => id as u32,
            Id::Extended(id) => id,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), FrameError> {
        match *self {
            Id::Standard(id) if id > Self::STANDARD_MAX => {
                Err(FrameError::StandardIdOutOfRange(id))
            }
            Id::Extended(id) if id > Self::EXTENDED_MAX => {
                Err(FrameError::ExtendedIdOutOfRange(id))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.raw())
    }
}

/// A classic CAN data payload: 0 to 8 bytes in a fixed backing store.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Payload {
    len: u8,
    bytes: [u8; 8],
}

impl Payload {
    /// Maximum payload length of a classic CAN frame.
    pub const MAX: usize = 8;

    /// Creates a payload from a slice of at most [`Payload::MAX`] bytes.
    pub fn new(data: &[u8]) -> Result<Self, FrameError> {
        if data.len() > Self::MAX {
            return Err(FrameError::PayloadTooLong(data.len()));
        }
        let mut bytes = [0u8; 8];
        bytes[..data.len()].copy_from_slice(data);
        Ok(Self {
            len: data.len() as u8,
            bytes,
        })
    }

    /// Creates a payload in const context.
    ///
    /// Panics (at compile time, when evaluated in a const item) if the input
    /// exceeds [`Payload::MAX`] bytes.
    pub const fn from_static(data: &[u8]) -> Self {
        assert!(data.len() <= Payload::MAX, "payload exceeds 8 bytes");
        let mut bytes = [0u8; 8];
        let mut i = 0;
        while i < data.len() {
            bytes[i] = data[i];
            i += 1;
        }
        Self {
            len: data.len() as u8,
            bytes,
        }
    }

    /// An empty payload.
    pub const fn empty() -> Self {
        Self {
            len: 0,
            bytes: [0; 8],
        }
    }

    /// Number of payload bytes.
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    /// Whether the payload carries no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl std::ops::Deref for Payload {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }
}

impl AsRef<[u8]> for Payload {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl TryFrom<&[u8]> for Payload {
    type Error = FrameError;

    fn try_from(data: &[u8]) -> Result<Self, FrameError> {
        Payload::new(data)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload({})", hex::encode(self))
    }
}

/// A CAN data frame. The same shape is used inbound and outbound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Arbitration identifier.
    pub id: Id,
    /// Payload bytes.
    pub data: Payload,
}

impl Frame {
    /// Creates a frame, validating the identifier range and payload length.
    pub fn new(id: Id, data: &[u8]) -> Result<Self, FrameError> {
        id.validate()?;
        Ok(Self {
            id,
            data: Payload::new(data)?,
        })
    }
}

/// A remote transmission request: asks a peer to transmit a data frame of
/// the given length. Carries no payload of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteRequest {
    /// Arbitration identifier.
    pub id: Id,
    /// Requested payload length, at most [`Payload::MAX`].
    pub length: u8,
}

impl RemoteRequest {
    /// Creates a remote request, validating the identifier and length.
    pub fn new(id: Id, length: u8) -> Result<Self, FrameError> {
        id.validate()?;
        if usize::from(length) > Payload::MAX {
            return Err(FrameError::PayloadTooLong(usize::from(length)));
        }
        Ok(Self { id, length })
    }
}

/// Everything a transport can produce while listening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A data frame was received.
    Frame(Frame),
    /// A remote transmission request was received.
    RemoteRequest(RemoteRequest),
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn payload_accepts_up_to_eight_bytes() {
        for len in 0..=Payload::MAX {
            let data = vec![0x5a; len];
            let payload = Payload::new(&data).unwrap();
            assert_eq!(payload.len(), len);
            assert_eq!(&*payload, &data[..]);
        }
    }

    #[test]
    fn payload_rejects_nine_bytes() {
        assert_eq!(
            Payload::new(&[0; 9]).unwrap_err(),
            FrameError::PayloadTooLong(9)
        );
    }

    #[test]
    fn standard_id_is_limited_to_eleven_bits() {
        assert!(Frame::new(Id::Standard(0x7ff), b"ok").is_ok());
        assert_eq!(
            Frame::new(Id::Standard(0x800), b"no").unwrap_err(),
            FrameError::StandardIdOutOfRange(0x800)
        );
    }

    #[test]
    fn extended_id_is_limited_to_twenty_nine_bits() {
        assert!(Frame::new(Id::Extended(0x1fff_ffff), b"").is_ok());
        assert_eq!(
            Frame::new(Id::Extended(0x2000_0000), b"").unwrap_err(),
            FrameError::ExtendedIdOutOfRange(0x2000_0000)
        );
    }

    #[test]
    fn remote_request_length_is_limited() {
        assert!(RemoteRequest::new(Id::Standard(0x50), 8).is_ok());
        assert_eq!(
            RemoteRequest::new(Id::Standard(0x50), 9).unwrap_err(),
            FrameError::PayloadTooLong(9)
        );
    }

    #[test]
    fn id_displays_as_hex() {
        assert_eq!(Id::Standard(0x123).to_string(), "0x123");
        assert_eq!(Id::Extended(0x1800_0042).to_string(), "0x18000042");
        assert!(Id::Extended(1).is_extended());
        assert!(!Id::Standard(1).is_extended());
    }

    #[test]
    fn const_payload_matches_runtime_payload() {
        const PING: Payload = Payload::from_static(b"ping");
        assert_eq!(PING, Payload::new(b"ping").unwrap());
        assert!(Payload::empty().is_empty());
    }
}
