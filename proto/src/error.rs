// Copyright (c) 2022-2023 The MobileCoin Foundation

/// Protocol errors, returned when encoding commands or validating responses
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
pub enum Error {
    /// Buffer too small for encoding / decoding
    #[cfg_attr(feature = "thiserror", error("invalid buffer length"))]
    InvalidLength,

    /// Parameter out of range for the command
    #[cfg_attr(feature = "thiserror", error("invalid parameter"))]
    InvalidParameter,

    /// Count byte does not match the number of bytes received
    #[cfg_attr(
        feature = "thiserror",
        error("response count mismatch (count: {count}, received: {received})")
    )]
    CountMismatch { count: u8, received: usize },

    /// Response CRC does not match computed CRC
    #[cfg_attr(
        feature = "thiserror",
        error("response CRC mismatch (expected: {expected:02x?}, actual: {actual:02x?})")
    )]
    CrcMismatch { expected: [u8; 2], actual: [u8; 2] },

    /// Device returned a non-zero status code
    #[cfg_attr(feature = "thiserror", error("device error status: 0x{0:02x}"))]
    Device(u8),

    /// Response payload did not match the expected format
    #[cfg_attr(feature = "thiserror", error("unexpected response"))]
    UnexpectedResponse,
}

impl From<encdec::Error> for Error {
    fn from(_: encdec::Error) -> Self {
        Error::InvalidLength
    }
}
