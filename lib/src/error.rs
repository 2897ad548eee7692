// Copyright (c) 2022-2023 The MobileCoin Foundation

use core::fmt::Debug;

use atecc_proto::status::Status;

/// ATECC driver error type, generic over the underlying bus error
#[derive(Debug, thiserror::Error)]
pub enum Error<E: Debug> {
    /// Underlying bus error
    #[error("bus error: {0:?}")]
    Bus(E),

    /// Device did not return a complete response within the chunk request budget
    #[error("timeout waiting for device response")]
    Timeout,

    /// Response count byte did not match the received length
    #[error("response count mismatch (count: {count}, received: {received})")]
    CountMismatch { count: u8, received: usize },

    /// Response CRC did not match
    #[error("response CRC mismatch (expected: {expected:02x?}, actual: {actual:02x?})")]
    CrcMismatch { expected: [u8; 2], actual: [u8; 2] },

    /// Device reported a non-zero status
    #[error("device error: 0x{0:02x} ({})", status_name(.0))]
    Device(u8),

    /// Device did not acknowledge wake
    #[error("device wake failed")]
    WakeFailed,

    /// Invalid argument (slot, key index, zone length)
    #[error("invalid parameter")]
    InvalidParameter,

    /// Invalid buffer or payload length
    #[error("invalid length")]
    InvalidLength,

    /// Unexpected response contents
    #[error("unexpected response")]
    UnexpectedResponse,

    /// Cipher input is not block aligned
    #[error("input length must be a multiple of 16 bytes")]
    InvalidInputLength,

    /// Cipher output buffer too small
    #[error("output buffer too small")]
    OutputTooSmall,

    /// Cipher input too small for padding removal
    #[error("input too small")]
    InputTooSmall,

    /// CBC requested without a 16 byte IV
    #[error("CBC mode requires a 16 byte IV")]
    IvMissing,

    /// Decrypted data carried invalid padding
    #[error("invalid padding")]
    PaddingError,
}

fn status_name(s: &u8) -> &'static str {
    match Status::try_from(*s) {
        Ok(Status::Success) => "success",
        Ok(Status::Miscompare) => "miscompare",
        Ok(Status::ParseError) => "parse error",
        Ok(Status::EccFault) => "ECC fault",
        Ok(Status::SelfTestError) => "self test error",
        Ok(Status::HealthTestError) => "health test error",
        Ok(Status::ExecutionError) => "execution error",
        Ok(Status::AfterWake) => "after wake",
        Ok(Status::WatchdogExpired) => "watchdog expired",
        Ok(Status::CrcError) => "CRC error",
        Err(_) => "unknown",
    }
}

impl<E: Debug> From<atecc_proto::Error> for Error<E> {
    fn from(e: atecc_proto::Error) -> Self {
        use atecc_proto::Error as P;

        match e {
            P::InvalidLength => Error::InvalidLength,
            P::InvalidParameter => Error::InvalidParameter,
            P::CountMismatch { count, received } => Error::CountMismatch { count, received },
            P::CrcMismatch { expected, actual } => Error::CrcMismatch { expected, actual },
            P::Device(s) => Error::Device(s),
            P::UnexpectedResponse => Error::UnexpectedResponse,
        }
    }
}

/// Flatten cipher engine errors, block failures carry the driver error
impl<E: Debug> From<atecc_core::Error<Error<E>>> for Error<E> {
    fn from(e: atecc_core::Error<Error<E>>) -> Self {
        use atecc_core::Error as C;

        match e {
            C::InvalidInputLength => Error::InvalidInputLength,
            C::OutputTooSmall => Error::OutputTooSmall,
            C::InputTooSmall => Error::InputTooSmall,
            C::InvalidParameter => Error::InvalidParameter,
            C::IvMissing => Error::IvMissing,
            C::PaddingError => Error::PaddingError,
            C::Block(e) => e,
        }
    }
}
