// Copyright (c) 2022-2023 The MobileCoin Foundation

use core::{convert::Infallible, fmt::Debug};

/// Cipher mode errors, generic over the block primitive error.
///
/// Context construction cannot fail at the block level and
/// returns `Error<Infallible>`.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
pub enum Error<E: Debug = Infallible> {
    /// Input length is not a multiple of the block size
    #[cfg_attr(feature = "thiserror", error("input length must be a multiple of 16 bytes"))]
    InvalidInputLength,

    /// Output buffer cannot hold the result
    #[cfg_attr(feature = "thiserror", error("output buffer too small"))]
    OutputTooSmall,

    /// Padded input must contain at least one block
    #[cfg_attr(feature = "thiserror", error("input too small"))]
    InputTooSmall,

    /// Slot or key index out of range
    #[cfg_attr(feature = "thiserror", error("invalid slot or key index"))]
    InvalidParameter,

    /// CBC mode requires a 16 byte IV
    #[cfg_attr(feature = "thiserror", error("CBC mode requires a 16 byte IV"))]
    IvMissing,

    /// Decrypted data does not carry valid PKCS#7 padding
    #[cfg_attr(feature = "thiserror", error("invalid padding"))]
    PaddingError,

    /// Block primitive failure
    #[cfg_attr(feature = "thiserror", error("block operation failed: {0:?}"))]
    Block(E),
}

impl<E: Debug> From<atecc_proto::Error> for Error<E> {
    fn from(_: atecc_proto::Error) -> Self {
        Error::InvalidParameter
    }
}
