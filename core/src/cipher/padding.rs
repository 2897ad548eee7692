// Copyright (c) 2022-2023 The MobileCoin Foundation

use core::fmt::Debug;

use crate::{Error, AES_BLOCKSIZE};

/// Padding scheme applied to plaintext
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Padding {
    /// No padding, input must be block aligned
    None,
    /// PKCS#7, always appends 1..=16 bytes
    #[default]
    Pkcs7,
}

/// Compute the output size for encrypting `input_len` bytes
pub fn required_output_size(input_len: usize, padding: Padding) -> Result<usize, Error> {
    output_size(input_len, padding)
}

pub(crate) fn output_size<E: Debug>(input_len: usize, padding: Padding) -> Result<usize, Error<E>> {
    match padding {
        Padding::None if input_len % AES_BLOCKSIZE != 0 => Err(Error::InvalidInputLength),
        Padding::None => Ok(input_len),
        Padding::Pkcs7 => Ok((input_len / AES_BLOCKSIZE + 1) * AES_BLOCKSIZE),
    }
}

/// Write PKCS#7 padding following `len` bytes of data, `buff` must be
/// sized to the padded length
pub(crate) fn pad(buff: &mut [u8], len: usize) {
    let k = buff.len() - len;
    buff[len..].fill(k as u8);
}

/// Validate PKCS#7 padding, returning the unpadded length
pub(crate) fn unpad<E: Debug>(buff: &[u8]) -> Result<usize, Error<E>> {
    let p = match buff.last() {
        Some(p) => *p as usize,
        None => return Err(Error::InputTooSmall),
    };

    if p == 0 || p > AES_BLOCKSIZE || p > buff.len() {
        return Err(Error::PaddingError);
    }

    let n = buff.len() - p;
    if buff[n..].iter().any(|b| *b as usize != p) {
        return Err(Error::PaddingError);
    }

    Ok(n)
}
