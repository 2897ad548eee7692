// Copyright (c) 2022-2023 The MobileCoin Foundation

//! SHA-256 digest command
//!
//! A digest is computed as START, zero or more 64 byte UPDATEs, then an
//! END carrying the final 0..=63 bytes which returns the digest.

use encdec::{Decode, Encode};

use crate::{helpers::arr, Command, Error, Opcode};

/// SHA-256 input block length
pub const SHA_BLOCK_LEN: usize = 64;

/// SHA-256 digest length
pub const DIGEST_LEN: usize = 32;

/// SHA command mode
#[derive(Copy, Clone, Debug, PartialEq, Eq, num_enum::TryFromPrimitive, strum::Display)]
#[repr(u8)]
pub enum ShaMode {
    Start = 0x00,
    Update = 0x01,
    End = 0x02,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ShaReq<'a> {
    mode: ShaMode,
    data: &'a [u8],
}

impl<'a> ShaReq<'a> {
    /// Initialise the SHA-256 engine
    pub fn start() -> Self {
        Self {
            mode: ShaMode::Start,
            data: &[],
        }
    }

    /// Add a full 64 byte block to the digest
    pub fn update(data: &'a [u8]) -> Result<Self, Error> {
        if data.len() != SHA_BLOCK_LEN {
            return Err(Error::InvalidLength);
        }
        Ok(Self {
            mode: ShaMode::Update,
            data,
        })
    }

    /// Complete the digest with the final (possibly empty) partial block
    pub fn end(data: &'a [u8]) -> Result<Self, Error> {
        if data.len() >= SHA_BLOCK_LEN {
            return Err(Error::InvalidLength);
        }
        Ok(Self {
            mode: ShaMode::End,
            data,
        })
    }

    pub fn mode(&self) -> ShaMode {
        self.mode
    }
}

impl<'a> Encode for ShaReq<'a> {
    type Error = Error;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(self.data.len())
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        let n = self.data.len();
        if buff.len() < n {
            return Err(Error::InvalidLength);
        }

        buff[..n].copy_from_slice(self.data);

        Ok(n)
    }
}

impl<'a> Command for ShaReq<'a> {
    const OPCODE: Opcode = Opcode::Sha;
    const EXEC_TIME_MS: u32 = 9;

    fn param1(&self) -> u8 {
        self.mode as u8
    }

    fn param2(&self) -> u16 {
        self.data.len() as u16
    }

    fn response_len(&self) -> usize {
        match self.mode {
            ShaMode::End => DIGEST_LEN,
            _ => 1,
        }
    }
}

#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "Error")]
pub struct DigestResp {
    #[encdec(with = "arr")]
    pub digest: [u8; DIGEST_LEN],
}
