// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Single block AES-128 command (ATECC608A)

use encdec::{Decode, Encode};

use crate::{helpers::arr, Command, Error, Opcode, NUM_SLOTS};

/// AES block size in bytes
pub const AES_BLOCKSIZE: usize = 16;

/// Largest key index within a slot (a slot holds four AES keys)
pub const MAX_KEY_INDEX: u8 = 3;

/// AES block
pub type Block = [u8; AES_BLOCKSIZE];

/// Block operation direction, bit 0 of the mode parameter
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
#[repr(u8)]
pub enum Direction {
    Encrypt = 0x00,
    Decrypt = 0x01,
}

/// Location of an AES key on the device
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AesKey {
    slot: u8,
    key_index: u8,
}

impl AesKey {
    /// Create a key reference, `slot` must be in `0..=15` and `key_index` in `0..=3`
    pub fn new(slot: u8, key_index: u8) -> Result<Self, Error> {
        if slot >= NUM_SLOTS || key_index > MAX_KEY_INDEX {
            return Err(Error::InvalidParameter);
        }
        Ok(Self { slot, key_index })
    }

    pub fn slot(&self) -> u8 {
        self.slot
    }

    pub fn key_index(&self) -> u8 {
        self.key_index
    }
}

/// Encrypt or decrypt a single block
#[derive(Clone, PartialEq, Debug)]
pub struct AesReq {
    pub key: AesKey,
    pub direction: Direction,
    pub block: Block,
}

impl Encode for AesReq {
    type Error = Error;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(AES_BLOCKSIZE)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        arr::enc(&self.block, buff)
    }
}

impl Command for AesReq {
    const OPCODE: Opcode = Opcode::Aes;
    const EXEC_TIME_MS: u32 = 10;

    /// Direction in bit 0, key index in bits 6..7
    fn param1(&self) -> u8 {
        self.direction as u8 | self.key.key_index << 6
    }

    fn param2(&self) -> u16 {
        self.key.slot as u16
    }

    fn response_len(&self) -> usize {
        AES_BLOCKSIZE
    }
}

#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "Error")]
pub struct AesResp {
    #[encdec(with = "arr")]
    pub block: Block,
}
