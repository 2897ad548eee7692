// Copyright (c) 2022-2023 The MobileCoin Foundation

//! GenKey command, creates a P256 private key or computes the matching public key

use encdec::{Decode, Encode};

use crate::{helpers::arr, Command, Error, Opcode, NUM_SLOTS};

/// Length of an uncompressed P256 public key (X ‖ Y)
pub const PUBLIC_KEY_LEN: usize = 64;

bitflags::bitflags! {
    /// GenKey mode flags
    pub struct GenKeyMode: u8 {
        /// Generate a new private key in the slot, otherwise compute the public key
        const PRIVATE = 0b0000_0100;
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct GenKeyReq {
    slot: u8,
    mode: GenKeyMode,
}

impl GenKeyReq {
    /// Request a new private key in the provided slot
    pub fn private(slot: u8) -> Result<Self, Error> {
        Self::new(slot, GenKeyMode::PRIVATE)
    }

    /// Request the public key for the private key stored in the provided slot
    pub fn public(slot: u8) -> Result<Self, Error> {
        Self::new(slot, GenKeyMode::empty())
    }

    fn new(slot: u8, mode: GenKeyMode) -> Result<Self, Error> {
        if slot >= NUM_SLOTS {
            return Err(Error::InvalidParameter);
        }
        Ok(Self { slot, mode })
    }
}

impl Encode for GenKeyReq {
    type Error = Error;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(0)
    }

    fn encode(&self, _buff: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(0)
    }
}

impl Command for GenKeyReq {
    const OPCODE: Opcode = Opcode::GenKey;
    const EXEC_TIME_MS: u32 = 115;

    fn param1(&self) -> u8 {
        self.mode.bits()
    }

    fn param2(&self) -> u16 {
        self.slot as u16
    }

    fn response_len(&self) -> usize {
        PUBLIC_KEY_LEN
    }
}

/// Public key response
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "Error")]
pub struct PublicKeyResp {
    #[encdec(with = "arr")]
    pub key: [u8; PUBLIC_KEY_LEN],
}
