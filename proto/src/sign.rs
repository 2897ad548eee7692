// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Sign command, signs the contents of TempKey with a slot private key

use encdec::{Decode, Encode};

use crate::{helpers::arr, Command, Error, Opcode, NUM_SLOTS};

/// Length of a P256 signature (R ‖ S)
pub const SIGNATURE_LEN: usize = 64;

/// External sign mode, message is read from TempKey
pub const SIGN_MODE_TEMPKEY: u8 = 0x80;

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SignReq {
    slot: u8,
}

impl SignReq {
    pub fn new(slot: u8) -> Result<Self, Error> {
        if slot >= NUM_SLOTS {
            return Err(Error::InvalidParameter);
        }
        Ok(Self { slot })
    }
}

impl Encode for SignReq {
    type Error = Error;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(0)
    }

    fn encode(&self, _buff: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(0)
    }
}

impl Command for SignReq {
    const OPCODE: Opcode = Opcode::Sign;
    const EXEC_TIME_MS: u32 = 70;

    fn param1(&self) -> u8 {
        SIGN_MODE_TEMPKEY
    }

    fn param2(&self) -> u16 {
        self.slot as u16
    }

    fn response_len(&self) -> usize {
        SIGNATURE_LEN
    }
}

#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "Error")]
pub struct SignatureResp {
    #[encdec(with = "arr")]
    pub signature: [u8; SIGNATURE_LEN],
}
