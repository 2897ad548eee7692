// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Nonce command, used in pass-through mode to load TempKey with a message digest

use encdec::{Decode, Encode};

use crate::{helpers::arr, Command, Error, Opcode};

/// Pass-through mode, writes `NumIn` to TempKey unmodified
pub const NONCE_MODE_PASSTHROUGH: u8 = 0x03;

/// Load a 32 byte value into TempKey
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "Error")]
pub struct NonceReq {
    #[encdec(with = "arr")]
    pub num_in: [u8; 32],
}

impl Command for NonceReq {
    const OPCODE: Opcode = Opcode::Nonce;
    const EXEC_TIME_MS: u32 = 7;

    fn param1(&self) -> u8 {
        NONCE_MODE_PASSTHROUGH
    }

    fn param2(&self) -> u16 {
        0x0000
    }

    fn response_len(&self) -> usize {
        1
    }
}
