// Copyright (c) 2022-2023 The MobileCoin Foundation

use encdec::{Decode, Encode};

use crate::{helpers::arr, Command, Error, Opcode};

/// Length of the random value returned by the device
pub const RANDOM_LEN: usize = 32;

/// Random request, updates the device seed before generating a value
#[derive(Copy, Clone, PartialEq, Debug, Default, Encode, Decode)]
#[encdec(error = "Error")]
pub struct RandomReq {}

impl Command for RandomReq {
    const OPCODE: Opcode = Opcode::Random;
    const EXEC_TIME_MS: u32 = 23;

    fn param1(&self) -> u8 {
        0x00
    }

    fn param2(&self) -> u16 {
        0x0000
    }

    fn response_len(&self) -> usize {
        RANDOM_LEN
    }
}

#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "Error")]
pub struct RandomResp {
    /// Random value
    #[encdec(with = "arr")]
    pub value: [u8; RANDOM_LEN],
}
