// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Lock command, permanently locks zones or individual slots

use encdec::Encode;

use crate::{Command, Error, Opcode, NUM_SLOTS};

/// Lock targets
#[derive(Copy, Clone, PartialEq, Eq, Debug, strum::Display)]
pub enum LockTarget {
    /// Configuration zone
    Config,
    /// Data and OTP zones
    DataAndOtp,
    /// A single data slot
    Slot(u8),
}

impl LockTarget {
    /// Mode parameter for the lock command (CRC check disabled)
    pub fn mode(&self) -> u8 {
        match self {
            LockTarget::Config => 0x80,
            LockTarget::DataAndOtp => 0x81,
            LockTarget::Slot(s) => 0x82 | (*s << 2),
        }
    }
}

/// Lock request
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct LockReq {
    target: LockTarget,
}

impl LockReq {
    pub fn new(target: LockTarget) -> Result<Self, Error> {
        if let LockTarget::Slot(s) = target {
            if s >= NUM_SLOTS {
                return Err(Error::InvalidParameter);
            }
        }
        Ok(Self { target })
    }
}

impl Encode for LockReq {
    type Error = Error;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(0)
    }

    fn encode(&self, _buff: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(0)
    }
}

impl Command for LockReq {
    const OPCODE: Opcode = Opcode::Lock;
    const EXEC_TIME_MS: u32 = 32;

    fn param1(&self) -> u8 {
        self.target.mode()
    }

    fn param2(&self) -> u16 {
        0x0000
    }

    fn response_len(&self) -> usize {
        1
    }
}
