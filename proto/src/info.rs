// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Device revision information

use encdec::{Decode, Encode};

use crate::{helpers::arr, Command, Error, Opcode};

/// Fetch device revision (Info command in revision mode)
#[derive(Copy, Clone, PartialEq, Debug, Default, Encode, Decode)]
#[encdec(error = "Error")]
pub struct InfoReq {}

impl Command for InfoReq {
    const OPCODE: Opcode = Opcode::Info;
    const EXEC_TIME_MS: u32 = 1;

    /// Revision mode
    fn param1(&self) -> u8 {
        0x00
    }

    fn param2(&self) -> u16 {
        0x0000
    }

    fn response_len(&self) -> usize {
        4
    }
}

/// Device revision response
#[derive(Copy, Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "Error")]
pub struct InfoResp {
    /// Raw revision bytes, the third byte identifies the device family
    #[encdec(with = "arr")]
    pub revision: [u8; 4],
}

/// Device families reported in the revision response
#[derive(Copy, Clone, Debug, PartialEq, Eq, num_enum::TryFromPrimitive, strum::Display)]
#[repr(u8)]
pub enum DeviceType {
    Atecc508a = 0x50,
    Atecc608a = 0x60,
}

impl InfoResp {
    /// Resolve the device family from the revision bytes
    pub fn device_type(&self) -> Result<DeviceType, Error> {
        DeviceType::try_from(self.revision[2]).map_err(|_| Error::UnexpectedResponse)
    }
}
