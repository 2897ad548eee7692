// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Zone read and write commands
//!
//! Reads and writes transfer either a single 4 byte word or a 32 byte block,
//! selected by bit 7 of the zone parameter.

use encdec::Encode;

use crate::{Command, Error, Opcode, NUM_SLOTS};

/// Device memory zones
#[derive(Copy, Clone, Debug, PartialEq, Eq, num_enum::TryFromPrimitive, strum::Display)]
#[repr(u8)]
pub enum Zone {
    Config = 0x00,
    Otp = 0x01,
    Data = 0x02,
}

bitflags::bitflags! {
    /// Flags combined with [Zone] in the first command parameter
    pub struct ZoneFlags: u8 {
        /// Transfer a 32 byte block rather than a 4 byte word
        const LEN_32 = 0x80;
    }
}

/// Single word transfer length
pub const WORD_LEN: usize = 4;

/// Block transfer length
pub const BLOCK_LEN: usize = 32;

/// Compute the data zone address for a byte offset within a slot
pub fn slot_address(slot: u8, offset: usize) -> Result<u16, Error> {
    if slot >= NUM_SLOTS || offset % WORD_LEN != 0 {
        return Err(Error::InvalidParameter);
    }

    let block = (offset / BLOCK_LEN) as u16;
    let word = ((offset % BLOCK_LEN) / WORD_LEN) as u16;

    Ok((slot as u16) << 3 | block << 8 | word)
}

/// Compute the config zone address of a 32 byte block
pub const fn config_address(block: u8) -> u16 {
    (block as u16) << 3
}

fn zone_param(zone: Zone, len: usize) -> u8 {
    let mut flags = ZoneFlags::empty();
    if len == BLOCK_LEN {
        flags |= ZoneFlags::LEN_32;
    }
    zone as u8 | flags.bits()
}

fn check_len(len: usize) -> Result<(), Error> {
    match len {
        WORD_LEN | BLOCK_LEN => Ok(()),
        _ => Err(Error::InvalidParameter),
    }
}

/// Read a word or block from a zone
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ReadReq {
    zone: Zone,
    address: u16,
    len: usize,
}

impl ReadReq {
    /// Create a read request, `len` must be 4 or 32 bytes
    pub fn new(zone: Zone, address: u16, len: usize) -> Result<Self, Error> {
        check_len(len)?;
        Ok(Self { zone, address, len })
    }
}

impl Encode for ReadReq {
    type Error = Error;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(0)
    }

    fn encode(&self, _buff: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(0)
    }
}

impl Command for ReadReq {
    const OPCODE: Opcode = Opcode::Read;
    const EXEC_TIME_MS: u32 = 1;

    fn param1(&self) -> u8 {
        zone_param(self.zone, self.len)
    }

    fn param2(&self) -> u16 {
        self.address
    }

    fn response_len(&self) -> usize {
        self.len
    }
}

/// Write a word or block to a zone
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct WriteReq<'a> {
    zone: Zone,
    address: u16,
    data: &'a [u8],
}

impl<'a> WriteReq<'a> {
    /// Create a write request, `data` must be 4 or 32 bytes
    pub fn new(zone: Zone, address: u16, data: &'a [u8]) -> Result<Self, Error> {
        check_len(data.len())?;
        Ok(Self {
            zone,
            address,
            data,
        })
    }
}

impl<'a> Encode for WriteReq<'a> {
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

impl<'a> Command for WriteReq<'a> {
    const OPCODE: Opcode = Opcode::Write;
    const EXEC_TIME_MS: u32 = 26;

    fn param1(&self) -> u8 {
        zone_param(self.zone, self.data.len())
    }

    fn param2(&self) -> u16 {
        self.address
    }

    fn response_len(&self) -> usize {
        1
    }
}
