// Copyright (c) 2022-2023 The MobileCoin Foundation

//! CRC-16 used to protect command and response frames
//!
//! This is the bit-serial CRC described in the CryptoAuth data zone CRC application note:
//! a zero-initialised 16-bit register, polynomial `0x8005`, input bits consumed LSB first
//! and the register emitted low byte first without reflection.

use ::crc::{Algorithm, Crc};

/// CRC algorithm parameters
pub const CRC_16_ATECC: Algorithm<u16> = Algorithm {
    width: 16,
    poly: 0x8005,
    init: 0x0000,
    refin: true,
    refout: false,
    xorout: 0x0000,
    check: 0xbcdd,
    residue: 0x0000,
};

/// Length of the CRC field in frames
pub const CRC_SIZE: usize = 2;

const ATECC_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_ATECC);

/// Compute the CRC over the provided data, returning `[low, high]` in wire order
pub fn crc16(data: &[u8]) -> [u8; CRC_SIZE] {
    ATECC_CRC.checksum(data).to_le_bytes()
}
