// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Protocol / command definitions for ATECCx08A secure elements
//!
//! This module provides the wire encoding for communication with ATECC508A / ATECC608A
//! devices: the CRC-16 used to protect frames, command frame construction, response
//! validation, and one module per supported device command.
//!
//! Commands are issued as a word address byte followed by a counted frame:
//!
//! ```text
//! +--------------+-------+--------+--------+----------+----------------+-------+
//! | WORD_ADDRESS | COUNT | OPCODE | PARAM1 | PARAM2   | DATA...        | CRC   |
//! | 1            | 1     | 1      | 1      | 2 (LE)   | 0..N           | 2     |
//! +--------------+-------+--------+--------+----------+----------------+-------+
//! ```
//!
//! and the device replies with `COUNT | DATA... | CRC`. In both directions `COUNT`
//! includes itself and the CRC, and the CRC covers `COUNT` through the end of `DATA`.
//!
//! Command payloads implement [encdec::Encode], response objects implement
//! [encdec::Decode], mirroring the byte layout on the wire.

#![cfg_attr(not(feature = "std"), no_std)]

pub use encdec::{Decode, DecodeOwned, Encode};

pub mod aes;
pub mod config;
pub mod crc;
pub mod frame;
pub mod genkey;
pub mod info;
pub mod lock;
pub mod nonce;
pub mod prelude;
pub mod random;
pub mod sha;
pub mod sign;
pub mod status;
pub mod verify;
pub mod zone;

mod error;
pub use error::Error;

mod helpers;

/// Default (7-bit, unshifted) I2C address of a factory fresh device
pub const DEFAULT_ADDRESS: u8 = 0x60;

/// Number of key / data slots on the device
pub const NUM_SLOTS: u8 = 16;

/// Device command opcodes
#[derive(Copy, Clone, Debug, PartialEq, Eq, num_enum::TryFromPrimitive, strum::Display)]
#[repr(u8)]
pub enum Opcode {
    /// Return data from a zone
    Read = 0x02,

    /// Load TempKey with a nonce or pass-through value
    Nonce = 0x16,

    /// Lock the configuration / data zones or a single slot
    Lock = 0x17,

    /// Fetch 32 random bytes
    Random = 0x1B,

    /// Write data to a zone
    Write = 0x12,

    /// Return device revision information
    Info = 0x30,

    /// Generate a private key or compute a public key
    GenKey = 0x40,

    /// Sign the contents of TempKey
    Sign = 0x41,

    /// Verify an ECDSA signature
    Verify = 0x45,

    /// SHA-256 digest operations
    Sha = 0x47,

    /// Single block AES-128 encrypt / decrypt (ATECC608A)
    Aes = 0x51,
}

/// Command trait, implemented by request objects to provide
/// the framing parameters for each device command.
///
/// The command payload (`DATA`) is written via the [Encode] implementation.
pub trait Command: Encode<Error = Error> {
    /// Opcode for this command
    const OPCODE: Opcode;

    /// Maximum execution time in milliseconds, the device
    /// will not respond to reads until this has elapsed
    const EXEC_TIME_MS: u32;

    /// First parameter (mode) byte
    fn param1(&self) -> u8;

    /// Second parameter, encoded little-endian
    fn param2(&self) -> u16;

    /// Expected length of the response payload (excluding count and CRC)
    fn response_len(&self) -> usize;
}
