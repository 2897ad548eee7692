// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Configuration zone layout
//!
//! The 128 byte configuration zone is read as four 32 byte blocks.

use crate::{zone::BLOCK_LEN, Error, NUM_SLOTS};

/// Configuration zone size
pub const CONFIG_ZONE_LEN: usize = 128;

/// Number of 32 byte blocks in the configuration zone
pub const CONFIG_ZONE_BLOCKS: u8 = (CONFIG_ZONE_LEN / BLOCK_LEN) as u8;

/// Device serial number length
pub const SERIAL_NUMBER_LEN: usize = 9;

const SERIAL_PART0: usize = 0;
const SERIAL_PART1: usize = 8;
const REVISION: usize = 4;
const AES_ENABLE: usize = 13;
const SLOT_CONFIG: usize = 20;
const OTP_DATA_LOCK: usize = 86;
const CONFIG_LOCK: usize = 87;
const SLOT_LOCKS: usize = 88;
const KEY_CONFIG: usize = 96;

/// Lock byte value once a zone is locked
const LOCKED: u8 = 0x00;

/// Configuration zone contents
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ConfigZone([u8; CONFIG_ZONE_LEN]);

impl ConfigZone {
    pub fn new(data: [u8; CONFIG_ZONE_LEN]) -> Self {
        Self(data)
    }

    pub fn as_bytes(&self) -> &[u8; CONFIG_ZONE_LEN] {
        &self.0
    }

    /// Serial number, bytes 0..4 followed by 8..13
    pub fn serial_number(&self) -> [u8; SERIAL_NUMBER_LEN] {
        let mut s = [0u8; SERIAL_NUMBER_LEN];
        s[..4].copy_from_slice(&self.0[SERIAL_PART0..][..4]);
        s[4..].copy_from_slice(&self.0[SERIAL_PART1..][..5]);
        s
    }

    pub fn revision(&self) -> [u8; 4] {
        let mut r = [0u8; 4];
        r.copy_from_slice(&self.0[REVISION..][..4]);
        r
    }

    /// AES command enabled (ATECC608A only)
    pub fn aes_enabled(&self) -> bool {
        self.0[AES_ENABLE] & 0x01 != 0
    }

    pub fn config_locked(&self) -> bool {
        self.0[CONFIG_LOCK] == LOCKED
    }

    pub fn data_otp_locked(&self) -> bool {
        self.0[OTP_DATA_LOCK] == LOCKED
    }

    /// Per-slot lock status, a cleared bit indicates a locked slot
    pub fn slot_locked(&self, slot: u8) -> Result<bool, Error> {
        check_slot(slot)?;

        let locks = u16::from_le_bytes([self.0[SLOT_LOCKS], self.0[SLOT_LOCKS + 1]]);
        Ok(locks & (1 << slot) == 0)
    }

    /// SlotConfig word for a slot
    pub fn slot_config(&self, slot: u8) -> Result<u16, Error> {
        check_slot(slot)?;
        Ok(self.word(SLOT_CONFIG + slot as usize * 2))
    }

    /// KeyConfig word for a slot
    pub fn key_config(&self, slot: u8) -> Result<u16, Error> {
        check_slot(slot)?;
        Ok(self.word(KEY_CONFIG + slot as usize * 2))
    }

    /// KeyConfig private bit, set when the slot holds an ECC private key
    pub fn contains_private_key(&self, slot: u8) -> Result<bool, Error> {
        Ok(self.key_config(slot)? & 0x0001 != 0)
    }

    fn word(&self, offset: usize) -> u16 {
        u16::from_le_bytes([self.0[offset], self.0[offset + 1]])
    }
}

impl AsRef<[u8]> for ConfigZone {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn check_slot(slot: u8) -> Result<(), Error> {
    if slot >= NUM_SLOTS {
        return Err(Error::InvalidParameter);
    }
    Ok(())
}
