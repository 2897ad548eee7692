// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Factory configuration for simulated devices

use rand::RngCore;

use atecc_proto::{config::CONFIG_ZONE_LEN, info::DeviceType, NUM_SLOTS};

/// Configuration zone unlock value
pub const UNLOCKED: u8 = 0x55;

pub const AES_ENABLE: usize = 13;
pub const SLOT_CONFIG: usize = 20;
pub const OTP_DATA_LOCK: usize = 86;
pub const CONFIG_LOCK: usize = 87;
pub const SLOT_LOCKS: usize = 88;
pub const KEY_CONFIG: usize = 96;

/// Bytes that cannot be changed by a write command
pub const READ_ONLY: [core::ops::Range<usize>; 2] = [0..16, 84..88];

/// KeyConfig: P256 private key with public info
pub const KEY_CONFIG_P256_PRIVATE: u16 = 0x0033;
/// KeyConfig: AES key slot
pub const KEY_CONFIG_AES: u16 = 0x0038;
/// KeyConfig: data / public key storage
pub const KEY_CONFIG_DATA: u16 = 0x003c;

/// AES slot in the default configuration
pub const DEFAULT_AES_SLOT: u8 = 9;

/// Public key storage slot in the default configuration
pub const DEFAULT_PUBKEY_SLOT: u8 = 10;

/// Slot sizes in bytes
pub fn slot_len(slot: u8) -> usize {
    match slot {
        0..=7 => 36,
        8 => 416,
        _ => 72,
    }
}

/// KeyType field of a KeyConfig word
pub fn key_type(key_config: u16) -> u8 {
    ((key_config >> 2) & 0b111) as u8
}

/// Build the factory configuration zone for a device
pub fn default_config<R: RngCore>(device_type: DeviceType, rng: &mut R) -> [u8; CONFIG_ZONE_LEN] {
    let mut c = [0u8; CONFIG_ZONE_LEN];

    // Serial number, fixed prefix / suffix with random body
    c[0] = 0x01;
    c[1] = 0x23;
    rng.fill_bytes(&mut c[2..4]);
    rng.fill_bytes(&mut c[8..12]);
    c[12] = 0xee;

    c[4..8].copy_from_slice(&revision(device_type));

    c[AES_ENABLE] = match device_type {
        DeviceType::Atecc608a => 0x01,
        DeviceType::Atecc508a => 0x00,
    };
    c[14] = 0x01;
    c[16] = atecc_proto::DEFAULT_ADDRESS << 1;
    c[18] = 0x55;

    for slot in 0..NUM_SLOTS {
        let (slot_config, key_config) = match slot {
            0..=7 => (0x2087, KEY_CONFIG_P256_PRIVATE),
            DEFAULT_AES_SLOT => (0x0f0f, KEY_CONFIG_AES),
            _ => (0x0f0f, KEY_CONFIG_DATA),
        };

        let i = slot as usize * 2;
        c[SLOT_CONFIG + i..][..2].copy_from_slice(&u16::to_le_bytes(slot_config));
        c[KEY_CONFIG + i..][..2].copy_from_slice(&u16::to_le_bytes(key_config));
    }

    c[OTP_DATA_LOCK] = UNLOCKED;
    c[CONFIG_LOCK] = UNLOCKED;
    c[SLOT_LOCKS] = 0xff;
    c[SLOT_LOCKS + 1] = 0xff;

    c
}

/// Revision bytes reported by the info command
pub fn revision(device_type: DeviceType) -> [u8; 4] {
    [0x00, 0x00, device_type as u8, 0x02]
}

#[cfg(test)]
mod test {
    use atecc_proto::config::ConfigZone;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn factory_config() {
        let mut rng = StdRng::seed_from_u64(1);
        let c = ConfigZone::new(default_config(DeviceType::Atecc608a, &mut rng));

        assert_eq!(c.revision(), [0x00, 0x00, 0x60, 0x02]);
        assert!(c.aes_enabled());
        assert!(!c.config_locked());
        assert!(!c.data_otp_locked());

        for slot in 0..NUM_SLOTS {
            assert_eq!(c.slot_locked(slot), Ok(false));
            assert_eq!(c.contains_private_key(slot), Ok(slot < 8));
        }

        assert_eq!(key_type(c.key_config(DEFAULT_AES_SLOT).unwrap()), 6);
        assert_eq!(key_type(c.key_config(0).unwrap()), 4);
    }

    #[test]
    fn atecc508a_has_no_aes() {
        let mut rng = StdRng::seed_from_u64(1);
        let c = ConfigZone::new(default_config(DeviceType::Atecc508a, &mut rng));

        assert_eq!(c.revision()[2], 0x50);
        assert!(!c.aes_enabled());
    }
}
