// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Simulated device state and command execution

use aes::{
    cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit},
    Aes128,
};
use log::{debug, trace, warn};
use p256::ecdsa::{
    signature::hazmat::{PrehashSigner, PrehashVerifier},
    Signature, SigningKey, VerifyingKey,
};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use sha2::{Digest, Sha256};

use atecc_proto::{
    aes::AES_BLOCKSIZE,
    config::CONFIG_ZONE_LEN,
    crc::{crc16, CRC_SIZE},
    frame::FRAME_OVERHEAD,
    genkey::{GenKeyMode, PUBLIC_KEY_LEN},
    info::DeviceType,
    nonce::NONCE_MODE_PASSTHROUGH,
    sha::{ShaMode, DIGEST_LEN, SHA_BLOCK_LEN},
    sign::SIGN_MODE_TEMPKEY,
    status::Status,
    verify::{KEY_TYPE_P256, VERIFY_MODE_EXTERNAL},
    zone::{Zone, ZoneFlags, BLOCK_LEN, WORD_LEN},
    Opcode, NUM_SLOTS,
};

use crate::config::*;

/// Largest response payload (public keys and signatures)
pub const MAX_PAYLOAD: usize = 64;

/// Response payload or failure status
pub type Payload = heapless::Vec<u8, MAX_PAYLOAD>;

/// OTP zone size
pub const OTP_ZONE_LEN: usize = 64;

/// AES key type in KeyConfig
const KEY_TYPE_AES: u8 = 6;

/// Volatile and persistent state for a simulated device
pub struct Device {
    device_type: DeviceType,
    config: [u8; CONFIG_ZONE_LEN],
    otp: [u8; OTP_ZONE_LEN],
    slots: Vec<Vec<u8>>,
    keys: Vec<Option<SigningKey>>,
    tempkey: Option<[u8; 32]>,
    sha: Option<Sha256>,
    rng: StdRng,
}

impl Device {
    pub fn new(device_type: DeviceType, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        let config = default_config(device_type, &mut rng);
        let slots = (0..NUM_SLOTS).map(|s| vec![0u8; slot_len(s)]).collect();

        Self {
            device_type,
            config,
            otp: [0u8; OTP_ZONE_LEN],
            slots,
            keys: (0..NUM_SLOTS).map(|_| None).collect(),
            tempkey: None,
            sha: None,
            rng,
        }
    }

    pub fn config(&self) -> &[u8; CONFIG_ZONE_LEN] {
        &self.config
    }

    /// Clear volatile state on entering sleep
    pub fn sleep(&mut self) {
        self.tempkey = None;
        self.sha = None;
    }

    /// Parse and execute a command frame (count through CRC),
    /// returning the execution time and the response payload
    pub fn execute(&mut self, frame: &[u8]) -> (u32, Payload) {
        let n = frame.len();

        if n < FRAME_OVERHEAD || frame[0] as usize != n {
            warn!("invalid command count for {} byte frame", n);
            return (0, status(Status::CrcError));
        }

        if crc16(&frame[..n - CRC_SIZE]) != frame[n - CRC_SIZE..] {
            warn!("command CRC mismatch");
            return (0, status(Status::CrcError));
        }

        let p1 = frame[2];
        let p2 = u16::from_le_bytes([frame[3], frame[4]]);
        let data = &frame[5..n - CRC_SIZE];

        let opcode = match Opcode::try_from(frame[1]) {
            Ok(o) => o,
            Err(_) => {
                warn!("unsupported opcode: 0x{:02x}", frame[1]);
                return (0, status(Status::ParseError));
            }
        };

        trace!(
            "exec {} (p1: 0x{:02x}, p2: 0x{:04x}, data: {:02x?})",
            opcode,
            p1,
            p2,
            data
        );

        let r = match opcode {
            Opcode::Info => self.info(p1),
            Opcode::Random => self.random(p1),
            Opcode::Nonce => self.nonce(p1, data),
            Opcode::Read => self.read(p1, p2),
            Opcode::Write => self.write(p1, p2, data),
            Opcode::Lock => self.lock(p1),
            Opcode::GenKey => self.genkey(p1, p2),
            Opcode::Sign => self.sign(p1, p2),
            Opcode::Verify => self.verify(p1, p2, data),
            Opcode::Sha => self.sha(p1, p2, data),
            Opcode::Aes => self.aes(p1, p2, data),
        };

        let payload = match r {
            Ok(p) => p,
            Err(s) => {
                debug!("{} failed: {}", opcode, s);
                status(s)
            }
        };

        (exec_time_ms(opcode), payload)
    }

    fn info(&mut self, mode: u8) -> Result<Payload, Status> {
        if mode != 0x00 {
            return Err(Status::ParseError);
        }
        payload(&revision(self.device_type))
    }

    fn random(&mut self, mode: u8) -> Result<Payload, Status> {
        if mode != 0x00 {
            return Err(Status::ParseError);
        }

        let mut r = [0u8; 32];
        self.rng.fill_bytes(&mut r);

        payload(&r)
    }

    fn nonce(&mut self, mode: u8, data: &[u8]) -> Result<Payload, Status> {
        if mode != NONCE_MODE_PASSTHROUGH || data.len() != 32 {
            return Err(Status::ParseError);
        }

        let mut t = [0u8; 32];
        t.copy_from_slice(data);
        self.tempkey = Some(t);

        Ok(status(Status::Success))
    }

    /// Resolve a zone / address / length to a byte offset within the zone
    fn locate(&self, p1: u8, address: u16) -> Result<(Zone, usize, usize), Status> {
        let zone = Zone::try_from(p1 & 0x03).map_err(|_| Status::ParseError)?;
        let len = match ZoneFlags::from_bits_truncate(p1).contains(ZoneFlags::LEN_32) {
            true => BLOCK_LEN,
            false => WORD_LEN,
        };

        let word = (address & 0x07) as usize;
        let (offset, limit) = match zone {
            Zone::Config => {
                let block = ((address >> 3) & 0x03) as usize;
                (block * BLOCK_LEN + word * WORD_LEN, CONFIG_ZONE_LEN)
            }
            Zone::Otp => {
                let block = ((address >> 3) & 0x01) as usize;
                (block * BLOCK_LEN + word * WORD_LEN, OTP_ZONE_LEN)
            }
            Zone::Data => {
                let slot = ((address >> 3) & 0x0f) as u8;
                let block = (address >> 8) as usize;
                (block * BLOCK_LEN + word * WORD_LEN, slot_len(slot))
            }
        };

        if offset + len > limit {
            return Err(Status::ParseError);
        }

        Ok((zone, offset, len))
    }

    fn read(&mut self, p1: u8, address: u16) -> Result<Payload, Status> {
        let (zone, offset, len) = self.locate(p1, address)?;

        let d = match zone {
            Zone::Config => &self.config[offset..][..len],
            Zone::Otp => &self.otp[offset..][..len],
            Zone::Data => &self.slots[((address >> 3) & 0x0f) as usize][offset..][..len],
        };

        payload(d)
    }

    fn write(&mut self, p1: u8, address: u16, data: &[u8]) -> Result<Payload, Status> {
        let (zone, offset, len) = self.locate(p1, address)?;
        if data.len() != len {
            return Err(Status::ParseError);
        }

        match zone {
            Zone::Config => {
                if self.config[CONFIG_LOCK] != UNLOCKED {
                    return Err(Status::ExecutionError);
                }

                for (i, b) in data.iter().enumerate() {
                    let o = offset + i;
                    if !READ_ONLY.iter().any(|r| r.contains(&o)) {
                        self.config[o] = *b;
                    }
                }
            }
            Zone::Otp => {
                if self.config[OTP_DATA_LOCK] != UNLOCKED {
                    return Err(Status::ExecutionError);
                }
                self.otp[offset..][..len].copy_from_slice(data);
            }
            Zone::Data => {
                let slot = ((address >> 3) & 0x0f) as u8;
                if self.slot_locked(slot) {
                    return Err(Status::ExecutionError);
                }
                self.slots[slot as usize][offset..][..len].copy_from_slice(data);
            }
        }

        Ok(status(Status::Success))
    }

    fn lock(&mut self, mode: u8) -> Result<Payload, Status> {
        match mode & 0x03 {
            0x00 => {
                if self.config[CONFIG_LOCK] != UNLOCKED {
                    return Err(Status::ExecutionError);
                }
                self.config[CONFIG_LOCK] = 0x00;
            }
            0x01 => {
                if self.config[CONFIG_LOCK] == UNLOCKED || self.config[OTP_DATA_LOCK] != UNLOCKED {
                    return Err(Status::ExecutionError);
                }
                self.config[OTP_DATA_LOCK] = 0x00;
            }
            0x02 => {
                let slot = (mode >> 2) & 0x0f;
                if self.slot_locked(slot) {
                    return Err(Status::ExecutionError);
                }

                let mut locks =
                    u16::from_le_bytes([self.config[SLOT_LOCKS], self.config[SLOT_LOCKS + 1]]);
                locks &= !(1 << slot);
                self.config[SLOT_LOCKS..][..2].copy_from_slice(&locks.to_le_bytes());
            }
            _ => return Err(Status::ParseError),
        }

        Ok(status(Status::Success))
    }

    fn genkey(&mut self, mode: u8, slot: u16) -> Result<Payload, Status> {
        let slot = key_slot(slot)?;
        let mode = GenKeyMode::from_bits(mode).ok_or(Status::ParseError)?;

        if mode.contains(GenKeyMode::PRIVATE) {
            if self.key_config(slot) & 0x0001 == 0 || self.slot_locked(slot) {
                return Err(Status::ExecutionError);
            }
            self.keys[slot as usize] = Some(SigningKey::random(&mut self.rng));
        }

        let k = self.keys[slot as usize]
            .as_ref()
            .ok_or(Status::ExecutionError)?;

        let p = VerifyingKey::from(k).to_encoded_point(false);
        payload(&p.as_bytes()[1..][..PUBLIC_KEY_LEN])
    }

    fn sign(&mut self, mode: u8, slot: u16) -> Result<Payload, Status> {
        let slot = key_slot(slot)?;
        if mode != SIGN_MODE_TEMPKEY {
            return Err(Status::ParseError);
        }

        // TempKey is consumed by signing
        let digest = self.tempkey.take().ok_or(Status::ExecutionError)?;
        let k = self.keys[slot as usize]
            .as_ref()
            .ok_or(Status::ExecutionError)?;

        let sig: Signature = k.sign_prehash(&digest).map_err(|_| Status::EccFault)?;

        payload(&sig.to_bytes())
    }

    fn verify(&mut self, mode: u8, key_type: u16, data: &[u8]) -> Result<Payload, Status> {
        if mode != VERIFY_MODE_EXTERNAL || key_type != KEY_TYPE_P256 || data.len() != 128 {
            return Err(Status::ParseError);
        }

        let digest = self.tempkey.take().ok_or(Status::ExecutionError)?;

        let mut point = [0u8; PUBLIC_KEY_LEN + 1];
        point[0] = 0x04;
        point[1..].copy_from_slice(&data[64..]);

        let key = VerifyingKey::from_sec1_bytes(&point).map_err(|_| Status::ExecutionError)?;

        let ok = Signature::from_slice(&data[..64])
            .and_then(|s| key.verify_prehash(&digest, &s))
            .is_ok();

        match ok {
            true => Ok(status(Status::Success)),
            false => Err(Status::Miscompare),
        }
    }

    fn sha(&mut self, mode: u8, len: u16, data: &[u8]) -> Result<Payload, Status> {
        if len as usize != data.len() {
            return Err(Status::ParseError);
        }

        match ShaMode::try_from(mode).map_err(|_| Status::ParseError)? {
            ShaMode::Start => {
                self.sha = Some(Sha256::new());
                Ok(status(Status::Success))
            }
            ShaMode::Update => {
                if data.len() != SHA_BLOCK_LEN {
                    return Err(Status::ParseError);
                }
                let s = self.sha.as_mut().ok_or(Status::ExecutionError)?;
                s.update(data);
                Ok(status(Status::Success))
            }
            ShaMode::End => {
                if data.len() >= SHA_BLOCK_LEN {
                    return Err(Status::ParseError);
                }
                let mut s = self.sha.take().ok_or(Status::ExecutionError)?;
                s.update(data);

                let mut d = [0u8; DIGEST_LEN];
                d.copy_from_slice(&s.finalize());

                // Digest is also left in TempKey
                self.tempkey = Some(d);

                payload(&d)
            }
        }
    }

    fn aes(&mut self, mode: u8, slot: u16, data: &[u8]) -> Result<Payload, Status> {
        let slot = key_slot(slot)?;
        if data.len() != AES_BLOCKSIZE || mode & 0b0011_1110 != 0 {
            return Err(Status::ParseError);
        }

        let aes_enabled = self.config[AES_ENABLE] & 0x01 != 0;
        if !aes_enabled || key_type(self.key_config(slot)) != KEY_TYPE_AES {
            return Err(Status::ExecutionError);
        }

        let index = (mode >> 6) as usize;
        let key = self.slots[slot as usize]
            .get(index * AES_BLOCKSIZE..(index + 1) * AES_BLOCKSIZE)
            .ok_or(Status::ExecutionError)?;

        let c = Aes128::new(GenericArray::from_slice(key));
        let mut b = GenericArray::clone_from_slice(data);

        match mode & 0x01 {
            0 => c.encrypt_block(&mut b),
            _ => c.decrypt_block(&mut b),
        }

        payload(&b)
    }

    fn key_config(&self, slot: u8) -> u16 {
        let i = KEY_CONFIG + slot as usize * 2;
        u16::from_le_bytes([self.config[i], self.config[i + 1]])
    }

    fn slot_locked(&self, slot: u8) -> bool {
        let locks = u16::from_le_bytes([self.config[SLOT_LOCKS], self.config[SLOT_LOCKS + 1]]);
        locks & (1 << slot) == 0
    }
}

fn key_slot(p2: u16) -> Result<u8, Status> {
    match p2 < NUM_SLOTS as u16 {
        true => Ok(p2 as u8),
        false => Err(Status::ParseError),
    }
}

fn payload(d: &[u8]) -> Result<Payload, Status> {
    Payload::from_slice(d).map_err(|_| Status::ExecutionError)
}

/// Single byte status response
pub fn status(s: Status) -> Payload {
    let mut p = Payload::new();
    // Capacity is always sufficient for a single byte
    let _ = p.push(s as u8);
    p
}

/// Typical execution times, always within the maximums used by the host
fn exec_time_ms(opcode: Opcode) -> u32 {
    match opcode {
        Opcode::Read | Opcode::Info => 1,
        Opcode::Nonce => 5,
        Opcode::Random => 20,
        Opcode::Write => 20,
        Opcode::Lock => 25,
        Opcode::GenKey => 100,
        Opcode::Sign => 60,
        Opcode::Verify => 50,
        Opcode::Sha => 7,
        Opcode::Aes => 9,
    }
}
