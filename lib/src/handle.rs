// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Handle for connected ATECC devices
//!
//! This provides methods for interacting with the device
//! and is generic over [Bus] implementations

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use encdec::Decode;
use log::debug;
use zeroize::Zeroize;

use atecc_core::{BlockCrypt, CipherContext};
use atecc_proto::{
    aes::{AesKey, AesReq, AesResp, Block, Direction},
    config::{ConfigZone, CONFIG_ZONE_BLOCKS, CONFIG_ZONE_LEN},
    frame::MAX_RESPONSE_LEN,
    genkey::{GenKeyReq, PublicKeyResp, PUBLIC_KEY_LEN},
    info::{DeviceType, InfoReq, InfoResp},
    lock::{LockReq, LockTarget},
    nonce::NonceReq,
    random::{RandomReq, RandomResp, RANDOM_LEN},
    sha::{DigestResp, ShaReq, DIGEST_LEN, SHA_BLOCK_LEN},
    sign::{SignReq, SignatureResp, SIGNATURE_LEN},
    status::{check_status, Status},
    verify::VerifyReq,
    zone::{config_address, slot_address, ReadReq, WriteReq, Zone, BLOCK_LEN, WORD_LEN},
    Command, NUM_SLOTS,
};

use crate::{
    transport::{Bus, DeviceOptions, Transport},
    Error,
};

/// Handle for a connected ATECCx08A device.
///
/// Clones share the underlying [Transport], the lock is held for
/// each complete wake / command / idle sequence.
pub struct DeviceHandle<B: Bus> {
    t: Arc<Mutex<Transport<B>>>,
}

impl<B: Bus> Clone for DeviceHandle<B> {
    fn clone(&self) -> Self {
        Self { t: self.t.clone() }
    }
}

/// Create a [DeviceHandle] wrapper from a [Transport]
impl<B: Bus> From<Transport<B>> for DeviceHandle<B> {
    fn from(t: Transport<B>) -> Self {
        Self {
            t: Arc::new(Mutex::new(t)),
        }
    }
}

/// Device revision information
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceInfo {
    pub device_type: DeviceType,
    pub revision: [u8; 4],
}

impl<B: Bus> DeviceHandle<B> {
    /// Create a new handle over the provided bus
    pub fn new(bus: B, opts: DeviceOptions) -> Self {
        Self::from(Transport::new(bus, opts))
    }

    /// Lock the transport, a poisoned lock is recovered as each
    /// sequence leaves the device idle
    fn lock(&self) -> MutexGuard<'_, Transport<B>> {
        self.t.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Execute a command returning a decoded response object
    fn request<R, C>(t: &mut Transport<B>, cmd: &C) -> Result<R, Error<B::Error>>
    where
        C: Command + core::fmt::Debug,
        R: for<'a> Decode<'a, Output = R, Error = atecc_proto::Error>,
    {
        let mut buff = [0u8; MAX_RESPONSE_LEN];

        let n = t.command(cmd, &mut buff)?;
        let (r, _) = R::decode(&buff[..n])?;

        buff.zeroize();

        Ok(r)
    }

    /// Execute a command returning a status-only response
    fn status<C: Command + core::fmt::Debug>(
        t: &mut Transport<B>,
        cmd: &C,
    ) -> Result<(), Error<B::Error>> {
        let mut buff = [0u8; 1];

        let n = t.command(cmd, &mut buff)?;
        check_status(&buff[..n])?;

        Ok(())
    }

    /// Wake the device, checking the wake acknowledgement, and return it to idle
    pub fn wake(&self) -> Result<(), Error<B::Error>> {
        let mut t = self.lock();

        t.wake()?;
        t.idle()
    }

    /// Fetch device revision, failing if the device is not an ATECC508A / ATECC608A
    pub fn info(&self) -> Result<DeviceInfo, Error<B::Error>> {
        debug!("Requesting device info");

        let resp: InfoResp = Self::request(&mut self.lock(), &InfoReq {})?;
        let device_type = resp.device_type()?;

        Ok(DeviceInfo {
            device_type,
            revision: resp.revision,
        })
    }

    /// Fetch 32 random bytes
    pub fn random(&self) -> Result<[u8; RANDOM_LEN], Error<B::Error>> {
        let resp: RandomResp = Self::request(&mut self.lock(), &RandomReq {})?;
        Ok(resp.value)
    }

    pub fn random_u8(&self) -> Result<u8, Error<B::Error>> {
        let r = self.random()?;
        Ok(r[0])
    }

    pub fn random_u16(&self) -> Result<u16, Error<B::Error>> {
        let r = self.random()?;
        Ok(u16::from_be_bytes([r[0], r[1]]))
    }

    pub fn random_u32(&self) -> Result<u32, Error<B::Error>> {
        let r = self.random()?;
        Ok(u32::from_be_bytes([r[0], r[1], r[2], r[3]]))
    }

    /// Fetch a random value in the inclusive range between `a` and `b`,
    /// bounds may be provided in either order
    pub fn random_range(&self, a: i32, b: i32) -> Result<i32, Error<B::Error>> {
        let (min, max) = match a <= b {
            true => (a as i64, b as i64),
            false => (b as i64, a as i64),
        };

        let span = (max - min + 1) as u64;
        let r = self.random_u32()? as u64;

        Ok((min + (r % span) as i64) as i32)
    }

    /// Fetch a random value in the inclusive range between zero and `max`
    pub fn random_max(&self, max: i32) -> Result<i32, Error<B::Error>> {
        self.random_range(0, max)
    }

    /// Read a 4 or 32 byte word / block from a zone into `buff`
    pub fn read(&self, zone: Zone, address: u16, buff: &mut [u8]) -> Result<(), Error<B::Error>> {
        let req = ReadReq::new(zone, address, buff.len())?;
        let n = self.lock().command(&req, buff)?;

        if n != buff.len() {
            return Err(Error::UnexpectedResponse);
        }

        Ok(())
    }

    /// Write a 4 or 32 byte word / block to a zone
    pub fn write(&self, zone: Zone, address: u16, data: &[u8]) -> Result<(), Error<B::Error>> {
        let req = WriteReq::new(zone, address, data)?;
        Self::status(&mut self.lock(), &req)
    }

    /// Read `buff.len()` bytes (a multiple of 4) from the start of a data slot
    pub fn read_slot(&self, slot: u8, buff: &mut [u8]) -> Result<(), Error<B::Error>> {
        check_slot_len(slot, buff.len())?;

        let mut t = self.lock();
        let mut offset = 0;

        while offset < buff.len() {
            let n = chunk_len(buff.len() - offset);
            let req = ReadReq::new(Zone::Data, slot_address(slot, offset)?, n)?;

            t.command(&req, &mut buff[offset..][..n])?;
            offset += n;
        }

        Ok(())
    }

    /// Write `data` (a multiple of 4 bytes) to the start of a data slot
    pub fn write_slot(&self, slot: u8, data: &[u8]) -> Result<(), Error<B::Error>> {
        check_slot_len(slot, data.len())?;

        let mut t = self.lock();
        let mut offset = 0;

        while offset < data.len() {
            let n = chunk_len(data.len() - offset);
            let req = WriteReq::new(Zone::Data, slot_address(slot, offset)?, &data[offset..][..n])?;

            Self::status(&mut t, &req)?;
            offset += n;
        }

        Ok(())
    }

    /// Read the complete configuration zone
    pub fn read_config_zone(&self) -> Result<ConfigZone, Error<B::Error>> {
        debug!("Reading config zone");

        let mut data = [0u8; CONFIG_ZONE_LEN];
        let mut t = self.lock();

        for (i, b) in data.chunks_exact_mut(BLOCK_LEN).enumerate() {
            let req = ReadReq::new(Zone::Config, config_address(i as u8), BLOCK_LEN)?;
            t.command(&req, b)?;
        }

        debug_assert_eq!(CONFIG_ZONE_BLOCKS as usize * BLOCK_LEN, CONFIG_ZONE_LEN);

        Ok(ConfigZone::new(data))
    }

    /// Lock a zone or slot, this is irreversible
    pub fn lock_target(&self, target: LockTarget) -> Result<(), Error<B::Error>> {
        debug!("Locking {}", target);

        let req = LockReq::new(target)?;
        Self::status(&mut self.lock(), &req)
    }

    /// Lock the configuration zone
    pub fn lock_config(&self) -> Result<(), Error<B::Error>> {
        self.lock_target(LockTarget::Config)
    }

    /// Lock the data and OTP zones
    pub fn lock_data_otp(&self) -> Result<(), Error<B::Error>> {
        self.lock_target(LockTarget::DataAndOtp)
    }

    /// Lock a single data slot
    pub fn lock_slot(&self, slot: u8) -> Result<(), Error<B::Error>> {
        self.lock_target(LockTarget::Slot(slot))
    }

    /// Create a new P256 private key in `slot`, returning the public key
    pub fn create_key_pair(&self, slot: u8) -> Result<[u8; PUBLIC_KEY_LEN], Error<B::Error>> {
        debug!("Generating key pair in slot {}", slot);

        let resp: PublicKeyResp = Self::request(&mut self.lock(), &GenKeyReq::private(slot)?)?;
        Ok(resp.key)
    }

    /// Compute the public key for the private key stored in `slot`
    pub fn public_key(&self, slot: u8) -> Result<[u8; PUBLIC_KEY_LEN], Error<B::Error>> {
        let resp: PublicKeyResp = Self::request(&mut self.lock(), &GenKeyReq::public(slot)?)?;
        Ok(resp.key)
    }

    /// Sign a 32 byte digest with the private key in `slot`
    pub fn create_signature(
        &self,
        digest: &[u8; DIGEST_LEN],
        slot: u8,
    ) -> Result<[u8; SIGNATURE_LEN], Error<B::Error>> {
        debug!("Signing with slot {}", slot);

        let sign = SignReq::new(slot)?;

        // TempKey must not be replaced between the nonce and sign commands
        let mut t = self.lock();

        Self::status(&mut t, &NonceReq { num_in: *digest })?;
        let resp: SignatureResp = Self::request(&mut t, &sign)?;

        Ok(resp.signature)
    }

    /// Verify a signature over a 32 byte digest with an external public key
    pub fn verify_signature(
        &self,
        digest: &[u8; DIGEST_LEN],
        signature: &[u8; SIGNATURE_LEN],
        public_key: &[u8; PUBLIC_KEY_LEN],
    ) -> Result<bool, Error<B::Error>> {
        let req = VerifyReq {
            signature: *signature,
            public_key: *public_key,
        };

        let mut t = self.lock();

        Self::status(&mut t, &NonceReq { num_in: *digest })?;

        match Self::status(&mut t, &req) {
            Ok(_) => Ok(true),
            Err(Error::Device(s)) if s == Status::Miscompare as u8 => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Compute the SHA-256 digest of `data` on the device
    pub fn sha256(&self, data: &[u8]) -> Result<[u8; DIGEST_LEN], Error<B::Error>> {
        debug!("Computing SHA-256 over {} bytes", data.len());

        let mut t = self.lock();

        Self::status(&mut t, &ShaReq::start())?;

        let mut blocks = data.chunks_exact(SHA_BLOCK_LEN);
        for b in &mut blocks {
            Self::status(&mut t, &ShaReq::update(b)?)?;
        }

        let resp: DigestResp = Self::request(&mut t, &ShaReq::end(blocks.remainder())?)?;

        Ok(resp.digest)
    }

    /// Hash `data` on the device then sign the digest with the key in `slot`
    pub fn sign_with_sha256(
        &self,
        data: &[u8],
        slot: u8,
    ) -> Result<[u8; SIGNATURE_LEN], Error<B::Error>> {
        let digest = self.sha256(data)?;
        self.create_signature(&digest, slot)
    }

    /// Hash `data` on the device then verify the signature against the public key
    /// for `slot`, computed for private key slots or read from public key slots
    pub fn verify_with_sha256(
        &self,
        data: &[u8],
        signature: &[u8; SIGNATURE_LEN],
        slot: u8,
    ) -> Result<bool, Error<B::Error>> {
        let digest = self.sha256(data)?;

        let config = self.read_config_zone()?;
        let public_key = match config.contains_private_key(slot)? {
            true => self.public_key(slot)?,
            false => {
                let mut k = [0u8; PUBLIC_KEY_LEN];
                self.read_slot(slot, &mut k)?;
                k
            }
        };

        self.verify_signature(&digest, signature, &public_key)
    }

    /// Encrypt or decrypt a single block with the AES key at `slot` / `key_index`
    pub fn crypt_block(
        &self,
        block: &Block,
        slot: u8,
        key_index: u8,
        direction: Direction,
    ) -> Result<Block, Error<B::Error>> {
        let key = AesKey::new(slot, key_index)?;
        <Self as BlockCrypt>::crypt_block(self, &key, direction, block)
    }

    /// Encrypt `plain` into `out` using the provided [CipherContext],
    /// returning the number of ciphertext bytes
    pub fn encrypt(
        &self,
        ctx: &CipherContext,
        plain: &[u8],
        out: &mut [u8],
    ) -> Result<usize, Error<B::Error>> {
        let n = ctx.encrypt(self, plain, out)?;
        Ok(n)
    }

    /// Decrypt `cipher` into `out` using the provided [CipherContext],
    /// returning the plaintext length
    pub fn decrypt(
        &self,
        ctx: &CipherContext,
        cipher: &[u8],
        out: &mut [u8],
    ) -> Result<usize, Error<B::Error>> {
        let n = ctx.decrypt(self, cipher, out)?;
        Ok(n)
    }
}

/// Single block AES over the device AES command
impl<B: Bus> BlockCrypt for DeviceHandle<B> {
    type Error = Error<B::Error>;

    fn crypt_block(
        &self,
        key: &AesKey,
        direction: Direction,
        block: &Block,
    ) -> Result<Block, Self::Error> {
        let req = AesReq {
            key: *key,
            direction,
            block: *block,
        };

        let resp: AesResp = Self::request(&mut self.lock(), &req)?;

        Ok(resp.block)
    }
}

/// Slot transfers are 32 byte blocks followed by 4 byte words
fn chunk_len(remaining: usize) -> usize {
    match remaining >= BLOCK_LEN {
        true => BLOCK_LEN,
        false => WORD_LEN,
    }
}

fn check_slot_len<E: core::fmt::Debug>(slot: u8, len: usize) -> Result<(), Error<E>> {
    if slot >= NUM_SLOTS || len % WORD_LEN != 0 {
        return Err(Error::InvalidParameter);
    }
    Ok(())
}
