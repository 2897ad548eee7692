// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Cipher mode engine
//!
//! Blocks are processed in order with one [BlockCrypt] call each. Encryption
//! pads in place within the caller's output buffer, decryption writes the
//! recovered plaintext to the output buffer and only reports a length once
//! any padding has been validated.

use core::fmt::Debug;

#[cfg(feature = "log")]
use log::{debug, warn};
use zeroize::Zeroize;

use crate::{AesKey, Block, Direction, AES_BLOCKSIZE};

mod chain;
use chain::{CbcChain, Chaining, NoChain};

mod error;
pub use error::Error;

mod padding;
pub use padding::{required_output_size, Padding};
use padding::{output_size, pad, unpad};

/// Single block AES primitive, implemented by device handles and test stubs
pub trait BlockCrypt {
    type Error: Debug;

    /// Encrypt or decrypt one block using the referenced device key
    fn crypt_block(
        &self,
        key: &AesKey,
        direction: Direction,
        block: &Block,
    ) -> Result<Block, Self::Error>;
}

impl<T: BlockCrypt> BlockCrypt for &T {
    type Error = T::Error;

    fn crypt_block(
        &self,
        key: &AesKey,
        direction: Direction,
        block: &Block,
    ) -> Result<Block, Self::Error> {
        (*self).crypt_block(key, direction, block)
    }
}

/// Block chaining mode
#[derive(Clone, PartialEq, Eq, Debug, strum::Display)]
pub enum Mode {
    /// Electronic codebook
    Ecb,
    /// Cipher block chaining with a static IV
    Cbc { iv: Block },
}

impl Mode {
    /// Create a CBC mode, the IV must be exactly 16 bytes
    pub fn cbc(iv: Option<&[u8]>) -> Result<Self, Error> {
        match iv {
            Some(v) if v.len() == AES_BLOCKSIZE => {
                let mut iv = [0u8; AES_BLOCKSIZE];
                iv.copy_from_slice(v);
                Ok(Mode::Cbc { iv })
            }
            _ => Err(Error::IvMissing),
        }
    }
}

/// Cipher context, reusable across calls
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CipherContext {
    mode: Mode,
    padding: Padding,
    key: AesKey,
}

impl CipherContext {
    /// Create a context for the key at `slot` (0..=15) and `key_index` (0..=3)
    pub fn new(mode: Mode, padding: Padding, slot: u8, key_index: u8) -> Result<Self, Error> {
        let key = AesKey::new(slot, key_index)?;
        Ok(Self { mode, padding, key })
    }

    /// Shorthand for an ECB context
    pub fn ecb(padding: Padding, slot: u8, key_index: u8) -> Result<Self, Error> {
        Self::new(Mode::Ecb, padding, slot, key_index)
    }

    /// Shorthand for a CBC context, failing with [Error::IvMissing]
    /// unless a 16 byte IV is provided
    pub fn cbc(iv: Option<&[u8]>, padding: Padding, slot: u8, key_index: u8) -> Result<Self, Error> {
        Self::new(Mode::cbc(iv)?, padding, slot, key_index)
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn key(&self) -> &AesKey {
        &self.key
    }

    /// Output buffer size required to encrypt `input_len` bytes
    pub fn required_output_size(&self, input_len: usize) -> Result<usize, Error> {
        required_output_size(input_len, self.padding)
    }

    /// Encrypt `plain` into `out`, returning the number of ciphertext bytes
    pub fn encrypt<B: BlockCrypt>(
        &self,
        crypt: &B,
        plain: &[u8],
        out: &mut [u8],
    ) -> Result<usize, Error<B::Error>> {
        let n = output_size(plain.len(), self.padding)?;
        if out.len() < n {
            return Err(Error::OutputTooSmall);
        }

        #[cfg(feature = "log")]
        debug!(
            "encrypt {} bytes ({}, padding: {}, slot: {}, key: {})",
            plain.len(),
            self.mode,
            self.padding,
            self.key.slot(),
            self.key.key_index()
        );

        let buff = &mut out[..n];
        buff[..plain.len()].copy_from_slice(plain);
        if self.padding == Padding::Pkcs7 {
            pad(buff, plain.len());
        }

        let r = match &self.mode {
            Mode::Ecb => encrypt_blocks(crypt, &self.key, NoChain, buff),
            Mode::Cbc { iv } => encrypt_blocks(crypt, &self.key, CbcChain::new(iv), buff),
        };

        if let Err(e) = r {
            buff.zeroize();
            return Err(e);
        }

        Ok(n)
    }

    /// Decrypt `cipher` into `out`, returning the plaintext length
    ///
    /// On failure the output buffer is cleared, no partial plaintext is released.
    pub fn decrypt<B: BlockCrypt>(
        &self,
        crypt: &B,
        cipher: &[u8],
        out: &mut [u8],
    ) -> Result<usize, Error<B::Error>> {
        if cipher.len() % AES_BLOCKSIZE != 0 {
            return Err(Error::InvalidInputLength);
        }
        if self.padding == Padding::Pkcs7 && cipher.is_empty() {
            return Err(Error::InputTooSmall);
        }
        if out.len() < cipher.len() {
            return Err(Error::OutputTooSmall);
        }

        #[cfg(feature = "log")]
        debug!(
            "decrypt {} bytes ({}, padding: {}, slot: {}, key: {})",
            cipher.len(),
            self.mode,
            self.padding,
            self.key.slot(),
            self.key.key_index()
        );

        let buff = &mut out[..cipher.len()];

        let r = match &self.mode {
            Mode::Ecb => decrypt_blocks(crypt, &self.key, NoChain, cipher, buff),
            Mode::Cbc { iv } => decrypt_blocks(crypt, &self.key, CbcChain::new(iv), cipher, buff),
        };

        let r = r.and_then(|_| match self.padding {
            Padding::None => Ok(buff.len()),
            Padding::Pkcs7 => unpad(buff),
        });

        match r {
            Ok(n) => Ok(n),
            Err(e) => {
                #[cfg(feature = "log")]
                warn!("decrypt failed: {:?}", e);

                buff.zeroize();
                Err(e)
            }
        }
    }
}

fn encrypt_blocks<B: BlockCrypt, C: Chaining>(
    crypt: &B,
    key: &AesKey,
    mut chain: C,
    buff: &mut [u8],
) -> Result<(), Error<B::Error>> {
    let mut block: Block = [0u8; AES_BLOCKSIZE];

    for c in buff.chunks_exact_mut(AES_BLOCKSIZE) {
        block.copy_from_slice(c);
        chain.pre_encrypt(&mut block);

        let r = crypt.crypt_block(key, Direction::Encrypt, &block);
        block.zeroize();

        let out = r.map_err(Error::Block)?;
        chain.post_encrypt(&out);
        c.copy_from_slice(&out);
    }

    Ok(())
}

fn decrypt_blocks<B: BlockCrypt, C: Chaining>(
    crypt: &B,
    key: &AesKey,
    mut chain: C,
    cipher: &[u8],
    buff: &mut [u8],
) -> Result<(), Error<B::Error>> {
    let mut src: Block = [0u8; AES_BLOCKSIZE];

    for (c, p) in cipher
        .chunks_exact(AES_BLOCKSIZE)
        .zip(buff.chunks_exact_mut(AES_BLOCKSIZE))
    {
        src.copy_from_slice(c);

        let mut block = crypt
            .crypt_block(key, Direction::Decrypt, &src)
            .map_err(Error::Block)?;

        chain.post_decrypt(&src, &mut block);
        p.copy_from_slice(&block);
        block.zeroize();
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use core::cell::Cell;

    use super::*;

    /// XOR-0xFF stub primitive, self inverse
    struct XorStub;

    impl BlockCrypt for XorStub {
        type Error = ();

        fn crypt_block(&self, _key: &AesKey, _d: Direction, block: &Block) -> Result<Block, ()> {
            let mut b = *block;
            b.iter_mut().for_each(|v| *v ^= 0xff);
            Ok(b)
        }
    }

    /// Stub failing on the Nth call
    struct FailAt {
        n: usize,
        calls: Cell<usize>,
    }

    impl BlockCrypt for FailAt {
        type Error = u8;

        fn crypt_block(&self, _key: &AesKey, _d: Direction, block: &Block) -> Result<Block, u8> {
            let c = self.calls.get();
            self.calls.set(c + 1);

            if c == self.n {
                return Err(0x0f);
            }
            Ok(*block)
        }
    }

    #[test]
    fn ecb_xor_vector() {
        let ctx = CipherContext::ecb(Padding::None, 0, 0).unwrap();
        let plain: [u8; 16] = core::array::from_fn(|i| i as u8);
        let mut cipher = [0u8; 16];

        let n = ctx.encrypt(&XorStub, &plain, &mut cipher).unwrap();
        assert_eq!(n, 16);

        let expected: [u8; 16] = core::array::from_fn(|i| 0xff - i as u8);
        assert_eq!(cipher, expected);

        let mut out = [0u8; 16];
        let n = ctx.decrypt(&XorStub, &cipher, &mut out).unwrap();
        assert_eq!(&out[..n], &plain);
    }

    #[test]
    fn cbc_requires_iv() {
        assert_eq!(
            CipherContext::cbc(None, Padding::Pkcs7, 0, 0),
            Err(Error::IvMissing)
        );
        assert_eq!(
            CipherContext::cbc(Some(&[0u8; 15]), Padding::Pkcs7, 0, 0),
            Err(Error::IvMissing)
        );
        assert!(CipherContext::cbc(Some(&[0u8; 16]), Padding::Pkcs7, 0, 0).is_ok());
    }

    #[test]
    fn invalid_key_reference() {
        assert_eq!(
            CipherContext::ecb(Padding::None, 16, 0),
            Err(Error::InvalidParameter)
        );
        assert_eq!(
            CipherContext::ecb(Padding::None, 0, 4),
            Err(Error::InvalidParameter)
        );
    }

    #[test]
    fn encrypt_output_too_small() {
        let ctx = CipherContext::ecb(Padding::Pkcs7, 0, 0).unwrap();
        let mut out = [0u8; 16];

        assert_eq!(
            ctx.encrypt(&XorStub, &[0u8; 16], &mut out),
            Err(Error::OutputTooSmall)
        );
    }

    #[test]
    fn encrypt_unaligned_without_padding() {
        let ctx = CipherContext::ecb(Padding::None, 0, 0).unwrap();
        let mut out = [0u8; 32];

        assert_eq!(
            ctx.encrypt(&XorStub, &[0u8; 17], &mut out),
            Err(Error::InvalidInputLength)
        );
    }

    #[test]
    fn decrypt_validation() {
        let ctx = CipherContext::ecb(Padding::Pkcs7, 0, 0).unwrap();
        let mut out = [0u8; 32];

        assert_eq!(
            ctx.decrypt(&XorStub, &[0u8; 17], &mut out),
            Err(Error::InvalidInputLength)
        );
        assert_eq!(
            ctx.decrypt(&XorStub, &[], &mut out),
            Err(Error::InputTooSmall)
        );
        assert_eq!(
            ctx.decrypt(&XorStub, &[0u8; 32], &mut out[..16]),
            Err(Error::OutputTooSmall)
        );
    }

    #[test]
    fn block_failure_aborts() {
        let ctx = CipherContext::ecb(Padding::None, 0, 0).unwrap();
        let stub = FailAt {
            n: 1,
            calls: Cell::new(0),
        };
        let mut out = [0xaa; 48];

        assert_eq!(
            ctx.encrypt(&stub, &[0x11; 48], &mut out),
            Err(Error::Block(0x0f))
        );
        assert_eq!(stub.calls.get(), 2);
        assert_eq!(out, [0u8; 48]);

        let stub = FailAt {
            n: 2,
            calls: Cell::new(0),
        };
        assert_eq!(
            ctx.decrypt(&stub, &[0x11; 48], &mut out),
            Err(Error::Block(0x0f))
        );
        assert_eq!(stub.calls.get(), 3);
        assert_eq!(out, [0u8; 48]);
    }

    #[test]
    fn padding_failure_clears_output() {
        let ctx = CipherContext::ecb(Padding::Pkcs7, 0, 0).unwrap();

        // XOR stub decrypts 0xff to 0x00, an invalid final padding byte
        let cipher = [0xff; 32];
        let mut out = [0xaa; 32];

        assert_eq!(
            ctx.decrypt(&XorStub, &cipher, &mut out),
            Err(Error::PaddingError)
        );
        assert_eq!(out, [0u8; 32]);
    }
}
