#![allow(unused)]

use std::cell::Cell;

use aes::{
    cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit},
    Aes128,
};

use atecc_core::{AesKey, Block, BlockCrypt, Direction};

/// XOR-0xFF primitive, counting calls
#[derive(Default)]
pub struct XorBlock {
    pub calls: Cell<usize>,
}

impl BlockCrypt for XorBlock {
    type Error = ();

    fn crypt_block(&self, _key: &AesKey, _d: Direction, block: &Block) -> Result<Block, ()> {
        self.calls.set(self.calls.get() + 1);

        let mut b = *block;
        b.iter_mut().for_each(|v| *v ^= 0xff);
        Ok(b)
    }
}

/// Software AES-128 primitive with a fixed key
pub struct SoftAes {
    cipher: Aes128,
}

impl SoftAes {
    pub fn new(key: [u8; 16]) -> Self {
        Self {
            cipher: Aes128::new(&GenericArray::from(key)),
        }
    }
}

impl BlockCrypt for SoftAes {
    type Error = ();

    fn crypt_block(&self, _key: &AesKey, d: Direction, block: &Block) -> Result<Block, ()> {
        let mut b = GenericArray::from(*block);

        match d {
            Direction::Encrypt => self.cipher.encrypt_block(&mut b),
            Direction::Decrypt => self.cipher.decrypt_block(&mut b),
        }

        Ok(b.into())
    }
}

/// Deterministic test data
pub fn data(n: usize) -> Vec<u8> {
    (0..n).map(|i| (i * 7 + 3) as u8).collect()
}

pub fn log_init() {
    let _ = simplelog::SimpleLogger::init(log::LevelFilter::Debug, Default::default());
}
