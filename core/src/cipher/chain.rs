// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Block chaining transforms applied around each primitive call

use zeroize::Zeroize;

use crate::Block;

/// Chaining capability, block iteration is generic over this
pub(crate) trait Chaining {
    /// Transform plaintext prior to encryption
    fn pre_encrypt(&mut self, block: &mut Block);

    /// Observe ciphertext produced by encryption
    fn post_encrypt(&mut self, cipher: &Block);

    /// Transform decrypted output using the source ciphertext
    fn post_decrypt(&mut self, cipher: &Block, block: &mut Block);
}

/// Electronic codebook, blocks are independent
pub(crate) struct NoChain;

impl Chaining for NoChain {
    #[inline]
    fn pre_encrypt(&mut self, _block: &mut Block) {}

    #[inline]
    fn post_encrypt(&mut self, _cipher: &Block) {}

    #[inline]
    fn post_decrypt(&mut self, _cipher: &Block, _block: &mut Block) {}
}

/// Cipher block chaining, seeded from the context IV
pub(crate) struct CbcChain {
    prev: Block,
}

impl CbcChain {
    pub fn new(iv: &Block) -> Self {
        Self { prev: *iv }
    }
}

fn xor(block: &mut Block, v: &Block) {
    for (b, v) in block.iter_mut().zip(v.iter()) {
        *b ^= v;
    }
}

impl Chaining for CbcChain {
    fn pre_encrypt(&mut self, block: &mut Block) {
        xor(block, &self.prev);
    }

    fn post_encrypt(&mut self, cipher: &Block) {
        self.prev = *cipher;
    }

    fn post_decrypt(&mut self, cipher: &Block, block: &mut Block) {
        xor(block, &self.prev);
        self.prev = *cipher;
    }
}

impl Drop for CbcChain {
    fn drop(&mut self) {
        self.prev.zeroize();
    }
}
