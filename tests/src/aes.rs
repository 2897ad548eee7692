// Copyright (c) 2022-2023 The MobileCoin Foundation

//! AES ECB / CBC tests, checked against a software implementation

use aes::{
    cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit},
    Aes128,
};
use log::{debug, info};
use rand::RngCore;

use atecc::{
    required_output_size, Bus, CipherContext, DeviceHandle, Direction, Padding,
    AES_BLOCKSIZE,
};

/// Message lengths for padded round trips
const LENGTHS: &[usize] = &[0, 1, 15, 16, 17, 31, 32, 33, 100];

/// Write an AES key to `slot` / `key_index` then exercise block and
/// mode operations against a software reference
pub fn test<B>(d: &DeviceHandle<B>, slot: u8, key_index: u8) -> anyhow::Result<()>
where
    B: Bus,
    B::Error: Send + Sync + 'static,
{
    let mut rng = rand::thread_rng();

    // Load key material, each slot holds up to four 16 byte keys
    let mut keys = [0u8; 4 * AES_BLOCKSIZE];
    rng.fill_bytes(&mut keys);
    d.write_slot(slot, &keys)?;

    let k = &keys[key_index as usize * AES_BLOCKSIZE..][..AES_BLOCKSIZE];
    let soft = Aes128::new(GenericArray::from_slice(k));

    // Single block
    let mut block = [0u8; AES_BLOCKSIZE];
    rng.fill_bytes(&mut block);

    let c = d.crypt_block(&block, slot, key_index, Direction::Encrypt)?;

    let mut expected = GenericArray::clone_from_slice(&block);
    soft.encrypt_block(&mut expected);
    assert_eq!(&c[..], &expected[..], "block encrypt mismatch");

    let p = d.crypt_block(&c, slot, key_index, Direction::Decrypt)?;
    assert_eq!(p, block, "block decrypt mismatch");

    // Padded ECB / CBC round trips
    let mut iv = [0u8; AES_BLOCKSIZE];
    rng.fill_bytes(&mut iv);

    let contexts = [
        CipherContext::ecb(Padding::Pkcs7, slot, key_index)?,
        CipherContext::cbc(Some(&iv[..]), Padding::Pkcs7, slot, key_index)?,
    ];

    for ctx in &contexts {
        for n in LENGTHS {
            let mut plain = vec![0u8; *n];
            rng.fill_bytes(&mut plain);

            let mut cipher = vec![0u8; required_output_size(*n, Padding::Pkcs7)?];
            let c = d.encrypt(ctx, &plain, &mut cipher)?;

            assert_eq!(c, (n / AES_BLOCKSIZE + 1) * AES_BLOCKSIZE);
            debug!("{:?} {} bytes: {}", ctx.mode(), n, hex::encode(&cipher[..c]));

            // Compare first block against the software reference
            let mut first = GenericArray::clone_from_slice(&padded(&plain)[..AES_BLOCKSIZE]);
            if let atecc::Mode::Cbc { iv } = ctx.mode() {
                for (b, v) in first.iter_mut().zip(iv.iter()) {
                    *b ^= v;
                }
            }
            soft.encrypt_block(&mut first);
            assert_eq!(&cipher[..AES_BLOCKSIZE], &first[..]);

            let mut out = vec![0u8; c];
            let m = d.decrypt(ctx, &cipher[..c], &mut out)?;

            assert_eq!(&out[..m], &plain[..], "round trip mismatch for {n} bytes");
        }
    }

    info!("AES slot {} key {} OK", slot, key_index);

    Ok(())
}

/// PKCS7 padding reference
fn padded(d: &[u8]) -> Vec<u8> {
    let p = AES_BLOCKSIZE - d.len() % AES_BLOCKSIZE;

    let mut v = d.to_vec();
    v.resize(d.len() + p, p as u8);
    v
}
