// Copyright (c) 2022-2023 The MobileCoin Foundation

//! SHA-256 tests

use log::debug;
use rand::RngCore;
use sha2::{Digest, Sha256};

use atecc::{Bus, DeviceHandle};

/// Lengths around the 64 byte block boundary
const LENGTHS: &[usize] = &[0, 1, 55, 63, 64, 65, 127, 128, 129, 300];

/// Compare device digests with a software implementation
pub fn test<B>(d: &DeviceHandle<B>) -> anyhow::Result<()>
where
    B: Bus,
    B::Error: Send + Sync + 'static,
{
    for n in LENGTHS {
        let mut data = vec![0u8; *n];
        rand::thread_rng().fill_bytes(&mut data);

        let digest = d.sha256(&data)?;
        let expected = Sha256::digest(&data);

        debug!("sha256 ({} bytes): {}", n, hex::encode(digest));

        assert_eq!(&digest[..], &expected[..], "digest mismatch for {n} bytes");
    }

    Ok(())
}
