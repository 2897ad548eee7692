// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Zone read / write tests

use log::info;
use rand::RngCore;

use atecc::{
    proto::zone::{config_address, Zone, BLOCK_LEN},
    Bus, DeviceHandle,
};

/// Write random data to a slot and read it back
pub fn test<B>(d: &DeviceHandle<B>, slot: u8, len: usize) -> anyhow::Result<()>
where
    B: Bus,
    B::Error: Send + Sync + 'static,
{
    let mut data = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut data);

    info!("writing {} bytes to slot {}", len, slot);
    d.write_slot(slot, &data)?;

    let mut read = vec![0u8; len];
    d.read_slot(slot, &mut read)?;

    assert_eq!(data, read, "slot {slot} readback mismatch");

    // Block reads match the complete config zone
    let c = d.read_config_zone()?;
    for block in 0..4u8 {
        let mut b = [0u8; BLOCK_LEN];
        d.read(Zone::Config, config_address(block), &mut b)?;

        assert_eq!(&b[..], &c.as_bytes()[block as usize * BLOCK_LEN..][..BLOCK_LEN]);
    }

    Ok(())
}
