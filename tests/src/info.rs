// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Device info / configuration tests

use log::info;

use atecc::{Bus, DeviceHandle};

/// Fetch device info and check the configuration zone is consistent
pub fn test<B>(d: &DeviceHandle<B>) -> anyhow::Result<()>
where
    B: Bus,
    B::Error: Send + Sync + 'static,
{
    d.wake()?;

    let i = d.info()?;
    info!("device: {} (revision: {:02x?})", i.device_type, i.revision);

    let c = d.read_config_zone()?;
    info!("serial: {}", hex::encode(c.serial_number()));
    info!(
        "config locked: {}, data locked: {}, aes: {}",
        c.config_locked(),
        c.data_otp_locked(),
        c.aes_enabled()
    );

    // Revision is mirrored in the configuration zone
    assert_eq!(c.revision(), i.revision);

    Ok(())
}
