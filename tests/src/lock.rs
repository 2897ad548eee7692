// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Zone and slot locking tests
//!
//! Locking is permanent, only run this against simulated or disposable devices.

use log::{info, warn};

use atecc::{proto::status::Status, Bus, DeviceHandle, Error};

/// Lock the configuration and data zones (if unlocked) then `slot`,
/// checking the slot rejects further writes
pub fn test<B>(d: &DeviceHandle<B>, slot: u8) -> anyhow::Result<()>
where
    B: Bus,
    B::Error: Send + Sync + 'static,
{
    let c = d.read_config_zone()?;

    if !c.config_locked() {
        warn!("locking configuration zone");
        d.lock_config()?;
    }

    if !c.data_otp_locked() {
        warn!("locking data / OTP zones");
        d.lock_data_otp()?;
    }

    // Zones may only be locked once
    match d.lock_config() {
        Err(Error::Device(s)) if s == Status::ExecutionError as u8 => (),
        r => anyhow::bail!("unexpected config relock result: {r:?}"),
    }

    if !c.slot_locked(slot)? {
        warn!("locking slot {}", slot);
        d.lock_slot(slot)?;
    }

    let c = d.read_config_zone()?;
    assert!(c.config_locked());
    assert!(c.data_otp_locked());
    assert!(c.slot_locked(slot)?);

    match d.write_slot(slot, &[0u8; 4]) {
        Err(Error::Device(s)) if s == Status::ExecutionError as u8 => (),
        r => anyhow::bail!("unexpected locked slot write result: {r:?}"),
    }

    info!("slot {} locked", slot);

    Ok(())
}
