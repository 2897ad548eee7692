// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Random number tests

use log::{debug, info};

use atecc::{Bus, DeviceHandle};

/// Fetch random values, checking these differ and ranges are respected.
///
/// Devices with an unlocked configuration zone return a fixed test pattern,
/// uniqueness is only checked once the configuration is locked.
pub fn test<B>(d: &DeviceHandle<B>, n: usize) -> anyhow::Result<()>
where
    B: Bus,
    B::Error: Send + Sync + 'static,
{
    let locked = d.read_config_zone()?.config_locked();
    let mut values = Vec::with_capacity(n);

    for _ in 0..n {
        let r = d.random()?;
        debug!("random: {}", hex::encode(r));

        if locked {
            assert!(!values.contains(&r), "repeated random value");
        }
        values.push(r);
    }

    for (min, max) in [(0, 10), (-50, 50), (7, 7), (100, -100)] {
        let v = d.random_range(min, max)?;
        debug!("range ({min}, {max}): {v}");

        assert!(v >= min.min(max) && v <= max.max(min), "value {v} out of range");
    }

    for max in [0, 1, 255, -16] {
        let v = d.random_max(max)?;
        debug!("max {max}: {v}");

        assert!(v >= max.min(0) && v <= max.max(0), "value {v} out of range");
    }

    info!("{} random values OK", n);

    Ok(())
}
