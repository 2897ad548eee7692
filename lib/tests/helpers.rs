// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::str::FromStr;

use log::LevelFilter;
use simplelog::SimpleLogger;

use atecc::{DeviceHandle, DeviceOptions, I2cBus};
use atecc_sim::{SimDelay, SimDevice, SimOptions};

pub type SimHandle = DeviceHandle<I2cBus<SimDevice, SimDelay>>;

/// Setup a simulated device and handle with a fixed seed
pub fn setup(opts: SimOptions) -> (SimDevice, SimHandle) {
    // Setup logging
    let log_level = match std::env::var("LOG_LEVEL").map(|v| LevelFilter::from_str(&v)) {
        Ok(Ok(l)) => l,
        _ => LevelFilter::Debug,
    };

    let log_cfg = simplelog::ConfigBuilder::new()
        .add_filter_ignore_str("atecc_sim")
        .build();

    let _ = SimpleLogger::init(log_level, log_cfg);

    let address = opts.address;
    let s = SimDevice::new(SimOptions {
        seed: opts.seed.or(Some(0x5eed)),
        ..opts
    });

    let bus = I2cBus::new(s.clone(), s.delay(), address);
    let d = DeviceHandle::new(bus, DeviceOptions::default());

    (s, d)
}

/// Setup a default simulated ATECC608A
#[allow(unused)]
pub fn setup_default() -> (SimDevice, SimHandle) {
    setup(SimOptions::default())
}
