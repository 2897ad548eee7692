// Copyright (c) 2022-2023 The MobileCoin Foundation

//! ATECCx08A secure element driver library (and CLI)
//!
//! This provides a [Transport] implementing the wake / command / chunked
//! receive / idle sequence over any [Bus], and a [DeviceHandle] exposing
//! device commands and ECB / CBC AES over the single-block device primitive.
//!
//! ```no_run
//! # #[cfg(feature = "sim")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use atecc::{DeviceHandle, DeviceOptions, I2cBus};
//! use atecc_sim::{SimDevice, SimOptions};
//!
//! let sim = SimDevice::new(SimOptions::default());
//! let bus = I2cBus::new(sim.clone(), sim.delay(), atecc::proto::DEFAULT_ADDRESS);
//!
//! let d = DeviceHandle::new(bus, DeviceOptions::default());
//! let info = d.info()?;
//! println!("{} ({:02x?})", info.device_type, info.revision);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "sim"))]
//! # fn main() {}
//! ```

/// Re-export `atecc-proto` for consumers
pub use atecc_proto::{self as proto};

/// Re-export cipher engine types for consumers
pub use atecc_core::{
    required_output_size, AesKey, Block, BlockCrypt, CipherContext, Direction, Mode, Padding,
    AES_BLOCKSIZE,
};

pub mod transport;
pub use transport::{Bus, DeviceOptions, I2cBus, Transport};

mod handle;
pub use handle::{DeviceHandle, DeviceInfo};

mod error;
pub use error::Error;

/// [I2cBus] over linux `i2c-dev`
#[cfg(feature = "transport_i2c")]
pub type LinuxI2cBus = I2cBus<linux_embedded_hal::I2cdev, linux_embedded_hal::Delay>;

/// Open an I2C attached device via linux `i2c-dev`
#[cfg(feature = "transport_i2c")]
pub fn connect_i2c(
    path: &std::path::Path,
    opts: DeviceOptions,
) -> anyhow::Result<DeviceHandle<LinuxI2cBus>> {
    let i2c = linux_embedded_hal::I2cdev::new(path)?;
    let bus = I2cBus::new(i2c, linux_embedded_hal::Delay, opts.address);

    Ok(DeviceHandle::new(bus, opts))
}
