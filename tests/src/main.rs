// Copyright (c) 2022-2023 The MobileCoin Foundation

use clap::Parser;
use log::{debug, info, LevelFilter};
use strum::{Display, EnumString, EnumVariantNames};

use atecc::{Bus, DeviceHandle, DeviceOptions, I2cBus};
use atecc_sim::{SimDevice, SimOptions};

/// Test CLI arguments
#[derive(Clone, Debug, Parser)]
pub struct Opts {
    #[clap(subcommand)]
    pub test: Tests,

    /// Target for test execution
    #[clap(long, value_enum, default_value = "sim", env)]
    pub target: Target,

    /// I2C device for physical targets
    #[clap(long, default_value = "/dev/i2c-1", env)]
    pub i2c_dev: String,

    /// 7-bit device address
    #[clap(long, default_value = "0x60", value_parser = parse_address)]
    pub address: u8,

    /// Log level
    #[clap(long, default_value = "debug", env)]
    pub log_level: LevelFilter,

    /// Enable logging for the simulator
    #[clap(long)]
    pub log_sim: bool,
}

fn parse_address(s: &str) -> anyhow::Result<u8> {
    let a = match s.strip_prefix("0x") {
        Some(h) => u8::from_str_radix(h, 16)?,
        None => s.parse()?,
    };
    Ok(a)
}

/// Test modes
#[derive(Clone, PartialEq, Debug, clap::Subcommand, Display, EnumString, EnumVariantNames)]
pub enum Tests {
    /// Check device info and configuration
    Info,
    /// Fetch random values
    Random {
        #[clap(long, default_value = "8")]
        n: usize,
    },
    /// Write and read back slot data
    Zones {
        #[clap(long, default_value = "10")]
        slot: u8,
        #[clap(long, default_value = "72")]
        len: usize,
    },
    /// Compare device SHA-256 digests with software
    Sha,
    /// Generate keys, sign and verify
    Ecc {
        #[clap(long, default_value = "0")]
        key_slot: u8,
        #[clap(long, default_value = "11")]
        pubkey_slot: u8,
    },
    /// AES block and ECB / CBC modes
    Aes {
        #[clap(long, default_value = "9")]
        slot: u8,
        #[clap(long, default_value = "0")]
        key_index: u8,
    },
    /// Lock zones and a slot (irreversible)
    Lock {
        #[clap(long, default_value = "12")]
        slot: u8,
    },
    /// Run all non-destructive tests with default arguments
    All,
}

/// Test target connection
#[derive(Clone, PartialEq, Debug, clap::ValueEnum, Display, EnumString, EnumVariantNames)]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
pub enum Target {
    /// Software device model
    Sim,
    /// Linux i2c-dev attached device
    I2c,
}

fn main() -> anyhow::Result<()> {
    // Load command line options
    let opts = Opts::parse();

    // Setup logging
    let mut c = simplelog::ConfigBuilder::new();
    if !opts.log_sim {
        c.add_filter_ignore_str("atecc_sim");
    }

    let _ = simplelog::SimpleLogger::init(opts.log_level, c.build());

    debug!("options: {:?}", opts);

    info!("Running test '{}' via {}", opts.test, opts.target);

    let dev_opts = DeviceOptions {
        address: opts.address,
        ..Default::default()
    };

    // Connect to target and execute test
    match opts.target {
        Target::Sim => {
            let s = SimDevice::new(SimOptions {
                address: opts.address,
                ..Default::default()
            });
            let bus = I2cBus::new(s.clone(), s.delay(), opts.address);

            execute(&DeviceHandle::new(bus, dev_opts), &opts.test)?;
        }
        #[cfg(feature = "transport_i2c")]
        Target::I2c => {
            let d = atecc::connect_i2c(std::path::Path::new(&opts.i2c_dev), dev_opts)?;

            execute(&d, &opts.test)?;
        }
        #[cfg(not(feature = "transport_i2c"))]
        _ => {
            return Err(anyhow::anyhow!(
                "transport: {} feature not enabled",
                opts.target
            ));
        }
    };

    log::info!("Test OK!");

    Ok(())
}

/// Execute a test with the provided device
fn execute<B>(d: &DeviceHandle<B>, test: &Tests) -> anyhow::Result<()>
where
    B: Bus,
    B::Error: Send + Sync + 'static,
{
    use atecc_tests::*;

    match test {
        Tests::Info => info::test(d)?,
        Tests::Random { n } => random::test(d, *n)?,
        Tests::Zones { slot, len } => zones::test(d, *slot, *len)?,
        Tests::Sha => sha::test(d)?,
        Tests::Ecc {
            key_slot,
            pubkey_slot,
        } => ecc::test(d, *key_slot, *pubkey_slot)?,
        Tests::Aes { slot, key_index } => aes::test(d, *slot, *key_index)?,
        Tests::Lock { slot } => lock::test(d, *slot)?,
        Tests::All => {
            info::test(d)?;
            random::test(d, 8)?;
            zones::test(d, 10, 72)?;
            sha::test(d)?;
            ecc::test(d, 0, 11)?;
            aes::test(d, 9, 0)?;
        }
    }

    Ok(())
}
