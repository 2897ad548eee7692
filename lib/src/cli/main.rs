// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Command line utility for interacting with ATECCx08A secure elements

use clap::Parser;
use log::{debug, info, LevelFilter};

use atecc::{
    proto::{lock::LockTarget, sha::DIGEST_LEN, sign::SIGNATURE_LEN},
    Bus, CipherContext, DeviceHandle, DeviceOptions, I2cBus, Padding, AES_BLOCKSIZE,
};
use atecc_sim::{SimDevice, SimOptions};

mod helpers;
use helpers::*;

/// ATECC command line utility
#[derive(Clone, PartialEq, Debug, Parser)]
struct Options {
    /// Device target
    #[clap(long, value_enum, default_value = "sim")]
    target: Target,

    /// I2C device path for `i2c` targets
    #[clap(long, default_value = "/dev/i2c-1")]
    i2c_dev: String,

    /// 7-bit device address
    #[clap(long, default_value = "0x60", value_parser = parse_address)]
    address: u8,

    /// Seed for simulated devices
    #[clap(long)]
    sim_seed: Option<u64>,

    /// Subcommand to execute
    #[clap(subcommand)]
    cmd: Actions,

    /// Enable verbose logging
    #[clap(long, default_value = "info")]
    log_level: LevelFilter,
}

/// Device targets
#[derive(Copy, Clone, PartialEq, Debug, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "snake_case")]
enum Target {
    /// Simulated device
    Sim,
    /// Linux i2c-dev attached device
    I2c,
}

#[derive(Clone, PartialEq, Debug, clap::Subcommand)]
#[non_exhaustive]
enum Actions {
    /// Wake the device and check the wake response
    Wake,

    /// Fetch device info
    Info,

    /// Fetch a random value from the device
    Random {
        /// Return a value in the inclusive range `--min` to `--max`
        #[clap(long, requires = "max", allow_hyphen_values = true)]
        min: Option<i32>,

        /// Upper bound, used with zero when `--min` is not provided
        #[clap(long, allow_hyphen_values = true)]
        max: Option<i32>,
    },

    /// Read and decode the configuration zone
    Config,

    /// Read data from a slot
    ReadSlot {
        #[clap(long)]
        slot: u8,

        /// Number of bytes to read (multiple of 4)
        #[clap(long, default_value = "32")]
        len: usize,
    },

    /// Write hex encoded data to a slot
    WriteSlot {
        #[clap(long)]
        slot: u8,

        /// Data to write (multiple of 4 bytes)
        data: HexVec,
    },

    /// Lock the configuration zone, data zone, or a slot (irreversible)
    Lock {
        #[clap(long, value_enum)]
        zone: LockZone,

        /// Slot for slot locks
        #[clap(long, default_value = "0")]
        slot: u8,
    },

    /// Generate a P256 key pair in a slot
    Genkey {
        #[clap(long)]
        slot: u8,
    },

    /// Compute the public key for a private key slot
    PublicKey {
        #[clap(long)]
        slot: u8,
    },

    /// Sign a message (or a pre-computed digest) with a private key slot
    Sign {
        #[clap(long)]
        slot: u8,

        /// Message to sign, hashed on the device
        #[clap(long, conflicts_with = "digest")]
        message: Option<String>,

        /// Hex encoded 32 byte digest
        #[clap(long)]
        digest: Option<HexData<DIGEST_LEN>>,
    },

    /// Verify a message signature with the public key for a slot
    Verify {
        #[clap(long)]
        slot: u8,

        #[clap(long)]
        message: String,

        /// Hex encoded `R || S` signature
        #[clap(long)]
        signature: HexData<SIGNATURE_LEN>,
    },

    /// Compute the SHA-256 digest of a message
    Sha256 { message: String },

    /// Encrypt hex data with an AES key slot
    Encrypt {
        #[clap(flatten)]
        cipher: CipherArgs,

        data: HexVec,
    },

    /// Decrypt hex data with an AES key slot
    Decrypt {
        #[clap(flatten)]
        cipher: CipherArgs,

        data: HexVec,
    },
}

#[derive(Copy, Clone, PartialEq, Debug, clap::ValueEnum)]
enum LockZone {
    Config,
    Data,
    Slot,
}

#[derive(Clone, PartialEq, Debug, clap::Args)]
struct CipherArgs {
    /// AES key slot
    #[clap(long, default_value = "9")]
    slot: u8,

    /// Key index within the slot
    #[clap(long, default_value = "0")]
    key_index: u8,

    /// Hex encoded IV, enables CBC mode
    #[clap(long)]
    iv: Option<HexData<AES_BLOCKSIZE>>,

    /// Padding mode (`none` or `pkcs7`)
    #[clap(long, default_value = "pkcs7")]
    padding: Padding,
}

impl CipherArgs {
    fn context(&self) -> anyhow::Result<CipherContext> {
        let c = match &self.iv {
            Some(iv) => {
                CipherContext::cbc(Some(&iv.0[..]), self.padding, self.slot, self.key_index)?
            }
            None => CipherContext::ecb(self.padding, self.slot, self.key_index)?,
        };
        Ok(c)
    }
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Options::parse();

    // Setup logging
    let _ = simplelog::SimpleLogger::init(args.log_level, simplelog::Config::default());

    debug!("Using target: {}", args.target);

    let opts = DeviceOptions {
        address: args.address,
        ..Default::default()
    };

    match args.target {
        Target::Sim => {
            let s = SimDevice::new(SimOptions {
                address: args.address,
                seed: args.sim_seed,
                ..Default::default()
            });
            let bus = I2cBus::new(s.clone(), s.delay(), args.address);

            execute(DeviceHandle::new(bus, opts), args.cmd)?;
        }
        #[cfg(feature = "transport_i2c")]
        Target::I2c => {
            let d = atecc::connect_i2c(std::path::Path::new(&args.i2c_dev), opts)?;

            execute(d, args.cmd)?;
        }
        #[cfg(not(feature = "transport_i2c"))]
        Target::I2c => {
            return Err(anyhow::anyhow!(
                "i2c target unavailable ({} requires the transport_i2c feature)",
                args.i2c_dev
            ));
        }
    }

    Ok(())
}

/// Execute a command with the provided device
fn execute<B>(d: DeviceHandle<B>, cmd: Actions) -> anyhow::Result<()>
where
    B: Bus,
    B::Error: Send + Sync + 'static,
{
    debug!("Executing command: {:?}", cmd);

    match cmd {
        Actions::Wake => {
            d.wake()?;
            info!("device awake");
        }
        Actions::Info => {
            let i = d.info()?;
            info!("device: {} (revision: {})", i.device_type, hex::encode(i.revision));
        }
        Actions::Random { min, max } => match (min, max) {
            (Some(min), Some(max)) => info!("value: {}", d.random_range(min, max)?),
            (None, Some(max)) => info!("value: {}", d.random_max(max)?),
            _ => info!("value: {}", hex::encode(d.random()?)),
        },
        Actions::Config => {
            let c = d.read_config_zone()?;

            info!("serial: {}", hex::encode(c.serial_number()));
            info!("revision: {}", hex::encode(c.revision()));
            info!("aes enabled: {}", c.aes_enabled());
            info!("config locked: {}", c.config_locked());
            info!("data / otp locked: {}", c.data_otp_locked());

            for slot in 0..atecc::proto::NUM_SLOTS {
                info!(
                    "slot {:2}: slot config: {:04x} key config: {:04x} private: {} locked: {}",
                    slot,
                    c.slot_config(slot)?,
                    c.key_config(slot)?,
                    c.contains_private_key(slot)?,
                    c.slot_locked(slot)?,
                );
            }

            debug!("raw: {}", hex::encode(c.as_bytes()));
        }
        Actions::ReadSlot { slot, len } => {
            let mut buff = vec![0u8; len];
            d.read_slot(slot, &mut buff)?;

            info!("slot {}: {}", slot, hex::encode(&buff));
        }
        Actions::WriteSlot { slot, data } => {
            d.write_slot(slot, data.as_ref())?;

            info!("wrote {} bytes to slot {}", data.0.len(), slot);
        }
        Actions::Lock { zone, slot } => {
            let target = match zone {
                LockZone::Config => LockTarget::Config,
                LockZone::Data => LockTarget::DataAndOtp,
                LockZone::Slot => LockTarget::Slot(slot),
            };

            d.lock_target(target)?;

            info!("locked {}", target);
        }
        Actions::Genkey { slot } => {
            let k = d.create_key_pair(slot)?;
            info!("public key: {}", hex::encode(k));
        }
        Actions::PublicKey { slot } => {
            let k = d.public_key(slot)?;
            info!("public key: {}", hex::encode(k));
        }
        Actions::Sign {
            slot,
            message,
            digest,
        } => {
            let s = match (message, digest) {
                (Some(m), _) => d.sign_with_sha256(m.as_bytes(), slot)?,
                (None, Some(h)) => d.create_signature(h.as_ref(), slot)?,
                (None, None) => return Err(anyhow::anyhow!("--message or --digest required")),
            };

            info!("signature: {}", hex::encode(s));
        }
        Actions::Verify {
            slot,
            message,
            signature,
        } => {
            let ok = d.verify_with_sha256(message.as_bytes(), signature.as_ref(), slot)?;

            info!("signature valid: {}", ok);
        }
        Actions::Sha256 { message } => {
            let h = d.sha256(message.as_bytes())?;
            info!("digest: {}", hex::encode(h));
        }
        Actions::Encrypt { cipher, data } => {
            let ctx = cipher.context()?;

            let mut out = vec![0u8; ctx.required_output_size(data.0.len())?];
            let n = d.encrypt(&ctx, data.as_ref(), &mut out)?;

            info!("ciphertext: {}", hex::encode(&out[..n]));
        }
        Actions::Decrypt { cipher, data } => {
            let ctx = cipher.context()?;

            let mut out = vec![0u8; data.0.len()];
            let n = d.decrypt(&ctx, data.as_ref(), &mut out)?;

            info!("plaintext: {}", hex::encode(&out[..n]));
        }
    }

    Ok(())
}
