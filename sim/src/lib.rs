// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Software model of ATECC508A / ATECC608A secure elements
//!
//! [SimDevice] implements [embedded_hal::i2c::I2c] so the driver can be
//! exercised without hardware. Execution time is modelled on a virtual
//! [Clock] advanced by [SimDelay], reads are NACKed until a command has
//! completed (and for [SimOptions::busy_reads] further requests).
//!
//! ECDSA is provided by `p256`, digests by `sha2` and AES by `aes`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use log::{debug, trace};

use atecc_proto::{
    frame::{encode_response, WordAddress, MAX_RESPONSE_LEN},
    info::DeviceType,
    status::Status,
    DEFAULT_ADDRESS,
};

mod clock;
pub use clock::{Clock, SimDelay};

pub mod config;

mod exec;
use exec::{status, Device};

/// Time from the wake token until the device accepts reads
pub const WAKE_DELAY_US: u64 = 1500;

/// Value returned for reads beyond the end of a response
const IDLE_BUS: u8 = 0xff;

/// Simulator options
#[derive(Clone, Debug, PartialEq)]
pub struct SimOptions {
    /// 7-bit device address
    pub address: u8,

    /// Additional read requests NACKed after each response is ready
    pub busy_reads: usize,

    /// Seed for key generation and random values, entropy is used if unset
    pub seed: Option<u64>,

    /// Device revision to model
    pub device_type: DeviceType,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            busy_reads: 0,
            seed: None,
            device_type: DeviceType::Atecc608a,
        }
    }
}

/// Device power state
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
pub enum PowerState {
    /// Volatile state cleared, wake token required
    Sleep,
    /// Accepting commands
    Awake,
    /// TempKey retained, wake token required
    Idle,
}

struct Inner {
    opts: SimOptions,
    power: PowerState,
    device: Device,
    output: heapless::Vec<u8, MAX_RESPONSE_LEN>,
    index: usize,
    ready_at: u64,
    busy: usize,
}

/// Simulated device, clones share the same device state and clock
#[derive(Clone)]
pub struct SimDevice {
    inner: Arc<Mutex<Inner>>,
    clock: Clock,
}

impl SimDevice {
    pub fn new(opts: SimOptions) -> Self {
        let device = Device::new(opts.device_type, opts.seed);

        debug!("Simulating {} at 0x{:02x}", opts.device_type, opts.address);

        Self {
            inner: Arc::new(Mutex::new(Inner {
                opts,
                power: PowerState::Sleep,
                device,
                output: heapless::Vec::new(),
                index: 0,
                ready_at: 0,
                busy: 0,
            })),
            clock: Clock::default(),
        }
    }

    /// Create a [SimDelay] advancing this device's clock
    pub fn delay(&self) -> SimDelay {
        SimDelay::new(self.clock.clone())
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn power_state(&self) -> PowerState {
        self.lock().power
    }

    /// Current configuration zone contents
    pub fn config(&self) -> [u8; atecc_proto::config::CONFIG_ZONE_LEN] {
        *self.lock().device.config()
    }

    /// Update the number of busy reads for subsequent responses
    pub fn set_busy_reads(&self, n: usize) {
        self.lock().opts.busy_reads = n;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Inner {
    /// Queue a response payload, available after `delay_us`
    fn respond(&mut self, now: u64, delay_us: u64, payload: &[u8]) {
        let mut buff = [0u8; MAX_RESPONSE_LEN];

        // Payloads are bounded by the largest response
        let n = encode_response(payload, &mut buff).unwrap_or(0);

        self.output.clear();
        let _ = self.output.extend_from_slice(&buff[..n]);
        self.index = 0;
        self.ready_at = now + delay_us;
        self.busy = self.opts.busy_reads;
    }

    fn wake(&mut self, now: u64) {
        if self.power == PowerState::Awake {
            trace!("wake ignored, device awake");
            return;
        }

        trace!("wake from {}", self.power);

        self.power = PowerState::Awake;
        self.respond(now, WAKE_DELAY_US, &status(Status::AfterWake));
    }

    fn write(&mut self, now: u64, data: &[u8]) -> Result<(), ErrorKind> {
        if self.power != PowerState::Awake {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        // Address probe
        let (word, frame) = match data.split_first() {
            Some(v) => v,
            None => return Ok(()),
        };

        match WordAddress::try_from(*word) {
            Ok(WordAddress::Reset) => {
                self.index = 0;
            }
            Ok(WordAddress::Sleep) => {
                trace!("sleep");
                self.power = PowerState::Sleep;
                self.device.sleep();
                self.output.clear();
            }
            Ok(WordAddress::Idle) => {
                trace!("idle");
                self.power = PowerState::Idle;
                self.output.clear();
            }
            Ok(WordAddress::Command) => {
                let (exec_ms, payload) = self.device.execute(frame);
                self.respond(now, exec_ms as u64 * 1000, &payload);
            }
            Err(_) => return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)),
        }

        Ok(())
    }

    fn read(&mut self, now: u64, buff: &mut [u8]) -> Result<(), ErrorKind> {
        if self.power != PowerState::Awake || now < self.ready_at {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        if self.busy > 0 {
            self.busy -= 1;
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        for b in buff.iter_mut() {
            *b = self.output.get(self.index).copied().unwrap_or(IDLE_BUS);
            self.index += 1;
        }

        Ok(())
    }
}

impl ErrorType for SimDevice {
    type Error = ErrorKind;
}

impl I2c for SimDevice {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let now = self.clock.now_us();
        let mut inner = self.lock();

        // General call address carries the wake token, nothing acknowledges this
        if address == 0x00 {
            inner.wake(now);
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        if address != inner.opts.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        for op in operations.iter_mut() {
            match op {
                Operation::Write(d) => inner.write(now, d)?,
                Operation::Read(b) => inner.read(now, b)?,
            }
        }

        Ok(())
    }
}
