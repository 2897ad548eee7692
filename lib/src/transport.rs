// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Bus abstraction and chunked command transport
//!
//! Each command is a complete wake / send / execute / receive / idle sequence.
//! Responses are read in chunks of at most [DeviceOptions::chunk_size] bytes,
//! a busy device NACKs reads and these count against the request budget.

use core::fmt::Debug;

use embedded_hal::{
    delay::DelayNs,
    i2c::{Error as _, ErrorKind, I2c},
};
use heapless::Vec;
use log::{debug, trace, warn};

use atecc_proto::{
    frame::{
        decode_response, encode_command, encode_frame, WordAddress, MAX_FRAME_LEN,
        MAX_RESPONSE_LEN, RESPONSE_OVERHEAD, STATUS_RESPONSE_LEN,
    },
    status::Status,
    Command, Opcode, DEFAULT_ADDRESS,
};

use crate::Error;

/// Raw response buffer, sized to the largest response
pub type ResponseBuffer = Vec<u8, MAX_RESPONSE_LEN>;

/// Bus abstraction for half duplex request / response exchange with a device
pub trait Bus {
    type Error: Debug;

    /// Issue the wake token (hold SDA low for at least 60us)
    fn wake(&mut self) -> Result<(), Self::Error>;

    /// Write a single transaction to the device
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Request up to `buff.len()` bytes, returning the number received.
    /// A busy device returns zero bytes.
    fn read(&mut self, buff: &mut [u8]) -> Result<usize, Self::Error>;

    /// Block for the provided number of microseconds
    fn delay_us(&mut self, us: u32);
}

/// [Bus] implementation over [embedded_hal::i2c::I2c] and [embedded_hal::delay::DelayNs]
pub struct I2cBus<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> I2cBus<I2C, D> {
    /// Create a new I2C bus adaptor using the provided 7-bit device address
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Release the underlying peripherals
    pub fn free(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C: I2c, D: DelayNs> Bus for I2cBus<I2C, D> {
    type Error = I2C::Error;

    fn wake(&mut self) -> Result<(), Self::Error> {
        // Addressing 0x00 holds SDA low for the wake period, nothing acknowledges this
        match self.i2c.write(0x00, &[]) {
            Ok(_) => Ok(()),
            Err(e) if matches!(e.kind(), ErrorKind::NoAcknowledge(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(self.address, data)
    }

    fn read(&mut self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        match self.i2c.read(self.address, buff) {
            Ok(_) => Ok(buff.len()),
            Err(e) if matches!(e.kind(), ErrorKind::NoAcknowledge(_)) => Ok(0),
            Err(e) => Err(e),
        }
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us)
    }
}

/// Largest read request supported by the device
pub const MAX_CHUNK_LEN: usize = 32;

/// Device / transport configuration
#[derive(Clone, PartialEq, Debug)]
pub struct DeviceOptions {
    /// 7-bit device address
    pub address: u8,

    /// Maximum bytes per read request, capped at [MAX_CHUNK_LEN]
    pub chunk_size: usize,

    /// Maximum read requests per response
    pub max_requests: usize,

    /// Delay between the wake token and the first read (tWHI)
    pub wake_delay_us: u32,
}

impl Default for DeviceOptions {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            chunk_size: MAX_CHUNK_LEN,
            max_requests: 20,
            wake_delay_us: 1500,
        }
    }
}

/// Command transport over a [Bus]
pub struct Transport<B: Bus> {
    bus: B,
    opts: DeviceOptions,
}

impl<B: Bus> Transport<B> {
    pub fn new(bus: B, opts: DeviceOptions) -> Self {
        Self { bus, opts }
    }

    pub fn options(&self) -> &DeviceOptions {
        &self.opts
    }

    /// Release the underlying bus
    pub fn free(self) -> B {
        self.bus
    }

    /// Wake the device and check the wake acknowledgement
    pub fn wake(&mut self) -> Result<(), Error<B::Error>> {
        self.bus.wake().map_err(Error::Bus)?;
        self.bus.delay_us(self.opts.wake_delay_us);

        let raw = self.receive(STATUS_RESPONSE_LEN)?;
        let payload = decode_response(&raw, STATUS_RESPONSE_LEN).map_err(|e| {
            warn!("invalid wake response: {:02x?}", &raw[..]);
            Error::from(e)
        })?;

        if payload != [Status::AfterWake as u8] {
            warn!("unexpected wake status: {:02x?}", payload);
            return Err(Error::WakeFailed);
        }

        trace!("device awake");

        Ok(())
    }

    /// Put the device into idle mode, TempKey is retained
    pub fn idle(&mut self) -> Result<(), Error<B::Error>> {
        self.bus
            .write(&[WordAddress::Idle as u8])
            .map_err(Error::Bus)
    }

    /// Put the device to sleep, volatile state is cleared
    pub fn sleep(&mut self) -> Result<(), Error<B::Error>> {
        self.bus
            .write(&[WordAddress::Sleep as u8])
            .map_err(Error::Bus)
    }

    /// Wake the device and write a command frame from raw parts
    pub fn send(
        &mut self,
        opcode: Opcode,
        param1: u8,
        param2: u16,
        payload: &[u8],
    ) -> Result<(), Error<B::Error>> {
        let mut buff = [0u8; MAX_FRAME_LEN];
        let n = encode_frame(opcode, param1, param2, payload, &mut buff)?;

        self.wake()?;
        self.bus.write(&buff[..n]).map_err(Error::Bus)
    }

    /// Wake the device and write an encoded [Command]
    pub fn send_command<C: Command>(&mut self, cmd: &C) -> Result<(), Error<B::Error>> {
        let mut buff = [0u8; MAX_FRAME_LEN];
        let n = encode_command(cmd, &mut buff)?;

        self.wake()?;
        self.bus.write(&buff[..n]).map_err(Error::Bus)
    }

    /// Receive a raw response of `expected_len` bytes (count and CRC included)
    /// in chunks, failing with [Error::Timeout] if the request budget is exhausted
    pub fn receive(&mut self, expected_len: usize) -> Result<ResponseBuffer, Error<B::Error>> {
        if expected_len == 0 || expected_len > MAX_RESPONSE_LEN || self.opts.chunk_size == 0 {
            return Err(Error::InvalidLength);
        }

        let chunk_size = self.opts.chunk_size.min(MAX_CHUNK_LEN);

        let mut buff = [0u8; MAX_RESPONSE_LEN];
        let mut received = 0;
        let mut requests = 0;

        while received < expected_len {
            if requests >= self.opts.max_requests {
                warn!(
                    "receive timeout ({} of {} bytes after {} requests)",
                    received, expected_len, requests
                );
                return Err(Error::Timeout);
            }

            let n = (expected_len - received).min(chunk_size);
            let r = self
                .bus
                .read(&mut buff[received..][..n])
                .map_err(Error::Bus)?;

            requests += 1;
            received += r.min(n);

            trace!(
                "chunk {}: {} of {} bytes ({}/{})",
                requests,
                r,
                n,
                received,
                expected_len
            );
        }

        trace!("received: {:02x?}", &buff[..received]);

        Vec::from_slice(&buff[..received]).map_err(|_| Error::InvalidLength)
    }

    /// Receive and validate a response, copying the payload into `out`
    pub fn receive_response(
        &mut self,
        expected_len: usize,
        out: &mut [u8],
    ) -> Result<usize, Error<B::Error>> {
        let raw = self.receive(expected_len)?;
        let payload = decode_response(&raw, expected_len)?;

        if out.len() < payload.len() {
            return Err(Error::InvalidLength);
        }
        out[..payload.len()].copy_from_slice(payload);

        Ok(payload.len())
    }

    /// Execute a complete command sequence, writing the response payload to `out`
    pub fn command<C: Command + Debug>(
        &mut self,
        cmd: &C,
        out: &mut [u8],
    ) -> Result<usize, Error<B::Error>> {
        debug!("command: {:?}", cmd);

        let expected_len = cmd.response_len() + RESPONSE_OVERHEAD;
        let r = self.send_command(cmd).and_then(|_| {
            self.bus.delay_us(C::EXEC_TIME_MS * 1000);
            self.receive_response(expected_len, out)
        });

        // Always return the device to idle, report the command error first
        let i = self.idle();
        let n = r?;
        i?;

        Ok(n)
    }
}
