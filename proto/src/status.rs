// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Device status codes, returned as a single byte response payload

use crate::Error;

/// Status byte values reported by the device
#[derive(Copy, Clone, Debug, PartialEq, Eq, num_enum::TryFromPrimitive, strum::Display)]
#[repr(u8)]
pub enum Status {
    /// Command executed successfully
    Success = 0x00,
    /// Verify or CheckMac miscompare
    Miscompare = 0x01,
    /// Illegal parameter or frame
    ParseError = 0x03,
    /// Internal ECC computation failed, may succeed on retry
    EccFault = 0x05,
    /// Self test failure
    SelfTestError = 0x07,
    /// Random number generator health test failure
    HealthTestError = 0x08,
    /// Command could not be executed in the current device state
    ExecutionError = 0x0f,
    /// First response after wake
    AfterWake = 0x11,
    /// Watchdog about to expire
    WatchdogExpired = 0xee,
    /// Received frame failed CRC / length check
    CrcError = 0xff,
}

/// Check a status-only response payload, mapping non-zero values to [Error::Device]
pub fn check_status(payload: &[u8]) -> Result<(), Error> {
    match payload {
        [0x00] => Ok(()),
        [s] => Err(Error::Device(*s)),
        _ => Err(Error::UnexpectedResponse),
    }
}
