// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Command frame construction and response frame validation

use byteorder::{ByteOrder, LittleEndian};

#[cfg(feature = "log")]
use log::{trace, warn};

use crate::{
    crc::{crc16, CRC_SIZE},
    Command, Error, Opcode,
};

/// Word address byte, selects the function of an I2C write
#[derive(Copy, Clone, Debug, PartialEq, Eq, num_enum::TryFromPrimitive, strum::Display)]
#[repr(u8)]
pub enum WordAddress {
    /// Reset the IO buffer address counter
    Reset = 0x00,
    /// Enter sleep (low power) mode
    Sleep = 0x01,
    /// Enter idle mode, TempKey is retained
    Idle = 0x02,
    /// Command frame follows
    Command = 0x03,
}

/// Frame bytes following the word address, excluding the payload
/// (count, opcode, param1, param2 and CRC)
pub const FRAME_OVERHEAD: usize = 1 + 1 + 1 + 2 + CRC_SIZE;

/// Largest command payload accepted by the device
pub const MAX_PAYLOAD_LEN: usize = 155 - FRAME_OVERHEAD;

/// Largest encoded command frame, including the word address
pub const MAX_FRAME_LEN: usize = 1 + FRAME_OVERHEAD + MAX_PAYLOAD_LEN;

/// Response bytes surrounding the payload (count and CRC)
pub const RESPONSE_OVERHEAD: usize = 1 + CRC_SIZE;

/// Length of a status-only response packet
pub const STATUS_RESPONSE_LEN: usize = RESPONSE_OVERHEAD + 1;

/// Largest response the driver will accept (64 byte payload)
pub const MAX_RESPONSE_LEN: usize = RESPONSE_OVERHEAD + 64;

/// Encode a command frame into the provided buffer, returning the
/// number of bytes to be written to the device (word address included)
pub fn encode_frame(
    opcode: Opcode,
    param1: u8,
    param2: u16,
    payload: &[u8],
    buff: &mut [u8],
) -> Result<usize, Error> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(Error::InvalidLength);
    }

    let count = FRAME_OVERHEAD + payload.len();
    let n = count + 1;
    if buff.len() < n {
        return Err(Error::InvalidLength);
    }

    buff[0] = WordAddress::Command as u8;
    buff[1] = count as u8;
    buff[2] = opcode as u8;
    buff[3] = param1;
    LittleEndian::write_u16(&mut buff[4..6], param2);
    buff[6..][..payload.len()].copy_from_slice(payload);

    let crc = crc16(&buff[1..n - CRC_SIZE]);
    buff[n - CRC_SIZE..n].copy_from_slice(&crc);

    #[cfg(feature = "log")]
    trace!("encoded {} frame: {:02x?}", opcode, &buff[..n]);

    Ok(n)
}

/// Encode a [Command] object into a frame, writing the payload
/// directly into the output buffer
pub fn encode_command<C: Command>(cmd: &C, buff: &mut [u8]) -> Result<usize, Error> {
    let payload_len = cmd.encode_len()?;
    if payload_len > MAX_PAYLOAD_LEN {
        return Err(Error::InvalidLength);
    }

    let count = FRAME_OVERHEAD + payload_len;
    let n = count + 1;
    if buff.len() < n {
        return Err(Error::InvalidLength);
    }

    // Write payload in place then fill in the header and CRC
    let written = cmd.encode(&mut buff[6..][..payload_len])?;
    if written != payload_len {
        return Err(Error::InvalidLength);
    }

    buff[0] = WordAddress::Command as u8;
    buff[1] = count as u8;
    buff[2] = C::OPCODE as u8;
    buff[3] = cmd.param1();
    LittleEndian::write_u16(&mut buff[4..6], cmd.param2());

    let crc = crc16(&buff[1..n - CRC_SIZE]);
    buff[n - CRC_SIZE..n].copy_from_slice(&crc);

    #[cfg(feature = "log")]
    trace!("encoded {} frame: {:02x?}", C::OPCODE, &buff[..n]);

    Ok(n)
}

/// Validate a raw response of `expected_len` bytes (count and CRC included),
/// returning the payload on success.
///
/// A status packet received in place of a longer response is reported
/// as [Error::Device] when it carries a non-zero status.
pub fn decode_response(raw: &[u8], expected_len: usize) -> Result<&[u8], Error> {
    if raw.len() < RESPONSE_OVERHEAD {
        #[cfg(feature = "log")]
        warn!("short response: {:02x?}", raw);

        return Err(Error::CountMismatch {
            count: raw.first().copied().unwrap_or(0),
            received: raw.len(),
        });
    }

    // Devices report failures with a status packet regardless of the expected length
    if expected_len != STATUS_RESPONSE_LEN
        && raw[0] as usize == STATUS_RESPONSE_LEN
        && raw.len() >= STATUS_RESPONSE_LEN
        && raw[1] != 0
        && crc16(&raw[..2]) == raw[2..STATUS_RESPONSE_LEN]
    {
        #[cfg(feature = "log")]
        warn!("device status 0x{:02x} in place of {} byte response", raw[1], expected_len);

        return Err(Error::Device(raw[1]));
    }

    let count = raw[0];
    if count as usize != raw.len() {
        #[cfg(feature = "log")]
        warn!("count mismatch (count: {}, received: {})", count, raw.len());

        return Err(Error::CountMismatch {
            count,
            received: raw.len(),
        });
    }

    let n = raw.len();
    let expected = crc16(&raw[..n - CRC_SIZE]);
    let mut actual = [0u8; CRC_SIZE];
    actual.copy_from_slice(&raw[n - CRC_SIZE..]);

    if expected != actual {
        #[cfg(feature = "log")]
        warn!("CRC mismatch (expected: {:02x?}, actual: {:02x?})", expected, actual);

        return Err(Error::CrcMismatch { expected, actual });
    }

    Ok(&raw[1..n - CRC_SIZE])
}

/// Build a well formed response frame around the provided payload,
/// used by device models and tests
pub fn encode_response(payload: &[u8], buff: &mut [u8]) -> Result<usize, Error> {
    let n = payload.len() + RESPONSE_OVERHEAD;
    if n > u8::MAX as usize || buff.len() < n {
        return Err(Error::InvalidLength);
    }

    buff[0] = n as u8;
    buff[1..][..payload.len()].copy_from_slice(payload);

    let crc = crc16(&buff[..n - CRC_SIZE]);
    buff[n - CRC_SIZE..n].copy_from_slice(&crc);

    Ok(n)
}
