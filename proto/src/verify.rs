// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Verify command, checks a signature over TempKey against an external public key

use encdec::Encode;

use crate::{genkey::PUBLIC_KEY_LEN, sign::SIGNATURE_LEN, Command, Error, Opcode};

/// External mode, public key is supplied in the command payload
pub const VERIFY_MODE_EXTERNAL: u8 = 0x02;

/// Key type for P256 NIST ECC keys
pub const KEY_TYPE_P256: u16 = 0x0004;

#[derive(Clone, PartialEq, Debug)]
pub struct VerifyReq {
    pub signature: [u8; SIGNATURE_LEN],
    pub public_key: [u8; PUBLIC_KEY_LEN],
}

impl Encode for VerifyReq {
    type Error = Error;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(SIGNATURE_LEN + PUBLIC_KEY_LEN)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        if buff.len() < SIGNATURE_LEN + PUBLIC_KEY_LEN {
            return Err(Error::InvalidLength);
        }

        buff[..SIGNATURE_LEN].copy_from_slice(&self.signature);
        buff[SIGNATURE_LEN..][..PUBLIC_KEY_LEN].copy_from_slice(&self.public_key);

        Ok(SIGNATURE_LEN + PUBLIC_KEY_LEN)
    }
}

impl Command for VerifyReq {
    const OPCODE: Opcode = Opcode::Verify;
    const EXEC_TIME_MS: u32 = 58;

    fn param1(&self) -> u8 {
        VERIFY_MODE_EXTERNAL
    }

    fn param2(&self) -> u16 {
        KEY_TYPE_P256
    }

    fn response_len(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::encode_frame_check;

    #[test]
    fn encode_verify() {
        let mut buff = [0u8; 160];
        let req = VerifyReq {
            signature: [0x11; SIGNATURE_LEN],
            public_key: [0x22; PUBLIC_KEY_LEN],
        };

        let n = encode_frame_check(&mut buff, &req);

        assert_eq!(n, 1 + 7 + 128);
        assert_eq!(&buff[3..6], &[0x02, 0x04, 0x00]);
        assert_eq!(&buff[6..70], &[0x11; 64]);
        assert_eq!(&buff[70..134], &[0x22; 64]);
    }
}
