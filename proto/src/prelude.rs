// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Prelude to simplify downstream use of command objects
//!

pub use crate::{
    aes::{AesKey, AesReq, AesResp, Block, Direction, AES_BLOCKSIZE},
    config::{ConfigZone, CONFIG_ZONE_LEN},
    frame::{decode_response, encode_command, encode_frame, WordAddress},
    genkey::{GenKeyReq, PublicKeyResp, PUBLIC_KEY_LEN},
    info::{DeviceType, InfoReq, InfoResp},
    lock::{LockReq, LockTarget},
    nonce::NonceReq,
    random::{RandomReq, RandomResp},
    sha::{DigestResp, ShaReq, DIGEST_LEN},
    sign::{SignReq, SignatureResp, SIGNATURE_LEN},
    status::{check_status, Status},
    verify::VerifyReq,
    zone::{ReadReq, WriteReq, Zone},
    Command, Error, Opcode,
};
