// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Block cipher mode engine for ATECCx08A devices
//!
//! The ATECC608A AES command encrypts or decrypts exactly one 16 byte block
//! per round trip. This crate provides ECB and CBC chaining with optional
//! PKCS#7 padding on top of any [BlockCrypt] implementation, so the same
//! engine drives real hardware, the device simulator, or a software AES for
//! testing.
//!
//! ## Operations
//!
//! 1. Create a [CipherContext] with the chaining [Mode], [Padding], and the
//!    slot / key index of the device key
//! 2. Size the output buffer using [CipherContext::required_output_size]
//!    (decryption requires at least the ciphertext length)
//! 3. Call [CipherContext::encrypt] or [CipherContext::decrypt], each block
//!    is one call to the underlying [BlockCrypt] primitive
//!
//! The context only holds the static IV, chaining state is local to each call.

#![cfg_attr(not(feature = "std"), no_std)]

pub use atecc_proto::aes::{AesKey, Block, Direction, AES_BLOCKSIZE};

pub mod cipher;
pub use cipher::{required_output_size, BlockCrypt, CipherContext, Error, Mode, Padding};
