// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Tests for ATECCx08A devices.
//!
//! Generic over [atecc::Bus] for reuse against simulated and physical devices.
//!

pub mod info;

pub mod random;

pub mod zones;

pub mod sha;

pub mod ecc;

pub mod aes;

pub mod lock;
