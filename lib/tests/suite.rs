// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Shared device test suite against the simulator

mod helpers;
use helpers::setup_default;

#[test]
fn info() -> anyhow::Result<()> {
    let (_s, d) = setup_default();
    atecc_tests::info::test(&d)
}

#[test]
fn random() -> anyhow::Result<()> {
    let (_s, d) = setup_default();
    atecc_tests::random::test(&d, 16)
}

#[test]
fn zones() -> anyhow::Result<()> {
    let (_s, d) = setup_default();

    // Data slot, then a 36 byte key slot using a trailing word
    atecc_tests::zones::test(&d, 10, 72)?;
    atecc_tests::zones::test(&d, 1, 36)
}

#[test]
fn sha() -> anyhow::Result<()> {
    let (_s, d) = setup_default();
    atecc_tests::sha::test(&d)
}

#[test]
fn ecc() -> anyhow::Result<()> {
    let (_s, d) = setup_default();

    atecc_tests::ecc::test(&d, 0, 11)?;
    atecc_tests::ecc::test(&d, 7, 12)
}

#[test]
fn aes() -> anyhow::Result<()> {
    let (_s, d) = setup_default();

    for key_index in 0..4 {
        atecc_tests::aes::test(&d, 9, key_index)?;
    }

    Ok(())
}

#[test]
fn lock() -> anyhow::Result<()> {
    let (_s, d) = setup_default();
    atecc_tests::lock::test(&d, 12)
}
