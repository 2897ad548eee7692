// Copyright (c) 2022-2023 The MobileCoin Foundation

//! ECDSA P256 key generation / signing / verification tests

use log::info;
use p256::ecdsa::{
    signature::{
        hazmat::{PrehashSigner, PrehashVerifier},
        Verifier,
    },
    Signature, SigningKey, VerifyingKey,
};
use rand::RngCore;

use atecc::{
    proto::genkey::PUBLIC_KEY_LEN, proto::sign::SIGNATURE_LEN, Bus, DeviceHandle,
};

/// Convert a raw `X || Y` device public key to a [VerifyingKey]
pub fn verifying_key(pk: &[u8; PUBLIC_KEY_LEN]) -> anyhow::Result<VerifyingKey> {
    let mut point = [0u8; PUBLIC_KEY_LEN + 1];
    point[0] = 0x04;
    point[1..].copy_from_slice(pk);

    Ok(VerifyingKey::from_sec1_bytes(&point)?)
}

/// Generate a key in `key_slot`, sign and verify against software P256,
/// then verify using a public key stored in `pubkey_slot`
pub fn test<B>(d: &DeviceHandle<B>, key_slot: u8, pubkey_slot: u8) -> anyhow::Result<()>
where
    B: Bus,
    B::Error: Send + Sync + 'static,
{
    let mut rng = rand::thread_rng();

    // Generate key pair
    let pk = d.create_key_pair(key_slot)?;
    info!("slot {} public key: {}", key_slot, hex::encode(pk));

    assert_eq!(d.public_key(key_slot)?, pk, "public key mismatch");

    let vk = verifying_key(&pk)?;

    // Sign a digest on the device and verify in software
    let mut digest = [0u8; 32];
    rng.fill_bytes(&mut digest);

    let sig = d.create_signature(&digest, key_slot)?;
    info!("signature: {}", hex::encode(sig));

    let s = Signature::from_slice(&sig)?;
    vk.verify_prehash(&digest, &s)?;

    // Verify on the device, rejecting modified signatures
    assert!(d.verify_signature(&digest, &sig, &pk)?);

    let mut bad = sig;
    bad[SIGNATURE_LEN - 1] ^= 0x01;
    assert!(!d.verify_signature(&digest, &bad, &pk)?);

    // Sign in software and verify on the device
    let sk = SigningKey::random(&mut rng);
    let s: Signature = sk.sign_prehash(&digest)?;

    let mut sw_pk = [0u8; PUBLIC_KEY_LEN];
    sw_pk.copy_from_slice(&VerifyingKey::from(&sk).to_encoded_point(false).as_bytes()[1..]);

    let mut sw_sig = [0u8; SIGNATURE_LEN];
    sw_sig.copy_from_slice(&s.to_bytes());

    assert!(d.verify_signature(&digest, &sw_sig, &sw_pk)?);

    // Message signing with an on-device digest
    let msg = b"Test message signed on device";
    let sig = d.sign_with_sha256(msg, key_slot)?;

    vk.verify(msg, &Signature::from_slice(&sig)?)?;
    assert!(d.verify_with_sha256(msg, &sig, key_slot)?);

    // Verify using a stored public key
    d.write_slot(pubkey_slot, &pk)?;
    assert!(d.verify_with_sha256(msg, &sig, pubkey_slot)?);
    assert!(!d.verify_with_sha256(b"Another message", &sig, pubkey_slot)?);

    Ok(())
}
