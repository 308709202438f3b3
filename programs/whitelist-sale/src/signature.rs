//! Recovery of admin-issued secp256k1 signatures.
//!
//! Messages are 32-byte words: public keys as their raw bytes, integers
//! big-endian and left-padded. The signed digest is the Ethereum personal
//! message hash of the message's keccak-256, so any EVM-style signing
//! backend can issue them. Signatures are `r || s || v`, 65 bytes.

use anchor_lang::prelude::*;
use sale_admin::EthAddress;
use solana_program::keccak;
use solana_program::secp256k1_recover::secp256k1_recover;
use crate::access_control::AdminOracle;

pub const SIGNATURE_LEN: usize = 65;

const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

fn word(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

pub fn registration_message(user: &Pubkey, round_id: u8, sale: &Pubkey) -> Vec<u8> {
    let words: [&[u8]; 3] = [user.as_ref(), &word(round_id.into()), sale.as_ref()];
    words.concat()
}

pub fn participation_message(user: &Pubkey, amount: u64, round_id: u8) -> Vec<u8> {
    let words: [&[u8]; 3] = [user.as_ref(), &word(amount), &word(round_id.into())];
    words.concat()
}

pub fn message_digest(message: &[u8]) -> [u8; 32] {
    let inner = keccak::hash(message);
    keccak::hashv(&[PERSONAL_MESSAGE_PREFIX, &inner.0]).0
}

/// Address of an uncompressed public key given without its 0x04 tag.
pub fn eth_address(public_key: &[u8]) -> EthAddress {
    let hash = keccak::hash(public_key).0;
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

pub fn recover_signer(message: &[u8], signature: &[u8]) -> Option<EthAddress> {
    if signature.len() != SIGNATURE_LEN {
        return None;
    }

    let recovery_id = match signature[64] {
        v @ 0..=1 => v,
        v @ 27..=28 => v - 27,
        _ => return None,
    };

    let digest = message_digest(message);
    let public_key = secp256k1_recover(&digest, recovery_id, &signature[..64]).ok()?;
    Some(eth_address(&public_key.0))
}

/// True when `signature` over `message` was produced by an admin signing key.
pub fn verify<O: AdminOracle + ?Sized>(oracle: &O, message: &[u8], signature: &[u8]) -> bool {
    match recover_signer(message, signature) {
        Some(signer) => oracle.is_admin_signer(&signer),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeOracle, TestSigner};

    #[test]
    fn messages_are_word_aligned() {
        let user = Pubkey::new_unique();
        let sale = Pubkey::new_unique();

        let registration = registration_message(&user, 3, &sale);
        assert_eq!(registration.len(), 96);
        assert_eq!(&registration[..32], user.as_ref());
        assert_eq!(registration[63], 3);
        assert!(registration[32..63].iter().all(|b| *b == 0));
        assert_eq!(&registration[64..], sale.as_ref());

        let participation = participation_message(&user, 0x0102, 2);
        assert_eq!(participation.len(), 96);
        assert_eq!(&participation[62..64], &[0x01, 0x02]);
        assert_eq!(participation[95], 2);
    }

    #[test]
    fn keccak_matches_reference_vector() {
        // keccak256("abc")
        let expected = [
            0x4e, 0x03, 0x65, 0x7a, 0xea, 0x45, 0xa9, 0x4f, 0xc7, 0xd4, 0x7b, 0xa8, 0x26, 0xc8,
            0xd6, 0x67, 0xc0, 0xd1, 0xe6, 0xe3, 0x3a, 0x64, 0xa0, 0x36, 0xec, 0x44, 0xf5, 0x8f,
            0xa1, 0x2d, 0x6c, 0x45,
        ];
        assert_eq!(keccak::hash(b"abc").0, expected);
    }

    #[test]
    fn recovers_the_signing_key() {
        let signer = TestSigner::new(1);
        let message = participation_message(&Pubkey::new_unique(), 500, 1);
        let signature = signer.sign(&message);

        assert_eq!(recover_signer(&message, &signature), Some(signer.address()));
    }

    #[test]
    fn accepts_raw_recovery_ids() {
        let signer = TestSigner::new(2);
        let message = registration_message(&Pubkey::new_unique(), 1, &Pubkey::new_unique());
        let mut signature = signer.sign(&message);
        signature[64] -= 27;

        assert_eq!(recover_signer(&message, &signature), Some(signer.address()));
    }

    #[test]
    fn malformed_signatures_do_not_verify() {
        let signer = TestSigner::new(3);
        let oracle = FakeOracle::with_signer(signer.address());
        let message = participation_message(&Pubkey::new_unique(), 1, 1);
        let signature = signer.sign(&message);

        assert!(verify(&oracle, &message, &signature));
        assert!(!verify(&oracle, &message, &signature[..64]));
        assert!(!verify(&oracle, &message, &[]));

        let mut bad_v = signature.clone();
        bad_v[64] = 5;
        assert!(!verify(&oracle, &message, &bad_v));

        let mut zeroed = signature;
        zeroed[..64].fill(0);
        assert!(!verify(&oracle, &message, &zeroed));
    }

    #[test]
    fn only_admin_signers_verify() {
        let admin = TestSigner::new(4);
        let stranger = TestSigner::new(5);
        let oracle = FakeOracle::with_signer(admin.address());
        let message = participation_message(&Pubkey::new_unique(), 10, 2);

        assert!(verify(&oracle, &message, &admin.sign(&message)));
        assert!(!verify(&oracle, &message, &stranger.sign(&message)));
    }

    #[test]
    fn signature_is_bound_to_the_message() {
        let admin = TestSigner::new(6);
        let oracle = FakeOracle::with_signer(admin.address());
        let user = Pubkey::new_unique();
        let signature = admin.sign(&participation_message(&user, 10, 2));

        assert!(!verify(&oracle, &participation_message(&user, 11, 2), &signature));
        assert!(!verify(&oracle, &participation_message(&user, 10, 3), &signature));
        assert!(!verify(
            &oracle,
            &participation_message(&Pubkey::new_unique(), 10, 2),
            &signature
        ));
    }
}
