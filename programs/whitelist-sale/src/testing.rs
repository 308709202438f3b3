use anchor_lang::prelude::*;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use sale_admin::EthAddress;
use crate::access_control::AdminOracle;
use crate::account::*;
use crate::signature::{eth_address, message_digest};

pub const ONE_TOKEN: u64 = 1_000_000_000_000_000_000;

#[derive(Default)]
pub struct FakeOracle {
    pub admins: Vec<Pubkey>,
    pub signers: Vec<EthAddress>,
}

impl FakeOracle {
    pub fn with_admin(admin: Pubkey) -> Self {
        FakeOracle { admins: vec![admin], signers: Vec::new() }
    }

    pub fn with_signer(signer: EthAddress) -> Self {
        FakeOracle { admins: Vec::new(), signers: vec![signer] }
    }
}

impl AdminOracle for FakeOracle {
    fn is_admin(&self, who: &Pubkey) -> bool {
        self.admins.contains(who)
    }

    fn is_admin_signer(&self, signer: &EthAddress) -> bool {
        self.signers.contains(signer)
    }
}

/// Off-chain signing backend stand-in.
pub struct TestSigner {
    secp: Secp256k1<secp256k1::All>,
    key: SecretKey,
}

impl TestSigner {
    pub fn new(seed: u8) -> Self {
        let key = SecretKey::from_slice(&[seed; 32]).unwrap();
        TestSigner { secp: Secp256k1::new(), key }
    }

    pub fn address(&self) -> EthAddress {
        let public_key = PublicKey::from_secret_key(&self.secp, &self.key).serialize_uncompressed();
        eth_address(&public_key[1..])
    }

    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let digest = Message::from_digest_slice(&message_digest(message)).unwrap();
        let (recovery_id, compact) = self
            .secp
            .sign_ecdsa_recoverable(&digest, &self.key)
            .serialize_compact();
        let mut bytes = compact.to_vec();
        bytes.push(recovery_id.to_i32() as u8 + 27);
        bytes
    }
}

/// Sale priced at one lamport per token base unit: registration open over
/// [10, 50], rounds at `starts`, ends at 1_000 and unlocks at 2_000.
pub fn sale_with_rounds(starts: &[i64]) -> Sale {
    Sale {
        sale_owner: Pubkey::new_unique(),
        admin_registry: Pubkey::new_unique(),
        token_mint: Pubkey::new_unique(),
        token_price: ONE_TOKEN,
        amount_of_tokens_to_sell: 10 * ONE_TOKEN,
        total_tokens_sold: 0,
        total_lamports_raised: 0,
        sale_end: 1_000,
        tokens_unlock_time: 2_000,
        registration: Registration {
            registration_time_starts: 10,
            registration_time_ends: 50,
            number_of_registrants: 0,
        },
        rounds: starts
            .iter()
            .enumerate()
            .map(|(i, start)| Round {
                round_id: i as u8 + 1,
                start_time: *start,
                max_participation: 5 * ONE_TOKEN,
            })
            .collect(),
        earnings_withdrawn: false,
        bump: 255,
        vault_bump: 254,
        custody_bump: 253,
    }
}
