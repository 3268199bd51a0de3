//! Invite code generation for rooms.
//!
//! Codes are six upper-case letters or digits, drawn from the thread RNG.
//! Uniqueness is enforced by the store; callers retry on collision.

use rand::Rng;

use crate::domain::lobby::INVITE_CODE_LEN;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub fn generate_invite_code() -> String {
    let mut rng = rand::rng();
    (0..INVITE_CODE_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}
