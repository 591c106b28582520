//! Account address derivation from public keys.
//!
//! Format: `sprt_` + base32(public_key, 52 chars) + base32(checksum, 8 chars)
//! where the checksum is the first 5 bytes of Blake2b-256(public_key).
//! The alphabet omits visually ambiguous characters.

use sprint_types::{Address, PublicKey};

const ALPHABET: &[u8; 32] = b"13456789abcdefghijkmnopqrstuwxyz";
const PREFIX: &str = "sprt_";
/// 256 bits of public key → ceil(256/5) base32 characters.
const PUBKEY_CHARS: usize = 52;
/// 40 bits of checksum → 8 base32 characters.
const CHECKSUM_CHARS: usize = 8;

fn decode_symbol(c: u8) -> Option<u8> {
    ALPHABET.iter().position(|&a| a == c).map(|i| i as u8)
}

fn encode_base32(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 8 / 5 + 1);
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    for &b in bytes {
        acc = (acc << 8) | u32::from(b);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[((acc >> bits) & 0x1F) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(ALPHABET[((acc << (5 - bits)) & 0x1F) as usize] as char);
    }
    out
}

fn decode_base32(s: &str, out: &mut [u8]) -> bool {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut pos = 0;
    for c in s.bytes() {
        let Some(v) = decode_symbol(c) else {
            return false;
        };
        acc = (acc << 5) | u32::from(v);
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            if pos < out.len() {
                out[pos] = (acc >> bits) as u8;
                pos += 1;
            }
        }
    }
    pos == out.len()
}

/// Derive a `sprt_`-prefixed address from a public key.
pub fn derive_address(public_key: &PublicKey) -> Address {
    let body = encode_base32(public_key.as_bytes());
    let digest = crate::blake2b_256(public_key.as_bytes());
    let checksum = encode_base32(&digest[..5]);
    Address::new(format!("{PREFIX}{body}{checksum}"))
}

/// Extract the public key bytes from a valid address.
///
/// Returns `None` if the address is malformed or its checksum is wrong.
pub fn decode_address(address: &str) -> Option<[u8; 32]> {
    let encoded = address.strip_prefix(PREFIX)?;
    if encoded.len() != PUBKEY_CHARS + CHECKSUM_CHARS {
        return None;
    }
    let mut pubkey = [0u8; 32];
    if !decode_base32(&encoded[..PUBKEY_CHARS], &mut pubkey) {
        return None;
    }
    let mut checksum = [0u8; 5];
    if !decode_base32(&encoded[PUBKEY_CHARS..], &mut checksum) {
        return None;
    }
    if checksum != crate::blake2b_256(&pubkey)[..5] {
        return None;
    }
    Some(pubkey)
}

/// Whether an address string is well-formed with a correct checksum.
pub fn validate_address(address: &str) -> bool {
    decode_address(address).is_some()
}
