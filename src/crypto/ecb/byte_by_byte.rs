#[cfg(test)]
use base64::{Engine as _, engine::general_purpose};
#[cfg(test)]
use rand::{SeedableRng, rngs::StdRng};

use crate::crypto::bytes::pkcs7_unpad;
use crate::crypto::oracle::Oracle;
use crate::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct OracleProfile {
    // filler bytes at which the ciphertext length first grows
    pub pad_size: usize,
    pub block_size: usize,
    // distance from pad_size to the end of the hidden suffix; includes the
    // oracle's own padding, so it overcounts the secret itself
    pub suffix_len: usize,
}

// Feeds the oracle growing filler until the ciphertext length jumps; the
// jump size is the block size.
pub fn profile_oracle(oracle: &dyn Oracle) -> OracleProfile {
    let base_len = oracle(&[]).len();
    let mut filler = vec![b'A'];
    while oracle(&filler).len() == base_len {
        filler.push(b'A');
    }
    let pad_size = filler.len();
    let block_size = oracle(&filler).len() - base_len;
    let suffix_len = oracle(&vec![b'A'; pad_size + block_size]).len() - pad_size - block_size;
    OracleProfile { pad_size, block_size, suffix_len }
}

// Two identical filler blocks must encrypt identically under ECB.
pub fn confirm_ecb(oracle: &dyn Oracle, block_size: usize) -> Result<(), Error> {
    let probe = oracle(&vec![b'A'; 2 * block_size]);
    if probe[..block_size] != probe[block_size..2 * block_size] {
        return Err(Error::NotEcb);
    }
    Ok(())
}

// Recovers the oracle's hidden suffix one byte at a time: align the next
// unknown byte as the last byte of a block, record that ciphertext block,
// then find the candidate byte whose chosen-plaintext block encrypts to it.
//
// suffix_len overcounts the secret, so recovery runs into the oracle's own
// padding: the first padding byte (always 0x01 from the probe's view) is
// recovered like any other, and the stall on the byte after it marks the
// true end. A stall anywhere else means the oracle broke protocol.
pub fn attack_ecb_suffix(oracle: &dyn Oracle) -> Result<Vec<u8>, Error> {
    let profile = profile_oracle(oracle);
    confirm_ecb(oracle, profile.block_size)?;

    let mut known: Vec<u8> = Vec::new();
    while known.len() < profile.suffix_len {
        let filler = vec![b'A'; profile.block_size - 1 - known.len() % profile.block_size];
        let boundary = filler.len() + known.len() + 1 - profile.block_size;
        let target = oracle(&filler)[boundary..boundary + profile.block_size].to_vec();

        let aligned = [filler.as_slice(), &known].concat();
        let probe_prefix = &aligned[aligned.len() - (profile.block_size - 1)..];
        let matched = (0..=u8::MAX).find(|&b| {
            let probe = [probe_prefix, &[b]].concat();
            oracle(&probe)[..profile.block_size] == target[..]
        });

        match matched {
            Some(b) => known.push(b),
            // one byte past the secret: the recovered 0x01 was the padding
            None if known.last() == Some(&1) => break,
            None => return Err(Error::AttackStalled { position: known.len() }),
        }
    }
    pkcs7_unpad(&known)
}

#[cfg(test)]
fn funky_secret() -> Vec<u8> {
    let encoded = b"Um9sbGluJyBpbiBteSA1LjAKV2l0aCBteSByYWctdG9wIGRvd24gc28gbXkg\
aGFpciBjYW4gYmxvdwpUaGUgZ2lybGllcyBvbiBzdGFuZGJ5IHdhdmluZyBq\
dXN0IHRvIHNheSBoaQpEaWQgeW91IHN0b3A/IE5vLCBJIGp1c3QgZHJvdmUg\
YnkK";
    general_purpose::STANDARD
        .decode(encoded.as_slice())
        .expect("Base64 decoding failed")
}

#[test]
fn test_profile_oracle() {
    let mut rng = StdRng::seed_from_u64(9);
    let secret = funky_secret();
    let oracle = crate::crypto::oracle::ecb_suffix_oracle(&secret, &mut rng);

    let profile = profile_oracle(&oracle);
    assert_eq!(16, profile.block_size);
    assert!(profile.suffix_len >= secret.len());
    assert!(profile.suffix_len <= secret.len() + 16);
}

#[test]
fn test_confirm_ecb_rejects_cbc() {
    let key = b"YELLOW SUBMARINE";
    let iv = [7u8; 16];
    let oracle = move |buf: &[u8]| {
        crate::crypto::cbc::cbc_encrypt(&crate::crypto::ecb::Aes128, &iv, key, buf).unwrap()
    };
    assert_eq!(Err(Error::NotEcb), confirm_ecb(&oracle, 16));
}

#[test]
fn test_attack_ecb_suffix() {
    let mut rng = StdRng::seed_from_u64(1234);
    let secret = funky_secret();
    let oracle = crate::crypto::oracle::ecb_suffix_oracle(&secret, &mut rng);

    assert_eq!(Ok(secret), attack_ecb_suffix(&oracle));
}

#[test]
fn test_attack_ecb_suffix_block_aligned_secret() {
    let mut rng = StdRng::seed_from_u64(5);
    let secret = b"exactly 32 bytes of secret data!".to_vec();
    let oracle = crate::crypto::oracle::ecb_suffix_oracle(&secret, &mut rng);

    assert_eq!(Ok(secret), attack_ecb_suffix(&oracle));
}

#[test]
fn test_attack_ecb_suffix_empty_secret() {
    let mut rng = StdRng::seed_from_u64(5);
    let oracle = crate::crypto::oracle::ecb_suffix_oracle(b"", &mut rng);

    assert_eq!(Ok(Vec::new()), attack_ecb_suffix(&oracle));
}

#[test]
fn test_attack_ecb_suffix_aborts_on_cbc_oracle() {
    let key = b"YELLOW SUBMARINE";
    let iv = [3u8; 16];
    let secret = funky_secret();
    let oracle = move |buf: &[u8]| {
        let plaintext = [buf, secret.as_slice()].concat();
        crate::crypto::cbc::cbc_encrypt(&crate::crypto::ecb::Aes128, &iv, key, &plaintext).unwrap()
    };
    assert_eq!(Err(Error::NotEcb), attack_ecb_suffix(&oracle));
}
