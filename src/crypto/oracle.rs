#[cfg(test)]
use rand::SeedableRng;
#[cfg(test)]
use rand::rngs::StdRng;

use rand::Rng;

use crate::crypto::bytes::split_blocks;
use crate::crypto::cbc::cbc_encrypt;
use crate::crypto::ecb::{ecb_encrypt, looks_like_ecb, Aes128};
use crate::util::random_bytes;

// The only capability an oracle attack sees: chosen plaintext in,
// ciphertext out. Key, mode and any hidden bytes stay inside the closure.
pub trait Oracle: Fn(&[u8]) -> Vec<u8> {}
impl<T: Fn(&[u8]) -> Vec<u8>> Oracle for T {}

// Appends a fixed secret suffix and ECB-encrypts under a fixed key drawn
// from the injected rng. Seed the rng and the oracle is fully deterministic.
pub fn ecb_suffix_oracle(secret: &[u8], rng: &mut impl Rng) -> impl Oracle {
    let key = random_bytes(rng, 16);
    let secret = secret.to_vec();
    move |buf: &[u8]| {
        let plaintext = [buf, &secret].concat();
        ecb_encrypt(&Aes128, &key, &plaintext).unwrap()
    }
}

// Wraps the caller's bytes in 5-10 random bytes on each side, then flips a
// coin between ECB and CBC under a fresh key. Returns the coin so tests can
// assert both branches.
pub fn random_mode_oracle(rng: &mut impl Rng) -> (bool, impl Oracle) {
    let key = random_bytes(rng, 16);
    let prefix_len = rng.gen_range(5..=10);
    let prefix = random_bytes(rng, prefix_len);
    let suffix_len = rng.gen_range(5..=10);
    let suffix = random_bytes(rng, suffix_len);
    let iv = random_bytes(rng, 16);
    let use_ecb: bool = rng.gen();

    let oracle = move |buf: &[u8]| {
        let plaintext = [prefix.as_slice(), buf, suffix.as_slice()].concat();
        match use_ecb {
            true => ecb_encrypt(&Aes128, &key, &plaintext).unwrap(),
            false => cbc_encrypt(&Aes128, &iv, &key, &plaintext).unwrap(),
        }
    };
    (use_ecb, oracle)
}

#[test]
fn test_ecb_suffix_oracle_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(42);
    let oracle = ecb_suffix_oracle(b"secret sauce", &mut rng);
    assert_eq!(oracle(b"hello"), oracle(b"hello"));
    assert_eq!(32, oracle(b"hello").len());
}

#[test]
fn test_random_mode_oracle_is_detectable() {
    // 11 bytes on each side cover the worst-case random padding, 32 in the
    // middle guarantee two attacker-aligned identical blocks under ECB
    let payload = vec![b'A'; 54];
    let mut seen_ecb = false;
    let mut seen_cbc = false;

    for seed in 0..40 {
        let mut rng = StdRng::seed_from_u64(seed);
        let (is_ecb, oracle) = random_mode_oracle(&mut rng);
        let detected = looks_like_ecb(&split_blocks(&oracle(&payload), 16));
        assert_eq!(is_ecb, detected);
        seen_ecb |= is_ecb;
        seen_cbc |= !is_ecb;
    }
    assert!(seen_ecb && seen_cbc);
}
