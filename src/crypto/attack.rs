#[cfg(test)]
use base64::{Engine as _, engine::general_purpose};
use itertools::Itertools;

use crate::crypto::bytes;
use crate::crypto::english;

// Admissibility thresholds for candidate plaintexts. Tuned against the
// fixtures; both must hold before a decryption is scored at all.
const MIN_PRINTABLE_FRACTION: f64 = 0.9;
const MIN_LETTER_FRACTION: f64 = 0.85;

const MIN_KEYSIZE: usize = 2;
const MAX_KEYSIZE: usize = 40;
const KEYSIZES_TO_TRY: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct AttackResult {
    pub key: Vec<u8>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyCandidate {
    pub keysize: usize,
    pub normalized_distance: f64,
}

fn plausible_plaintext(buf: &[u8]) -> bool {
    let n = buf.len() as f64;
    let printable = buf.iter()
        .filter(|&&b| (b' '..=b'~').contains(&b) || b == 0)
        .count() as f64;
    let letters = buf.iter()
        .filter(|&&b| b.is_ascii_alphabetic() || b == b' ')
        .count() as f64;
    printable >= MIN_PRINTABLE_FRACTION * n && letters >= MIN_LETTER_FRACTION * n
}

// Brute-forces all 256 single-byte keys. Decryptions failing the
// plausibility heuristics are never scored; None means no key survived.
pub fn attack_single_byte_xor_cipher(buf: &[u8]) -> Option<AttackResult> {
    if buf.is_empty() {
        return None;
    }
    (0..=u8::MAX)
        .map(|k| (k, bytes::byte_xor(buf, k)))
        .filter(|(_, dec)| plausible_plaintext(dec))
        .map(|(k, dec)| AttackResult { key: vec![k], score: english::english_score(&dec) })
        .min_by(|x, y| x.score.partial_cmp(&y.score).unwrap())
}

#[test]
fn test_attack_single_byte_xor_cipher() {
    let case = hex!("1b37373331363f78151b7f2b783431333d78397828372d363c78373e783a393b3736");
    let result = attack_single_byte_xor_cipher(&case).unwrap();
    let plaintext = bytes::byte_xor(&case, result.key[0]);
    assert_eq!(b"Cooking MC's like a pound of bacon".to_vec(), plaintext);
}

#[test]
fn test_attack_single_byte_xor_cipher_no_survivor() {
    // 64 consecutive byte values: under any key the letter fraction tops
    // out at 52/64, below the 85% threshold
    let case: Vec<u8> = (0u8..64).collect();
    assert_eq!(None, attack_single_byte_xor_cipher(&case));
    assert_eq!(None, attack_single_byte_xor_cipher(b""));
}

// Runs the single-byte breaker over every candidate buffer and returns the
// index of the globally best one. Ties keep the first-seen candidate.
pub fn find_single_byte_xor(candidates: &[Vec<u8>]) -> Option<(usize, AttackResult)> {
    candidates.iter()
        .enumerate()
        .filter_map(|(i, buf)| attack_single_byte_xor_cipher(buf).map(|r| (i, r)))
        .min_by(|(_, x), (_, y)| x.score.partial_cmp(&y.score).unwrap())
}

#[test]
fn test_find_single_byte_xor_is_stable() {
    let line = hex::decode("1b37373331363f78151b7f2b783431333d78397828372d363c78373e783a393b3736").unwrap();
    let candidates = vec![line.clone(), line];
    let (index, _) = find_single_byte_xor(&candidates).unwrap();
    assert_eq!(0, index);
}

// Ranks candidate key lengths by the normalised Hamming distance between
// the leading block and every later full block. Dividing the summed
// distance by the full ciphertext length keeps keysizes with different
// block counts comparable.
pub fn estimate_keysizes(buf: &[u8]) -> Vec<KeyCandidate> {
    (MIN_KEYSIZE..=MAX_KEYSIZE)
        .filter(|&keysize| 2 * keysize <= buf.len())
        .map(|keysize| {
            let mut blocks = buf.chunks_exact(keysize);
            let reference = blocks.next().unwrap();
            let total: u32 = blocks
                .map(|block| bytes::hamming_distance(reference, block).unwrap())
                .sum();
            KeyCandidate {
                keysize,
                normalized_distance: total as f64 / buf.len() as f64,
            }
        })
        .sorted_by(|x, y| x.normalized_distance.partial_cmp(&y.normalized_distance).unwrap())
        .take(KEYSIZES_TO_TRY)
        .collect()
}

fn attack_fixed_keysize(buf: &[u8], keysize: usize) -> Option<Vec<u8>> {
    (0..keysize)
        .map(|i| {
            let column: Vec<u8> = buf[i..].iter().step_by(keysize).copied().collect();
            attack_single_byte_xor_cipher(&column).map(|r| r.key[0])
        })
        .collect()
}

// The keysize ranking is a noisy signal, so the top candidates are each
// attacked in full and the English fit of the whole decryption decides.
pub fn attack_repeating_key_xor_cipher(buf: &[u8]) -> Option<AttackResult> {
    estimate_keysizes(buf)
        .iter()
        .filter_map(|candidate| attack_fixed_keysize(buf, candidate.keysize))
        .map(|key| {
            let score = english::english_score(&bytes::repeating_key_xor(buf, &key));
            AttackResult { key, score }
        })
        .min_by(|x, y| x.score.partial_cmp(&y.score).unwrap())
}

#[test]
fn test_estimate_keysizes() {
    let contents = std::fs::read_to_string("./data/vigenere.txt")
        .expect("Should have been able to read the file")
        .replace('\n', "");
    let decoded = general_purpose::STANDARD.decode(contents).expect("Base64 decoding failed");
    let candidates = estimate_keysizes(&decoded);
    assert_eq!(3, candidates.len());
    assert_eq!(23, candidates[0].keysize);
    assert!(candidates[0].normalized_distance <= candidates[1].normalized_distance);
    assert!(candidates[1].normalized_distance <= candidates[2].normalized_distance);
}

#[test]
fn test_attack_repeating_key_xor_cipher() {
    let contents = std::fs::read_to_string("./data/vigenere.txt")
        .expect("Should have been able to read the file")
        .replace('\n', "");
    let decoded = general_purpose::STANDARD.decode(contents).expect("Base64 decoding failed");
    let expected = std::fs::read("./data/vigenere_expected.txt")
        .expect("Should have been able to read the file");

    let result = attack_repeating_key_xor_cipher(&decoded).unwrap();
    assert_eq!(b"ULTRAVIOLET CATASTROPHE".to_vec(), result.key);
    assert_eq!(expected, bytes::repeating_key_xor(&decoded, &result.key));
}

#[test]
fn test_attack_repeating_key_xor_cipher_inconclusive() {
    // too short for any keysize to have two full blocks
    assert_eq!(None, attack_repeating_key_xor_cipher(b"abc"));
}
