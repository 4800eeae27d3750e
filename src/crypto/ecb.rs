use std::collections::HashSet;

use itertools::Itertools;
use openssl::symm::{Cipher, Crypter, Mode};

use crate::crypto::bytes::{pkcs7_pad, pkcs7_unpad, split_blocks};
use crate::error::Error;

pub mod byte_by_byte;
pub mod cut_and_paste;

// A raw block cipher: one block in, one block out, no padding, no chaining.
// The CBC chainer and the oracles only ever see this interface, so tests can
// substitute their own primitive.
pub trait BlockCipher {
    fn block_size(&self) -> usize;
    fn encrypt_block(&self, key: &[u8], block: &[u8]) -> Result<Vec<u8>, Error>;
    fn decrypt_block(&self, key: &[u8], block: &[u8]) -> Result<Vec<u8>, Error>;
}

pub struct Aes128;

impl Aes128 {
    fn apply(&self, mode: Mode, key: &[u8], block: &[u8]) -> Result<Vec<u8>, Error> {
        let cipher = Cipher::aes_128_ecb();
        if block.len() != cipher.block_size() {
            return Err(Error::UnevenCiphertext {
                len: block.len(),
                block_size: cipher.block_size(),
            });
        }
        let mut crypter = Crypter::new(cipher, mode, key, None)
            .map_err(|e| Error::Cipher { message: e.to_string() })?;
        crypter.pad(false);
        let mut out = vec![0u8; block.len() + cipher.block_size()];
        let mut count = crypter.update(block, &mut out)
            .map_err(|e| Error::Cipher { message: e.to_string() })?;
        count += crypter.finalize(&mut out[count..])
            .map_err(|e| Error::Cipher { message: e.to_string() })?;
        out.truncate(count);
        Ok(out)
    }
}

impl BlockCipher for Aes128 {
    fn block_size(&self) -> usize {
        Cipher::aes_128_ecb().block_size()
    }

    fn encrypt_block(&self, key: &[u8], block: &[u8]) -> Result<Vec<u8>, Error> {
        self.apply(Mode::Encrypt, key, block)
    }

    fn decrypt_block(&self, key: &[u8], block: &[u8]) -> Result<Vec<u8>, Error> {
        self.apply(Mode::Decrypt, key, block)
    }
}

#[test]
fn test_aes128_single_block_round_trip() {
    let aes = Aes128;
    let key = b"YELLOW SUBMARINE";
    let block = b"ATTACK AT DAWN!!";
    let encrypted = aes.encrypt_block(key, block).unwrap();
    assert_eq!(16, encrypted.len());
    assert_ne!(block.to_vec(), encrypted);
    assert_eq!(block.to_vec(), aes.decrypt_block(key, &encrypted).unwrap());
}

#[test]
fn test_aes128_rejects_partial_blocks() {
    let aes = Aes128;
    let result = aes.encrypt_block(b"YELLOW SUBMARINE", b"short");
    assert_eq!(Err(Error::UnevenCiphertext { len: 5, block_size: 16 }), result);
}

pub fn ecb_encrypt(cipher: &dyn BlockCipher, key: &[u8], buf: &[u8]) -> Result<Vec<u8>, Error> {
    let block_size = cipher.block_size();
    pkcs7_pad(buf, block_size)
        .chunks(block_size)
        .map(|block| cipher.encrypt_block(key, block))
        .collect::<Result<Vec<_>, _>>()
        .map(|blocks| blocks.concat())
}

pub fn ecb_decrypt(cipher: &dyn BlockCipher, key: &[u8], buf: &[u8]) -> Result<Vec<u8>, Error> {
    let block_size = cipher.block_size();
    if buf.len() % block_size != 0 {
        return Err(Error::UnevenCiphertext { len: buf.len(), block_size });
    }
    let decrypted = buf.chunks(block_size)
        .map(|block| cipher.decrypt_block(key, block))
        .collect::<Result<Vec<_>, _>>()?
        .concat();
    pkcs7_unpad(&decrypted)
}

#[test]
fn test_aes_ecb_round_trip() {
    let key = b"YELLOW SUBMARINE";
    let plaintext = b"I'm back and I'm ringin' the bell";
    let ciphertext = ecb_encrypt(&Aes128, key, plaintext).unwrap();
    assert_eq!(48, ciphertext.len());
    assert_eq!(plaintext.to_vec(), ecb_decrypt(&Aes128, key, &ciphertext).unwrap());
}

#[test]
fn test_aes_ecb_decrypt_rejects_uneven_input() {
    let result = ecb_decrypt(&Aes128, b"YELLOW SUBMARINE", &[0u8; 17]);
    assert_eq!(Err(Error::UnevenCiphertext { len: 17, block_size: 16 }), result);
}

// ECB is the only mode where identical plaintext blocks under one key give
// identical ciphertext blocks, so any duplicate block is the fingerprint.
pub fn looks_like_ecb<B: AsRef<[u8]>>(blocks: &[B]) -> bool {
    let mut seen: HashSet<&[u8]> = HashSet::new();
    blocks.iter()
        .any(|block| !seen.insert(block.as_ref()))
}

#[test]
fn test_looks_like_ecb() {
    let blocks: Vec<&[u8]> = vec![];
    assert!(!looks_like_ecb(&blocks));

    let mut blocks = vec![b"abcabcab".to_vec(), b"defdefde".to_vec(), b"abcabccc".to_vec()];
    assert!(!looks_like_ecb(&blocks));

    blocks.push(b"abcabcab".to_vec());
    assert!(looks_like_ecb(&blocks));
}

pub fn scan_for_ecb<B: AsRef<[u8]>>(ciphertexts: &[B], block_size: usize) -> Vec<usize> {
    ciphertexts.iter()
        .positions(|c| looks_like_ecb(&split_blocks(c.as_ref(), block_size)))
        .collect()
}

#[test]
fn test_scan_for_ecb() {
    let ciphertexts: Vec<&[u8]> = vec![
        b"aaaaaaaaaaaaaaaabbbbbbbbbbbbbbbbaaaaaaaaaaaaaaab",
        b"aaaaaaaaaaaaaaaabbbbbbbbbbbbbbbbaaaaaaaaaaaaaaaa",
        b"aaaaaaaaaaaaaaaabbbbbbbbbbbbbbbbaaaaaaaaaaaaaaaaabbbbbbbbbbbbbbb",
        b"aaaaaaaaaaaaaaaabbbbbbbbbbbbbbb",
    ];
    assert_eq!(vec![1, 2], scan_for_ecb(&ciphertexts, 16));
    assert_eq!(vec![0, 1, 2, 3], scan_for_ecb(&ciphertexts, 8));
}
