#[cfg(test)]
use crate::crypto::ecb::Aes128;

use crate::crypto::bytes::{fixed_xor, pkcs7_pad, pkcs7_unpad};
use crate::crypto::ecb::BlockCipher;
use crate::error::Error;

// CBC built by chaining an injected single-block primitive: each plaintext
// block is XORed with the previous ciphertext block (the IV first) before
// encryption.
pub fn cbc_encrypt(
    cipher: &dyn BlockCipher,
    iv: &[u8],
    key: &[u8],
    buf: &[u8],
) -> Result<Vec<u8>, Error> {
    let block_size = cipher.block_size();
    let padded = pkcs7_pad(buf, block_size);

    let mut out: Vec<u8> = Vec::with_capacity(padded.len());
    let mut previous = iv.to_vec();
    for block in padded.chunks(block_size) {
        let chained = fixed_xor(&previous, block)?;
        previous = cipher.encrypt_block(key, &chained)?;
        out.extend_from_slice(&previous);
    }
    Ok(out)
}

pub fn cbc_decrypt(
    cipher: &dyn BlockCipher,
    iv: &[u8],
    key: &[u8],
    buf: &[u8],
) -> Result<Vec<u8>, Error> {
    let block_size = cipher.block_size();
    if buf.is_empty() || buf.len() % block_size != 0 {
        return Err(Error::UnevenCiphertext { len: buf.len(), block_size });
    }

    let mut out: Vec<u8> = Vec::with_capacity(buf.len());
    let mut previous = iv;
    for block in buf.chunks(block_size) {
        let decrypted = cipher.decrypt_block(key, block)?;
        out.extend(fixed_xor(previous, &decrypted)?);
        previous = block;
    }
    pkcs7_unpad(&out)
}

#[test]
fn test_cbc_round_trip() {
    let iv = hex!("deadbeefdeadbeefdeadbeefdeadbeef");
    let key = b"YELLOW SUBMARINE";
    let msg: Vec<u8> = b"Hello world xxxx".repeat(20);

    let ciphertext = cbc_encrypt(&Aes128, &iv, key, &msg).unwrap();
    assert_eq!(msg.len() + 16, ciphertext.len());
    assert_eq!(Ok(msg), cbc_decrypt(&Aes128, &iv, key, &ciphertext));
}

#[test]
fn test_cbc_round_trip_unaligned_plaintext() {
    let iv = [0u8; 16];
    let key = b"YELLOW SUBMARINE";
    let msg = b"this is not a multiple of sixteen bytes";

    let ciphertext = cbc_encrypt(&Aes128, &iv, key, msg).unwrap();
    assert_eq!(0, ciphertext.len() % 16);
    assert_eq!(Ok(msg.to_vec()), cbc_decrypt(&Aes128, &iv, key, &ciphertext));
}

#[test]
fn test_cbc_first_block_chains_from_iv() {
    // one aligned block: CBC must equal ECB of (iv XOR plaintext)
    let iv = hex!("000102030405060708090a0b0c0d0e0f");
    let key = b"YELLOW SUBMARINE";
    let block = b"ATTACK AT DAWN!!";

    let chained = fixed_xor(&iv, block).unwrap();
    let expected = Aes128.encrypt_block(key, &chained).unwrap();
    let ciphertext = cbc_encrypt(&Aes128, &iv, key, block).unwrap();
    assert_eq!(expected, ciphertext[..16].to_vec());
}

#[test]
fn test_cbc_decrypt_rejects_uneven_ciphertext() {
    let result = cbc_decrypt(&Aes128, &[0u8; 16], b"YELLOW SUBMARINE", &[0u8; 20]);
    assert_eq!(Err(Error::UnevenCiphertext { len: 20, block_size: 16 }), result);
}

#[test]
fn test_cbc_encrypt_rejects_mismatched_iv() {
    let result = cbc_encrypt(&Aes128, &[0u8; 4], b"YELLOW SUBMARINE", b"ATTACK AT DAWN!!");
    assert_eq!(Err(Error::LengthMismatch { left: 4, right: 16 }), result);
}
