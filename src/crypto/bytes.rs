use num::Integer;

use crate::error::Error;

pub fn fixed_xor(buf1: &[u8], buf2: &[u8]) -> Result<Vec<u8>, Error> {
    if buf1.len() != buf2.len() {
        return Err(Error::LengthMismatch {
            left: buf1.len(),
            right: buf2.len(),
        });
    }
    Ok(buf1.iter()
        .zip(buf2.iter())
        .map(|(x, y)| x ^ y)
        .collect())
}

#[test]
fn test_fixed_xor() {
    let case_buf1 = hex!("1c0111001f010100061a024b53535009181c");
    let case_buf2 = hex!("686974207468652062756c6c277320657965");
    let expected = hex!("746865206b696420646f6e277420706c6179");
    let result = fixed_xor(&case_buf1, &case_buf2).unwrap();
    assert_eq!(result, expected);
}

#[test]
fn test_fixed_xor_is_an_involution() {
    let a = hex!("deadbeef00ff137f");
    let b = hex!("0102030405060708");
    let once = fixed_xor(&a, &b).unwrap();
    assert_eq!(a.to_vec(), fixed_xor(&once, &b).unwrap());
}

#[test]
fn test_fixed_xor_length_mismatch() {
    let result = fixed_xor(b"abc", b"ab");
    assert_eq!(Err(Error::LengthMismatch { left: 3, right: 2 }), result);
}

pub fn byte_xor(buf: &[u8], b: u8) -> Vec<u8> {
    buf.iter()
        .map(|x| x ^ b)
        .collect()
}

pub fn repeating_key_xor(buf: &[u8], key: &[u8]) -> Vec<u8> {
    buf.iter()
        .zip(key.iter().cycle())
        .map(|(x, k)| x ^ k)
        .collect()
}

#[test]
fn test_repeating_key_xor() {
    let case = b"Burning 'em, if you ain't quick and nimble\nI go crazy when I hear a cymbal";
    let key = b"ICE";
    let encoded = repeating_key_xor(case, key);
    let expected = hex!("0b3637272a2b2e63622c2e69692a23693a2a3c6324202d623d63343c2a26226324272765272a282b2f20430a652e2c652a3124333a653e2b2027630c692b20283165286326302e27282f");
    assert_eq!(encoded, expected);
}

pub fn split_blocks(buf: &[u8], size: usize) -> Vec<Vec<u8>> {
    buf.chunks(size)
        .map(|block| block.to_vec())
        .collect()
}

#[test]
fn test_split_blocks() {
    let expected: Vec<Vec<u8>> = vec![b"01234567".to_vec(), b"89abcdef".to_vec()];
    assert_eq!(expected, split_blocks(b"0123456789abcdef", 8));

    let expected: Vec<Vec<u8>> = vec![b"01234567".to_vec(), b"89abcd".to_vec()];
    assert_eq!(expected, split_blocks(b"0123456789abcd", 8));
}

pub fn pkcs7_pad(buf: &[u8], block_size: usize) -> Vec<u8> {
    let padding_length = block_size - buf.len() % block_size;
    [buf, &vec![padding_length as u8; padding_length]].concat()
}

// Reads the final byte and drops that many bytes. The trailing bytes are
// deliberately not checked for equality with the count, matching the
// permissive behaviour the attacks rely on; only a count that cannot
// describe the buffer at all is rejected.
pub fn pkcs7_unpad(buf: &[u8]) -> Result<Vec<u8>, Error> {
    let declared = *buf.last().ok_or(Error::BadPadding { declared: 0, len: 0 })? as usize;
    if declared == 0 || declared > buf.len() {
        return Err(Error::BadPadding { declared, len: buf.len() });
    }
    Ok(buf[..buf.len() - declared].to_vec())
}

#[test]
fn test_pkcs7_pad() {
    let case = b"YELLOW SUBMARINE";
    assert_eq!(b"YELLOW SUBMARINE\x04\x04\x04\x04".to_vec(), pkcs7_pad(case, 20));

    // already aligned: a full extra block
    let expected = [case.to_vec(), vec![0x10; 16]].concat();
    assert_eq!(expected, pkcs7_pad(case, 16));
}

#[test]
fn test_pkcs7_unpad_round_trip() {
    for block_size in [1, 5, 16, 20] {
        let case = b"YELLOW SUBMARINE";
        let padded = pkcs7_pad(case, block_size);
        assert_eq!(0, padded.len() % block_size);
        assert_eq!(Ok(case.to_vec()), pkcs7_unpad(&padded));
    }
}

#[test]
fn test_pkcs7_unpad_is_permissive() {
    // mismatched filler bytes are not rejected, only counted off
    assert_eq!(Ok(b"ICE ICE BAB".to_vec()), pkcs7_unpad(b"ICE ICE BABY\x04\x04\x04\x05"));
}

#[test]
fn test_pkcs7_unpad_rejects_impossible_counts() {
    assert_eq!(
        Err(Error::BadPadding { declared: 0, len: 4 }),
        pkcs7_unpad(b"abc\x00")
    );
    assert_eq!(
        Err(Error::BadPadding { declared: 9, len: 4 }),
        pkcs7_unpad(b"abc\x09")
    );
    assert_eq!(
        Err(Error::BadPadding { declared: 0, len: 0 }),
        pkcs7_unpad(b"")
    );
}

pub fn hamming_distance(buf1: &[u8], buf2: &[u8]) -> Result<u32, Error> {
    if buf1.len() != buf2.len() {
        return Err(Error::LengthMismatch {
            left: buf1.len(),
            right: buf2.len(),
        });
    }
    Ok(buf1.iter()
        .zip(buf2.iter())
        .map(|(x, y)| (x ^ y).count_ones())
        .sum())
}

#[test]
fn test_hamming_distance() {
    let dist = hamming_distance(b"this is a test", b"wokka wokka!!!").unwrap();
    assert_eq!(37, dist);
}

pub fn normalised_hamming_distance(buf1: &[u8], buf2: &[u8]) -> Result<f64, Error> {
    Ok(hamming_distance(buf1, buf2)? as f64 / buf1.len() as f64)
}

pub fn round_up_to_nearest_multiple(n: usize, m: usize) -> usize {
    Integer::div_ceil(&n, &m) * m
}

#[test]
fn test_round_up_to_nearest_multiple() {
    assert_eq!(16, round_up_to_nearest_multiple(11, 16));
    assert_eq!(32, round_up_to_nearest_multiple(17, 16));
    assert_eq!(16, round_up_to_nearest_multiple(16, 16));
}
