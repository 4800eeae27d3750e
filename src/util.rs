use std::collections::HashMap;

use base64::{Engine as _, engine::general_purpose};
use hex::FromHexError;
use rand::RngCore;

use crate::error::Error;

pub fn hex_to_b64(input: &str) -> Result<String, FromHexError> {
    hex::decode(input)
        .map(|b| general_purpose::STANDARD.encode(b))
}

#[test]
fn test_hex_to_b64() {
    let case = "49276d206b696c6c696e6720796f757220627261696e206c696b65206120706f69736f6e6f7573206d757368726f6f6d";
    let expected = Ok(String::from("SSdtIGtpbGxpbmcgeW91ciBicmFpbiBsaWtlIGEgcG9pc29ub3VzIG11c2hyb29t"));
    assert_eq!(expected, hex_to_b64(case));
}

// Parses "k1=v1&k2=v2" byte strings. Duplicate keys keep the last value.
pub fn parse_kv(buf: &[u8]) -> Result<HashMap<Vec<u8>, Vec<u8>>, Error> {
    buf.split(|&b| b == b'&')
        .map(|pair| {
            let eq = pair.iter().position(|&b| b == b'=').ok_or(Error::ParseError)?;
            Ok((pair[..eq].to_vec(), pair[eq + 1..].to_vec()))
        })
        .collect()
}

#[test]
fn test_parse_kv() {
    let parsed = parse_kv(b"foo=bar&baz=qux&zap=zazzle").unwrap();
    assert_eq!(3, parsed.len());
    assert_eq!(b"bar".to_vec(), parsed[b"foo".as_slice()]);
    assert_eq!(b"qux".to_vec(), parsed[b"baz".as_slice()]);
    assert_eq!(b"zazzle".to_vec(), parsed[b"zap".as_slice()]);

    assert_eq!(Err(Error::ParseError), parse_kv(b"foo=bar&nope"));
}

pub fn random_bytes(rng: &mut impl RngCore, n: usize) -> Vec<u8> {
    let mut data = vec![0u8; n];
    rng.fill_bytes(&mut data);
    data
}

#[test]
fn test_random_bytes() {
    use rand::SeedableRng;
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let a = random_bytes(&mut rng, 16);
    let b = random_bytes(&mut rng, 16);
    assert_eq!(16, a.len());
    assert_ne!(a, b);
}
