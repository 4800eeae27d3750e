#[cfg(test)]
use rand::{SeedableRng, rngs::StdRng};

use crate::crypto::bytes::pkcs7_pad;
use crate::crypto::oracle::Oracle;
use crate::error::Error;
use crate::util::parse_kv;

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub email: Vec<u8>,
    pub uid: Vec<u8>,
    pub role: Vec<u8>,
}

impl Profile {
    // metacharacters are swallowed, so an email cannot smuggle "&role=admin"
    pub fn from_email(email: &[u8]) -> Profile {
        let safe = email.iter()
            .copied()
            .filter(|&b| b != b'&' && b != b'=')
            .collect();
        Profile {
            email: safe,
            uid: b"10".to_vec(),
            role: b"user".to_vec(),
        }
    }

    pub fn parse(buf: &[u8]) -> Result<Profile, Error> {
        let fields = parse_kv(buf)?;
        let field = |key: &[u8]| fields.get(key).cloned().ok_or(Error::ParseError);
        Ok(Profile {
            email: field(b"email")?,
            uid: field(b"uid")?,
            role: field(b"role")?,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        [
            b"email=".as_slice(), &self.email,
            b"&uid=".as_slice(), &self.uid,
            b"&role=".as_slice(), &self.role,
        ].concat()
    }
}

#[test]
fn test_profile_from_email_strips_metacharacters() {
    let expected = b"email=abc@def.com&uid=10&role=user".to_vec();
    assert_eq!(expected, Profile::from_email(b"abc@def.com").encode());
    assert_eq!(expected, Profile::from_email(b"abc@def&.com").encode());
    assert_eq!(expected, Profile::from_email(b"abc@def=.com").encode());
}

#[test]
fn test_profile_parse_round_trip() {
    let profile = Profile::from_email(b"foo@bar.com");
    let parsed = Profile::parse(&profile.encode()).unwrap();
    assert_eq!(profile, parsed);
    assert_eq!(Err(Error::ParseError), Profile::parse(b"email=a&uid=10"));
}

// Splices ciphertext blocks from two chosen emails so the profile decrypts
// with role=admin. The oracle encodes an attacker-supplied email into
// "email=..&uid=10&role=user" and ECB-encrypts it under a fixed key.
pub fn forge_admin_profile(oracle: &dyn Oracle) -> Vec<u8> {
    let block_size = 16;

    // line the second block up to hold exactly "admin" + PKCS#7 filler
    let filler = vec![b'A'; block_size - b"email=".len()];
    let payload = [filler, pkcs7_pad(b"admin", block_size)].concat();
    let admin_block = oracle(&payload)[block_size..2 * block_size].to_vec();

    // a 13-byte email pushes "&role=" flush against the second boundary,
    // leaving "user" plus padding alone in the final block
    let head = oracle(&vec![b'A'; 13])[..2 * block_size].to_vec();

    [head, admin_block].concat()
}

#[test]
fn test_forge_admin_profile() {
    use crate::crypto::ecb::{ecb_decrypt, ecb_encrypt, Aes128};
    use crate::util::random_bytes;

    let mut rng = StdRng::seed_from_u64(99);
    let key = random_bytes(&mut rng, 16);
    let oracle_key = key.clone();
    let oracle = move |buf: &[u8]| {
        let encoded = Profile::from_email(buf).encode();
        ecb_encrypt(&Aes128, &oracle_key, &encoded).unwrap()
    };

    let forged = forge_admin_profile(&oracle);
    let decrypted = ecb_decrypt(&Aes128, &key, &forged).unwrap();
    let profile = Profile::parse(&decrypted).unwrap();
    assert_eq!(b"admin".to_vec(), profile.role);
}
