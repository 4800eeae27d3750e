pub mod bytes;
pub mod english;
pub mod attack;
pub mod ecb;
pub mod cbc;
pub mod oracle;

#[cfg(test)]
mod generic_tests {
    use crate::crypto::*;

    // One line of the fixture is a single-byte XOR of an English sentence;
    // the rest are random bytes that no key makes plausible.
    #[test]
    fn test_detect_single_byte_xor_encoded_line() {
        let contents = std::fs::read_to_string("./data/xor_lines.txt")
            .expect("Should have been able to read the file");
        let candidates: Vec<Vec<u8>> = contents
            .split('\n')
            .filter(|l| !l.is_empty())
            .map(|l| hex::decode(l).expect("Hex decoding failed"))
            .collect();

        let (index, result) = attack::find_single_byte_xor(&candidates)
            .expect("one line should be breakable");
        assert_eq!(4, index);
        assert_eq!(vec![0x5d], result.key);

        let plaintext = bytes::byte_xor(&candidates[index], result.key[0]);
        assert_eq!(b"The best attack against a bad cipher is patience\n".to_vec(), plaintext);
    }
}
