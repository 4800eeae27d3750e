use lazy_static::lazy_static;

use crate::stats;

// Relative letter frequencies of English text, in percent, most common
// first. Process-wide and immutable.
static ENGLISH_FREQ: [(char, f64); 26] = [
    ('E', 12.49), ('T', 9.28), ('A', 8.04), ('O', 7.64), ('I', 7.57),
    ('N', 7.23),  ('S', 6.51), ('R', 6.28), ('H', 5.05), ('L', 4.07),
    ('D', 3.82),  ('C', 3.34), ('U', 2.73), ('M', 2.51), ('F', 2.40),
    ('P', 2.14),  ('G', 1.87), ('W', 1.68), ('Y', 1.66), ('B', 1.48),
    ('V', 1.05),  ('K', 0.54), ('X', 0.23), ('J', 0.16), ('Q', 0.12),
    ('Z', 0.09),
];

lazy_static! {
    // The same table re-keyed by alphabet position, as fractions
    static ref FREQ_BY_LETTER: [f64; 26] = {
        let mut freqs = [0f64; 26];
        for &(c, pct) in ENGLISH_FREQ.iter() {
            freqs[c as usize - 'A' as usize] = pct / 100.0;
        }
        freqs
    };
}

// Case-folds to A-Z and counts; every other byte is discarded.
pub fn letter_counts(buf: &[u8]) -> [u32; 26] {
    let mut counts = [0u32; 26];
    buf.iter()
        .map(|b| b.to_ascii_uppercase())
        .filter(|b| b.is_ascii_uppercase())
        .for_each(|b| counts[(b - b'A') as usize] += 1);
    counts
}

#[test]
fn test_letter_counts() {
    let counts = letter_counts(b"AABACB");
    assert_eq!(3, counts[0]);
    assert_eq!(2, counts[1]);
    assert_eq!(1, counts[2]);

    assert_eq!(counts, letter_counts(b"aabacb"));

    let counts = letter_counts(b" z y ");
    assert_eq!(1, counts[25]);
    assert_eq!(1, counts[24]);
    assert_eq!(2, counts.iter().sum::<u32>());
}

// Chi-squared distance between the observed letter histogram and the English
// profile scaled to the text length. Lower is more English-like.
pub fn english_score(buf: &[u8]) -> f64 {
    if buf.is_empty() {
        return f64::MAX;
    }
    let n = buf.len() as f64;
    let expected: Vec<f64> = FREQ_BY_LETTER.iter().map(|f| f * n).collect();
    let observed: Vec<f64> = letter_counts(buf).iter().map(|&c| c as f64).collect();
    // both histograms are always 26 buckets long
    stats::chi_squared(&observed, &expected).unwrap()
}

#[test]
fn test_english_score() {
    let score = english_score(b"The quick brown fox jumped over the lazy black dog");
    assert!((score - 77.621).abs() < 0.001);
}

#[test]
fn test_english_score_orders_prose_above_noise() {
    let prose = english_score(b"Now that the party is jumping");
    let noise = english_score(b"zzzzqqqqxxxxjjjj");
    assert!(prose < noise);
}

#[test]
fn test_english_score_empty_input() {
    assert_eq!(f64::MAX, english_score(b""));
}
