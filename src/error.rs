use snafu::Snafu;

#[derive(Debug, Clone, PartialEq, Snafu)]
pub enum Error {
    #[snafu(display("buffer lengths differ: {} != {}", left, right))]
    LengthMismatch { left: usize, right: usize },

    #[snafu(display("padding length {} cannot describe a buffer of length {}", declared, len))]
    BadPadding { declared: usize, len: usize },

    #[snafu(display("ciphertext length {} is not a multiple of the block size {}", len, block_size))]
    UnevenCiphertext { len: usize, block_size: usize },

    #[snafu(display("oracle does not encrypt in ECB mode"))]
    NotEcb,

    #[snafu(display("no candidate byte matched the oracle at position {}", position))]
    AttackStalled { position: usize },

    #[snafu(display("block cipher failure: {}", message))]
    Cipher { message: String },

    #[snafu(display("malformed key=value input"))]
    ParseError,
}
