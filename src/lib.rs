//! Reed-Solomon forward-error-correction codec over GF(256).
//!
//! Systematic block coding for datacast-style transports: the encoder appends
//! parity symbols to a message, and the decoder reconstructs the original
//! block from a copy carrying both unknown-position corruption (errors) and
//! known-position loss (erasures). Erasure positions come from whatever
//! framing layer sits above (a missing transport fragment marks every byte
//! it covered), and each erasure costs one parity symbol against the two an
//! unknown error costs: any mix with `2 * errors + erasures <= parity_len`
//! is recovered exactly.
//!
//! The crate does no I/O and keeps no state across calls; it operates purely
//! on caller-supplied byte buffers.
//!
//! # Example
//!
//! ```
//! let rs = rsfec::ReedSolomon::new(4).unwrap();
//! let codeword = rs.encode(b"hello").unwrap();
//!
//! let mut received = codeword.clone();
//! received[2] ^= 0x5a; // corrupted in transit
//! received[7] = 0x00; // lost fragment, position known
//!
//! rs.correct(&mut received, &[7]).unwrap();
//! assert_eq!(received, codeword);
//! ```

pub mod codec;
pub mod gf;
pub mod poly;

pub use codec::{Correction, ReedSolomon};

/// Errors returned by codec construction, encoding and correction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid parity length: {0} (must be 1..=254)")]
    InvalidParityLength(usize),

    #[error("block too large: {data} data + {parity} parity bytes exceeds the 255-byte field span")]
    BlockTooLarge { data: usize, parity: usize },

    #[error("codeword too short: {len} bytes cannot hold {parity} parity symbols")]
    CodewordTooShort { len: usize, parity: usize },

    #[error("erasure position {pos} outside codeword of {len} bytes")]
    ErasureOutOfBounds { pos: usize, len: usize },

    #[error("too many erasures: {count} marked with only {parity} parity symbols")]
    TooManyErasures { count: usize, parity: usize },

    #[error("uncorrectable block: error weight exceeds the parity budget")]
    Uncorrectable,

    #[error("error location {pos} outside codeword of {len} bytes")]
    LocationOutOfBounds { pos: usize, len: usize },
}
