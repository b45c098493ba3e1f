//! Systematic Reed-Solomon block codec with combined error-and-erasure decoding.
//!
//! A codeword is `message || parity` with array index 0 as the highest-order
//! symbol. Encoding runs the message through a parity-length-stage LFSR driven
//! by the generator polynomial. Decoding computes syndromes, seeds a
//! Berlekamp-Massey search with the known-erasure locator so erasures cost one
//! parity symbol instead of two, locates errors by brute-force root search and
//! repairs them in place with Forney magnitudes.

use crate::gf;
use crate::poly::{Poly, MAX_DEG};
use crate::Error;

/// One GF(256) block spans at most 255 symbols.
pub const BLOCK_LEN: usize = 255;

/// Maximum parity symbols per block (at least one symbol must carry data).
pub const MAX_PARITY: usize = 254;

// --- Generator polynomial ---

/// G(x) = product of (x + alpha^i) for i in 1..=parity_len.
fn generator_poly(parity_len: usize) -> Poly {
    let mut g = Poly::one();
    for i in 1..=parity_len {
        // g *= (x + alpha^i)
        let mut shifted = g;
        shifted.shift_z();
        g = shifted.add(&g.scale(gf::alpha_pow(i as isize)));
    }
    g
}

// --- Systematic encoder ---

/// Run `msg` through the LFSR and write `parity_len` parity bytes in
/// transmission order.
fn lfsr_parity(msg: &[u8], generator: &Poly, parity_len: usize, parity_out: &mut [u8]) {
    let mut lfsr = [0u8; MAX_PARITY];
    for &byte in msg {
        let feedback = byte ^ lfsr[parity_len - 1];
        for j in (1..parity_len).rev() {
            lfsr[j] = lfsr[j - 1] ^ gf::mul(generator.coef(j), feedback);
        }
        lfsr[0] = gf::mul(generator.coef(0), feedback);
    }
    // the register holds parity in reverse transmission order
    for i in 0..parity_len {
        parity_out[i] = lfsr[parity_len - 1 - i];
    }
}

// --- Syndromes ---

/// Horner-evaluate the received block at alpha^1 .. alpha^parity_len.
/// Returns true when every syndrome is zero (no detected corruption).
fn calc_syndromes(codeword: &[u8], parity_len: usize, out: &mut [u8]) -> bool {
    let mut all_zero = true;
    for (j, slot) in out.iter_mut().enumerate().take(parity_len) {
        let x = gf::alpha_pow(j as isize + 1);
        let mut sum = 0u8;
        for &byte in codeword {
            sum = byte ^ gf::mul(x, sum);
        }
        *slot = sum;
        if sum != 0 {
            all_zero = false;
        }
    }
    all_zero
}

// --- Erasure locator ---

/// Gamma(x) = product of (1 + alpha^e * x) over the known erasure powers.
/// With no erasures this is the constant 1 and the locator search below
/// degenerates to pure error correction.
fn erasure_locator(locs: &[usize]) -> Poly {
    let mut gamma = Poly::one();
    for &loc in locs {
        let mut term = gamma.scale(gf::alpha_pow(loc as isize));
        term.shift_z();
        gamma = gamma.add(&term);
    }
    gamma
}

// --- Error locator (erasure-seeded Berlekamp-Massey) ---

/// d = sum of psi[i] * synd[n-i] for i in 0..=l.
fn discrepancy(psi: &Poly, synd: &[u8], l: usize, n: usize) -> u8 {
    let mut d = 0u8;
    for i in 0..=l {
        d ^= gf::mul(psi.coef(i), synd[n - i]);
    }
    d
}

/// Iteratively refine the combined error/erasure locator. The search is
/// seeded with the erasure locator and runs the remaining
/// `parity_len - n_erasures` steps, so each erasure consumes one parity
/// symbol against the two an unknown error costs.
fn find_error_locator(synd: &[u8], n_erasures: usize, gamma: &Poly) -> Poly {
    let mut psi = *gamma;
    let mut aux = *gamma;
    aux.shift_z();
    let mut l = n_erasures;
    let mut k: isize = -1;

    for n in n_erasures..synd.len() {
        let d = discrepancy(&psi, synd, l, n);
        if d != 0 {
            let psi2 = psi.add(&aux.scale(d));
            if (l as isize) < n as isize - k {
                let l2 = n as isize - k;
                k = n as isize - l as isize;
                aux = psi.scale(gf::inv(d));
                l = l2 as usize;
            }
            psi = psi2;
        }
        aux.shift_z();
    }
    psi
}

// --- Error evaluator ---

/// Omega(x) = (locator * syndrome polynomial) mod x^parity_len.
fn find_error_evaluator(locator: &Poly, synd: &[u8], parity_len: usize) -> Poly {
    let mut s = Poly::zero();
    for (i, &v) in synd.iter().enumerate() {
        s.set_coef(i, v);
    }
    let mut omega = locator.mul(&s);
    for i in parity_len..MAX_DEG {
        omega.set_coef(i, 0);
    }
    omega
}

// --- Root search ---

/// Brute-force evaluate the locator at every nonzero field element.
/// A root at alpha^r marks symbol power 255 - r; positions are collected
/// into `locs` and the count returned.
fn find_errors(locator: &Poly, locs: &mut [usize; BLOCK_LEN]) -> usize {
    let mut count = 0;
    for r in 1..=255isize {
        if locator.eval(gf::alpha_pow(r)) == 0 {
            locs[count] = 255 - r as usize;
            count += 1;
        }
    }
    count
}

/// Formal derivative of the locator evaluated at `x`: in characteristic 2
/// only odd-degree terms survive, each contributing coef * x^(j-1).
fn locator_prime_eval(locator: &Poly, x: u8) -> u8 {
    let x2 = gf::mul(x, x);
    let mut xpow = 1u8;
    let mut acc = 0u8;
    for j in (1..MAX_DEG).step_by(2) {
        acc ^= gf::mul(locator.coef(j), xpow);
        xpow = gf::mul(xpow, x2);
    }
    acc
}

// --- Codec handle ---

/// Outcome of a successful [`ReedSolomon::correct`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    /// All syndromes were zero; the codeword needed no repair.
    Clean,
    /// The given number of symbol positions were repaired in place.
    Corrected(usize),
}

/// Reed-Solomon encoder/decoder over GF(256) for a fixed parity length.
///
/// The handle owns the generator polynomial, built once at construction and
/// read-only afterward, so it can be shared freely across threads. Every
/// decode artifact is scoped to a single [`correct`](Self::correct) call.
///
/// `parity_len` parity symbols correct up to `parity_len / 2` errors at
/// unknown positions, up to `parity_len` erasures at known positions, or any
/// mix with `2 * errors + erasures <= parity_len`.
pub struct ReedSolomon {
    parity_len: usize,
    generator: Poly,
}

impl std::fmt::Debug for ReedSolomon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReedSolomon")
            .field("parity_len", &self.parity_len)
            .finish()
    }
}

impl ReedSolomon {
    /// Create a codec producing `parity_len` parity symbols per block.
    pub fn new(parity_len: usize) -> Result<Self, Error> {
        if parity_len == 0 || parity_len > MAX_PARITY {
            return Err(Error::InvalidParityLength(parity_len));
        }
        Ok(Self {
            parity_len,
            generator: generator_poly(parity_len),
        })
    }

    /// Parity symbols appended to each message.
    pub fn parity_len(&self) -> usize {
        self.parity_len
    }

    /// Encode: returns `message || parity`.
    ///
    /// The block must fit one field span: `message.len() + parity_len <= 255`.
    pub fn encode(&self, message: &[u8]) -> Result<Vec<u8>, Error> {
        if message.len() + self.parity_len > BLOCK_LEN {
            return Err(Error::BlockTooLarge {
                data: message.len(),
                parity: self.parity_len,
            });
        }

        let mut codeword = Vec::with_capacity(message.len() + self.parity_len);
        codeword.extend_from_slice(message);

        let mut parity = [0u8; MAX_PARITY];
        lfsr_parity(message, &self.generator, self.parity_len, &mut parity);
        codeword.extend_from_slice(&parity[..self.parity_len]);

        Ok(codeword)
    }

    /// Repair a received block in place.
    ///
    /// `erasures` lists byte indices into `codeword` known a priori to be
    /// unreliable (e.g. positions covered by a lost transport fragment); their
    /// current values may be arbitrary. On any `Err` the buffer is left
    /// exactly as it was passed in.
    pub fn correct(&self, codeword: &mut [u8], erasures: &[usize]) -> Result<Correction, Error> {
        let len = codeword.len();
        let parity = self.parity_len;
        if len < parity {
            return Err(Error::CodewordTooShort { len, parity });
        }
        if len > BLOCK_LEN {
            return Err(Error::BlockTooLarge {
                data: len - parity,
                parity,
            });
        }
        if erasures.len() > parity {
            return Err(Error::TooManyErasures {
                count: erasures.len(),
                parity,
            });
        }
        for &pos in erasures {
            if pos >= len {
                return Err(Error::ErasureOutOfBounds { pos, len });
            }
        }

        let mut synd = [0u8; MAX_PARITY];
        if calc_syndromes(codeword, parity, &mut synd) {
            return Ok(Correction::Clean);
        }

        // byte indices -> symbol powers counted from the high-order end
        let mut erasure_locs = [0usize; MAX_PARITY];
        for (i, &pos) in erasures.iter().enumerate() {
            erasure_locs[i] = len - 1 - pos;
        }

        let gamma = erasure_locator(&erasure_locs[..erasures.len()]);
        let locator = find_error_locator(&synd[..parity], erasures.len(), &gamma);
        let omega = find_error_evaluator(&locator, &synd[..parity], parity);

        let mut locs = [0usize; BLOCK_LEN];
        let n_found = find_errors(&locator, &mut locs);
        if n_found == 0 || n_found > parity {
            return Err(Error::Uncorrectable);
        }
        for &loc in &locs[..n_found] {
            // a root beyond the actual block length is spurious: the real
            // error weight exceeded what the parity budget can justify
            if loc >= len {
                return Err(Error::LocationOutOfBounds { pos: loc, len });
            }
        }

        // compute every magnitude before touching the buffer so a failed
        // block is handed back unmodified
        let mut magnitudes = [0u8; BLOCK_LEN];
        for (r, &loc) in locs[..n_found].iter().enumerate() {
            let x_inv = gf::alpha_pow(-(loc as isize));
            let num = omega.eval(x_inv);
            let denom = locator_prime_eval(&locator, x_inv);
            if denom == 0 {
                return Err(Error::Uncorrectable);
            }
            magnitudes[r] = gf::mul(num, gf::inv(denom));
        }
        for (r, &loc) in locs[..n_found].iter().enumerate() {
            codeword[len - 1 - loc] ^= magnitudes[r];
        }

        Ok(Correction::Corrected(n_found))
    }
}
