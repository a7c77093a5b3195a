// Deterministic random sources for tests.

use rand_core::{CryptoRng, Error as RngError, RngCore};
use sha2::{Digest, Sha512};

/// A pretend RNG for test purposes (deterministic from a given seed).
/// It is NOT secure: the output is a public function of the seed.
pub(crate) struct Drng {
    buf: [u8; 64],
    ptr: usize,
}

impl Drng {

    pub(crate) fn from_seed(seed: &[u8]) -> Self {
        let mut d = Self {
            buf: [0u8; 64],
            ptr: 0,
        };
        let mut sh = Sha512::new();
        sh.update(seed);
        d.buf[..].copy_from_slice(&sh.finalize());
        d
    }
}

impl RngCore for Drng {

    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        // Only the first half of the buffer is output; the second half
        // stays secret and feeds the next refill.
        let len = dest.len();
        let mut off = 0;
        while off < len {
            let clen = (32 - self.ptr).min(len - off);
            dest[off..off + clen].copy_from_slice(
                &self.buf[self.ptr..self.ptr + clen]);
            self.ptr += clen;
            off += clen;
            if self.ptr == 32 {
                let mut sh = Sha512::new();
                sh.update(&self.buf);
                self.buf[..].copy_from_slice(&sh.finalize());
                self.ptr = 0;
            }
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RngError> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for Drng { }

/// A broken source that always outputs the same byte.
pub(crate) struct Constant(pub(crate) u8);

impl RngCore for Constant {

    fn next_u32(&mut self) -> u32 {
        u32::from_le_bytes([self.0; 4])
    }

    fn next_u64(&mut self) -> u64 {
        u64::from_le_bytes([self.0; 8])
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for b in dest.iter_mut() {
            *b = self.0;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RngError> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for Constant { }

/// A source whose every call fails.
pub(crate) struct Failing;

impl RngCore for Failing {

    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for b in dest.iter_mut() {
            *b = 0;
        }
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), RngError> {
        Err(RngError::new("entropy source unavailable"))
    }
}

impl CryptoRng for Failing { }
