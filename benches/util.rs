#![allow(dead_code)]

#[cfg(target_arch = "x86")]
pub fn core_cycles() -> u64 {
    use core::arch::x86::{_mm_lfence, _rdtsc};
    unsafe {
        _mm_lfence();
        _rdtsc()
    }
}

#[cfg(target_arch = "x86_64")]
pub fn core_cycles() -> u64 {
    use core::arch::x86_64::{_mm_lfence, _rdtsc};
    unsafe {
        _mm_lfence();
        _rdtsc()
    }
}

#[cfg(target_arch = "aarch64")]
pub fn core_cycles() -> u64 {
    use core::arch::asm;
    let mut x: u64;
    unsafe {
        asm!("dsb sy", "mrs {}, pmccntr_el0", out(reg) x);
    }
    x
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
pub fn core_cycles() -> u64 {
    // No cycle counter; nanoseconds are reported instead.
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now().duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64).unwrap_or(0)
}

// Runs `f` `inner` times per sample, over `samples` samples, and returns
// the median cost of one call.
pub fn median_cycles<F: FnMut()>(samples: usize, inner: usize, mut f: F) -> f64 {
    let mut tt = vec![0u64; samples];
    for i in 0..samples {
        let begin = core_cycles();
        for _ in 0..inner {
            f();
        }
        let end = core_cycles();
        tt[i] = end.wrapping_sub(begin);
    }
    tt.sort();
    (tt[tt.len() >> 1] as f64) / (inner as f64)
}

// 32-byte seed derived from the cycle counter.
pub fn seed() -> [u8; 32] {
    let z = core_cycles();
    let mut seed = [0u8; 32];
    seed[ 0.. 8].copy_from_slice(&z.to_le_bytes());
    seed[ 8..16].copy_from_slice(&z.wrapping_mul(3).to_le_bytes());
    seed[16..24].copy_from_slice(&z.wrapping_mul(5).to_le_bytes());
    seed[24..32].copy_from_slice(&z.wrapping_mul(7).to_le_bytes());
    seed
}
