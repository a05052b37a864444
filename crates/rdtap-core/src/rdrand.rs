//! x86_64 `RDRAND` / `RDSEED` sources.
//!
//! Both instructions signal per-call success through the carry flag. The
//! `_rd*64_step` intrinsics surface that as a return value of 1 (word
//! delivered) or 0 (no word this time). Values of these types are
//! capability tokens: they can only be built after CPUID confirmed the
//! instruction, which is what makes the `unsafe` calls below sound.

use crate::cpu::{supports_hardware_rng, supports_rdseed};
use crate::source::{SourceInfo, WordSource};

static RDRAND_INFO: SourceInfo = SourceInfo {
    name: "rdrand",
    instruction: "RDRAND",
    description: "x86 on-chip DRBG, reseeded from the thermal-noise entropy source",
};

static RDSEED_INFO: SourceInfo = SourceInfo {
    name: "rdseed",
    instruction: "RDSEED",
    description: "x86 on-chip entropy source output, conditioned but not DRBG-expanded",
};

/// Handle to the `RDRAND` instruction.
#[derive(Debug, Clone, Copy)]
pub struct RdRand {
    _token: (),
}

impl RdRand {
    /// `Some` iff CPUID reports `RDRAND`.
    pub fn detect() -> Option<Self> {
        supports_hardware_rng().then_some(Self { _token: () })
    }
}

impl WordSource for RdRand {
    fn info(&self) -> &SourceInfo {
        &RDRAND_INFO
    }

    #[inline]
    fn try_fill(&self, slot: &mut u64) -> bool {
        // SAFETY: `self` exists only if CPUID reported RDRAND.
        unsafe { rdrand64_step(slot) }
    }
}

/// Handle to the `RDSEED` instruction.
#[derive(Debug, Clone, Copy)]
pub struct RdSeed {
    _token: (),
}

impl RdSeed {
    /// `Some` iff CPUID reports `RDSEED`.
    pub fn detect() -> Option<Self> {
        supports_rdseed().then_some(Self { _token: () })
    }
}

impl WordSource for RdSeed {
    fn info(&self) -> &SourceInfo {
        &RDSEED_INFO
    }

    #[inline]
    fn try_fill(&self, slot: &mut u64) -> bool {
        // SAFETY: `self` exists only if CPUID reported RDSEED.
        unsafe { rdseed64_step(slot) }
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "rdrand")]
#[inline]
unsafe fn rdrand64_step(slot: &mut u64) -> bool {
    unsafe { core::arch::x86_64::_rdrand64_step(slot) == 1 }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "rdseed")]
#[inline]
unsafe fn rdseed64_step(slot: &mut u64) -> bool {
    unsafe { core::arch::x86_64::_rdseed64_step(slot) == 1 }
}

// No token can be built off x86_64, so these are never reached.
#[cfg(not(target_arch = "x86_64"))]
unsafe fn rdrand64_step(_slot: &mut u64) -> bool {
    false
}

#[cfg(not(target_arch = "x86_64"))]
unsafe fn rdseed64_step(_slot: &mut u64) -> bool {
    false
}
