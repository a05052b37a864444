//! CPU capability detection.
//!
//! CPUID is read once per process and cached. Every caller after the first
//! gets the same [`CpuFeatures`] snapshot, so the answer to "can this CPU
//! draw?" never changes within a run.

use std::sync::OnceLock;

use serde::Serialize;

/// CPUID.01H:ECX bit 30.
pub const RDRAND_ECX_BIT: u32 = 1 << 30;
/// CPUID.(EAX=07H,ECX=0):EBX bit 18.
pub const RDSEED_EBX_BIT: u32 = 1 << 18;

/// Hardware RNG capabilities reported by CPUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CpuFeatures {
    /// Vendor identification string (e.g. `"GenuineIntel"`), empty off x86.
    pub vendor: String,
    /// Highest basic CPUID leaf.
    pub max_leaf: u32,
    /// `RDRAND` is implemented.
    pub rdrand: bool,
    /// `RDSEED` is implemented.
    pub rdseed: bool,
}

impl CpuFeatures {
    /// Build a snapshot from raw register values.
    ///
    /// `leaf7_ebx` is ignored when `max_leaf < 7`, matching what the CPU
    /// itself guarantees about out-of-range leaves.
    pub fn from_registers(vendor: String, max_leaf: u32, leaf1_ecx: u32, leaf7_ebx: u32) -> Self {
        Self {
            vendor,
            max_leaf,
            rdrand: max_leaf >= 1 && leaf1_ecx & RDRAND_ECX_BIT != 0,
            rdseed: max_leaf >= 7 && leaf7_ebx & RDSEED_EBX_BIT != 0,
        }
    }

    #[cfg_attr(target_arch = "x86_64", allow(dead_code))]
    fn none() -> Self {
        Self::from_registers(String::new(), 0, 0, 0)
    }
}

static FEATURES: OnceLock<CpuFeatures> = OnceLock::new();

/// Process-wide CPUID snapshot, computed on first use.
pub fn cpu_features() -> &'static CpuFeatures {
    FEATURES.get_or_init(detect)
}

/// True iff the CPU implements `RDRAND`.
pub fn supports_hardware_rng() -> bool {
    cpu_features().rdrand
}

/// True iff the CPU implements `RDSEED`.
pub fn supports_rdseed() -> bool {
    cpu_features().rdseed
}

#[cfg(target_arch = "x86_64")]
#[allow(unused_unsafe)]
fn detect() -> CpuFeatures {
    use core::arch::x86_64::{__cpuid, __cpuid_count};

    // SAFETY: CPUID is part of the x86_64 baseline. Leaf 0 is always valid
    // and the other leaves are only queried when leaf 0 says they exist.
    let leaf0 = unsafe { __cpuid(0) };
    let max_leaf = leaf0.eax;

    let mut vendor = Vec::with_capacity(12);
    vendor.extend_from_slice(&leaf0.ebx.to_le_bytes());
    vendor.extend_from_slice(&leaf0.edx.to_le_bytes());
    vendor.extend_from_slice(&leaf0.ecx.to_le_bytes());
    let vendor = String::from_utf8_lossy(&vendor).trim_end_matches('\0').to_string();

    let leaf1_ecx = if max_leaf >= 1 {
        // SAFETY: leaf 1 is within the range leaf 0 reported.
        unsafe { __cpuid(1) }.ecx
    } else {
        0
    };
    let leaf7_ebx = if max_leaf >= 7 {
        // SAFETY: leaf 7 is within the range leaf 0 reported; subleaf 0
        // always exists for it.
        unsafe { __cpuid_count(7, 0) }.ebx
    } else {
        0
    };

    let features = CpuFeatures::from_registers(vendor, max_leaf, leaf1_ecx, leaf7_ebx);
    log::debug!(
        "cpuid: vendor={} max_leaf={} rdrand={} rdseed={}",
        features.vendor,
        features.max_leaf,
        features.rdrand,
        features.rdseed
    );
    features
}

#[cfg(not(target_arch = "x86_64"))]
fn detect() -> CpuFeatures {
    log::debug!("cpuid: not an x86_64 target, no hardware RNG instructions");
    CpuFeatures::none()
}
