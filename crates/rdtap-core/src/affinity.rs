//! Pin the process to one CPU core.
//!
//! Pinning only narrows draw-latency variance; it has no bearing on the
//! words produced. Failure is never fatal to a run.

/// Why a pinning request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AffinityError {
    /// `EFAULT`: the kernel could not read the CPU mask.
    #[error("EFAULT")]
    BadAddress,
    /// `EINVAL`: no such core, or it is outside the allowed set.
    #[error("processor {0} doesn't exist")]
    InvalidCore(usize),
    /// `EPERM`: not allowed to change affinity.
    #[error("insufficient permissions")]
    PermissionDenied,
    /// Affinity is not implemented on this platform.
    #[error("not supported on this platform")]
    Unsupported,
    /// Any other errno.
    #[error("unknown")]
    Unknown(i32),
}

impl AffinityError {
    /// Map an errno from `sched_setaffinity` to a reason.
    #[cfg(target_os = "linux")]
    pub fn from_errno(core: usize, errno: i32) -> Self {
        match errno {
            libc::EFAULT => Self::BadAddress,
            libc::EINVAL => Self::InvalidCore(core),
            libc::EPERM => Self::PermissionDenied,
            other => Self::Unknown(other),
        }
    }
}

/// Restrict the calling process to `core`.
#[cfg(target_os = "linux")]
pub fn pin_to_core(core: usize) -> Result<(), AffinityError> {
    if core >= libc::CPU_SETSIZE as usize {
        return Err(AffinityError::InvalidCore(core));
    }

    // SAFETY: cpu_set_t is a plain bitmask, all-zero is a valid empty set,
    // and `core` was bounds-checked against CPU_SETSIZE above.
    let rc = unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_ZERO(&mut set);
        libc::CPU_SET(core, &mut set);
        libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set)
    };

    if rc == 0 {
        log::debug!("pinned to core {core}");
        Ok(())
    } else {
        let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
        Err(AffinityError::from_errno(core, errno))
    }
}

#[cfg(not(target_os = "linux"))]
pub fn pin_to_core(_core: usize) -> Result<(), AffinityError> {
    Err(AffinityError::Unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_strings() {
        assert_eq!(AffinityError::BadAddress.to_string(), "EFAULT");
        assert_eq!(
            AffinityError::InvalidCore(99).to_string(),
            "processor 99 doesn't exist"
        );
        assert_eq!(
            AffinityError::PermissionDenied.to_string(),
            "insufficient permissions"
        );
        assert_eq!(AffinityError::Unknown(5).to_string(), "unknown");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn errno_mapping() {
        assert_eq!(AffinityError::from_errno(3, libc::EFAULT), AffinityError::BadAddress);
        assert_eq!(
            AffinityError::from_errno(3, libc::EINVAL),
            AffinityError::InvalidCore(3)
        );
        assert_eq!(
            AffinityError::from_errno(3, libc::EPERM),
            AffinityError::PermissionDenied
        );
        assert_eq!(
            AffinityError::from_errno(3, libc::EIO),
            AffinityError::Unknown(libc::EIO)
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn out_of_range_core_rejected() {
        let core = libc::CPU_SETSIZE as usize + 1;
        assert_eq!(pin_to_core(core), Err(AffinityError::InvalidCore(core)));
    }

    #[cfg(not(target_os = "linux"))]
    #[test]
    fn unsupported_off_linux() {
        assert_eq!(pin_to_core(0), Err(AffinityError::Unsupported));
    }
}
