// SPDX-License-Identifier: MPL-2.0
//! Execution device selected during backend initialization.

use std::fmt;

/// Where the engine runs jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    /// Vulkan GPU, by index.
    Gpu(i32),
    /// CPU fallback with the given number of worker threads.
    Cpu { cores: u32 },
}

impl Device {
    #[must_use]
    pub fn is_cpu(self) -> bool {
        matches!(self, Device::Cpu { .. })
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Gpu(index) => write!(f, "GPU #{index}"),
            Device::Cpu { cores } => write!(f, "CPU ({cores} cores)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_device() {
        assert_eq!(Device::Gpu(1).to_string(), "GPU #1");
        assert_eq!(Device::Cpu { cores: 8 }.to_string(), "CPU (8 cores)");
        assert!(Device::Cpu { cores: 1 }.is_cpu());
        assert!(!Device::Gpu(0).is_cpu());
    }
}
