use std::fmt::Debug;

/// Represents the physical location where tensor data is stored.
///
/// The graph engine itself is placement-agnostic: an executor carries one of these
/// tags and forwards it to every kernel, which uses it to allocate its outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StorageDevice {
    /// Data is stored in main system memory (RAM).
    /// This is the default device.
    #[default]
    CPU,
    /// Data is stored on a GPU. No kernel in this crate can allocate here yet,
    /// so evaluation on this device fails with `UnsupportedDevice`.
    GPU,
}

impl StorageDevice {
    /// Whether the CPU kernels can read and write buffers on this device.
    pub fn is_host_addressable(&self) -> bool {
        matches!(self, StorageDevice::CPU)
    }
}
