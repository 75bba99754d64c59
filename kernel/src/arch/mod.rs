//! Architecture-specific code
//!
//! The kernel only targets ARM64 (AArch64). Host builds, used for unit tests,
//! get portable stand-ins so the rest of the kernel compiles unchanged.

cfg_if::cfg_if! {
    if #[cfg(target_arch = "aarch64")] {
        pub mod aarch64;
        pub use aarch64::{data_barrier, halt, spin_cycles};
    } else {
        pub mod host;
        pub use host::{data_barrier, halt, spin_cycles};
    }
}
