//! Definitions shared by every part of the translation layer that speaks
//! the Linux side of the ABI: the Linux errno namespace, the Linux values of
//! open flags, clock identifiers and friends, and the `#[repr(C)]` structures
//! exchanged with the emulated process.
//!
//! Nothing in here calls into the host.
pub mod constants;
pub mod data;
