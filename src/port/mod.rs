//! Port layer, architecture-specific context switch and stack layout
//!
//! Exactly one of the `m0plus` / `m4f` Cargo features selects the real
//! port; building with neither (a host build) falls back to `stub`, which
//! has no dependency on ARM assembly at all (spec.md §9 "Arch variants":
//! two independent implementations behind a compile-time switch, never a
//! single parameterized handler).

#[cfg(all(feature = "m0plus", feature = "m4f"))]
compile_error!("features \"m0plus\" and \"m4f\" are mutually exclusive");

#[cfg(all(feature = "m0plus", target_arch = "arm"))]
pub mod cortex_m0plus;
#[cfg(all(feature = "m0plus", target_arch = "arm"))]
pub use cortex_m0plus::*;

#[cfg(all(feature = "m4f", target_arch = "arm"))]
pub mod cortex_m4f;
#[cfg(all(feature = "m4f", target_arch = "arm"))]
pub use cortex_m4f::*;

/// Host-side stand-in used when neither arch feature is active, so the
/// scheduler core (task table, selector, tick bookkeeping, event-flag
/// semantics) stays testable off-target (spec.md §9, REDESIGN FLAGS).
#[cfg(not(all(target_arch = "arm", any(feature = "m0plus", feature = "m4f"))))]
pub mod stub;
#[cfg(not(all(target_arch = "arm", any(feature = "m0plus", feature = "m4f"))))]
pub use stub::*;
