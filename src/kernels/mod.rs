//! Pure, stateless conversion kernels used by the codec registry.
//!
//! Kernels know nothing about logical types; they translate one primitive
//! representation into another and report failures through `ColIndexError`.

pub mod nanotime;
pub mod twos_complement;
