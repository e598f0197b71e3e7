//! Editor tools for user interaction.
//!
//! Tools translate pointer input into previews of the selection transform
//! and commit them as commands on release.

mod manipulation;

pub use manipulation::ManipulationSession;
