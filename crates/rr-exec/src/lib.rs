//! # rr-exec
//!
//! The single subprocess seam for runrelay.
//!
//! Everything runrelay asks of the outside world — "is the queue client
//! installed", "are credentials valid", "does this object exist", "deliver
//! this message" — is an external command invocation. This crate provides
//! that capability as one trait, [`CommandRunner`], so every consumer can be
//! exercised against scripted doubles in tests while production code uses
//! [`SystemRunner`].

mod error;
mod runner;

pub use error::ExecError;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
