//! Integration test crate for ClipForge.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every clipforge crate to verify they work together.

#[cfg(test)]
mod timeline;

#[cfg(test)]
mod playback;
