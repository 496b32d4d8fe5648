//! # link-types
//!
//! Identity and wire format types for the Skylink overlay relay.
//!
//! This crate provides the types shared between the relay and its
//! consumers:
//! - [`PeerId`] - opaque identity of a remote endpoint on the overlay
//! - [`Envelope`] - the `{sender, message}` unit forwarded per inbound read

#![warn(missing_docs)]
#![warn(clippy::all)]

mod envelope;
mod ids;

pub use envelope::Envelope;
pub use ids::PeerId;
