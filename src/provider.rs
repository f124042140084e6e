//! Remote platform descriptors.
//!
//! `descriptor` exposes [`GraphDescriptor`], the validated set of HTTPS endpoints the relay
//! talks to (Instagram authorize page + token endpoint, the Instagram Graph API, and the Threads
//! API), together with the grant identifiers sent to them.

pub mod descriptor;

pub use descriptor::*;
