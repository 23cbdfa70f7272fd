//! A DNS message codec and a small UDP responder built on it.
//!
//! The `protocol` module implements the RFC 1035 wire format:
//! messages deserialise as a whole or not at all, and every length
//! and count field is derived from the data being written rather than
//! stored.  The `server` module answers queries over UDP from records
//! in the `settings` configuration.

#![warn(clippy::pedantic)]
// Don't care enough to fix
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::wildcard_imports)]

pub mod protocol;
pub mod server;
pub mod settings;
