//! The DNS wire protocol: message types, and their serialisation to
//! and deserialisation from the format defined in RFC 1035.

pub mod deserialise;
pub mod serialise;
pub mod types;
