//! DNS resource records and their RFC 1035 wire format: the types,
//! and serialisation to / deserialisation from a message buffer.

pub mod deserialise;
pub mod serialise;
pub mod types;
