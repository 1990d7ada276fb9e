//! In-memory and wire representations of DNS resource records, plus
//! the "0x20" query-name capitalisation transform.  There is no
//! resolver, transport, or cache here: everything operates on
//! caller-owned buffers and values.

#![warn(clippy::pedantic)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::wildcard_imports)]

pub mod casing;
pub mod protocol;
