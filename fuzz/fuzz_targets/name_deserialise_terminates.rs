#![no_main]
use libfuzzer_sys::fuzz_target;

use rr_types::protocol::deserialise::ConsumableBuffer;
use rr_types::protocol::types::DomainName;

// pointer chasing must reject loops rather than hang; any result is
// fine, returning is the property
fuzz_target!(|data: &[u8]| {
    let _ = DomainName::deserialise(&mut ConsumableBuffer::new(data));
});
