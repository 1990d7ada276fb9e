#![no_main]
use libfuzzer_sys::fuzz_target;

use rr_types::protocol::types::ResourceRecord;

fuzz_target!(|data: &[u8]| {
    if let Ok((deserialised, _)) = ResourceRecord::from_octets_at(data, 0) {
        let serialised = deserialised.to_octets().unwrap();
        let re_deserialised = ResourceRecord::from_octets_at(&serialised, 0);
        assert_eq!(Ok((deserialised, serialised.len())), re_deserialised);
    }
});
