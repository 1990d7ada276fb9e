#![no_main]
use libfuzzer_sys::fuzz_target;

use rr_types::protocol::types::ResourceRecord;

fuzz_target!(|record: ResourceRecord| {
    if let Ok(serialised) = record.to_octets() {
        let deserialised = ResourceRecord::from_octets_at(&serialised, 0);
        assert_eq!(Ok((record, serialised.len())), deserialised);
    }
});
