use bytes::Bytes;
use rand::Rng;
use std::net::{Ipv4Addr, Ipv6Addr};

use rr_types::casing;
use rr_types::protocol::deserialise::ConsumableBuffer;
use rr_types::protocol::serialise::WritableBuffer;
use rr_types::protocol::types::*;

#[test]
fn roundtrip_resourcerecord() {
    for _ in 0..100 {
        let original = random_record(&mut rand::rng());

        let octets = original.to_octets().unwrap();
        let (deserialised, consumed) = ResourceRecord::from_octets_at(&octets, 0).unwrap();

        assert_eq!(original, deserialised);
        assert_eq!(octets.len(), consumed);
    }
}

#[test]
fn roundtrip_domainname() {
    for _ in 0..100 {
        let original = random_domain(&mut rand::rng());

        let mut buffer = WritableBuffer::default();
        original.serialise(&mut buffer, false).unwrap();
        let deserialised = DomainName::deserialise(&mut ConsumableBuffer::new(&buffer.octets));

        assert_eq!(Ok(original), deserialised);
    }
}

#[test]
fn roundtrip_record_sequence_with_compression() {
    // records sharing owner names in one buffer: later owners become
    // pointers, and decoding from each returned offset undoes them
    let mut rng = rand::rng();
    for _ in 0..20 {
        let shared_owner = random_domain(&mut rng);
        let first = random_record_with_owner(&mut rng, shared_owner.clone());
        let other_owner = random_domain(&mut rng);
        let second = random_record_with_owner(&mut rng, other_owner);
        let third = random_record_with_owner(&mut rng, shared_owner);
        let originals = vec![first, second, third];

        let mut buffer = WritableBuffer::default();
        for original in &originals {
            original.serialise(&mut buffer).unwrap();
        }

        let mut offset = 0;
        for original in &originals {
            let (deserialised, next) =
                ResourceRecord::from_octets_at(&buffer.octets, offset).unwrap();
            assert_eq!(*original, deserialised);
            offset = next;
        }
        assert_eq!(buffer.octets.len(), offset);
    }
}

#[test]
fn roundtrip_survives_case_randomisation() {
    let mut rng = rand::rng();
    for _ in 0..100 {
        let original = random_record(&mut rng);
        let randomised = ResourceRecord {
            owner: casing::randomize_domain(&original.owner, &mut rng),
            ..original.clone()
        };

        let octets = randomised.to_octets().unwrap();
        let (deserialised, _) = ResourceRecord::from_octets_at(&octets, 0).unwrap();

        assert_eq!(original, deserialised);
    }
}

fn random_domain<R: Rng>(rng: &mut R) -> DomainName {
    let num_labels = rng.random_range(1..5);
    let mut labels = Vec::with_capacity(num_labels + 1);

    for _ in 0..num_labels {
        let label_len = rng.random_range(1..10);
        let mut octets = Vec::with_capacity(label_len);
        for _ in 0..label_len {
            octets.push(rng.random_range(b'a'..=b'z'));
        }
        labels.push(Label::try_from(&octets[..]).unwrap());
    }
    labels.push(Label::new());

    DomainName::from_labels(labels).unwrap()
}

fn random_record<R: Rng>(rng: &mut R) -> ResourceRecord {
    let owner = random_domain(rng);
    random_record_with_owner(rng, owner)
}

fn random_record_with_owner<R: Rng>(rng: &mut R, owner: DomainName) -> ResourceRecord {
    let rdata = match rng.random_range(0..8) {
        0 => RecordData::A {
            address: Ipv4Addr::from(rng.random::<u32>()),
        },
        1 => RecordData::AAAA {
            address: Ipv6Addr::from(rng.random::<u128>()),
        },
        2 => RecordData::NS {
            nsdname: random_domain(rng),
        },
        3 => RecordData::CNAME {
            cname: random_domain(rng),
        },
        4 => RecordData::SOA {
            mname: random_domain(rng),
            rname: random_domain(rng),
            serial: rng.random(),
            refresh: rng.random(),
            retry: rng.random(),
            expire: rng.random(),
            minimum: rng.random(),
        },
        5 => RecordData::MX {
            preference: rng.random(),
            exchange: random_domain(rng),
        },
        6 => RecordData::TXT {
            octets: random_octets(rng),
        },
        _ => RecordData::Opaque {
            rtype: RecordType::from(rng.random_range(65280..65535)),
            octets: random_octets(rng),
        },
    };

    ResourceRecord {
        owner,
        rdata,
        rclass: RecordClass::IN,
        ttl: rng.random(),
    }
}

fn random_octets<R: Rng>(rng: &mut R) -> Bytes {
    let len = rng.random_range(0..64);
    let mut octets = Vec::with_capacity(len);
    for _ in 0..len {
        octets.push(rng.random());
    }
    Bytes::from(octets)
}
