//! Deserialisation of resource records from the wire format.  See the
//! `types` module for details of the format.

use bytes::Bytes;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::protocol::types::*;

/// How many compression pointers a single name may chase.  Every
/// pointer must also target an offset strictly before the name
/// segment it occurs in, so chains terminate regardless; this bound
/// caps the work done on a hostile message.
pub const POINTER_JUMP_LIMIT: usize = 128;

impl ResourceRecord {
    /// Decode one record from a message buffer, starting at `offset`.
    /// Compression pointers are resolved against the whole buffer, so
    /// this must be given the full message, not a record-sized slice.
    ///
    /// Returns the record and the offset just past it.
    ///
    /// # Errors
    ///
    /// If the record cannot be parsed.
    pub fn from_octets_at(octets: &[u8], offset: usize) -> Result<(Self, usize), Error> {
        let mut buffer = ConsumableBuffer::new(octets).at_offset(offset);
        let rr = Self::deserialise(&mut buffer)?;
        Ok((rr, buffer.position))
    }

    /// # Errors
    ///
    /// If the record cannot be parsed.
    pub fn deserialise(buffer: &mut ConsumableBuffer) -> Result<Self, Error> {
        let owner = DomainName::deserialise(buffer)?;
        let rtype = RecordType::deserialise(buffer)?;
        let rclass = RecordClass::deserialise(buffer)?;
        let ttl = buffer.next_u32().ok_or(Error::TruncatedMessage)?;
        let rdlength = buffer.next_u16().ok_or(Error::TruncatedMessage)?;

        let rdata_start = buffer.position;
        if buffer.octets.len() < rdata_start + (rdlength as usize) {
            return Err(Error::TruncatedMessage);
        }

        let mut raw_rdata = || {
            if let Some(octets) = buffer.take(rdlength as usize) {
                Ok(Bytes::copy_from_slice(octets))
            } else {
                Err(Error::TruncatedMessage)
            }
        };

        // records which include domain names are parsed so that any
        // pointers in them get expanded; everything else keeps its
        // byte-exact payload.
        let rdata = match rtype {
            RecordType::A => RecordData::A {
                address: Ipv4Addr::from(buffer.next_u32().ok_or(Error::TruncatedMessage)?),
            },
            RecordType::NS => RecordData::NS {
                nsdname: DomainName::deserialise(buffer)?,
            },
            RecordType::MD => RecordData::MD {
                madname: DomainName::deserialise(buffer)?,
            },
            RecordType::MF => RecordData::MF {
                madname: DomainName::deserialise(buffer)?,
            },
            RecordType::CNAME => RecordData::CNAME {
                cname: DomainName::deserialise(buffer)?,
            },
            RecordType::SOA => RecordData::SOA {
                mname: DomainName::deserialise(buffer)?,
                rname: DomainName::deserialise(buffer)?,
                serial: buffer.next_u32().ok_or(Error::TruncatedMessage)?,
                refresh: buffer.next_u32().ok_or(Error::TruncatedMessage)?,
                retry: buffer.next_u32().ok_or(Error::TruncatedMessage)?,
                expire: buffer.next_u32().ok_or(Error::TruncatedMessage)?,
                minimum: buffer.next_u32().ok_or(Error::TruncatedMessage)?,
            },
            RecordType::MB => RecordData::MB {
                madname: DomainName::deserialise(buffer)?,
            },
            RecordType::MG => RecordData::MG {
                mgmname: DomainName::deserialise(buffer)?,
            },
            RecordType::MR => RecordData::MR {
                newname: DomainName::deserialise(buffer)?,
            },
            RecordType::NULL => RecordData::NULL {
                octets: raw_rdata()?,
            },
            RecordType::WKS => RecordData::WKS {
                octets: raw_rdata()?,
            },
            RecordType::PTR => RecordData::PTR {
                ptrdname: DomainName::deserialise(buffer)?,
            },
            RecordType::HINFO => RecordData::HINFO {
                octets: raw_rdata()?,
            },
            RecordType::MINFO => RecordData::MINFO {
                rmailbx: DomainName::deserialise(buffer)?,
                emailbx: DomainName::deserialise(buffer)?,
            },
            RecordType::MX => RecordData::MX {
                preference: buffer.next_u16().ok_or(Error::TruncatedMessage)?,
                exchange: DomainName::deserialise(buffer)?,
            },
            RecordType::TXT => RecordData::TXT {
                octets: raw_rdata()?,
            },
            RecordType::AAAA => RecordData::AAAA {
                address: Ipv6Addr::new(
                    buffer.next_u16().ok_or(Error::TruncatedMessage)?,
                    buffer.next_u16().ok_or(Error::TruncatedMessage)?,
                    buffer.next_u16().ok_or(Error::TruncatedMessage)?,
                    buffer.next_u16().ok_or(Error::TruncatedMessage)?,
                    buffer.next_u16().ok_or(Error::TruncatedMessage)?,
                    buffer.next_u16().ok_or(Error::TruncatedMessage)?,
                    buffer.next_u16().ok_or(Error::TruncatedMessage)?,
                    buffer.next_u16().ok_or(Error::TruncatedMessage)?,
                ),
            },
            RecordType::SRV => RecordData::SRV {
                priority: buffer.next_u16().ok_or(Error::TruncatedMessage)?,
                weight: buffer.next_u16().ok_or(Error::TruncatedMessage)?,
                port: buffer.next_u16().ok_or(Error::TruncatedMessage)?,
                target: DomainName::deserialise(buffer)?,
            },
            other => RecordData::Opaque {
                rtype: other,
                octets: raw_rdata()?,
            },
        };

        if buffer.position == rdata_start + (rdlength as usize) {
            Ok(Self {
                owner,
                rdata,
                rclass,
                ttl,
            })
        } else {
            Err(Error::RdlengthMismatch)
        }
    }
}

impl DomainName {
    /// # Errors
    ///
    /// If the domain cannot be parsed.
    #[allow(clippy::missing_panics_doc)]
    pub fn deserialise<'a>(buffer: &mut ConsumableBuffer<'a>) -> Result<Self, Error> {
        let mut labels = Vec::<Label>::with_capacity(5);
        let mut len = 0;
        let mut jumps = 0;

        // Start of the name segment currently being read.  A pointer
        // must target an offset strictly before this, which makes the
        // chain of segment starts strictly decreasing: chasing can
        // never revisit an offset, and always terminates.
        let mut segment_start = buffer.position;

        // Reads after the first jump go through a detached cursor,
        // leaving `buffer` parked just past the pointer octets.
        let mut detached: Option<ConsumableBuffer<'a>> = None;

        loop {
            let cursor = match detached.as_mut() {
                Some(c) => c,
                None => &mut *buffer,
            };

            let size_offset = cursor.position;
            let size = cursor.next_u8().ok_or(Error::TruncatedMessage)?;

            if usize::from(size) <= LABEL_MAX_LEN {
                len += 1 + usize::from(size);
                if len > DOMAINNAME_MAX_LEN {
                    return Err(Error::InvalidLabel);
                }

                if size == 0 {
                    labels.push(Label::new());
                    break;
                }

                if let Some(os) = cursor.take(size as usize) {
                    // safe because of the bounds check above
                    labels.push(Label::try_from(os).unwrap());
                } else {
                    return Err(Error::TruncatedMessage);
                }
            } else if size & 0b1100_0000 == 0b1100_0000 {
                let hi = size & 0b0011_1111;
                let lo = cursor.next_u8().ok_or(Error::TruncatedMessage)?;
                let target = usize::from(u16::from_be_bytes([hi, lo]));

                if target >= segment_start {
                    return Err(Error::CompressionLoop);
                }

                jumps += 1;
                if jumps > POINTER_JUMP_LIMIT {
                    return Err(Error::CompressionLoop);
                }

                let next = cursor.at_offset(target);
                segment_start = target;
                detached = Some(next);
            } else {
                return Err(Error::InvalidLabel);
            }
        }

        Ok(DomainName { labels, len })
    }
}

impl RecordType {
    /// # Errors
    ///
    /// If the type is too short.
    pub fn deserialise(buffer: &mut ConsumableBuffer) -> Result<Self, Error> {
        let value = buffer.next_u16().ok_or(Error::TruncatedMessage)?;
        Ok(Self::from(value))
    }
}

impl RecordClass {
    /// # Errors
    ///
    /// If the class is too short.
    pub fn deserialise(buffer: &mut ConsumableBuffer) -> Result<Self, Error> {
        let value = buffer.next_u16().ok_or(Error::TruncatedMessage)?;
        Ok(Self::from(value))
    }
}

/// Errors encountered when parsing a record.  All of them are local
/// to the record being parsed: the caller gets a value back and
/// decides what to do, nothing is logged or retried here.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Error {
    /// The buffer ends before the record does.
    TruncatedMessage,

    /// A length octet is not a valid label length or pointer, or the
    /// name it belongs to is over 255 octets.
    InvalidLabel,

    /// A compression pointer chain does not make progress, or chases
    /// more than `POINTER_JUMP_LIMIT` pointers.
    CompressionLoop,

    /// The declared rdlength does not match the parsed rdata.
    RdlengthMismatch,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::TruncatedMessage => write!(f, "buffer ends before the end of the record"),
            Error::InvalidLabel => write!(f, "malformed label or over-long name"),
            Error::CompressionLoop => write!(f, "compression pointer chain does not terminate"),
            Error::RdlengthMismatch => write!(f, "rdlength does not match the rdata"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// A buffer which will be consumed by the parsing process.
pub struct ConsumableBuffer<'a> {
    octets: &'a [u8],
    position: usize,
}

impl<'a> ConsumableBuffer<'a> {
    pub fn new(octets: &'a [u8]) -> Self {
        Self {
            octets,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn next_u8(&mut self) -> Option<u8> {
        if self.octets.len() > self.position {
            let a = self.octets[self.position];
            self.position += 1;
            Some(a)
        } else {
            None
        }
    }

    pub fn next_u16(&mut self) -> Option<u16> {
        if self.octets.len() > self.position + 1 {
            let a = self.octets[self.position];
            let b = self.octets[self.position + 1];
            self.position += 2;
            Some(u16::from_be_bytes([a, b]))
        } else {
            None
        }
    }

    pub fn next_u32(&mut self) -> Option<u32> {
        if self.octets.len() > self.position + 3 {
            let a = self.octets[self.position];
            let b = self.octets[self.position + 1];
            let c = self.octets[self.position + 2];
            let d = self.octets[self.position + 3];
            self.position += 4;
            Some(u32::from_be_bytes([a, b, c, d]))
        } else {
            None
        }
    }

    pub fn take(&mut self, size: usize) -> Option<&'a [u8]> {
        if self.octets.len() >= self.position + size {
            let slice = &self.octets[self.position..self.position + size];
            self.position += size;
            Some(slice)
        } else {
            None
        }
    }

    pub fn at_offset(&self, position: usize) -> ConsumableBuffer<'a> {
        Self {
            octets: self.octets,
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::protocol::serialise::WritableBuffer;
    use crate::protocol::types::test_util::*;

    /// wire octets for `a.example.com. 3600 IN A 192.0.2.1`
    #[rustfmt::skip]
    fn a_record_octets() -> Vec<u8> {
        vec![
            // NAME
            1, 97, // "a"
            7, 101, 120, 97, 109, 112, 108, 101, // "example"
            3, 99, 111, 109, 0, // "com"
            // TYPE
            0, 1,
            // CLASS
            0, 1,
            // TTL
            0, 0, 14, 16, // 3600
            // RDLENGTH
            0, 4,
            // RDATA
            192, 0, 2, 1,
        ]
    }

    #[test]
    fn deserialise_a_record() {
        let octets = a_record_octets();
        let (rr, consumed) = ResourceRecord::from_octets_at(&octets, 0).unwrap();

        assert_eq!(domain("a.example.com."), rr.owner);
        assert_eq!(RecordType::A, rr.rtype());
        assert_eq!(RecordClass::IN, rr.rclass);
        assert_eq!(3600, rr.ttl);
        assert_eq!(
            RecordData::A {
                address: Ipv4Addr::new(192, 0, 2, 1)
            },
            rr.rdata
        );
        assert_eq!(octets.len(), consumed);
    }

    #[test]
    fn deserialise_resolves_owner_pointer() {
        // an encoded record whose owner collapses to a pointer
        let mut buf = WritableBuffer::default();
        a_record("www.example.com.", Ipv4Addr::new(192, 0, 2, 1))
            .serialise(&mut buf)
            .unwrap();
        let second_start = buf.index();
        a_record("www.example.com.", Ipv4Addr::new(192, 0, 2, 2))
            .serialise(&mut buf)
            .unwrap();

        let (rr, consumed) = ResourceRecord::from_octets_at(&buf.octets, second_start).unwrap();
        assert_eq!(domain("www.example.com."), rr.owner);
        assert_eq!(buf.octets.len(), consumed);
    }

    #[test]
    fn deserialise_resolves_rdata_pointer() {
        #[rustfmt::skip]
        let octets = vec![
            // a bare name for the pointer to target
            2, 110, 115, // "ns"
            7, 101, 120, 97, 109, 112, 108, 101, // "example"
            3, 99, 111, 109, 0, // "com"
            // NAME
            7, 101, 120, 97, 109, 112, 108, 101, // "example"
            3, 99, 111, 109, 0, // "com"
            // TYPE
            0, 2, // NS
            // CLASS
            0, 1,
            // TTL
            0, 0, 1, 44, // 300
            // RDLENGTH
            0, 2,
            // RDATA: pointer to "ns.example.com." at offset 0
            0b1100_0000, 0,
        ];

        let (rr, consumed) = ResourceRecord::from_octets_at(&octets, 16).unwrap();
        assert_eq!(domain("example.com."), rr.owner);
        assert_eq!(
            RecordData::NS {
                nsdname: domain("ns.example.com.")
            },
            rr.rdata
        );
        assert_eq!(octets.len(), consumed);
    }

    #[test]
    fn deserialise_rejects_self_pointer() {
        // a record at offset 4 whose owner is a pointer to itself
        let mut octets = vec![0, 0, 0, 0];
        octets.extend_from_slice(&[0b1100_0000, 4]);

        assert_eq!(
            Err(Error::CompressionLoop),
            ResourceRecord::from_octets_at(&octets, 4).map(|(rr, _)| rr)
        );
    }

    #[test]
    fn deserialise_rejects_forward_pointer() {
        let octets = vec![0b1100_0000, 9, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];

        assert_eq!(
            Err(Error::CompressionLoop),
            ResourceRecord::from_octets_at(&octets, 0).map(|(rr, _)| rr)
        );
    }

    #[test]
    fn deserialise_rejects_pointer_marathon() {
        // a chain of back-pointers, each targeting the one before it,
        // ending at a root label: more jumps than the limit
        let chain = POINTER_JUMP_LIMIT + 1;
        let mut octets = vec![0];
        for i in 0..chain {
            let target = if i == 0 { 0 } else { 2 * i - 1 };
            let [hi, lo] = u16::try_from(target).unwrap().to_be_bytes();
            octets.push(hi | 0b1100_0000);
            octets.push(lo);
        }

        let start = 2 * chain - 1;
        let mut buffer = ConsumableBuffer::new(&octets).at_offset(start);
        assert_eq!(
            Err(Error::CompressionLoop),
            DomainName::deserialise(&mut buffer)
        );
    }

    #[test]
    fn deserialise_accepts_short_pointer_chain() {
        #[rustfmt::skip]
        let octets = vec![
            3, 99, 111, 109, 0, // "com."
            7, 101, 120, 97, 109, 112, 108, 101, // "example"
            0b1100_0000, 0, // -> "com."
            3, 119, 119, 119, // "www"
            0b1100_0000, 5, // -> "example.com."
        ];

        let mut buffer = ConsumableBuffer::new(&octets).at_offset(15);
        assert_eq!(
            Ok(domain("www.example.com.")),
            DomainName::deserialise(&mut buffer)
        );
        assert_eq!(octets.len(), buffer.position());
    }

    #[test]
    fn deserialise_rejects_label_length_64() {
        let mut octets = vec![64];
        octets.extend_from_slice(&[b'x'; 64]);
        octets.push(0);

        let mut buffer = ConsumableBuffer::new(&octets);
        assert_eq!(
            Err(Error::InvalidLabel),
            DomainName::deserialise(&mut buffer)
        );
    }

    #[test]
    fn deserialise_rejects_overlong_name() {
        // five 60-octet labels: 305 encoded octets before the root
        let mut octets = Vec::new();
        for _ in 0..5 {
            octets.push(60);
            octets.extend_from_slice(&[b'x'; 60]);
        }
        octets.push(0);

        let mut buffer = ConsumableBuffer::new(&octets);
        assert_eq!(
            Err(Error::InvalidLabel),
            DomainName::deserialise(&mut buffer)
        );
    }

    #[test]
    fn deserialise_rejects_truncated_rdata() {
        let mut octets = a_record_octets();
        // declare more rdata than the buffer holds
        octets[24] = 200;

        assert_eq!(
            Err(Error::TruncatedMessage),
            ResourceRecord::from_octets_at(&octets, 0).map(|(rr, _)| rr)
        );
    }

    #[test]
    fn deserialise_rejects_truncated_name() {
        let octets = vec![7, 101, 120];

        let mut buffer = ConsumableBuffer::new(&octets);
        assert_eq!(
            Err(Error::TruncatedMessage),
            DomainName::deserialise(&mut buffer)
        );
    }

    #[test]
    fn deserialise_rejects_rdlength_mismatch() {
        let mut octets = a_record_octets();
        // A rdata is 4 octets, claim 6 (and supply them)
        octets[24] = 6;
        octets.extend_from_slice(&[0, 0]);

        assert_eq!(
            Err(Error::RdlengthMismatch),
            ResourceRecord::from_octets_at(&octets, 0).map(|(rr, _)| rr)
        );
    }

    #[test]
    fn deserialise_unknown_type_keeps_octets() {
        let mut octets = a_record_octets();
        // type 65280, in the private-use range
        octets[15] = 255;
        octets[16] = 0;

        let (rr, _) = ResourceRecord::from_octets_at(&octets, 0).unwrap();
        assert_eq!(
            RecordData::Opaque {
                rtype: RecordType::from(65280),
                octets: bytes::Bytes::copy_from_slice(&[192, 0, 2, 1]),
            },
            rr.rdata
        );
        assert_eq!("TYPE65280", rr.rtype().to_string());
    }

    #[test]
    fn deserialise_preserves_case_and_compares_insensitively() {
        let mut octets = a_record_octets();
        // uppercase the "a" and the "e" of "example"
        octets[1] = b'A';
        octets[3] = b'E';

        let (rr, _) = ResourceRecord::from_octets_at(&octets, 0).unwrap();
        assert_eq!("A.Example.com.", rr.owner.to_dotted_string());
        assert_eq!(domain("a.example.com."), rr.owner);
    }
}
