//! Serialisation of resource records to the wire format.  See the
//! `types` module for details of the format.

use bytes::{BufMut, BytesMut};
use std::collections::HashMap;
use std::fmt;

use crate::protocol::types::*;

impl ResourceRecord {
    /// Encode a single record into a fresh buffer.
    ///
    /// # Errors
    ///
    /// If the record violates a wire limit (the types permit more
    /// states than the wire can carry).
    pub fn to_octets(&self) -> Result<BytesMut, Error> {
        let mut buffer = WritableBuffer::default();
        self.serialise(&mut buffer)?;
        Ok(buffer.octets)
    }

    /// # Errors
    ///
    /// If the record violates a wire limit.
    pub fn serialise(&self, buffer: &mut WritableBuffer) -> Result<(), Error> {
        self.owner.serialise(buffer, true)?;
        self.rtype().serialise(buffer);
        self.rclass.serialise(buffer);
        buffer.write_u32(self.ttl);

        // filled in below
        let rdlength_index = buffer.index();
        buffer.write_u16(0);

        // rdata-borne names are always written as literal labels:
        // pointers inside rdata would make rdlength depend on where
        // the record sits in the buffer.
        match &self.rdata {
            RecordData::A { address } => buffer.write_octets(&address.octets()),
            RecordData::NS { nsdname } => nsdname.serialise(buffer, false)?,
            RecordData::MD { madname } => madname.serialise(buffer, false)?,
            RecordData::MF { madname } => madname.serialise(buffer, false)?,
            RecordData::CNAME { cname } => cname.serialise(buffer, false)?,
            RecordData::SOA {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => {
                mname.serialise(buffer, false)?;
                rname.serialise(buffer, false)?;
                buffer.write_u32(*serial);
                buffer.write_u32(*refresh);
                buffer.write_u32(*retry);
                buffer.write_u32(*expire);
                buffer.write_u32(*minimum);
            }
            RecordData::MB { madname } => madname.serialise(buffer, false)?,
            RecordData::MG { mgmname } => mgmname.serialise(buffer, false)?,
            RecordData::MR { newname } => newname.serialise(buffer, false)?,
            RecordData::NULL { octets } => buffer.write_octets(octets),
            RecordData::WKS { octets } => buffer.write_octets(octets),
            RecordData::PTR { ptrdname } => ptrdname.serialise(buffer, false)?,
            RecordData::HINFO { octets } => buffer.write_octets(octets),
            RecordData::MINFO { rmailbx, emailbx } => {
                rmailbx.serialise(buffer, false)?;
                emailbx.serialise(buffer, false)?;
            }
            RecordData::MX {
                preference,
                exchange,
            } => {
                buffer.write_u16(*preference);
                exchange.serialise(buffer, false)?;
            }
            RecordData::TXT { octets } => buffer.write_octets(octets),
            RecordData::AAAA { address } => buffer.write_octets(&address.octets()),
            RecordData::SRV {
                priority,
                weight,
                port,
                target,
            } => {
                buffer.write_u16(*priority);
                buffer.write_u16(*weight);
                buffer.write_u16(*port);
                target.serialise(buffer, false)?;
            }
            RecordData::Opaque { octets, .. } => buffer.write_octets(octets),
        }

        // -2 so we don't also include the 2 octets for the rdlength
        let rdlength = rdata_len_to_u16(buffer.index() - rdlength_index - 2)?;
        let [hi, lo] = rdlength.to_be_bytes();
        buffer.octets[rdlength_index] = hi;
        buffer.octets[rdlength_index + 1] = lo;

        Ok(())
    }
}

impl DomainName {
    /// Write a name as length-prefixed labels.  With `compress` set,
    /// a name the buffer has already seen is written as a single
    /// back-pointer instead; decoders must accept pointers either
    /// way, so compression is purely an output-size optimisation.
    ///
    /// # Errors
    ///
    /// The name fields are public, so the wire limits are re-checked
    /// here: a label over 63 octets or a name over 255 octets fails.
    pub fn serialise(&self, buffer: &mut WritableBuffer, compress: bool) -> Result<(), Error> {
        let mut encoded_len = 0;
        for label in &self.labels {
            let label_len = label.octets().len();
            if label_len > LABEL_MAX_LEN {
                return Err(Error::LabelTooLong { len: label_len });
            }
            encoded_len += 1 + label_len;
        }
        if encoded_len > DOMAINNAME_MAX_LEN {
            return Err(Error::NameTooLong { len: encoded_len });
        }

        if compress {
            if let Some(ptr) = buffer.name_pointer(self) {
                buffer.write_u16(ptr);
                return Ok(());
            }
        }

        buffer.memoise_name(self);
        for label in &self.labels {
            buffer.write_u8(label.len());
            buffer.write_octets(label.octets());
        }

        Ok(())
    }
}

impl RecordType {
    pub fn serialise(self, buffer: &mut WritableBuffer) {
        buffer.write_u16(self.into());
    }
}

impl RecordClass {
    pub fn serialise(self, buffer: &mut WritableBuffer) {
        buffer.write_u16(self.into());
    }
}

/// Errors encountered when serialising a record.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Error {
    /// A label is over 63 octets.
    LabelTooLong { len: usize },

    /// A name's encoded form is over 255 octets.
    NameTooLong { len: usize },

    /// The rdata does not fit in the 16 bit rdlength field.
    RdataTooLarge { len: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::LabelTooLong { len } => {
                write!(f, "label of {len} octets is over the 63 octet limit")
            }
            Error::NameTooLong { len } => {
                write!(f, "name of {len} octets is over the 255 octet limit")
            }
            Error::RdataTooLarge { len } => {
                write!(f, "rdata of {len} octets does not fit in the length field")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// A buffer which can be written to, for serialisation purposes.
pub struct WritableBuffer {
    pub octets: BytesMut,
    name_pointers: HashMap<DomainName, u16>,
}

impl Default for WritableBuffer {
    fn default() -> Self {
        Self {
            octets: BytesMut::with_capacity(512),
            name_pointers: HashMap::new(),
        }
    }
}

impl WritableBuffer {
    pub fn index(&self) -> usize {
        self.octets.len()
    }

    pub fn memoise_name(&mut self, name: &DomainName) {
        if !name.is_root() && !self.name_pointers.contains_key(name) {
            if let Ok(index) = u16::try_from(self.index()) {
                let [hi, lo] = index.to_be_bytes();
                self.name_pointers
                    .insert(name.clone(), u16::from_be_bytes([hi | 0b1100_0000, lo]));
            }
        }
    }

    pub fn name_pointer(&self, name: &DomainName) -> Option<u16> {
        self.name_pointers.get(name).copied()
    }

    pub fn write_u8(&mut self, octet: u8) {
        self.octets.put_u8(octet);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_octets(&value.to_be_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_octets(&value.to_be_bytes());
    }

    pub fn write_octets(&mut self, octets: &[u8]) {
        self.octets.put_slice(octets);
    }
}

/// Helper function to check the computed rdlength fits its field.
///
/// # Errors
///
/// If the value cannot be converted.
fn rdata_len_to_u16(len: usize) -> Result<u16, Error> {
    if let Ok(l) = u16::try_from(len) {
        Ok(l)
    } else {
        Err(Error::RdataTooLarge { len })
    }
}
