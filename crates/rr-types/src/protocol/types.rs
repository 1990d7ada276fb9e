use bytes::Bytes;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Maximum encoded length of a domain name.  The number of labels
/// plus sum of the lengths of the labels.
pub const DOMAINNAME_MAX_LEN: usize = 255;

/// Maximum length of a single label in a domain name.
pub const LABEL_MAX_LEN: usize = 63;

/// A single resource record: the unit the answer, authority, and
/// additional sections of a DNS message are made of.
///
/// ```text
///                                     1  1  1  1  1  1
///       0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                                               |
///     /                                               /
///     /                      NAME                     /
///     |                                               |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                      TYPE                     |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                     CLASS                     |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                      TTL                      |
///     |                                               |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                   RDLENGTH                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--|
///     /                     RDATA                     /
///     /                                               /
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
///
/// See section 4.1.3 of RFC 1035.  Once constructed a record is a
/// plain immutable value: transforms produce new records.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(any(feature = "test-util", test), derive(arbitrary::Arbitrary))]
pub struct ResourceRecord {
    /// The domain name this record pertains to.
    pub owner: DomainName,

    /// The RTYPE and RDATA fields, combined so that the payload always
    /// matches its type tag.
    pub rdata: RecordData,

    /// Two octets which specify the class of the data in the RDATA
    /// field.
    pub rclass: RecordClass,

    /// A 32 bit unsigned integer that specifies the time interval (in
    /// seconds) that the resource record may be cached before it
    /// should be discarded.
    pub ttl: u32,
}

impl ResourceRecord {
    pub fn rtype(&self) -> RecordType {
        self.rdata.rtype()
    }

    /// A human-readable `owner ttl class type rdata` line, for
    /// debugging and display.  Type and class mnemonics come from the
    /// conversion tables, so a line can be produced for any code.
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.owner,
            self.ttl,
            self.rclass,
            self.rtype(),
            self.rdata.to_display_string()
        )
    }
}

/// A record type with its associated, deserialised, data.
///
/// The RFC 1035 section 3.2 types (plus AAAA and SRV) are parsed into
/// typed payloads.  Every other type, registered or not, keeps its
/// byte-exact payload in the `Opaque` arm: opaque storage is always
/// correct, so nothing ever fails just because a type has no decoder.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum RecordData {
    /// A 32 bit Internet address.
    A { address: Ipv4Addr },

    /// A domain name which specifies a host which should be
    /// authoritative for the specified class and domain.
    NS { nsdname: DomainName },

    /// A domain name which specifies a host which has a mail agent
    /// which should be able to deliver mail for the domain.
    MD { madname: DomainName },

    /// A domain name which specifies a host which has a mail agent
    /// which will accept mail for forwarding to the domain.
    MF { madname: DomainName },

    /// A domain name which specifies the canonical or primary name
    /// for the owner.  The owner name is an alias.
    CNAME { cname: DomainName },

    /// Marks the start of a zone of authority.
    ///
    /// `MNAME` is the primary name server for the zone and `RNAME`
    /// the mailbox of the person responsible for it; the five 32 bit
    /// fields parameterise zone maintenance, in units of seconds.
    SOA {
        mname: DomainName,
        rname: DomainName,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    },

    /// A domain name which specifies a host which has the specified
    /// mailbox.
    MB { madname: DomainName },

    /// A domain name which specifies a mailbox which is a member of
    /// the mail group specified by the owner name.
    MG { mgmname: DomainName },

    /// A domain name which specifies a mailbox which is the proper
    /// rename of the owner mailbox.
    MR { newname: DomainName },

    /// Anything at all, so long as it is 65535 octets or less.
    NULL { octets: Bytes },

    /// Well-known service description; not interpreted here.
    WKS { octets: Bytes },

    /// A domain name which points to some location in the domain name
    /// space.
    PTR { ptrdname: DomainName },

    /// Host information; not interpreted here.
    HINFO { octets: Bytes },

    /// Mailing list or mailbox information: the responsible mailbox
    /// and the error mailbox.
    MINFO {
        rmailbx: DomainName,
        emailbx: DomainName,
    },

    /// ```text
    ///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    ///     |                  PREFERENCE                   |
    ///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    ///     /                   EXCHANGE                    /
    ///     /                                               /
    ///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    /// ```
    ///
    /// Where `PREFERENCE` is a 16 bit integer which specifies the
    /// preference given to this RR among others at the same owner
    /// (lower values preferred), and `EXCHANGE` is a domain name
    /// which specifies a host willing to act as a mail exchange.
    MX {
        preference: u16,
        exchange: DomainName,
    },

    /// One or more character strings.
    TXT { octets: Bytes },

    /// A 128 bit Internet address.
    AAAA { address: Ipv6Addr },

    /// ```text
    ///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    ///     |                   PRIORITY                    |
    ///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    ///     |                    WEIGHT                     |
    ///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    ///     |                     PORT                      |
    ///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    ///     /                    TARGET                     /
    ///     /                                               /
    ///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    /// ```
    ///
    /// The location of a service: clients try targets in `PRIORITY`
    /// order (lowest first), weighted by `WEIGHT` within a priority.
    SRV {
        priority: u16,
        weight: u16,
        port: u16,
        target: DomainName,
    },

    /// The byte-exact payload of any other record type.
    ///
    /// INVARIANT: `rtype` is never one of the types with a typed arm
    /// above; decoding never produces such a value.
    Opaque { rtype: RecordType, octets: Bytes },
}

impl RecordData {
    pub fn rtype(&self) -> RecordType {
        match self {
            RecordData::A { .. } => RecordType::A,
            RecordData::NS { .. } => RecordType::NS,
            RecordData::MD { .. } => RecordType::MD,
            RecordData::MF { .. } => RecordType::MF,
            RecordData::CNAME { .. } => RecordType::CNAME,
            RecordData::SOA { .. } => RecordType::SOA,
            RecordData::MB { .. } => RecordType::MB,
            RecordData::MG { .. } => RecordType::MG,
            RecordData::MR { .. } => RecordType::MR,
            RecordData::NULL { .. } => RecordType::NULL,
            RecordData::WKS { .. } => RecordType::WKS,
            RecordData::PTR { .. } => RecordType::PTR,
            RecordData::HINFO { .. } => RecordType::HINFO,
            RecordData::MINFO { .. } => RecordType::MINFO,
            RecordData::MX { .. } => RecordType::MX,
            RecordData::TXT { .. } => RecordType::TXT,
            RecordData::AAAA { .. } => RecordType::AAAA,
            RecordData::SRV { .. } => RecordType::SRV,
            RecordData::Opaque { rtype, .. } => *rtype,
        }
    }

    /// The rdata rendered for a display line: addresses in their
    /// standard notation, domains as dotted strings, raw octets as a
    /// quoted string with decimal escapes.
    pub fn to_display_string(&self) -> String {
        match self {
            RecordData::A { address } => format!("{address}"),
            RecordData::NS { nsdname } => nsdname.to_dotted_string(),
            RecordData::MD { madname } | RecordData::MF { madname } | RecordData::MB { madname } => {
                madname.to_dotted_string()
            }
            RecordData::CNAME { cname } => cname.to_dotted_string(),
            RecordData::SOA {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => format!(
                "{} {} {serial} {refresh} {retry} {expire} {minimum}",
                mname.to_dotted_string(),
                rname.to_dotted_string(),
            ),
            RecordData::MG { mgmname } => mgmname.to_dotted_string(),
            RecordData::MR { newname } => newname.to_dotted_string(),
            RecordData::NULL { octets }
            | RecordData::WKS { octets }
            | RecordData::HINFO { octets }
            | RecordData::TXT { octets }
            | RecordData::Opaque { octets, .. } => display_octets(octets, true),
            RecordData::PTR { ptrdname } => ptrdname.to_dotted_string(),
            RecordData::MINFO { rmailbx, emailbx } => format!(
                "{} {}",
                rmailbx.to_dotted_string(),
                emailbx.to_dotted_string()
            ),
            RecordData::MX {
                preference,
                exchange,
            } => format!("{preference} {}", exchange.to_dotted_string()),
            RecordData::AAAA { address } => format!("{address}"),
            RecordData::SRV {
                priority,
                weight,
                port,
                target,
            } => format!("{priority} {weight} {port} {}", target.to_dotted_string()),
        }
    }
}

/// Render a string of octets as a quoted or unquoted string with
/// decimal escapes for anything non-printable.
fn display_octets(octets: &[u8], quoted: bool) -> String {
    let mut out = String::with_capacity(2 + octets.len());

    if quoted {
        out.push('"');
    }

    for octet in octets {
        if *octet == b'"' || *octet == b'\\' || *octet == b';' || *octet == b'(' || *octet == b')' {
            out.push('\\');
            out.push(*octet as char);
        } else if *octet < 32 || *octet > 126 || (*octet == 32 && !quoted) {
            out.push('\\');
            let digit3 = *octet % 10;
            let digit2 = (*octet / 10) % 10;
            let digit1 = (*octet / 100) % 10;
            out.push((digit1 + 48) as char);
            out.push((digit2 + 48) as char);
            out.push((digit3 + 48) as char);
        } else {
            out.push(*octet as char);
        }
    }

    if quoted {
        out.push('"');
    }

    out
}

/// A domain name is a sequence of labels, where each label is a
/// length octet followed by that number of octets.
///
/// A label must be 63 octets or shorter.  A name must be 255 octets
/// or shorter in total, including both length and label octets.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DomainName {
    pub labels: Vec<Label>,
    // INVARIANT: len == len(labels) + sum(map(len, labels))
    pub len: usize,
}

impl DomainName {
    pub fn root_domain() -> Self {
        DomainName {
            labels: vec![Label::new()],
            len: 1,
        }
    }

    pub fn is_root(&self) -> bool {
        self.len == 1 && self.labels[0].is_empty()
    }

    /// The name in presentation format, with its original
    /// capitalisation and a trailing dot.
    pub fn to_dotted_string(&self) -> String {
        if self.is_root() {
            return ".".to_string();
        }

        let mut out = String::with_capacity(self.len);
        let mut first = true;
        for label in &self.labels {
            if first {
                first = false;
            } else {
                out.push('.');
            }
            for octet in label.octets() {
                out.push(*octet as char);
            }
        }

        out
    }

    /// Parse a dotted string.  A missing trailing dot is tolerated:
    /// the root label is appended.
    pub fn from_dotted_string(s: &str) -> Option<Self> {
        if s == "." {
            return Some(Self::root_domain());
        }

        let mut chunks = s.split('.').collect::<Vec<_>>();
        if chunks.last() != Some(&"") {
            chunks.push("");
        }

        let mut labels = Vec::with_capacity(chunks.len());
        for (i, label_chars) in chunks.iter().enumerate() {
            if label_chars.is_empty() && i != chunks.len() - 1 {
                return None;
            }

            match label_chars.as_bytes().try_into() {
                Ok(label) => labels.push(label),
                Err(_) => return None,
            }
        }

        Self::from_labels(labels)
    }

    /// Build a name from labels, of which exactly the last must be
    /// the empty root label.  `None` if any invariant is violated.
    pub fn from_labels(labels: Vec<Label>) -> Option<Self> {
        if labels.is_empty() {
            return None;
        }

        let mut len = labels.len();
        let mut blank_label = false;

        for label in &labels {
            if blank_label {
                return None;
            }

            blank_label |= label.is_empty();
            len += usize::from(label.len());
        }

        if blank_label && len <= DOMAINNAME_MAX_LEN {
            Some(Self { labels, len })
        } else {
            None
        }
    }
}

impl fmt::Debug for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainName")
            .field("to_dotted_string()", &self.to_dotted_string())
            .finish()
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", &self.to_dotted_string())
    }
}

impl FromStr for DomainName {
    type Err = DomainNameFromStr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(domain) = DomainName::from_dotted_string(s) {
            Ok(domain)
        } else {
            Err(DomainNameFromStr::NoParse)
        }
    }
}

/// Errors that can arise when converting a `&str` into a `DomainName`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DomainNameFromStr {
    NoParse,
}

impl fmt::Display for DomainNameFromStr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "could not parse string to domain name")
    }
}

impl std::error::Error for DomainNameFromStr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// A label is a sequence of up to 63 octets.
///
/// The octets keep the capitalisation they were built with, so that a
/// name survives the wire byte-for-byte, but labels are compared (and
/// hashed) as case-insensitive ASCII: two spellings of the same name
/// are the same name.
#[derive(Debug, Clone)]
pub struct Label {
    /// Private so constructing an over-long `Label` is impossible.
    octets: Bytes,
}

impl Label {
    /// Create a new, empty, label.
    pub fn new() -> Self {
        Self {
            octets: Bytes::new(),
        }
    }

    pub fn len(&self) -> u8 {
        // safe as the `TryFrom` ensures a label is <= 63 bytes
        self.octets.len().try_into().unwrap()
    }

    pub fn is_empty(&self) -> bool {
        self.octets.is_empty()
    }

    pub fn octets(&self) -> &Bytes {
        &self.octets
    }
}

impl Default for Label {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.octets.eq_ignore_ascii_case(&other.octets)
    }
}

impl Eq for Label {}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.octets.iter().map(u8::to_ascii_lowercase);
        let rhs = other.octets.iter().map(u8::to_ascii_lowercase);
        lhs.cmp(rhs)
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.octets.len());
        for octet in &self.octets {
            state.write_u8(octet.to_ascii_lowercase());
        }
    }
}

impl TryFrom<&[u8]> for Label {
    type Error = LabelTryFromOctetsError;

    fn try_from(octets: &[u8]) -> Result<Self, Self::Error> {
        if octets.len() > LABEL_MAX_LEN {
            return Err(LabelTryFromOctetsError::TooLong);
        }

        Ok(Self {
            octets: Bytes::copy_from_slice(octets),
        })
    }
}

/// Errors that can arise when converting a `[u8]` into a `Label`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LabelTryFromOctetsError {
    TooLong,
}

/// Record types, keyed on the wire by a 16 bit code.
///
/// The table below is the registry of well-known mnemonics; an
/// unregistered code is carried as `Unknown` and displayed in the
/// `TYPEnnn` synthetic form, so a name exists for every code.
/// Extending the table is a data change: add a variant and its row in
/// each conversion.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum RecordType {
    A,
    NS,
    MD,
    MF,
    CNAME,
    SOA,
    MB,
    MG,
    MR,
    NULL,
    WKS,
    PTR,
    HINFO,
    MINFO,
    MX,
    TXT,
    RP,
    AFSDB,
    SIG,
    KEY,
    PX,
    AAAA,
    LOC,
    SRV,
    NAPTR,
    KX,
    CERT,
    DNAME,
    OPT,
    APL,
    DS,
    SSHFP,
    IPSECKEY,
    RRSIG,
    NSEC,
    DNSKEY,
    DHCID,
    NSEC3,
    NSEC3PARAM,
    TLSA,
    SMIMEA,
    CDS,
    CDNSKEY,
    OPENPGPKEY,
    CSYNC,
    ZONEMD,
    SVCB,
    HTTPS,
    SPF,
    EUI48,
    EUI64,
    TKEY,
    TSIG,
    URI,
    CAA,
    Unknown(RecordTypeUnknown),
}

/// A struct with a private constructor, to ensure invalid `RecordType`s
/// cannot be created.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RecordTypeUnknown(u16);

impl RecordType {
    pub fn is_unknown(&self) -> bool {
        matches!(self, RecordType::Unknown(_))
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecordType::A => write!(f, "A"),
            RecordType::NS => write!(f, "NS"),
            RecordType::MD => write!(f, "MD"),
            RecordType::MF => write!(f, "MF"),
            RecordType::CNAME => write!(f, "CNAME"),
            RecordType::SOA => write!(f, "SOA"),
            RecordType::MB => write!(f, "MB"),
            RecordType::MG => write!(f, "MG"),
            RecordType::MR => write!(f, "MR"),
            RecordType::NULL => write!(f, "NULL"),
            RecordType::WKS => write!(f, "WKS"),
            RecordType::PTR => write!(f, "PTR"),
            RecordType::HINFO => write!(f, "HINFO"),
            RecordType::MINFO => write!(f, "MINFO"),
            RecordType::MX => write!(f, "MX"),
            RecordType::TXT => write!(f, "TXT"),
            RecordType::RP => write!(f, "RP"),
            RecordType::AFSDB => write!(f, "AFSDB"),
            RecordType::SIG => write!(f, "SIG"),
            RecordType::KEY => write!(f, "KEY"),
            RecordType::PX => write!(f, "PX"),
            RecordType::AAAA => write!(f, "AAAA"),
            RecordType::LOC => write!(f, "LOC"),
            RecordType::SRV => write!(f, "SRV"),
            RecordType::NAPTR => write!(f, "NAPTR"),
            RecordType::KX => write!(f, "KX"),
            RecordType::CERT => write!(f, "CERT"),
            RecordType::DNAME => write!(f, "DNAME"),
            RecordType::OPT => write!(f, "OPT"),
            RecordType::APL => write!(f, "APL"),
            RecordType::DS => write!(f, "DS"),
            RecordType::SSHFP => write!(f, "SSHFP"),
            RecordType::IPSECKEY => write!(f, "IPSECKEY"),
            RecordType::RRSIG => write!(f, "RRSIG"),
            RecordType::NSEC => write!(f, "NSEC"),
            RecordType::DNSKEY => write!(f, "DNSKEY"),
            RecordType::DHCID => write!(f, "DHCID"),
            RecordType::NSEC3 => write!(f, "NSEC3"),
            RecordType::NSEC3PARAM => write!(f, "NSEC3PARAM"),
            RecordType::TLSA => write!(f, "TLSA"),
            RecordType::SMIMEA => write!(f, "SMIMEA"),
            RecordType::CDS => write!(f, "CDS"),
            RecordType::CDNSKEY => write!(f, "CDNSKEY"),
            RecordType::OPENPGPKEY => write!(f, "OPENPGPKEY"),
            RecordType::CSYNC => write!(f, "CSYNC"),
            RecordType::ZONEMD => write!(f, "ZONEMD"),
            RecordType::SVCB => write!(f, "SVCB"),
            RecordType::HTTPS => write!(f, "HTTPS"),
            RecordType::SPF => write!(f, "SPF"),
            RecordType::EUI48 => write!(f, "EUI48"),
            RecordType::EUI64 => write!(f, "EUI64"),
            RecordType::TKEY => write!(f, "TKEY"),
            RecordType::TSIG => write!(f, "TSIG"),
            RecordType::URI => write!(f, "URI"),
            RecordType::CAA => write!(f, "CAA"),
            RecordType::Unknown(RecordTypeUnknown(n)) => write!(f, "TYPE{n}"),
        }
    }
}

impl FromStr for RecordType {
    type Err = RecordTypeFromStr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(RecordType::A),
            "NS" => Ok(RecordType::NS),
            "MD" => Ok(RecordType::MD),
            "MF" => Ok(RecordType::MF),
            "CNAME" => Ok(RecordType::CNAME),
            "SOA" => Ok(RecordType::SOA),
            "MB" => Ok(RecordType::MB),
            "MG" => Ok(RecordType::MG),
            "MR" => Ok(RecordType::MR),
            "NULL" => Ok(RecordType::NULL),
            "WKS" => Ok(RecordType::WKS),
            "PTR" => Ok(RecordType::PTR),
            "HINFO" => Ok(RecordType::HINFO),
            "MINFO" => Ok(RecordType::MINFO),
            "MX" => Ok(RecordType::MX),
            "TXT" => Ok(RecordType::TXT),
            "RP" => Ok(RecordType::RP),
            "AFSDB" => Ok(RecordType::AFSDB),
            "SIG" => Ok(RecordType::SIG),
            "KEY" => Ok(RecordType::KEY),
            "PX" => Ok(RecordType::PX),
            "AAAA" => Ok(RecordType::AAAA),
            "LOC" => Ok(RecordType::LOC),
            "SRV" => Ok(RecordType::SRV),
            "NAPTR" => Ok(RecordType::NAPTR),
            "KX" => Ok(RecordType::KX),
            "CERT" => Ok(RecordType::CERT),
            "DNAME" => Ok(RecordType::DNAME),
            "OPT" => Ok(RecordType::OPT),
            "APL" => Ok(RecordType::APL),
            "DS" => Ok(RecordType::DS),
            "SSHFP" => Ok(RecordType::SSHFP),
            "IPSECKEY" => Ok(RecordType::IPSECKEY),
            "RRSIG" => Ok(RecordType::RRSIG),
            "NSEC" => Ok(RecordType::NSEC),
            "DNSKEY" => Ok(RecordType::DNSKEY),
            "DHCID" => Ok(RecordType::DHCID),
            "NSEC3" => Ok(RecordType::NSEC3),
            "NSEC3PARAM" => Ok(RecordType::NSEC3PARAM),
            "TLSA" => Ok(RecordType::TLSA),
            "SMIMEA" => Ok(RecordType::SMIMEA),
            "CDS" => Ok(RecordType::CDS),
            "CDNSKEY" => Ok(RecordType::CDNSKEY),
            "OPENPGPKEY" => Ok(RecordType::OPENPGPKEY),
            "CSYNC" => Ok(RecordType::CSYNC),
            "ZONEMD" => Ok(RecordType::ZONEMD),
            "SVCB" => Ok(RecordType::SVCB),
            "HTTPS" => Ok(RecordType::HTTPS),
            "SPF" => Ok(RecordType::SPF),
            "EUI48" => Ok(RecordType::EUI48),
            "EUI64" => Ok(RecordType::EUI64),
            "TKEY" => Ok(RecordType::TKEY),
            "TSIG" => Ok(RecordType::TSIG),
            "URI" => Ok(RecordType::URI),
            "CAA" => Ok(RecordType::CAA),
            _ => {
                if let Some(type_str) = s.strip_prefix("TYPE") {
                    if let Ok(type_num) = u16::from_str(type_str) {
                        Ok(RecordType::from(type_num))
                    } else {
                        Err(RecordTypeFromStr::BadType)
                    }
                } else {
                    Err(RecordTypeFromStr::NoParse)
                }
            }
        }
    }
}

/// Errors that can arise when converting a `&str` into a `RecordType`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RecordTypeFromStr {
    BadType,
    NoParse,
}

impl fmt::Display for RecordTypeFromStr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecordTypeFromStr::BadType => write!(f, "TYPE<num> number must be a u16"),
            RecordTypeFromStr::NoParse => write!(f, "could not parse string to type"),
        }
    }
}

impl std::error::Error for RecordTypeFromStr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl From<u16> for RecordType {
    fn from(value: u16) -> Self {
        match value {
            1 => RecordType::A,
            2 => RecordType::NS,
            3 => RecordType::MD,
            4 => RecordType::MF,
            5 => RecordType::CNAME,
            6 => RecordType::SOA,
            7 => RecordType::MB,
            8 => RecordType::MG,
            9 => RecordType::MR,
            10 => RecordType::NULL,
            11 => RecordType::WKS,
            12 => RecordType::PTR,
            13 => RecordType::HINFO,
            14 => RecordType::MINFO,
            15 => RecordType::MX,
            16 => RecordType::TXT,
            17 => RecordType::RP,
            18 => RecordType::AFSDB,
            24 => RecordType::SIG,
            25 => RecordType::KEY,
            26 => RecordType::PX,
            28 => RecordType::AAAA,
            29 => RecordType::LOC,
            33 => RecordType::SRV,
            35 => RecordType::NAPTR,
            36 => RecordType::KX,
            37 => RecordType::CERT,
            39 => RecordType::DNAME,
            41 => RecordType::OPT,
            42 => RecordType::APL,
            43 => RecordType::DS,
            44 => RecordType::SSHFP,
            45 => RecordType::IPSECKEY,
            46 => RecordType::RRSIG,
            47 => RecordType::NSEC,
            48 => RecordType::DNSKEY,
            49 => RecordType::DHCID,
            50 => RecordType::NSEC3,
            51 => RecordType::NSEC3PARAM,
            52 => RecordType::TLSA,
            53 => RecordType::SMIMEA,
            59 => RecordType::CDS,
            60 => RecordType::CDNSKEY,
            61 => RecordType::OPENPGPKEY,
            62 => RecordType::CSYNC,
            63 => RecordType::ZONEMD,
            64 => RecordType::SVCB,
            65 => RecordType::HTTPS,
            99 => RecordType::SPF,
            108 => RecordType::EUI48,
            109 => RecordType::EUI64,
            249 => RecordType::TKEY,
            250 => RecordType::TSIG,
            256 => RecordType::URI,
            257 => RecordType::CAA,
            _ => RecordType::Unknown(RecordTypeUnknown(value)),
        }
    }
}

impl From<RecordType> for u16 {
    fn from(value: RecordType) -> Self {
        match value {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::MD => 3,
            RecordType::MF => 4,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::MB => 7,
            RecordType::MG => 8,
            RecordType::MR => 9,
            RecordType::NULL => 10,
            RecordType::WKS => 11,
            RecordType::PTR => 12,
            RecordType::HINFO => 13,
            RecordType::MINFO => 14,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::RP => 17,
            RecordType::AFSDB => 18,
            RecordType::SIG => 24,
            RecordType::KEY => 25,
            RecordType::PX => 26,
            RecordType::AAAA => 28,
            RecordType::LOC => 29,
            RecordType::SRV => 33,
            RecordType::NAPTR => 35,
            RecordType::KX => 36,
            RecordType::CERT => 37,
            RecordType::DNAME => 39,
            RecordType::OPT => 41,
            RecordType::APL => 42,
            RecordType::DS => 43,
            RecordType::SSHFP => 44,
            RecordType::IPSECKEY => 45,
            RecordType::RRSIG => 46,
            RecordType::NSEC => 47,
            RecordType::DNSKEY => 48,
            RecordType::DHCID => 49,
            RecordType::NSEC3 => 50,
            RecordType::NSEC3PARAM => 51,
            RecordType::TLSA => 52,
            RecordType::SMIMEA => 53,
            RecordType::CDS => 59,
            RecordType::CDNSKEY => 60,
            RecordType::OPENPGPKEY => 61,
            RecordType::CSYNC => 62,
            RecordType::ZONEMD => 63,
            RecordType::SVCB => 64,
            RecordType::HTTPS => 65,
            RecordType::SPF => 99,
            RecordType::EUI48 => 108,
            RecordType::EUI64 => 109,
            RecordType::TKEY => 249,
            RecordType::TSIG => 250,
            RecordType::URI => 256,
            RecordType::CAA => 257,
            RecordType::Unknown(RecordTypeUnknown(value)) => value,
        }
    }
}

/// Record classes, keyed on the wire by a 16 bit code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum RecordClass {
    IN,
    CS,
    CH,
    HS,
    Unknown(RecordClassUnknown),
}

/// A struct with a private constructor, to ensure invalid
/// `RecordClass`es cannot be created.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RecordClassUnknown(u16);

impl RecordClass {
    pub fn is_unknown(&self) -> bool {
        matches!(self, RecordClass::Unknown(_))
    }
}

impl fmt::Display for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecordClass::IN => write!(f, "IN"),
            RecordClass::CS => write!(f, "CS"),
            RecordClass::CH => write!(f, "CH"),
            RecordClass::HS => write!(f, "HS"),
            RecordClass::Unknown(RecordClassUnknown(n)) => write!(f, "CLASS{n}"),
        }
    }
}

impl FromStr for RecordClass {
    type Err = RecordClassFromStr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN" => Ok(RecordClass::IN),
            "CS" => Ok(RecordClass::CS),
            "CH" => Ok(RecordClass::CH),
            "HS" => Ok(RecordClass::HS),
            _ => {
                if let Some(class_str) = s.strip_prefix("CLASS") {
                    if let Ok(class_num) = u16::from_str(class_str) {
                        Ok(RecordClass::from(class_num))
                    } else {
                        Err(RecordClassFromStr::BadClass)
                    }
                } else {
                    Err(RecordClassFromStr::NoParse)
                }
            }
        }
    }
}

/// Errors that can arise when converting a `&str` into a `RecordClass`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RecordClassFromStr {
    BadClass,
    NoParse,
}

impl fmt::Display for RecordClassFromStr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecordClassFromStr::BadClass => write!(f, "CLASS<num> number must be a u16"),
            RecordClassFromStr::NoParse => write!(f, "could not parse string to class"),
        }
    }
}

impl std::error::Error for RecordClassFromStr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl From<u16> for RecordClass {
    fn from(value: u16) -> Self {
        match value {
            1 => RecordClass::IN,
            2 => RecordClass::CS,
            3 => RecordClass::CH,
            4 => RecordClass::HS,
            _ => RecordClass::Unknown(RecordClassUnknown(value)),
        }
    }
}

impl From<RecordClass> for u16 {
    fn from(value: RecordClass) -> Self {
        match value {
            RecordClass::IN => 1,
            RecordClass::CS => 2,
            RecordClass::CH => 3,
            RecordClass::HS => 4,
            RecordClass::Unknown(RecordClassUnknown(value)) => value,
        }
    }
}

#[cfg(any(feature = "test-util", test))]
impl<'a> arbitrary::Arbitrary<'a> for RecordData {
    // this is pretty verbose but it feels like a better way to guarantee the
    // max size of the `Bytes`s than adding a wrapper type
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let len = u.int_in_range(0..=128)?;
        let octets = Bytes::copy_from_slice(u.bytes(len)?);

        let rdata = match u.arbitrary::<RecordType>()? {
            RecordType::A => RecordData::A {
                address: u.arbitrary()?,
            },
            RecordType::NS => RecordData::NS {
                nsdname: u.arbitrary()?,
            },
            RecordType::MD => RecordData::MD {
                madname: u.arbitrary()?,
            },
            RecordType::MF => RecordData::MF {
                madname: u.arbitrary()?,
            },
            RecordType::CNAME => RecordData::CNAME {
                cname: u.arbitrary()?,
            },
            RecordType::SOA => RecordData::SOA {
                mname: u.arbitrary()?,
                rname: u.arbitrary()?,
                serial: u.arbitrary()?,
                refresh: u.arbitrary()?,
                retry: u.arbitrary()?,
                expire: u.arbitrary()?,
                minimum: u.arbitrary()?,
            },
            RecordType::MB => RecordData::MB {
                madname: u.arbitrary()?,
            },
            RecordType::MG => RecordData::MG {
                mgmname: u.arbitrary()?,
            },
            RecordType::MR => RecordData::MR {
                newname: u.arbitrary()?,
            },
            RecordType::NULL => RecordData::NULL { octets },
            RecordType::WKS => RecordData::WKS { octets },
            RecordType::PTR => RecordData::PTR {
                ptrdname: u.arbitrary()?,
            },
            RecordType::HINFO => RecordData::HINFO { octets },
            RecordType::MINFO => RecordData::MINFO {
                rmailbx: u.arbitrary()?,
                emailbx: u.arbitrary()?,
            },
            RecordType::MX => RecordData::MX {
                preference: u.arbitrary()?,
                exchange: u.arbitrary()?,
            },
            RecordType::TXT => RecordData::TXT { octets },
            RecordType::AAAA => RecordData::AAAA {
                address: u.arbitrary()?,
            },
            RecordType::SRV => RecordData::SRV {
                priority: u.arbitrary()?,
                weight: u.arbitrary()?,
                port: u.arbitrary()?,
                target: u.arbitrary()?,
            },
            other => RecordData::Opaque {
                rtype: other,
                octets,
            },
        };
        Ok(rdata)
    }
}

#[cfg(any(feature = "test-util", test))]
impl<'a> arbitrary::Arbitrary<'a> for DomainName {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let num_labels = u.int_in_range::<usize>(0..=10)?;
        let mut labels = Vec::new();
        for _ in 0..num_labels {
            labels.push(u.arbitrary()?);
        }
        labels.push(Label::new());
        Ok(DomainName::from_labels(labels).unwrap())
    }
}

#[cfg(any(feature = "test-util", test))]
impl<'a> arbitrary::Arbitrary<'a> for Label {
    // only generates non-empty labels
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Label> {
        use bytes::{BufMut, BytesMut};

        let label_len = u.int_in_range::<u8>(1..=20)?;
        let mut octets = BytesMut::with_capacity(label_len.into());
        let bs = u.bytes(label_len.into())?;
        for b in bs {
            let ascii_byte = if b.is_ascii() { *b } else { *b % 128 };
            octets.put_u8(
                if ascii_byte == b'.'
                    || ascii_byte == b'*'
                    || ascii_byte == b'@'
                    || ascii_byte == b'#'
                    || (ascii_byte as char).is_whitespace()
                {
                    b'x'
                } else {
                    ascii_byte
                },
            );
        }
        Ok(Self {
            octets: octets.freeze(),
        })
    }
}

#[cfg(any(feature = "test-util", test))]
impl<'a> arbitrary::Arbitrary<'a> for RecordType {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self::from(u.arbitrary::<u16>()?))
    }
}

#[cfg(any(feature = "test-util", test))]
impl<'a> arbitrary::Arbitrary<'a> for RecordClass {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self::from(u.arbitrary::<u16>()?))
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::test_util::*;
    use super::*;

    #[test]
    fn u16_recordtype_roundtrip() {
        for i in 0..300 {
            assert_eq!(u16::from(RecordType::from(i)), i);
        }
    }

    #[test]
    fn u16_recordclass_roundtrip() {
        for i in 0..300 {
            assert_eq!(u16::from(RecordClass::from(i)), i);
        }
    }

    #[test]
    fn recordtype_mnemonic_str_roundtrip() {
        for i in 0..300 {
            let rtype = RecordType::from(i);
            assert_eq!(Ok(rtype), RecordType::from_str(&rtype.to_string()));
        }
    }

    #[test]
    fn recordtype_unknown_synthesised_mnemonic() {
        let rtype = RecordType::from(65399);
        assert!(rtype.is_unknown());
        assert_eq!("TYPE65399", rtype.to_string());
        assert_eq!(Ok(rtype), RecordType::from_str("TYPE65399"));
        assert_eq!(65399, u16::from(RecordType::from_str("TYPE65399").unwrap()));
    }

    #[test]
    fn recordtype_synthetic_form_normalises_to_known() {
        assert_eq!(Ok(RecordType::MX), RecordType::from_str("TYPE15"));
    }

    #[test]
    fn recordtype_from_str_rejects_free_text() {
        assert_eq!(
            Err(RecordTypeFromStr::NoParse),
            RecordType::from_str("not-a-type")
        );
        assert_eq!(
            Err(RecordTypeFromStr::BadType),
            RecordType::from_str("TYPE65536")
        );
    }

    #[test]
    fn recordclass_mnemonic_str_roundtrip() {
        for i in 0..10 {
            let rclass = RecordClass::from(i);
            assert_eq!(Ok(rclass), RecordClass::from_str(&rclass.to_string()));
        }
    }

    #[test]
    fn domainname_root_conversions() {
        assert_eq!(
            Some(DomainName::root_domain()),
            DomainName::from_dotted_string(".")
        );

        assert_eq!(
            Some(DomainName::root_domain()),
            DomainName::from_labels(vec![Label::new()])
        );

        assert_eq!(".", DomainName::root_domain().to_dotted_string());
    }

    #[test]
    fn from_dotted_string_tolerates_missing_trailing_dot() {
        assert_eq!(
            DomainName::from_dotted_string("www.example.com."),
            DomainName::from_dotted_string("www.example.com")
        );
    }

    #[test]
    fn domainname_comparison_is_case_insensitive() {
        assert_eq!(domain("Example.COM."), domain("example.com."));
        assert_eq!(domain("EXAMPLE.com."), domain("exAMPle.Com."));

        let mut set = std::collections::HashSet::new();
        set.insert(domain("Example.COM."));
        assert!(set.contains(&domain("example.com.")));
    }

    #[test]
    fn to_dotted_string_preserves_case() {
        assert_eq!("ExAmPlE.cOm.", domain("ExAmPlE.cOm.").to_dotted_string());
    }

    #[test]
    fn label_too_long_rejected() {
        assert_eq!(
            Err(LabelTryFromOctetsError::TooLong),
            Label::try_from(&[b'x'; 64][..])
        );
        assert!(Label::try_from(&[b'x'; 63][..]).is_ok());
    }

    #[test]
    fn from_labels_rejects_overlong_name() {
        let mut labels = Vec::new();
        for _ in 0..5 {
            labels.push(Label::try_from(&[b'x'; 60][..]).unwrap());
        }
        labels.push(Label::new());
        // 5 * 61 + 1 = 306 > 255
        assert_eq!(None, DomainName::from_labels(labels));
    }

    #[test]
    fn display_line_a_record() {
        let rr = a_record("a.example.com.", Ipv4Addr::new(192, 0, 2, 1));
        let line = ResourceRecord { ttl: 3600, ..rr }.to_display_string();

        assert!(line.contains("a.example.com"));
        assert!(line.contains("3600"));
        assert!(line.contains("IN"));
        assert!(line.contains('A'));
        assert!(line.contains("192.0.2.1"));
    }

    #[test]
    fn display_line_unknown_type() {
        let rr = opaque_record("a.example.com.", 65280, &[1, 2, 3]);
        let line = rr.to_display_string();

        assert!(line.contains("TYPE65280"));
        assert!(line.contains("\\001\\002\\003"));
    }

    #[test]
    fn display_octets_special() {
        assert_eq!("\\012", display_octets(&[12], false));
        assert_eq!("\\234", display_octets(&[234], false));

        assert_eq!("\\\\", display_octets(b"\\", false));
        assert_eq!("\\\"", display_octets(b"\"", false));
    }

    #[test]
    fn display_octets_space() {
        assert_eq!("\\032", display_octets(b" ", false));
        assert_eq!("\" \"", display_octets(b" ", true));
    }

    #[test]
    fn domainname_conversions() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let labels_len = rng.random_range(0..5);

            let mut dotted_string_input = String::new();
            let mut labels_input = Vec::with_capacity(labels_len);
            let mut output = String::new();

            for i in 0..labels_len {
                let label_len = rng.random_range(1..10);

                if i > 0 {
                    dotted_string_input.push('.');
                    output.push('.');
                }

                let mut octets = Vec::with_capacity(label_len);
                for _ in 0..label_len {
                    let mut chr: u8 = rng.random_range(32..126);

                    if chr == b'.'
                        || chr == b'*'
                        || chr == b'@'
                        || chr == b'#'
                        || (chr as char).is_whitespace()
                    {
                        chr = b'X';
                    }

                    octets.push(chr);
                    dotted_string_input.push(chr as char);
                    output.push(chr as char);
                }
                labels_input.push(Label::try_from(&octets[..]).unwrap());
            }

            labels_input.push(Label::new());
            dotted_string_input.push('.');
            output.push('.');

            assert_eq!(
                Some(output.clone()),
                DomainName::from_dotted_string(&dotted_string_input).map(|d| d.to_dotted_string())
            );

            assert_eq!(
                Some(output),
                DomainName::from_labels(labels_input.clone()).map(|d| d.to_dotted_string())
            );

            assert_eq!(
                DomainName::from_dotted_string(&dotted_string_input).map(|d| d.to_dotted_string()),
                DomainName::from_labels(labels_input).map(|d| d.to_dotted_string())
            );
        }
    }
}

#[cfg(any(feature = "test-util", test))]
#[allow(clippy::missing_panics_doc)]
pub mod test_util {
    use super::*;

    use arbitrary::{Arbitrary, Unstructured};
    use rand::Rng;

    pub fn arbitrary_resourcerecord() -> ResourceRecord {
        let mut rng = rand::rng();
        for size in [128, 256, 512, 1024, 2048, 4096] {
            let mut buf = Vec::with_capacity(size);
            for _ in 0..size {
                buf.push(rng.random());
            }

            if let Ok(rr) = ResourceRecord::arbitrary(&mut Unstructured::new(&buf)) {
                return rr;
            }
        }

        panic!("could not generate arbitrary value!");
    }

    pub fn domain(name: &str) -> DomainName {
        DomainName::from_dotted_string(name).unwrap()
    }

    pub fn a_record(name: &str, address: Ipv4Addr) -> ResourceRecord {
        ResourceRecord {
            owner: domain(name),
            rdata: RecordData::A { address },
            rclass: RecordClass::IN,
            ttl: 300,
        }
    }

    pub fn aaaa_record(name: &str, address: Ipv6Addr) -> ResourceRecord {
        ResourceRecord {
            owner: domain(name),
            rdata: RecordData::AAAA { address },
            rclass: RecordClass::IN,
            ttl: 300,
        }
    }

    pub fn cname_record(name: &str, target_name: &str) -> ResourceRecord {
        ResourceRecord {
            owner: domain(name),
            rdata: RecordData::CNAME {
                cname: domain(target_name),
            },
            rclass: RecordClass::IN,
            ttl: 300,
        }
    }

    pub fn ns_record(superdomain_name: &str, nameserver_name: &str) -> ResourceRecord {
        ResourceRecord {
            owner: domain(superdomain_name),
            rdata: RecordData::NS {
                nsdname: domain(nameserver_name),
            },
            rclass: RecordClass::IN,
            ttl: 300,
        }
    }

    pub fn mx_record(name: &str, preference: u16, exchange_name: &str) -> ResourceRecord {
        ResourceRecord {
            owner: domain(name),
            rdata: RecordData::MX {
                preference,
                exchange: domain(exchange_name),
            },
            rclass: RecordClass::IN,
            ttl: 300,
        }
    }

    pub fn opaque_record(name: &str, rtype: u16, octets: &[u8]) -> ResourceRecord {
        ResourceRecord {
            owner: domain(name),
            rdata: RecordData::Opaque {
                rtype: RecordType::from(rtype),
                octets: Bytes::copy_from_slice(octets),
            },
            rclass: RecordClass::IN,
            ttl: 300,
        }
    }
}
