//! Wire types for DNS messages, used for both queries and responses.
//!
//! ```text
//!     +---------------------+
//!     |        Header       |
//!     +---------------------+
//!     |       Question      | the question for the name server
//!     +---------------------+
//!     |        Answer       | RRs answering the question
//!     +---------------------+
//!     |      Authority      | RRs pointing toward an authority
//!     +---------------------+
//!     |      Additional     | RRs holding additional information
//!     +---------------------+
//! ```
//!
//! See section 4.1 of RFC 1035.

use std::fmt;

/// Octets in the longest valid domain name, including both length and
/// label octets and the root terminator.
pub const DOMAINNAME_MAX_LEN: usize = 255;

/// Octets in the longest valid label.
pub const LABEL_MAX_LEN: usize = 63;

/// How many compression pointers one name may chase.  Pointers must
/// point strictly backwards, but a crafted chain can still be long
/// relative to the buffer, so this is an independent bound.
pub const POINTER_HOP_LIMIT: usize = 128;

/// Query / response flag.
pub const HEADER_MASK_QR: u8 = 0b1000_0000;

/// Operation code.
pub const HEADER_MASK_OPCODE: u8 = 0b0111_1000;

/// Operation code offset.
pub const HEADER_OFFSET_OPCODE: usize = 3;

/// Authoritative answer flag.
pub const HEADER_MASK_AA: u8 = 0b0000_0100;

/// Truncation flag.
pub const HEADER_MASK_TC: u8 = 0b0000_0010;

/// Recursion desired flag.
pub const HEADER_MASK_RD: u8 = 0b0000_0001;

/// Recursion available flag.
pub const HEADER_MASK_RA: u8 = 0b1000_0000;

/// Response code.
pub const HEADER_MASK_RCODE: u8 = 0b0000_1111;

/// Response code offset.
pub const HEADER_OFFSET_RCODE: usize = 0;

/// A DNS message: a header and four ordered sections.
///
/// The wire-format count fields do not appear here: they are derived
/// from the section lengths when serialising, and are only trusted
/// long enough to drive deserialisation (see `WireHeader`).  This
/// makes it impossible for the counts and the sections to fall out of
/// sync when a message is mutated.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(any(feature = "test-util", test), derive(arbitrary::Arbitrary))]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authority: Vec<ResourceRecord>,
    pub additional: Vec<ResourceRecord>,
}

impl Message {
    /// An empty response to this message: same ID and opcode, the
    /// question section copied over, everything else blank.
    pub fn make_response(&self) -> Self {
        Self {
            header: Header {
                id: self.header.id,
                is_response: true,
                opcode: self.header.opcode,
                is_authoritative: false,
                is_truncated: false,
                recursion_desired: self.header.recursion_desired,
                recursion_available: false,
                rcode: Rcode::NO_ERROR,
            },
            questions: self.questions.clone(),
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }

    /// A response to a message which could not even be parsed: all we
    /// have is the ID recovered from the first two octets.
    pub fn make_format_error_response(id: u16) -> Self {
        Self {
            header: Header {
                id,
                is_response: true,
                opcode: Opcode::QUERY,
                is_authoritative: false,
                is_truncated: false,
                recursion_desired: false,
                recursion_available: false,
                rcode: Rcode::FORMAT_ERROR,
            },
            questions: Vec::new(),
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }

    /// A fresh query asking a single question.
    pub fn from_question(id: u16, question: Question) -> Self {
        Self {
            header: Header {
                id,
                is_response: false,
                opcode: Opcode::QUERY,
                is_authoritative: false,
                is_truncated: false,
                recursion_desired: false,
                recursion_available: false,
                rcode: Rcode::NO_ERROR,
            },
            questions: vec![question],
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }
}

/// Common header type for all messages.
///
/// ```text
///                                     1  1  1  1  1  1
///       0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                      ID                       |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |QR|   Opcode  |AA|TC|RD|RA|   Z    |   RCODE   |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    QDCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    ANCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    NSCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    ARCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
///
/// The Z bits are ignored when deserialising and zero when
/// serialising.  See section 4.1.1 of RFC 1035.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(any(feature = "test-util", test), derive(arbitrary::Arbitrary))]
pub struct Header {
    /// A 16 bit identifier assigned by the program that generates any
    /// kind of query, copied into the corresponding reply so the
    /// requester can match up replies to outstanding queries.
    pub id: u16,

    /// Whether this message is a query (false) or a response (true).
    pub is_response: bool,

    /// Kind of query, set by the originator and copied into the
    /// response.
    pub opcode: Opcode,

    /// Authoritative Answer - valid in responses, specifies that the
    /// responding name server is an authority for the domain name in
    /// the question section.
    pub is_authoritative: bool,

    /// TrunCation - this message was truncated due to length greater
    /// than that permitted on the transmission channel.
    pub is_truncated: bool,

    /// Recursion Desired - may be set in a query and is copied into
    /// the response.
    pub recursion_desired: bool,

    /// Recursion Available - set or cleared in a response, denotes
    /// whether recursive query support is available.
    pub recursion_available: bool,

    /// Response code, set as part of responses.
    pub rcode: Rcode,
}

/// A `Header` as it appears on the network.  This type exists for
/// deserialisation only: the counts drive how many entries each
/// section parser reads, and are then discarded in favour of the
/// section lengths themselves.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct WireHeader {
    /// The header that is taken into the `Message`.
    pub header: Header,

    /// an unsigned 16 bit integer specifying the number of entries in
    /// the question section.
    pub qdcount: u16,

    /// an unsigned 16 bit integer specifying the number of resource
    /// records in the answer section.
    pub ancount: u16,

    /// an unsigned 16 bit integer specifying the number of name
    /// server resource records in the authority records section.
    pub nscount: u16,

    /// an unsigned 16 bit integer specifying the number of resource
    /// records in the additional records section.
    pub arcount: u16,
}

/// A single entry in the question section.
///
/// ```text
///                                     1  1  1  1  1  1
///       0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                                               |
///     /                     QNAME                     /
///     /                                               /
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                     QTYPE                     |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                     QCLASS                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
///
/// See section 4.1.2 of RFC 1035.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(any(feature = "test-util", test), derive(arbitrary::Arbitrary))]
pub struct Question {
    pub name: DomainName,
    pub qtype: RecordType,
    pub qclass: RecordClass,
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.qclass, self.qtype)
    }
}

/// The answer, authority, and additional sections are all the same
/// format: a variable number of resource records.
///
/// ```text
///                                     1  1  1  1  1  1
///       0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                                               |
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
/// The RDATA is kept as an opaque octet string: this codec does not
/// interpret record data, so the length prefix on the wire always
/// comes from the actual octet count and never from a stored counter.
/// See section 4.1.3 of RFC 1035.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ResourceRecord {
    /// a domain name to which this resource record pertains.
    pub name: DomainName,

    /// two octets containing one of the RR type codes.
    pub rtype: RecordType,

    /// two octets which specify the class of the data in the RDATA
    /// field.
    pub rclass: RecordClass,

    /// a 32 bit unsigned integer that specifies the time interval (in
    /// seconds) that the resource record may be cached before it
    /// should be discarded.  Zero means the RR can only be used for
    /// the transaction in progress.
    pub ttl: u32,

    /// the record data, uninterpreted.  Must be 65535 octets or
    /// fewer.
    pub rdata: Vec<u8>,
}

#[cfg(any(feature = "test-util", test))]
impl<'a> arbitrary::Arbitrary<'a> for ResourceRecord {
    // a derived impl would generate unbounded rdata, which makes
    // round-trip runs needlessly slow
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let len = u.int_in_range(0..=128)?;
        Ok(Self {
            name: u.arbitrary()?,
            rtype: u.arbitrary()?,
            rclass: u.arbitrary()?,
            ttl: u.arbitrary()?,
            rdata: Vec::from(u.bytes(len)?),
        })
    }
}

/// A 4-bit operation code.  Known values have named constants, but
/// any value round-trips through the wire format unchanged: a closed
/// enumeration here would silently corrupt codes assigned after this
/// crate was written.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Opcode(u8);

impl Opcode {
    /// A standard query.
    pub const QUERY: Self = Self(0);
    /// An inverse query.
    pub const IQUERY: Self = Self(1);
    /// A server status request.
    pub const STATUS: Self = Self(2);

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<u8> for Opcode {
    fn from(octet: u8) -> Self {
        Self(octet & 0b0000_1111)
    }
}

impl From<Opcode> for u8 {
    fn from(value: Opcode) -> Self {
        value.0
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Opcode::QUERY => write!(f, "QUERY"),
            Opcode::IQUERY => write!(f, "IQUERY"),
            Opcode::STATUS => write!(f, "STATUS"),
            Opcode(value) => write!(f, "{value}"),
        }
    }
}

#[cfg(any(feature = "test-util", test))]
impl<'a> arbitrary::Arbitrary<'a> for Opcode {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self::from(u.arbitrary::<u8>()?))
    }
}

/// A 4-bit response code.  Like `Opcode`, unassigned values are
/// preserved rather than coerced to a default.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rcode(u8);

impl Rcode {
    /// No error condition.
    pub const NO_ERROR: Self = Self(0);
    /// The name server was unable to interpret the query.
    pub const FORMAT_ERROR: Self = Self(1);
    /// The name server was unable to process this query due to a
    /// problem with the name server.
    pub const SERVER_FAILURE: Self = Self(2);
    /// Meaningful only for responses from an authoritative name
    /// server: the domain name referenced in the query does not
    /// exist.
    pub const NAME_ERROR: Self = Self(3);
    /// The name server does not support the requested kind of query.
    pub const NOT_IMPLEMENTED: Self = Self(4);
    /// The name server refuses to perform the specified operation for
    /// policy reasons.
    pub const REFUSED: Self = Self(5);

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<u8> for Rcode {
    fn from(octet: u8) -> Self {
        Self(octet & HEADER_MASK_RCODE)
    }
}

impl From<Rcode> for u8 {
    fn from(value: Rcode) -> Self {
        value.0
    }
}

impl fmt::Display for Rcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Rcode::NO_ERROR => write!(f, "NOERROR"),
            Rcode::FORMAT_ERROR => write!(f, "FORMERR"),
            Rcode::SERVER_FAILURE => write!(f, "SERVFAIL"),
            Rcode::NAME_ERROR => write!(f, "NXDOMAIN"),
            Rcode::NOT_IMPLEMENTED => write!(f, "NOTIMP"),
            Rcode::REFUSED => write!(f, "REFUSED"),
            Rcode(value) => write!(f, "{value}"),
        }
    }
}

#[cfg(any(feature = "test-util", test))]
impl<'a> arbitrary::Arbitrary<'a> for Rcode {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self::from(u.arbitrary::<u8>()?))
    }
}

/// A domain name is a sequence of labels, where each label on the
/// wire is a length octet followed by that number of octets.  Since
/// there is no particular character encoding needed, labels are kept
/// as raw octets, in the case they arrived in.
///
/// A label must be 1 to 63 octets.  A name must be 255 octets or
/// shorter in total, including length and terminator octets.  The
/// root name is the empty label sequence.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DomainName {
    /// The labels, not including the root terminator.
    pub labels: Vec<Vec<u8>>,
    /// The uncompressed wire encoding of the name.
    ///
    /// INVARIANT: this is exactly the length-prefixed labels followed
    /// by a zero octet.
    pub octets: Vec<u8>,
}

impl DomainName {
    pub fn root_domain() -> Self {
        DomainName {
            labels: Vec::new(),
            octets: vec![0],
        }
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Names compare equal on the wire regardless of ASCII case.
    pub fn eq_ignore_ascii_case(&self, other: &DomainName) -> bool {
        self.octets.eq_ignore_ascii_case(&other.octets)
    }

    /// Presentation format: labels joined by dots, with a trailing
    /// dot for the root.  Literal dots and backslashes inside a label
    /// are backslash-escaped, and non-printable octets are rendered
    /// as `\DDD` (three decimal digits).
    pub fn to_dotted_string(&self) -> String {
        if self.is_root() {
            return ".".to_string();
        }

        let mut out = String::with_capacity(self.octets.len() + 1);
        for label in &self.labels {
            for &octet in label {
                match octet {
                    b'.' => out.push_str("\\."),
                    b'\\' => out.push_str("\\\\"),
                    0x21..=0x7e => out.push(octet as char),
                    _ => {
                        out.push('\\');
                        out.push_str(&format!("{octet:03}"));
                    }
                }
            }
            out.push('.');
        }

        out
    }

    /// Parse a presentation-format name.  The trailing dot is
    /// optional.  Accepts both `\DDD` and `\X` escapes.
    pub fn from_dotted_string(s: &str) -> Option<Self> {
        if s == "." {
            return Some(Self::root_domain());
        }

        let octets = s.as_bytes();
        let mut labels = Vec::with_capacity(5);
        let mut label = Vec::new();
        let mut i = 0;

        while i < octets.len() {
            match octets[i] {
                b'.' => {
                    if label.is_empty() {
                        return None;
                    }
                    labels.push(std::mem::take(&mut label));
                    i += 1;
                }
                b'\\' => {
                    if i + 1 >= octets.len() {
                        return None;
                    }
                    if octets[i + 1].is_ascii_digit() {
                        if i + 3 >= octets.len()
                            || !octets[i + 2].is_ascii_digit()
                            || !octets[i + 3].is_ascii_digit()
                        {
                            return None;
                        }
                        let value = u32::from(octets[i + 1] - b'0') * 100
                            + u32::from(octets[i + 2] - b'0') * 10
                            + u32::from(octets[i + 3] - b'0');
                        label.push(u8::try_from(value).ok()?);
                        i += 4;
                    } else {
                        label.push(octets[i + 1]);
                        i += 2;
                    }
                }
                octet => {
                    label.push(octet);
                    i += 1;
                }
            }
        }

        if !label.is_empty() {
            labels.push(label);
        }

        Self::from_labels(labels).ok()
    }

    /// Build a name from labels, checking the encode-time invariants:
    /// every label must be 1 to 63 octets and the whole name must fit
    /// in 255 octets.
    pub fn from_labels(labels: Vec<Vec<u8>>) -> Result<Self, Error> {
        let mut octets = Vec::with_capacity(DOMAINNAME_MAX_LEN);

        for label in &labels {
            if label.is_empty() || label.len() > LABEL_MAX_LEN {
                return Err(Error::invalid_input(octets.len()));
            }
            octets.push(label.len() as u8);
            octets.extend_from_slice(label);
        }
        octets.push(0);

        if octets.len() > DOMAINNAME_MAX_LEN {
            return Err(Error::invalid_input(octets.len()));
        }

        Ok(Self { labels, octets })
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

#[cfg(any(feature = "test-util", test))]
impl<'a> arbitrary::Arbitrary<'a> for DomainName {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let num_labels = u.int_in_range::<usize>(0..=10)?;
        let mut labels = Vec::with_capacity(num_labels);
        for _ in 0..num_labels {
            let label_len = u.int_in_range::<u8>(1..=20)?;
            labels.push(Vec::from(u.bytes(label_len.into())?));
        }
        Ok(DomainName::from_labels(labels).unwrap())
    }
}

/// A 16-bit record type code, also used as the question type.  Known
/// values have named constants; unknown values round-trip as numbers,
/// since record data is opaque to this codec anyway.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RecordType(u16);

impl RecordType {
    pub const A: Self = Self(1);
    pub const NS: Self = Self(2);
    pub const CNAME: Self = Self(5);
    pub const SOA: Self = Self(6);
    pub const PTR: Self = Self(12);
    pub const MX: Self = Self(15);
    pub const TXT: Self = Self(16);
    pub const AAAA: Self = Self(28);
    pub const SRV: Self = Self(33);
    /// Question-only: a request for a zone transfer.
    pub const AXFR: Self = Self(252);
    /// Question-only: a request for all records.
    pub const ANY: Self = Self(255);

    pub fn value(self) -> u16 {
        self.0
    }
}

impl From<u16> for RecordType {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<RecordType> for u16 {
    fn from(value: RecordType) -> Self {
        value.0
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RecordType::A => write!(f, "A"),
            RecordType::NS => write!(f, "NS"),
            RecordType::CNAME => write!(f, "CNAME"),
            RecordType::SOA => write!(f, "SOA"),
            RecordType::PTR => write!(f, "PTR"),
            RecordType::MX => write!(f, "MX"),
            RecordType::TXT => write!(f, "TXT"),
            RecordType::AAAA => write!(f, "AAAA"),
            RecordType::SRV => write!(f, "SRV"),
            RecordType::AXFR => write!(f, "AXFR"),
            RecordType::ANY => write!(f, "ANY"),
            RecordType(value) => write!(f, "TYPE{value}"),
        }
    }
}

#[cfg(any(feature = "test-util", test))]
impl<'a> arbitrary::Arbitrary<'a> for RecordType {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self::from(u.arbitrary::<u16>()?))
    }
}

/// A 16-bit record class code, also used as the question class.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RecordClass(u16);

impl RecordClass {
    pub const IN: Self = Self(1);
    pub const CH: Self = Self(3);
    pub const HS: Self = Self(4);
    /// Question-only: a request for any class.
    pub const ANY: Self = Self(255);

    pub fn value(self) -> u16 {
        self.0
    }
}

impl From<u16> for RecordClass {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<RecordClass> for u16 {
    fn from(value: RecordClass) -> Self {
        value.0
    }
}

impl fmt::Display for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RecordClass::IN => write!(f, "IN"),
            RecordClass::CH => write!(f, "CH"),
            RecordClass::HS => write!(f, "HS"),
            RecordClass::ANY => write!(f, "ANY"),
            RecordClass(value) => write!(f, "CLASS{value}"),
        }
    }
}

#[cfg(any(feature = "test-util", test))]
impl<'a> arbitrary::Arbitrary<'a> for RecordClass {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self::from(u.arbitrary::<u16>()?))
    }
}

/// The four sections of a message which hold entries, used to locate
/// decode failures.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Section {
    Question,
    Answer,
    Authority,
    Additional,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Section::Question => write!(f, "question"),
            Section::Answer => write!(f, "answer"),
            Section::Authority => write!(f, "authority"),
            Section::Additional => write!(f, "additional"),
        }
    }
}

/// Why a message failed to decode or encode.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// The fixed-size header cannot be read, or a declared-length
    /// payload runs past the end of the buffer.
    Truncated,

    /// A domain name is invalid: a reserved label pattern, a pointer
    /// which does not point strictly backwards, a name over 255
    /// octets, a pointer chase over the hop limit, or a label running
    /// past the buffer.
    MalformedName,

    /// Fewer octets remain after a name than a question or resource
    /// record's fixed fields require.
    MalformedSection,

    /// An in-memory value violates an encode-time invariant: a label
    /// or name too long, or record data or a section too large for
    /// its 16-bit length field.
    InvalidInput,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Truncated => write!(f, "message truncated"),
            ErrorKind::MalformedName => write!(f, "malformed domain name"),
            ErrorKind::MalformedSection => write!(f, "malformed section"),
            ErrorKind::InvalidInput => write!(f, "invalid input"),
        }
    }
}

/// A codec failure.  Decoding either yields a complete `Message` or
/// one of these: there is no partial-parse mode.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Error {
    pub kind: ErrorKind,

    /// Offset into the buffer where the failure was noticed.
    pub offset: usize,

    /// The section and entry index being decoded, for errors raised
    /// past the header.
    pub context: Option<(Section, u16)>,
}

impl Error {
    pub(crate) fn truncated(offset: usize) -> Self {
        Self {
            kind: ErrorKind::Truncated,
            offset,
            context: None,
        }
    }

    pub(crate) fn malformed_name(offset: usize) -> Self {
        Self {
            kind: ErrorKind::MalformedName,
            offset,
            context: None,
        }
    }

    pub(crate) fn malformed_section(offset: usize) -> Self {
        Self {
            kind: ErrorKind::MalformedSection,
            offset,
            context: None,
        }
    }

    pub(crate) fn invalid_input(offset: usize) -> Self {
        Self {
            kind: ErrorKind::InvalidInput,
            offset,
            context: None,
        }
    }

    pub(crate) fn within(mut self, section: Section, index: u16) -> Self {
        if self.context.is_none() {
            self.context = Some((section, index));
        }
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.context {
            Some((section, index)) => write!(
                f,
                "{} at offset {} ({} entry {})",
                self.kind, self.offset, section, index
            ),
            None => write!(f, "{} at offset {}", self.kind, self.offset),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}


#[cfg(any(feature = "test-util", test))]
pub mod test_util {
    use super::*;

    pub fn domain(name: &str) -> DomainName {
        DomainName::from_dotted_string(name).unwrap()
    }

    pub fn a_record(name: &str, octets: Vec<u8>) -> ResourceRecord {
        ResourceRecord {
            name: domain(name),
            rtype: RecordType::A,
            rclass: RecordClass::IN,
            ttl: 300,
            rdata: octets,
        }
    }
}
