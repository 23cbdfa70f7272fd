//! Deserialisation of DNS messages from the network.  Messages are
//! decoded as a whole: any failure in any section aborts the decode
//! and reports where it happened.

use crate::protocol::types::*;

impl Message {
    /// Deserialise a message from a slice of octets.
    pub fn from_octets(octets: &[u8]) -> Result<Self, Error> {
        Self::deserialise(&mut ConsumableBuffer::new(octets))
    }

    /// Deserialise a message from a buffer, advancing it past the
    /// octets the message occupies.  If a name in the message uses a
    /// compression pointer, the buffer stops two octets past the
    /// first pointer of that name.
    pub fn deserialise(buffer: &mut ConsumableBuffer) -> Result<Self, Error> {
        let wire_header = WireHeader::deserialise(buffer)?;

        let mut questions = Vec::with_capacity(wire_header.qdcount.into());
        let mut answers = Vec::with_capacity(wire_header.ancount.into());
        let mut authority = Vec::with_capacity(wire_header.nscount.into());
        let mut additional = Vec::with_capacity(wire_header.arcount.into());

        for index in 0..wire_header.qdcount {
            let question = Question::deserialise(buffer)
                .map_err(|err| err.within(Section::Question, index))?;
            questions.push(question);
        }
        for index in 0..wire_header.ancount {
            let record = ResourceRecord::deserialise(buffer)
                .map_err(|err| err.within(Section::Answer, index))?;
            answers.push(record);
        }
        for index in 0..wire_header.nscount {
            let record = ResourceRecord::deserialise(buffer)
                .map_err(|err| err.within(Section::Authority, index))?;
            authority.push(record);
        }
        for index in 0..wire_header.arcount {
            let record = ResourceRecord::deserialise(buffer)
                .map_err(|err| err.within(Section::Additional, index))?;
            additional.push(record);
        }

        Ok(Self {
            header: wire_header.header,
            questions,
            answers,
            authority,
            additional,
        })
    }
}

impl WireHeader {
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
    /// The Z bits are ignored.
    pub fn deserialise(buffer: &mut ConsumableBuffer) -> Result<Self, Error> {
        let id = buffer
            .next_u16()
            .ok_or_else(|| Error::truncated(buffer.position()))?;
        let flags1 = buffer
            .next_u8()
            .ok_or_else(|| Error::truncated(buffer.position()))?;
        let flags2 = buffer
            .next_u8()
            .ok_or_else(|| Error::truncated(buffer.position()))?;
        let qdcount = buffer
            .next_u16()
            .ok_or_else(|| Error::truncated(buffer.position()))?;
        let ancount = buffer
            .next_u16()
            .ok_or_else(|| Error::truncated(buffer.position()))?;
        let nscount = buffer
            .next_u16()
            .ok_or_else(|| Error::truncated(buffer.position()))?;
        let arcount = buffer
            .next_u16()
            .ok_or_else(|| Error::truncated(buffer.position()))?;

        Ok(Self {
            header: Header {
                id,
                is_response: flags1 & HEADER_MASK_QR != 0,
                opcode: Opcode::from((flags1 & HEADER_MASK_OPCODE) >> HEADER_OFFSET_OPCODE),
                is_authoritative: flags1 & HEADER_MASK_AA != 0,
                is_truncated: flags1 & HEADER_MASK_TC != 0,
                recursion_desired: flags1 & HEADER_MASK_RD != 0,
                recursion_available: flags2 & HEADER_MASK_RA != 0,
                rcode: Rcode::from(flags2 & HEADER_MASK_RCODE),
            },
            qdcount,
            ancount,
            nscount,
            arcount,
        })
    }
}

impl Question {
    pub fn deserialise(buffer: &mut ConsumableBuffer) -> Result<Self, Error> {
        let name = DomainName::deserialise(buffer)?;
        let qtype = RecordType::from(
            buffer
                .next_u16()
                .ok_or_else(|| Error::malformed_section(buffer.position()))?,
        );
        let qclass = RecordClass::from(
            buffer
                .next_u16()
                .ok_or_else(|| Error::malformed_section(buffer.position()))?,
        );

        Ok(Self { name, qtype, qclass })
    }
}

impl ResourceRecord {
    pub fn deserialise(buffer: &mut ConsumableBuffer) -> Result<Self, Error> {
        let name = DomainName::deserialise(buffer)?;
        let rtype = RecordType::from(
            buffer
                .next_u16()
                .ok_or_else(|| Error::malformed_section(buffer.position()))?,
        );
        let rclass = RecordClass::from(
            buffer
                .next_u16()
                .ok_or_else(|| Error::malformed_section(buffer.position()))?,
        );
        let ttl = buffer
            .next_u32()
            .ok_or_else(|| Error::malformed_section(buffer.position()))?;
        let rdlength = buffer
            .next_u16()
            .ok_or_else(|| Error::malformed_section(buffer.position()))?;
        let rdata = buffer
            .take(rdlength.into())
            .ok_or_else(|| Error::truncated(buffer.position()))?;

        Ok(Self {
            name,
            rtype,
            rclass,
            ttl,
            rdata: rdata.to_vec(),
        })
    }
}

impl DomainName {
    pub fn deserialise(buffer: &mut ConsumableBuffer) -> Result<Self, Error> {
        let mut name = DomainName {
            octets: Vec::with_capacity(DOMAINNAME_MAX_LEN),
            labels: Vec::with_capacity(5),
        };

        // Chasing a pointer swaps reads over to a second buffer
        // positioned at the target; the original buffer has already
        // consumed the two pointer octets and is never advanced
        // again.
        let mut jumped: Option<ConsumableBuffer> = None;
        let mut hops = 0;

        loop {
            let cursor = match jumped.as_mut() {
                Some(inner) => inner,
                None => &mut *buffer,
            };

            let here = cursor.position();
            let size = cursor
                .next_u8()
                .ok_or_else(|| Error::malformed_name(here))?;

            if size <= 63 {
                name.octets.push(size);

                if size == 0 {
                    break;
                }

                if name.octets.len() + usize::from(size) + 1 > DOMAINNAME_MAX_LEN {
                    return Err(Error::malformed_name(here));
                }

                let label = cursor
                    .take(size.into())
                    .ok_or_else(|| Error::malformed_name(here))?;
                name.octets.extend_from_slice(label);
                name.labels.push(label.to_vec());
            } else if size & 0b1100_0000 == 0b1100_0000 {
                let lo = cursor
                    .next_u8()
                    .ok_or_else(|| Error::malformed_name(here))?;
                let target = usize::from(u16::from_be_bytes([size & 0b0011_1111, lo]));

                // Pointers may only point strictly backwards, which
                // rules out loops; the hop cap bounds the work even
                // so.
                if target >= here {
                    return Err(Error::malformed_name(here));
                }
                hops += 1;
                if hops > POINTER_HOP_LIMIT {
                    return Err(Error::malformed_name(here));
                }

                let next = cursor.at_offset(target);
                jumped = Some(next);
            } else {
                // The 01 and 10 patterns are reserved.
                return Err(Error::malformed_name(here));
            }
        }

        Ok(name)
    }
}

/// A buffer which can be consumed from the front, with bounds-checked
/// reads.  The position is tracked against the start of the original
/// slice so that errors and compression pointers can refer to
/// absolute message offsets.
pub struct ConsumableBuffer<'a> {
    octets: &'a [u8],
    position: usize,
}

impl<'a> ConsumableBuffer<'a> {
    pub fn new(octets: &'a [u8]) -> Self {
        Self { octets, position: 0 }
    }

    /// Offset of the next unread octet, from the start of the
    /// original slice.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.octets.len() - self.position
    }

    pub fn next_u8(&mut self) -> Option<u8> {
        if self.position < self.octets.len() {
            let octet = self.octets[self.position];
            self.position += 1;
            Some(octet)
        } else {
            None
        }
    }

    pub fn next_u16(&mut self) -> Option<u16> {
        if self.position + 1 < self.octets.len() {
            let hi = self.octets[self.position];
            let lo = self.octets[self.position + 1];
            self.position += 2;
            Some(u16::from_be_bytes([hi, lo]))
        } else {
            None
        }
    }

    pub fn next_u32(&mut self) -> Option<u32> {
        if self.position + 3 < self.octets.len() {
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
        if self.position + size <= self.octets.len() {
            let slice = &self.octets[self.position..self.position + size];
            self.position += size;
            Some(slice)
        } else {
            None
        }
    }

    /// A new buffer over the same octets, positioned at the given
    /// offset.
    pub fn at_offset(&self, position: usize) -> ConsumableBuffer<'a> {
        Self {
            octets: self.octets,
            position,
        }
    }
}
