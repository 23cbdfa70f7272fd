//! Serialisation of DNS messages for the network.  The count fields
//! and rdata length prefixes are always computed from the live
//! sections, never copied from anywhere.

use bytes::{BufMut, BytesMut};
use std::collections::HashMap;

use crate::protocol::types::*;

impl Message {
    /// Serialise a message to octets.
    ///
    /// Fails if a section holds more than 65535 entries or a record's
    /// rdata is over 65535 octets.
    pub fn to_octets(&self) -> Result<BytesMut, Error> {
        let mut buffer = WritableBuffer::default();
        self.serialise(&mut buffer)?;
        Ok(buffer.octets)
    }

    pub fn serialise(&self, buffer: &mut WritableBuffer) -> Result<(), Error> {
        let qdcount = usize_to_u16(self.questions.len(), buffer.index())?;
        let ancount = usize_to_u16(self.answers.len(), buffer.index())?;
        let nscount = usize_to_u16(self.authority.len(), buffer.index())?;
        let arcount = usize_to_u16(self.additional.len(), buffer.index())?;

        self.header.serialise(buffer);
        buffer.write_u16(qdcount);
        buffer.write_u16(ancount);
        buffer.write_u16(nscount);
        buffer.write_u16(arcount);

        for question in &self.questions {
            question.serialise(buffer);
        }
        for record in &self.answers {
            record.serialise(buffer)?;
        }
        for record in &self.authority {
            record.serialise(buffer)?;
        }
        for record in &self.additional {
            record.serialise(buffer)?;
        }

        Ok(())
    }
}

impl Header {
    pub fn serialise(&self, buffer: &mut WritableBuffer) {
        // the Z bits are always zero
        let flags1 = (if self.is_response { HEADER_MASK_QR } else { 0 })
            | (self.opcode.value() << HEADER_OFFSET_OPCODE)
            | (if self.is_authoritative { HEADER_MASK_AA } else { 0 })
            | (if self.is_truncated { HEADER_MASK_TC } else { 0 })
            | (if self.recursion_desired { HEADER_MASK_RD } else { 0 });
        let flags2 = (if self.recursion_available { HEADER_MASK_RA } else { 0 })
            | (self.rcode.value() << HEADER_OFFSET_RCODE);

        buffer.write_u16(self.id);
        buffer.write_u8(flags1);
        buffer.write_u8(flags2);
    }
}

impl Question {
    pub fn serialise(&self, buffer: &mut WritableBuffer) {
        self.name.serialise(buffer, true);
        buffer.write_u16(self.qtype.value());
        buffer.write_u16(self.qclass.value());
    }
}

impl ResourceRecord {
    pub fn serialise(&self, buffer: &mut WritableBuffer) -> Result<(), Error> {
        let rdlength = usize_to_u16(self.rdata.len(), buffer.index())?;

        self.name.serialise(buffer, true);
        buffer.write_u16(self.rtype.value());
        buffer.write_u16(self.rclass.value());
        buffer.write_u32(self.ttl);
        buffer.write_u16(rdlength);
        buffer.write_octets(&self.rdata);

        Ok(())
    }
}

impl DomainName {
    /// Serialise a domain name, using a compression pointer if the
    /// same name has already been written to this buffer and
    /// `compress` is set.  Either way the name is memoised for later
    /// writes.
    pub fn serialise(&self, buffer: &mut WritableBuffer, compress: bool) {
        if compress {
            if let Some(pointer) = buffer.name_pointer(self) {
                buffer.write_u16(pointer);
                return;
            }
        }

        buffer.memoise_name(self);
        buffer.write_octets(&self.octets);
    }
}

fn usize_to_u16(value: usize, offset: usize) -> Result<u16, Error> {
    u16::try_from(value).map_err(|_| Error::invalid_input(offset))
}

/// A growable buffer which can be written to, keeping track of where
/// each domain name starts so later occurrences can be written as
/// compression pointers.
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
    /// Offset of the next octet to be written.
    pub fn index(&self) -> usize {
        self.octets.len()
    }

    /// Remember where a name starts.  Names past the 14-bit pointer
    /// range, and the root name (for which a pointer saves nothing),
    /// are not memoised.
    fn memoise_name(&mut self, name: &DomainName) {
        if name.is_root() {
            return;
        }
        if let Ok(index) = u16::try_from(self.index()) {
            if index <= 0b0011_1111_1111_1111 {
                self.name_pointers.entry(name.clone()).or_insert(index);
            }
        }
    }

    /// The pointer octets for a previously-memoised name.
    fn name_pointer(&self, name: &DomainName) -> Option<u16> {
        self.name_pointers
            .get(name)
            .map(|index| index | 0b1100_0000_0000_0000)
    }

    pub fn write_u8(&mut self, value: u8) {
        self.octets.put_u8(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.octets.put_u16(value);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.octets.put_u32(value);
    }

    pub fn write_octets(&mut self, octets: &[u8]) {
        self.octets.put_slice(octets);
    }
}
