use fake::{Fake, Faker};

use dnsmsg::protocol::deserialise::ConsumableBuffer;
use dnsmsg::protocol::serialise::WritableBuffer;
use dnsmsg::protocol::types::*;

#[test]
fn roundtrip_message() {
    for _ in 0..100 {
        let original = arbitrary_message();
        let octets = original.to_octets().unwrap();
        let deserialised = Message::from_octets(&octets);

        assert_eq!(Ok(original), deserialised);
    }
}

#[test]
fn roundtrip_question() {
    for _ in 0..100 {
        let original = arbitrary_question();

        let mut buffer = WritableBuffer::default();
        original.serialise(&mut buffer);
        let deserialised = Question::deserialise(&mut ConsumableBuffer::new(&buffer.octets));

        assert_eq!(Ok(original), deserialised);
    }
}

#[test]
fn roundtrip_resourcerecord() {
    for _ in 0..100 {
        let original = arbitrary_resourcerecord();

        let mut buffer = WritableBuffer::default();
        original.serialise(&mut buffer).unwrap();
        let deserialised = ResourceRecord::deserialise(&mut ConsumableBuffer::new(&buffer.octets));

        assert_eq!(Ok(original), deserialised);
    }
}

#[test]
fn roundtrip_domainname() {
    for _ in 0..100 {
        let original = arbitrary_domainname();

        let mut buffer = WritableBuffer::default();
        original.serialise(&mut buffer, false);
        let deserialised = DomainName::deserialise(&mut ConsumableBuffer::new(&buffer.octets));

        assert_eq!(Ok(original), deserialised);
    }
}

#[test]
fn roundtrip_domainname_dotted_string() {
    for _ in 0..100 {
        let original = arbitrary_domainname();

        let parsed = DomainName::from_dotted_string(&original.to_dotted_string());

        assert_eq!(Some(original), parsed);
    }
}

fn arbitrary_message() -> Message {
    // keep runtime sane
    let qdcount = (0..10).fake();
    let ancount = (0..10).fake();
    let nscount = (0..10).fake();
    let arcount = (0..10).fake();

    let mut questions = Vec::with_capacity(qdcount);
    let mut answers = Vec::with_capacity(ancount);
    let mut authority = Vec::with_capacity(nscount);
    let mut additional = Vec::with_capacity(arcount);

    for _ in 0..qdcount {
        questions.push(arbitrary_question());
    }
    for _ in 0..ancount {
        answers.push(arbitrary_resourcerecord());
    }
    for _ in 0..nscount {
        authority.push(arbitrary_resourcerecord());
    }
    for _ in 0..arcount {
        additional.push(arbitrary_resourcerecord());
    }

    Message {
        header: arbitrary_header(),
        questions,
        answers,
        authority,
        additional,
    }
}

fn arbitrary_header() -> Header {
    Header {
        id: Faker.fake(),
        is_response: Faker.fake(),
        opcode: arbitrary_opcode(),
        is_authoritative: Faker.fake(),
        is_truncated: Faker.fake(),
        recursion_desired: Faker.fake(),
        recursion_available: Faker.fake(),
        rcode: arbitrary_rcode(),
    }
}

fn arbitrary_question() -> Question {
    Question {
        name: arbitrary_domainname(),
        qtype: Faker.fake::<u16>().into(),
        qclass: Faker.fake::<u16>().into(),
    }
}

fn arbitrary_resourcerecord() -> ResourceRecord {
    ResourceRecord {
        name: arbitrary_domainname(),
        rtype: Faker.fake::<u16>().into(),
        rclass: Faker.fake::<u16>().into(),
        ttl: Faker.fake(),
        rdata: arbitrary_octets((0..64).fake()),
    }
}

fn arbitrary_domainname() -> DomainName {
    let num_labels = (1..5).fake::<usize>();
    let mut labels = Vec::with_capacity(num_labels);

    for _ in 0..num_labels {
        let label_len = (1..40).fake::<usize>();
        let mut label = Vec::with_capacity(label_len);

        for _ in 0..label_len {
            label.push(Faker.fake::<u8>());
        }

        labels.push(label);
    }

    DomainName::from_labels(labels).unwrap()
}

fn arbitrary_opcode() -> Opcode {
    // opcode is a 4-bit field
    (Faker.fake::<u8>() & 0b0000_1111).into()
}

fn arbitrary_rcode() -> Rcode {
    // rcode is a 4-bit field
    (Faker.fake::<u8>() & 0b0000_1111).into()
}

fn arbitrary_octets(len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        out.push(Faker.fake());
    }
    out
}
