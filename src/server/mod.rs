//! A UDP responder which answers queries from statically configured
//! records.  Each datagram is handled in its own task, so a slow or
//! malformed one never stalls the receive loop.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::protocol::types::*;
use crate::settings::Settings;

/// The historical maximum size of a DNS message over UDP.
pub const MAX_UDP_PAYLOAD: usize = 512;

pub struct Server {
    socket: Arc<UdpSocket>,
    settings: Arc<Settings>,
    local_addr: SocketAddr,
}

impl Server {
    pub async fn bind(addr: SocketAddr, settings: Settings) -> std::io::Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        let local_addr = socket.local_addr()?;
        info!(addr = %local_addr, "UDP server listening");

        Ok(Self {
            socket: Arc::new(socket),
            settings: Arc::new(settings),
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Receive and answer datagrams until the shutdown channel fires.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut buf = vec![0u8; MAX_UDP_PAYLOAD];

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    info!(addr = %self.local_addr, "UDP server stopping");
                    break;
                }
                received = self.socket.recv_from(&mut buf) => match received {
                    Ok((size, peer)) => {
                        let socket = Arc::clone(&self.socket);
                        let settings = Arc::clone(&self.settings);
                        let datagram = buf[..size].to_vec();
                        tokio::spawn(async move {
                            handle_datagram(socket, settings, datagram, peer).await;
                        });
                    }
                    Err(error) => {
                        error!(?error, "could not receive datagram");
                    }
                },
            }
        }
    }
}

async fn handle_datagram(
    socket: Arc<UdpSocket>,
    settings: Arc<Settings>,
    datagram: Vec<u8>,
    peer: SocketAddr,
) {
    let response = match Message::from_octets(&datagram) {
        Ok(query) => {
            debug!(%peer, id = query.header.id, "received query");
            respond(&settings, &query)
        }
        Err(error) => {
            debug!(%peer, %error, "could not parse datagram");
            // all that can be salvaged is the ID, when there is one
            if datagram.len() < 2 {
                return;
            }
            Message::make_format_error_response(u16::from_be_bytes([datagram[0], datagram[1]]))
        }
    };

    match response.to_octets() {
        Ok(octets) => {
            if let Err(error) = socket.send_to(&octets, peer).await {
                warn!(%peer, ?error, "could not send response");
            }
        }
        Err(error) => {
            warn!(%peer, %error, "could not serialise response");
        }
    }
}

/// Build a response to a parsed query, answering each question from
/// the static records.  If nothing matches any question, the response
/// is a name error.
fn respond(settings: &Settings, query: &Message) -> Message {
    let mut response = query.make_response();
    response.header.is_authoritative = true;

    for question in &query.questions {
        response.answers.extend(static_answers(settings, question));
    }

    if response.answers.is_empty() {
        response.header.rcode = Rcode::NAME_ERROR;
    }

    response
}

fn static_answers(settings: &Settings, question: &Question) -> Vec<ResourceRecord> {
    if question.qclass != RecordClass::IN && question.qclass != RecordClass::ANY {
        return Vec::new();
    }
    if question.qtype != RecordType::A && question.qtype != RecordType::ANY {
        return Vec::new();
    }

    settings
        .static_records
        .iter()
        .filter(|record| record.domain.domain.eq_ignore_ascii_case(&question.name))
        .map(|record| ResourceRecord {
            name: question.name.clone(),
            rtype: RecordType::A,
            rclass: RecordClass::IN,
            ttl: record.ttl,
            rdata: record.address.octets().to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::types::test_util::*;
    use crate::settings::{Name, StaticRecord};

    use std::net::Ipv4Addr;
    use std::time::Duration;

    fn test_settings() -> Settings {
        Settings {
            static_records: vec![StaticRecord {
                domain: Name {
                    domain: domain("www.example.com."),
                },
                address: Ipv4Addr::new(192, 168, 1, 10),
                ttl: 300,
            }],
        }
    }

    fn query(name: &str, qtype: RecordType) -> Message {
        Message::from_question(
            0x0102,
            Question {
                name: domain(name),
                qtype,
                qclass: RecordClass::IN,
            },
        )
    }

    #[test]
    fn respond_answers_known_name() {
        let settings = test_settings();

        let response = respond(&settings, &query("www.example.com.", RecordType::A));

        assert!(response.header.is_response);
        assert_eq!(Rcode::NO_ERROR, response.header.rcode);
        assert_eq!(1, response.answers.len());
        assert_eq!(vec![192, 168, 1, 10], response.answers[0].rdata);
    }

    #[test]
    fn respond_is_case_insensitive() {
        let settings = test_settings();

        let response = respond(&settings, &query("WWW.EXAMPLE.COM.", RecordType::A));

        assert_eq!(1, response.answers.len());
        assert_eq!(domain("WWW.EXAMPLE.COM."), response.answers[0].name);
    }

    #[test]
    fn respond_name_error_for_unknown_name() {
        let settings = test_settings();

        let response = respond(&settings, &query("other.example.com.", RecordType::A));

        assert!(response.answers.is_empty());
        assert_eq!(Rcode::NAME_ERROR, response.header.rcode);
    }

    #[test]
    fn respond_ignores_other_record_types() {
        let settings = test_settings();

        let response = respond(&settings, &query("www.example.com.", RecordType::MX));

        assert!(response.answers.is_empty());
    }

    #[tokio::test]
    async fn server_binds_to_ephemeral_port() {
        let server = Server::bind("127.0.0.1:0".parse().unwrap(), Settings::default())
            .await
            .unwrap();

        assert_ne!(0, server.local_addr().port());
    }

    #[tokio::test]
    async fn server_answers_over_udp() {
        let server = Server::bind("127.0.0.1:0".parse().unwrap(), test_settings())
            .await
            .unwrap();
        let server_addr = server.local_addr();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move { server.run(shutdown_rx).await });

        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let octets = query("www.example.com.", RecordType::A).to_octets().unwrap();
        client.send_to(&octets, server_addr).await.unwrap();

        let mut buf = vec![0u8; MAX_UDP_PAYLOAD];
        let (size, _) = tokio::time::timeout(Duration::from_secs(5), client.recv_from(&mut buf))
            .await
            .unwrap()
            .unwrap();
        let response = Message::from_octets(&buf[..size]).unwrap();

        assert_eq!(0x0102, response.header.id);
        assert_eq!(1, response.answers.len());
        assert_eq!(vec![192, 168, 1, 10], response.answers[0].rdata);

        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn server_replies_format_error_to_garbage() {
        let server = Server::bind("127.0.0.1:0".parse().unwrap(), test_settings())
            .await
            .unwrap();
        let server_addr = server.local_addr();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move { server.run(shutdown_rx).await });

        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        client.send_to(&[0xab, 0xcd, 0xff], server_addr).await.unwrap();

        let mut buf = vec![0u8; MAX_UDP_PAYLOAD];
        let (size, _) = tokio::time::timeout(Duration::from_secs(5), client.recv_from(&mut buf))
            .await
            .unwrap()
            .unwrap();
        let response = Message::from_octets(&buf[..size]).unwrap();

        assert_eq!(0xabcd, response.header.id);
        assert_eq!(Rcode::FORMAT_ERROR, response.header.rcode);

        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
