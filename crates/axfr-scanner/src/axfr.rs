use crate::dns::{self, DnsResolver};
use crate::model::Zone;
use crate::{Error, Result};
use async_trait::async_trait;
use hickory_resolver::proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_resolver::proto::rr::{Name, Record, RecordType};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, instrument};

pub const DNS_PORT: u16 = 53;

/// One zone-transfer attempt against one nameserver. Best-effort: every
/// failure mode surfaces as an `Err` for the caller to absorb.
#[async_trait]
pub trait ZoneTransfer {
    async fn transfer(&self, domain: &str, nameserver: &str) -> Result<Zone>;
}

pub struct TcpZoneTransfer {
    dns_resolver: DnsResolver,
}

impl TcpZoneTransfer {
    pub fn new(dns_resolver: DnsResolver) -> Self {
        Self { dns_resolver }
    }
}

#[async_trait]
impl ZoneTransfer for TcpZoneTransfer {
    #[instrument(name = "axfr", level = "debug", fields(nameserver = %nameserver), skip_all)]
    async fn transfer(&self, domain: &str, nameserver: &str) -> Result<Zone> {
        let apex = zone_apex(domain)?;
        let addr = dns::nameserver_addr(&self.dns_resolver, nameserver, DNS_PORT).await?;

        let mut stream = TcpStream::connect(addr).await?;
        debug!("{:12} - {:?}", "CONNECTED", addr);
        write_message(&mut stream, &axfr_query(&apex)).await?;

        let mut transfer = TransferStream::new(apex);
        while !transfer.is_complete() {
            let message = read_message(&mut stream).await?;
            transfer.ingest(&message)?;
        }

        Ok(transfer.into_zone())
    }
}

/// Parse the target domain into the zone apex name.
pub fn zone_apex(domain: &str) -> Result<Name> {
    let mut apex = Name::from_utf8(domain)?;
    apex.set_fqdn(true);
    Ok(apex)
}

fn axfr_query(apex: &Name) -> Message {
    let mut message = Message::new();
    message.set_id(rand::random::<u16>());
    message.set_message_type(MessageType::Query);
    message.set_op_code(OpCode::Query);
    message.add_query(Query::query(apex.clone(), RecordType::AXFR));
    message
}

// DNS over TCP frames every message with a 2-byte big-endian length.
async fn write_message(stream: &mut TcpStream, message: &Message) -> Result<()> {
    let body = message.to_vec()?;
    let mut framed = Vec::with_capacity(2 + body.len());
    framed.extend_from_slice(&(body.len() as u16).to_be_bytes());
    framed.extend_from_slice(&body);
    stream.write_all(&framed).await?;

    Ok(())
}

async fn read_message(stream: &mut TcpStream) -> Result<Message> {
    let mut len = [0u8; 2];
    stream.read_exact(&mut len).await?;

    let mut body = vec![0u8; u16::from_be_bytes(len) as usize];
    stream.read_exact(&mut body).await?;

    Ok(Message::from_vec(&body)?)
}

// region:        --- TransferStream

/// Message-at-a-time interpreter for an AXFR answer stream.
///
/// The stream opens with the zone SOA, repeats it as its final record and
/// may span any number of response messages in between (RFC 5936 §2.2).
/// `ingest` each message until `is_complete`.
pub struct TransferStream {
    apex: Name,
    records: Vec<Record>,
    soa_seen: u8,
}

impl TransferStream {
    pub fn new(apex: Name) -> Self {
        Self {
            apex,
            records: Vec::new(),
            soa_seen: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.soa_seen >= 2
    }

    pub fn ingest(&mut self, message: &Message) -> Result<()> {
        if message.response_code() != ResponseCode::NoError {
            return Err(Error::TransferRefused(message.response_code()));
        }

        let answers = message.answers();
        if self.records.is_empty() {
            match answers.first() {
                Some(record) if record.record_type() == RecordType::SOA => {}
                _ => {
                    return Err(Error::InvalidTransferStream(
                        "answer stream must open with the zone SOA".to_string(),
                    ))
                }
            }
        }

        for record in answers {
            if record.record_type() == RecordType::SOA {
                self.soa_seen += 1;
            }
            self.records.push(record.clone());

            // nothing follows the closing SOA
            if self.is_complete() {
                break;
            }
        }

        Ok(())
    }

    pub fn into_zone(self) -> Zone {
        Zone::new(self.apex, self.records)
    }
}

// endregion:     --- TransferStream
