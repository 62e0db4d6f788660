//! AXFR zone transfer client.
//!
//! Speaks DNS over TCP directly: one AXFR query, then length-prefixed
//! response messages until the zone SOA comes back around. The whole
//! exchange runs under a single wall-clock timeout and is never retried.

use std::net::SocketAddr;

use async_trait::async_trait;
use axfr_core::{
    AxfrError, Domain, Nameserver, ResolvedAddress, Result, TransferConfig, TransferFailure,
    ZoneRecordSet,
};
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{Name, RecordType};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::lookup::NameserverDirectory;
use crate::zone::{self, AxfrStream};

/// Anything that can fetch a zone from one nameserver.
#[async_trait]
pub trait ZoneTransfer: Send + Sync {
    /// Transfer `domain` from `nameserver`.
    async fn transfer(&self, domain: &Domain, nameserver: &Nameserver) -> Result<ZoneRecordSet>;
}

/// Resolves a nameserver, then pulls the zone from it over TCP.
pub struct ZoneTransferClient<D> {
    directory: D,
    config: TransferConfig,
}

impl<D: NameserverDirectory> ZoneTransferClient<D> {
    /// Create a client resolving nameservers through `directory`
    pub const fn new(directory: D, config: TransferConfig) -> Self {
        Self { directory, config }
    }

    /// Transfer `domain` from an already resolved nameserver address.
    pub async fn transfer_from(
        &self,
        domain: &Domain,
        address: &ResolvedAddress,
    ) -> Result<ZoneRecordSet> {
        let fail = |cause: TransferFailure| AxfrError::Transfer {
            nameserver: address.nameserver.clone(),
            address: address.ip,
            domain: domain.clone(),
            cause,
        };

        let origin = zone::origin_name(domain)?;
        let peer = SocketAddr::from((address.ip, self.config.port));

        info!(
            nameserver = %address.nameserver,
            peer = %peer,
            zone = %origin,
            "starting zone transfer"
        );

        let zone = tokio::time::timeout(self.config.timeout, fetch_zone(peer, origin))
            .await
            .map_err(|_| fail(TransferFailure::Timeout(self.config.timeout)))?
            .map_err(fail)?;

        info!(
            nameserver = %address.nameserver,
            nodes = zone.len(),
            "zone transfer complete"
        );
        Ok(zone)
    }
}

#[async_trait]
impl<D: NameserverDirectory> ZoneTransfer for ZoneTransferClient<D> {
    async fn transfer(&self, domain: &Domain, nameserver: &Nameserver) -> Result<ZoneRecordSet> {
        let address = self.directory.resolve(nameserver).await?;
        self.transfer_from(domain, &address).await
    }
}

/// Run the AXFR exchange against `peer`.
async fn fetch_zone(
    peer: SocketAddr,
    origin: Name,
) -> std::result::Result<ZoneRecordSet, TransferFailure> {
    let mut stream = TcpStream::connect(peer)
        .await
        .map_err(TransferFailure::Connect)?;

    let id: u16 = rand::random();
    let query = axfr_query(id, &origin)?;
    write_frame(&mut stream, &query).await?;
    debug!(id, peer = %peer, "AXFR query sent");

    let mut axfr = AxfrStream::new(origin);
    loop {
        let frame = read_frame(&mut stream).await?;
        let response = Message::from_vec(&frame)
            .map_err(|e| TransferFailure::Malformed(format!("undecodable response: {e}")))?;
        check_response(&response, id)?;

        debug!(
            id,
            answers = response.answers().len(),
            "AXFR response received"
        );

        if axfr.absorb(response.answers())? {
            break;
        }
    }

    debug!(id, messages = axfr.messages(), "AXFR stream closed");
    axfr.finish()
}

/// Encode an AXFR query for `origin`.
fn axfr_query(id: u16, origin: &Name) -> std::result::Result<Vec<u8>, TransferFailure> {
    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(false)
        .add_query(Query::query(origin.clone(), RecordType::AXFR));

    message
        .to_vec()
        .map_err(|e| TransferFailure::Encode(e.to_string()))
}

/// Reject responses that do not belong to this transfer or carry an error.
fn check_response(response: &Message, id: u16) -> std::result::Result<(), TransferFailure> {
    if response.id() != id {
        return Err(TransferFailure::Malformed(format!(
            "response id {} does not match query id {id}",
            response.id()
        )));
    }
    if response.message_type() != MessageType::Response {
        return Err(TransferFailure::Malformed(
            "received a query instead of a response".into(),
        ));
    }

    match response.response_code() {
        ResponseCode::NoError => Ok(()),
        code => Err(TransferFailure::Refused(rcode_mnemonic(code))),
    }
}

/// Master-file mnemonic of a response code, e.g. `REFUSED` or `NOTAUTH`.
fn rcode_mnemonic(code: ResponseCode) -> String {
    match code {
        ResponseCode::Unknown(value) => format!("RCODE{value}"),
        known => format!("{known:?}").to_ascii_uppercase(),
    }
}

/// Write one message with its two-byte length prefix.
async fn write_frame(
    stream: &mut TcpStream,
    payload: &[u8],
) -> std::result::Result<(), TransferFailure> {
    let len = u16::try_from(payload.len())
        .map_err(|_| TransferFailure::Encode(format!("query of {} bytes", payload.len())))?;

    stream.write_all(&len.to_be_bytes()).await?;
    stream.write_all(payload).await?;
    stream.flush().await?;
    Ok(())
}

/// Read one length-prefixed message.
async fn read_frame(stream: &mut TcpStream) -> std::result::Result<Vec<u8>, TransferFailure> {
    let mut len = [0u8; 2];
    match stream.read_exact(&mut len).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(TransferFailure::Malformed(
                "connection closed before the transfer completed".into(),
            ));
        }
        Err(e) => return Err(e.into()),
    }

    let mut frame = vec![0u8; usize::from(u16::from_be_bytes(len))];
    stream.read_exact(&mut frame).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            TransferFailure::Malformed("connection closed mid-message".into())
        } else {
            e.into()
        }
    })?;
    Ok(frame)
}
