//! Assembling transferred records into a zone text dump.

use std::collections::HashMap;

use axfr_core::{AxfrError, Domain, Result, TransferFailure, ZoneRecordSet};
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};

/// Parse the user's domain into an absolute zone origin.
pub fn origin_name(domain: &Domain) -> Result<Name> {
    let mut origin = Name::from_utf8(domain.as_str()).map_err(|e| AxfrError::InvalidDomain {
        domain: domain.clone(),
        reason: e.to_string(),
    })?;
    origin.set_fqdn(true);
    Ok(origin)
}

/// Collects the answer sections of an AXFR response stream.
///
/// The stream opens with the zone SOA and ends when that SOA is sent again
/// as the last answer of a message.
#[derive(Debug)]
pub struct AxfrStream {
    origin: Name,
    records: Vec<Record>,
    opened: bool,
    closed: bool,
    messages: usize,
}

impl AxfrStream {
    /// Start collecting records for `origin`
    #[must_use]
    pub const fn new(origin: Name) -> Self {
        Self {
            origin,
            records: Vec::new(),
            opened: false,
            closed: false,
            messages: 0,
        }
    }

    /// Feed the answers of one response message.
    ///
    /// Returns `true` once the closing SOA has been seen.
    pub fn absorb(&mut self, answers: &[Record]) -> std::result::Result<bool, TransferFailure> {
        if self.closed {
            return Err(TransferFailure::Malformed(
                "answers after the closing SOA".into(),
            ));
        }
        self.messages += 1;

        if !self.opened && answers.is_empty() {
            return Err(TransferFailure::Malformed(
                "server returned no records".into(),
            ));
        }

        let last = answers.len().saturating_sub(1);
        for (i, record) in answers.iter().enumerate() {
            let is_apex_soa =
                record.record_type() == RecordType::SOA && record.name() == &self.origin;

            if !self.opened {
                if !is_apex_soa {
                    return Err(TransferFailure::Malformed(format!(
                        "transfer must start with the SOA of {}, got {} {}",
                        self.origin,
                        record.name(),
                        record.record_type()
                    )));
                }
                self.opened = true;
                self.records.push(record.clone());
                continue;
            }

            if is_apex_soa && i == last {
                self.closed = true;
                break;
            }
            self.records.push(record.clone());
        }

        Ok(self.closed)
    }

    /// Returns true once the closing SOA has been seen
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.closed
    }

    /// Number of messages absorbed so far
    #[must_use]
    pub const fn messages(&self) -> usize {
        self.messages
    }

    /// Build the zone dump from a completed stream.
    pub fn finish(self) -> std::result::Result<ZoneRecordSet, TransferFailure> {
        if !self.closed {
            return Err(TransferFailure::Malformed(
                "transfer ended before the closing SOA".into(),
            ));
        }
        Ok(build_zone(&self.origin, &self.records))
    }
}

/// Records of one owner name sharing type and class.
struct RecordGroup<'a> {
    record_type: RecordType,
    class: DNSClass,
    records: Vec<&'a Record>,
}

struct Node<'a> {
    owner: &'a Name,
    groups: Vec<RecordGroup<'a>>,
}

/// Group records into nodes and render one text entry per node.
///
/// Nodes and the record groups inside them keep their order of first
/// appearance. Identical records collapse into one.
pub fn build_zone(origin: &Name, records: &[Record]) -> ZoneRecordSet {
    let mut nodes: Vec<Node<'_>> = Vec::new();
    let mut index: HashMap<Name, usize> = HashMap::new();

    for record in records {
        let key = record.name().to_lowercase();
        let slot = *index.entry(key).or_insert_with(|| {
            nodes.push(Node {
                owner: record.name(),
                groups: Vec::new(),
            });
            nodes.len() - 1
        });
        let node = &mut nodes[slot];

        let group = match node
            .groups
            .iter()
            .position(|g| g.record_type == record.record_type() && g.class == record.dns_class())
        {
            Some(pos) => &mut node.groups[pos],
            None => {
                node.groups.push(RecordGroup {
                    record_type: record.record_type(),
                    class: record.dns_class(),
                    records: Vec::new(),
                });
                let last = node.groups.len() - 1;
                &mut node.groups[last]
            }
        };

        if !group.records.iter().any(|r| r.data() == record.data()) {
            group.records.push(record);
        }
    }

    nodes
        .iter()
        .map(|node| node_text(origin, node))
        .collect()
}

fn node_text(origin: &Name, node: &Node<'_>) -> String {
    let owner = relative_name(origin, node.owner);
    let mut lines = Vec::new();

    for group in &node.groups {
        // A record set shares one TTL, the lowest of its members.
        let ttl = group.records.iter().map(|r| r.ttl()).min().unwrap_or_default();
        for record in &group.records {
            lines.push(format!(
                "{owner} {ttl} {} {} {}",
                group.class,
                group.record_type,
                rdata_text(origin, record.data())
            ));
        }
    }

    lines.join("\n")
}

/// Master-file text of one record's data.
///
/// Names inside the zone are written relative to the origin and
/// character-strings are quoted. Types without names or strings use
/// hickory's presentation format.
fn rdata_text(origin: &Name, data: &RData) -> String {
    let name = |n: &Name| relative_name(origin, n);

    match data {
        RData::NS(ns) => name(&ns.0),
        RData::CNAME(cname) => name(&cname.0),
        RData::PTR(ptr) => name(&ptr.0),
        RData::MX(mx) => format!("{} {}", mx.preference(), name(mx.exchange())),
        RData::SRV(srv) => format!(
            "{} {} {} {}",
            srv.priority(),
            srv.weight(),
            srv.port(),
            name(srv.target())
        ),
        RData::SOA(soa) => format!(
            "{} {} {} {} {} {} {}",
            name(soa.mname()),
            name(soa.rname()),
            soa.serial(),
            soa.refresh(),
            soa.retry(),
            soa.expire(),
            soa.minimum()
        ),
        RData::TXT(txt) => txt
            .txt_data()
            .iter()
            .map(|s| quoted(s))
            .collect::<Vec<_>>()
            .join(" "),
        RData::HINFO(hinfo) => format!("{} {}", quoted(hinfo.cpu()), quoted(hinfo.os())),
        RData::CAA(caa) => format!(
            "{} {} {}",
            caa.flags(),
            caa.tag(),
            quoted(caa.raw_value())
        ),
        RData::NAPTR(naptr) => format!(
            "{} {} {} {} {} {}",
            naptr.order(),
            naptr.preference(),
            quoted(naptr.flags()),
            quoted(naptr.services()),
            quoted(naptr.regexp()),
            name(naptr.replacement())
        ),
        other => other.to_string(),
    }
}

/// A character-string in double quotes.
///
/// Quotes and backslashes are backslash-escaped; bytes outside printable
/// ASCII become `\DDD` decimal escapes.
fn quoted(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len() + 2);
    text.push('"');
    for &b in bytes {
        match b {
            b'"' | b'\\' => {
                text.push('\\');
                text.push(char::from(b));
            }
            0x20..=0x7e => text.push(char::from(b)),
            _ => text.push_str(&format!("\\{b:03}")),
        }
    }
    text.push('"');
    text
}

/// Name relative to the zone origin, `@` for the apex.
///
/// Names outside the zone stay absolute.
fn relative_name(origin: &Name, name: &Name) -> String {
    if name == origin {
        return String::from("@");
    }

    let text = name.to_string();
    let suffix = format!(".{origin}").to_ascii_lowercase();
    if text.len() > suffix.len() && text.to_ascii_lowercase().ends_with(&suffix) {
        return text[..text.len() - suffix.len()].to_string();
    }
    text
}
