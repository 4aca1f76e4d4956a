use crate::core::DnsConnError;
use crate::dns::core::{CodeTables, RecordClass, RecordType};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Metadata shared by every resource record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordHeader {
    name: String,
    rtype: RecordType,
    rclass: RecordClass,
    ttl: u32,
    rdlength: u16,
}

impl RecordHeader {
    pub fn new<S>(name: S, rtype: RecordType, rclass: RecordClass, ttl: u32) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            rtype,
            rclass,
            ttl,
            rdlength: 0,
        }
    }

    pub fn set_rdlength(mut self, rdlength: u16) -> Self {
        self.rdlength = rdlength;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rtype(&self) -> RecordType {
        self.rtype
    }

    pub fn rclass(&self) -> RecordClass {
        self.rclass
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Declared length of the record data that follows the header on the wire.
    pub fn rdlength(&self) -> u16 {
        self.rdlength
    }

    /// Render the header as the tab separated prefix of a presentation format
    /// record: name, TTL, class, and type. OPT pseudo-records aren't real records
    /// and are commented out with a leading `;`.
    pub fn render(&self, tables: &CodeTables) -> String {
        let prefix = if self.rtype == RecordType::OPT { ";" } else { "" };
        let name = if self.name.is_empty() { "." } else { &self.name };

        format!(
            "{}{}\t{}\t{}\t{}\t",
            prefix,
            name,
            self.ttl,
            tables.class_name(self.rclass),
            tables.type_name(self.rtype)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    NS(String),
    CNAME(String),
    PTR(String),
    MX(u16, String),
    TXT(Vec<String>),
    /// Record data this crate doesn't have a representation for, kept as raw bytes.
    Unknown(Vec<u8>),
}

impl fmt::Display for RecordData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordData::A(addr) => write!(f, "{}", addr),
            RecordData::AAAA(addr) => write!(f, "{}", addr),
            RecordData::NS(name) => write!(f, "{}", name),
            RecordData::CNAME(name) => write!(f, "{}", name),
            RecordData::PTR(name) => write!(f, "{}", name),
            RecordData::MX(pref, name) => write!(f, "{} {}", pref, name),
            RecordData::TXT(parts) => {
                let quoted: Vec<String> = parts.iter().map(|p| format!("{:?}", p)).collect();
                write!(f, "{}", quoted.join(" "))
            }
            // Generic rdata format from RFC 3597
            RecordData::Unknown(bytes) => {
                write!(f, "\\# {}", bytes.len())?;
                if !bytes.is_empty() {
                    write!(f, " ")?;
                    for b in bytes {
                        write!(f, "{:02x}", b)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// A resource record: data of one of a fixed set of kinds plus the header
/// common to all records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    header: RecordHeader,
    rdata: RecordData,
}

impl Record {
    pub fn new(header: RecordHeader, rdata: RecordData) -> Self {
        Self { header, rdata }
    }

    pub fn header(&self) -> &RecordHeader {
        &self.header
    }

    pub fn rdata(&self) -> &RecordData {
        &self.rdata
    }

    pub fn render(&self, tables: &CodeTables) -> String {
        format!("{}{}", self.header.render(tables), self.rdata)
    }
}

/// Ordered group of records, normally sharing an owner name and type.
///
/// Nothing prevents building a set that violates RFC 2181 rules, use
/// [`RecordSet::is_consistent`] to check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, r: Record) -> Self {
        self.records.push(r);
        self
    }

    pub fn push(&mut self, r: Record) {
        self.records.push(r);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Sort records by owner name only, keeping the existing order of records
    /// with the same name.
    pub fn sort(&mut self) {
        self.records.sort_by(|a, b| a.header.name.cmp(&b.header.name));
    }

    /// Check that every record has the same TTL, name, and class as the first
    /// record per RFC 2181. An empty set has nothing to compare and is an error.
    pub fn is_consistent(&self) -> Result<bool, DnsConnError> {
        let (first, rest) = self
            .records
            .split_first()
            .ok_or_else(|| DnsConnError::runtime("cannot check consistency of empty record set"))?;

        let h = &first.header;
        Ok(rest.iter().all(|r| {
            r.header.ttl == h.ttl && r.header.name == h.name && r.header.rclass == h.rclass
        }))
    }
}

impl From<Vec<Record>> for RecordSet {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl IntoIterator for RecordSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
