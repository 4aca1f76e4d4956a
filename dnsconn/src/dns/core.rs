use crate::core::DnsConnError;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u16)]
pub enum RecordType {
    A,
    NS,
    CNAME,
    SOA,
    PTR,
    MX,
    TXT,
    AAAA,
    SRV,
    OPT,
    DS,
    RRSIG,
    NSEC,
    DNSKEY,
    TSIG,
    IXFR,
    AXFR,
    ANY,
    Unknown(u16),
}

impl RecordType {
    /// Every type with a name, in code point order.
    pub const KNOWN: [RecordType; 18] = [
        RecordType::A,
        RecordType::NS,
        RecordType::CNAME,
        RecordType::SOA,
        RecordType::PTR,
        RecordType::MX,
        RecordType::TXT,
        RecordType::AAAA,
        RecordType::SRV,
        RecordType::OPT,
        RecordType::DS,
        RecordType::RRSIG,
        RecordType::NSEC,
        RecordType::DNSKEY,
        RecordType::TSIG,
        RecordType::IXFR,
        RecordType::AXFR,
        RecordType::ANY,
    ];
}

impl From<u16> for RecordType {
    fn from(value: u16) -> Self {
        match value {
            1 => Self::A,
            2 => Self::NS,
            5 => Self::CNAME,
            6 => Self::SOA,
            12 => Self::PTR,
            15 => Self::MX,
            16 => Self::TXT,
            28 => Self::AAAA,
            33 => Self::SRV,
            41 => Self::OPT,
            43 => Self::DS,
            46 => Self::RRSIG,
            47 => Self::NSEC,
            48 => Self::DNSKEY,
            250 => Self::TSIG,
            251 => Self::IXFR,
            252 => Self::AXFR,
            255 => Self::ANY,
            v => Self::Unknown(v),
        }
    }
}

impl From<RecordType> for u16 {
    fn from(value: RecordType) -> Self {
        match value {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::PTR => 12,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::AAAA => 28,
            RecordType::SRV => 33,
            RecordType::OPT => 41,
            RecordType::DS => 43,
            RecordType::RRSIG => 46,
            RecordType::NSEC => 47,
            RecordType::DNSKEY => 48,
            RecordType::TSIG => 250,
            RecordType::IXFR => 251,
            RecordType::AXFR => 252,
            RecordType::ANY => 255,
            RecordType::Unknown(c) => c,
        }
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::A => write!(f, "A"),
            RecordType::NS => write!(f, "NS"),
            RecordType::CNAME => write!(f, "CNAME"),
            RecordType::SOA => write!(f, "SOA"),
            RecordType::PTR => write!(f, "PTR"),
            RecordType::MX => write!(f, "MX"),
            RecordType::TXT => write!(f, "TXT"),
            RecordType::AAAA => write!(f, "AAAA"),
            RecordType::SRV => write!(f, "SRV"),
            RecordType::OPT => write!(f, "OPT"),
            RecordType::DS => write!(f, "DS"),
            RecordType::RRSIG => write!(f, "RRSIG"),
            RecordType::NSEC => write!(f, "NSEC"),
            RecordType::DNSKEY => write!(f, "DNSKEY"),
            RecordType::TSIG => write!(f, "TSIG"),
            RecordType::IXFR => write!(f, "IXFR"),
            RecordType::AXFR => write!(f, "AXFR"),
            RecordType::ANY => write!(f, "ANY"),
            // Generic form for unknown types from RFC 3597
            RecordType::Unknown(t) => write!(f, "TYPE{}", t),
        }
    }
}

impl FromStr for RecordType {
    type Err = DnsConnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_uppercase();
        if let Some(t) = RecordType::KNOWN.iter().find(|t| t.to_string() == s) {
            return Ok(*t);
        }

        s.strip_prefix("TYPE")
            .and_then(|n| n.parse::<u16>().ok())
            .map(RecordType::from)
            .ok_or_else(|| DnsConnError::runtime(format!("unknown record type '{}'", s)))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u16)]
pub enum RecordClass {
    INET,
    CHAOS,
    HESIOD,
    NONE,
    ANY,
    Unknown(u16),
}

impl RecordClass {
    /// Every class with a name, in code point order.
    pub const KNOWN: [RecordClass; 5] = [
        RecordClass::INET,
        RecordClass::CHAOS,
        RecordClass::HESIOD,
        RecordClass::NONE,
        RecordClass::ANY,
    ];
}

impl From<u16> for RecordClass {
    fn from(value: u16) -> Self {
        match value {
            1 => Self::INET,
            3 => Self::CHAOS,
            4 => Self::HESIOD,
            254 => Self::NONE,
            255 => Self::ANY,
            v => Self::Unknown(v),
        }
    }
}

impl From<RecordClass> for u16 {
    fn from(value: RecordClass) -> Self {
        match value {
            RecordClass::INET => 1,
            RecordClass::CHAOS => 3,
            RecordClass::HESIOD => 4,
            RecordClass::NONE => 254,
            RecordClass::ANY => 255,
            RecordClass::Unknown(c) => c,
        }
    }
}

impl Display for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordClass::INET => write!(f, "IN"),
            RecordClass::CHAOS => write!(f, "CH"),
            RecordClass::HESIOD => write!(f, "HS"),
            RecordClass::NONE => write!(f, "NONE"),
            RecordClass::ANY => write!(f, "ANY"),
            RecordClass::Unknown(c) => write!(f, "CLASS{}", c),
        }
    }
}

impl FromStr for RecordClass {
    type Err = DnsConnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_uppercase();
        match s.as_ref() {
            "IN" | "INET" => Ok(RecordClass::INET),
            "CH" | "CHAOS" => Ok(RecordClass::CHAOS),
            "HS" | "HESIOD" => Ok(RecordClass::HESIOD),
            "NONE" => Ok(RecordClass::NONE),
            "ANY" => Ok(RecordClass::ANY),
            v => v
                .strip_prefix("CLASS")
                .and_then(|n| n.parse::<u16>().ok())
                .map(RecordClass::from)
                .ok_or_else(|| DnsConnError::runtime(format!("unknown record class '{}'", v))),
        }
    }
}

/// Mappings from numeric class and type codes to their mnemonics, used when
/// rendering records as text.
///
/// Codes without a mnemonic are rendered in the generic `CLASS<n>` and `TYPE<n>`
/// forms so that records using code points this crate doesn't know about can
/// still be displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTables {
    classes: HashMap<u16, String>,
    types: HashMap<u16, String>,
}

impl CodeTables {
    /// Tables for every class and type known by this crate.
    pub fn new() -> Self {
        let classes = RecordClass::KNOWN
            .iter()
            .map(|c| (u16::from(*c), c.to_string()))
            .collect();
        let types = RecordType::KNOWN
            .iter()
            .map(|t| (u16::from(*t), t.to_string()))
            .collect();

        Self { classes, types }
    }

    /// Shared tables for every class and type known by this crate, built once.
    pub fn standard() -> &'static CodeTables {
        static TABLES: OnceLock<CodeTables> = OnceLock::new();
        TABLES.get_or_init(CodeTables::new)
    }

    pub fn with_class<S>(mut self, code: u16, name: S) -> Self
    where
        S: Into<String>,
    {
        self.classes.insert(code, name.into());
        self
    }

    pub fn with_type<S>(mut self, code: u16, name: S) -> Self
    where
        S: Into<String>,
    {
        self.types.insert(code, name.into());
        self
    }

    pub fn class_name(&self, class: RecordClass) -> String {
        let code = u16::from(class);
        match self.classes.get(&code) {
            Some(name) => name.clone(),
            None => format!("CLASS{}", code),
        }
    }

    pub fn type_name(&self, rtype: RecordType) -> String {
        let code = u16::from(rtype);
        match self.types.get(&code) {
            Some(name) => name.clone(),
            None => format!("TYPE{}", code),
        }
    }
}

impl Default for CodeTables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::{CodeTables, RecordClass, RecordType};
    use std::str::FromStr;

    #[test]
    fn test_record_type_from_u16() {
        assert_eq!(RecordType::A, RecordType::from(1));
        assert_eq!(RecordType::NS, RecordType::from(2));
        assert_eq!(RecordType::CNAME, RecordType::from(5));
        assert_eq!(RecordType::SOA, RecordType::from(6));
        assert_eq!(RecordType::MX, RecordType::from(15));
        assert_eq!(RecordType::TXT, RecordType::from(16));
        assert_eq!(RecordType::AAAA, RecordType::from(28));
        assert_eq!(RecordType::OPT, RecordType::from(41));
        assert_eq!(RecordType::TSIG, RecordType::from(250));
        assert_eq!(RecordType::Unknown(999), RecordType::from(999));
    }

    #[test]
    fn test_record_type_u16_round_trip_known() {
        for t in RecordType::KNOWN {
            assert_eq!(t, RecordType::from(u16::from(t)));
        }
    }

    #[test]
    fn test_record_type_display() {
        assert_eq!("A", RecordType::A.to_string());
        assert_eq!("AAAA", RecordType::AAAA.to_string());
        assert_eq!("OPT", RecordType::OPT.to_string());
        assert_eq!("RRSIG", RecordType::RRSIG.to_string());
        assert_eq!("TYPE999", RecordType::Unknown(999).to_string());
    }

    #[test]
    fn test_record_type_from_str() {
        assert_eq!(RecordType::A, RecordType::from_str("A").unwrap());
        assert_eq!(RecordType::AAAA, RecordType::from_str("aaaa").unwrap());
        assert_eq!(RecordType::DNSKEY, RecordType::from_str("DNSKEY").unwrap());
        assert_eq!(RecordType::Unknown(999), RecordType::from_str("TYPE999").unwrap());
        assert_eq!(RecordType::MX, RecordType::from_str("TYPE15").unwrap());
        assert!(RecordType::from_str("BOGUS").is_err());
        assert!(RecordType::from_str("TYPE70000").is_err());
    }

    #[test]
    fn test_record_class_from_u16() {
        assert_eq!(RecordClass::INET, RecordClass::from(1));
        assert_eq!(RecordClass::CHAOS, RecordClass::from(3));
        assert_eq!(RecordClass::HESIOD, RecordClass::from(4));
        assert_eq!(RecordClass::NONE, RecordClass::from(254));
        assert_eq!(RecordClass::ANY, RecordClass::from(255));
        assert_eq!(RecordClass::Unknown(512), RecordClass::from(512));
    }

    #[test]
    fn test_record_class_to_u16() {
        assert_eq!(1_u16, RecordClass::INET.into());
        assert_eq!(3_u16, RecordClass::CHAOS.into());
        assert_eq!(4_u16, RecordClass::HESIOD.into());
        assert_eq!(254_u16, RecordClass::NONE.into());
        assert_eq!(255_u16, RecordClass::ANY.into());
        assert_eq!(512_u16, RecordClass::Unknown(512).into());
    }

    #[test]
    fn test_record_class_display() {
        assert_eq!("IN", RecordClass::INET.to_string());
        assert_eq!("CH", RecordClass::CHAOS.to_string());
        assert_eq!("HS", RecordClass::HESIOD.to_string());
        assert_eq!("NONE", RecordClass::NONE.to_string());
        assert_eq!("ANY", RecordClass::ANY.to_string());
        assert_eq!("CLASS512", RecordClass::Unknown(512).to_string());
    }

    #[test]
    fn test_record_class_from_str() {
        assert_eq!(RecordClass::INET, RecordClass::from_str("IN").unwrap());
        assert_eq!(RecordClass::INET, RecordClass::from_str("INET").unwrap());
        assert_eq!(RecordClass::CHAOS, RecordClass::from_str("ch").unwrap());
        assert_eq!(RecordClass::HESIOD, RecordClass::from_str("HESIOD").unwrap());
        assert_eq!(RecordClass::Unknown(512), RecordClass::from_str("CLASS512").unwrap());
        assert!(RecordClass::from_str("BOGUS").is_err());
    }

    #[test]
    fn test_code_tables_known() {
        let tables = CodeTables::standard();
        assert_eq!("IN", tables.class_name(RecordClass::INET));
        assert_eq!("AAAA", tables.type_name(RecordType::AAAA));
    }

    #[test]
    fn test_code_tables_fallback() {
        let tables = CodeTables::new();
        assert_eq!("CLASS42", tables.class_name(RecordClass::Unknown(42)));
        assert_eq!("TYPE64", tables.type_name(RecordType::Unknown(64)));
    }

    #[test]
    fn test_code_tables_extended() {
        let tables = CodeTables::new().with_type(64, "SVCB").with_class(2, "CS");
        assert_eq!("SVCB", tables.type_name(RecordType::Unknown(64)));
        assert_eq!("CS", tables.class_name(RecordClass::Unknown(2)));
        assert_eq!("A", tables.type_name(RecordType::A));
    }
}
