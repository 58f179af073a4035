//! Flow table record types.
//!
//! One [`FlowRecord`] per data row of the flow table. Addresses are typed
//! ([`IpAddr`]), ports and reduction are integers, and the start time is kept
//! exactly as the appliance printed it.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoerceError;

/// Optimization / pass-through state of a flow, as shown in the `T` column.
///
/// Serializes as the report code. A code outside the known set is kept
/// verbatim in [`FlowType::Other`] so newer appliance output still parses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlowType {
    /// `N`: packet-mode optimized.
    PacketMode,
    /// `O`: RiOS only.
    RiosOnly,
    /// `SO`: SCPS only.
    ScpsOnly,
    /// `RS`: RiOS + SCPS.
    RiosScps,
    /// `TP`: TCP proxy.
    TcpProxy,
    /// `H`: half-opened optimized.
    HalfOpened,
    /// `C`: half-closed optimized.
    HalfClosed,
    /// `E`: establishing.
    Establishing,
    /// `PI`: passthrough, intentional.
    PassthroughIntentional,
    /// `PU`: passthrough, unintentional.
    PassthroughUnintentional,
    /// `F`: forwarded.
    Forwarded,
    /// Any other code, as printed.
    Other(String),
}

impl FlowType {
    /// The known codes. [`FlowType::Other`] is not listed.
    pub const ALL: [FlowType; 11] = [
        FlowType::PacketMode,
        FlowType::RiosOnly,
        FlowType::ScpsOnly,
        FlowType::RiosScps,
        FlowType::TcpProxy,
        FlowType::HalfOpened,
        FlowType::HalfClosed,
        FlowType::Establishing,
        FlowType::PassthroughIntentional,
        FlowType::PassthroughUnintentional,
        FlowType::Forwarded,
    ];

    /// The code printed in the report.
    pub fn code(&self) -> &str {
        match self {
            FlowType::PacketMode => "N",
            FlowType::RiosOnly => "O",
            FlowType::ScpsOnly => "SO",
            FlowType::RiosScps => "RS",
            FlowType::TcpProxy => "TP",
            FlowType::HalfOpened => "H",
            FlowType::HalfClosed => "C",
            FlowType::Establishing => "E",
            FlowType::PassthroughIntentional => "PI",
            FlowType::PassthroughUnintentional => "PU",
            FlowType::Forwarded => "F",
            FlowType::Other(code) => code,
        }
    }

    /// Look up a known type by its report code. Case-sensitive; never
    /// returns [`FlowType::Other`].
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FlowType::Other(_))
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(
            self,
            FlowType::PassthroughIntentional | FlowType::PassthroughUnintentional
        )
    }
}

impl FromStr for FlowType {
    type Err = CoerceError;

    /// Known codes map to their variant; any other single token becomes
    /// [`FlowType::Other`]. Only an empty or whitespace-bearing token fails.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(CoerceError::UnknownFlowType(s.to_string()));
        }
        Ok(Self::from_code(s).unwrap_or_else(|| FlowType::Other(s.to_string())))
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl Serialize for FlowType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for FlowType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(D::Error::custom)
    }
}

/// Start time of a flow, verbatim from the report.
///
/// Every component is the zero-padded text the appliance printed (`"02"`, not
/// `2`). Use [`Timestamp::to_naive_datetime`] when a numeric value is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub min: String,
    pub secs: String,
}

impl Timestamp {
    /// Interpret the textual fields as a calendar date and time.
    ///
    /// Returns `None` when the fields do not form a valid date (the parser
    /// only checks their shape, not their range).
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(
            self.year.parse().ok()?,
            self.month.parse().ok()?,
            self.day.parse().ok()?,
        )?;
        date.and_hms_opt(
            self.hour.parse().ok()?,
            self.min.parse().ok()?,
            self.secs.parse().ok()?,
        )
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{} {}:{}:{}",
            self.year, self.month, self.day, self.hour, self.min, self.secs
        )
    }
}

/// The `Since` column: a timestamp, or `pre_existing` for flows that predate
/// the appliance's tracking window.
///
/// Serializes as the timestamp's six fields or as `{"pre_existing": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Since {
    At(Timestamp),
    PreExisting,
}

impl Since {
    pub fn timestamp(&self) -> Option<&Timestamp> {
        match self {
            Since::At(ts) => Some(ts),
            Since::PreExisting => None,
        }
    }
}

impl Serialize for Since {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Since::At(ts) => ts.serialize(serializer),
            Since::PreExisting => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("pre_existing", &true)?;
                map.end()
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SinceRepr {
    At(Timestamp),
    PreExisting { pre_existing: bool },
}

impl<'de> Deserialize<'de> for Since {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match SinceRepr::deserialize(deserializer)? {
            SinceRepr::At(ts) => Ok(Since::At(ts)),
            SinceRepr::PreExisting { pre_existing: true } => Ok(Since::PreExisting),
            SinceRepr::PreExisting { pre_existing: false } => Err(D::Error::custom(
                "`pre_existing` may only be true; use a timestamp otherwise",
            )),
        }
    }
}

/// One row of the flow table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowRecord {
    #[serde(rename = "type")]
    pub flow_type: FlowType,
    pub source_ip: IpAddr,
    pub source_port: u16,
    pub destination_ip: IpAddr,
    pub destination_port: u16,
    /// Appliance-defined application label (`UDPv4`, `CIFS`, `FTP-DAT`, ...).
    pub app: String,
    /// Bandwidth reduction percentage, 0..=100.
    pub reduction: u8,
    pub since: Since,
}

impl FlowRecord {
    pub fn is_pre_existing(&self) -> bool {
        matches!(self.since, Since::PreExisting)
    }

    /// True when both endpoints were written as bracketed IPv6 literals.
    pub fn is_ipv6(&self) -> bool {
        self.source_ip.is_ipv6() && self.destination_ip.is_ipv6()
    }
}
