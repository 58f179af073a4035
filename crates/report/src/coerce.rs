//! Text-to-value coercions for report tokens.
//!
//! Each helper takes one token (or the `Since` tokens) and returns a typed
//! value or a [`CoerceError`]. None of them allocate on success beyond the
//! value they return, and none look at anything but their input.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::error::CoerceError;
use crate::flow::{Since, Timestamp};

/// Token the appliance prints instead of a start time.
pub const PRE_EXISTING: &str = "pre_existing";

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse `address:port` or `[address]:port`.
///
/// The bracket is the only thing that selects IPv6; an unbracketed IPv6
/// literal is rejected rather than guessed at.
pub fn parse_endpoint(token: &str) -> Result<(IpAddr, u16), CoerceError> {
    let bad_endpoint = || CoerceError::BadEndpoint(token.to_string());

    let (addr, port) = if let Some(rest) = token.strip_prefix('[') {
        let (addr, port) = rest.split_once("]:").ok_or_else(bad_endpoint)?;
        let addr = Ipv6Addr::from_str(addr)
            .map_err(|_| CoerceError::BadAddress(addr.to_string()))?;
        (IpAddr::V6(addr), port)
    } else {
        let (addr, port) = token.rsplit_once(':').ok_or_else(bad_endpoint)?;
        let addr = Ipv4Addr::from_str(addr)
            .map_err(|_| CoerceError::BadAddress(addr.to_string()))?;
        (IpAddr::V4(addr), port)
    };

    Ok((addr, parse_port(port)?))
}

pub fn parse_port(token: &str) -> Result<u16, CoerceError> {
    if !all_digits(token) {
        return Err(CoerceError::BadPort(token.to_string()));
    }
    token
        .parse::<u16>()
        .map_err(|_| CoerceError::BadPort(token.to_string()))
}

/// Parse a reduction token such as `99%` into `99`.
pub fn parse_reduction(token: &str) -> Result<u8, CoerceError> {
    let bad = || CoerceError::BadPercentage(token.to_string());
    let digits = token.strip_suffix('%').ok_or_else(bad)?;

    if !all_digits(digits) {
        if let Some((whole, frac)) = digits.split_once('.') {
            if all_digits(whole) && all_digits(frac) {
                return Err(CoerceError::FractionalPercentage(token.to_string()));
            }
        }
        return Err(bad());
    }

    let value: u32 = digits.parse().map_err(|_| bad())?;
    u8::try_from(value)
        .ok()
        .filter(|pct| *pct <= 100)
        .ok_or(CoerceError::PercentageOutOfRange(value))
}

/// Parse the `Since` column tokens: `["pre_existing"]` or
/// `["YYYY/MM/DD", "HH:MM:SS"]`.
///
/// Components are kept as the appliance printed them. Only their shape is
/// checked (digits, four-digit year, two digits elsewhere).
pub fn parse_since(tokens: &[&str]) -> Result<Since, CoerceError> {
    match tokens {
        [single] if *single == PRE_EXISTING => Ok(Since::PreExisting),
        [date, time] => {
            let bad = || CoerceError::BadTimestamp(format!("{date} {time}"));
            let [year, month, day] = split_fields(date, '/').ok_or_else(bad)?;
            let [hour, min, secs] = split_fields(time, ':').ok_or_else(bad)?;

            let widths = [
                (year, 4),
                (month, 2),
                (day, 2),
                (hour, 2),
                (min, 2),
                (secs, 2),
            ];
            if !widths
                .iter()
                .all(|(field, width)| field.len() == *width && all_digits(field))
            {
                return Err(bad());
            }

            Ok(Since::At(Timestamp {
                year: year.to_string(),
                month: month.to_string(),
                day: day.to_string(),
                hour: hour.to_string(),
                min: min.to_string(),
                secs: secs.to_string(),
            }))
        }
        other => Err(CoerceError::BadTimestamp(other.join(" "))),
    }
}

fn split_fields(s: &str, sep: char) -> Option<[&str; 3]> {
    let mut parts = s.split(sep);
    let fields = [parts.next()?, parts.next()?, parts.next()?];
    if parts.next().is_some() {
        return None;
    }
    Some(fields)
}

/// Parse one summary counter value.
pub fn parse_counter(token: &str) -> Result<u64, CoerceError> {
    if !all_digits(token) {
        return Err(CoerceError::BadCounter(token.to_string()));
    }
    token
        .parse::<u64>()
        .map_err(|_| CoerceError::BadCounter(token.to_string()))
}
