use tracing::warn;

use crate::coerce::{parse_endpoint, parse_reduction, parse_since};
use crate::error::{CoerceError, ParseError};
use crate::flow::{FlowRecord, FlowType};
use crate::section::Line;

/// Parse one flow-table data row.
///
/// The row is split on whitespace into type, source, destination, app,
/// reduction and since; since is either `pre_existing` or a date and a time
/// token, so a valid row has 6 or 7 fields.
///
/// ```rust
/// use report::{parse_row, FlowType};
///
/// let rec = parse_row("N  10.190.0.1:406  10.190.5.2:1003  UDPv4  99% 2014/02/10 23:58:01")
///     .expect("row parses");
/// assert_eq!(rec.flow_type, FlowType::PacketMode);
/// assert_eq!(rec.source_port, 406);
/// assert_eq!(rec.reduction, 99);
/// ```
pub fn parse_row(line: &str) -> Result<FlowRecord, CoerceError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [flow_type, source, destination, app, reduction, since @ ..] = fields.as_slice() else {
        return Err(CoerceError::FieldCount {
            found: fields.len(),
        });
    };
    if !(1..=2).contains(&since.len()) {
        return Err(CoerceError::FieldCount {
            found: fields.len(),
        });
    }

    let flow_type: FlowType = flow_type.parse()?;
    let (source_ip, source_port) = parse_endpoint(source)?;
    let (destination_ip, destination_port) = parse_endpoint(destination)?;
    let reduction = parse_reduction(reduction)?;
    let since = parse_since(since)?;

    Ok(FlowRecord {
        flow_type,
        source_ip,
        source_port,
        destination_ip,
        destination_port,
        app: (*app).to_string(),
        reduction,
        since,
    })
}

/// Parse every data row of the table block, in order.
///
/// Blank lines inside the block are skipped and do not count as rows. The
/// first bad row fails the whole table.
pub(crate) fn parse_rows(rows: &[Line<'_>]) -> Result<Vec<FlowRecord>, ParseError> {
    let mut records = Vec::with_capacity(rows.len());
    for line in rows.iter().filter(|l| !l.is_blank()) {
        let record = parse_row(line.text).map_err(|reason| ParseError::MalformedRow {
            row: records.len(),
            line_no: line.no,
            line: line.text.to_string(),
            reason,
        })?;
        if !record.flow_type.is_known() {
            warn!(
                code = %record.flow_type,
                line_no = line.no,
                "flow_type_unrecognized"
            );
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use super::*;
    use crate::flow::Since;
    use crate::section::number_lines;

    #[test]
    fn pre_existing_row() {
        let rec = parse_row("N  11.19.11.11:146       10.190.11.11:3003     UDPv4    0% pre_existing")
            .expect("row");
        assert_eq!(rec.source_ip, IpAddr::V4(Ipv4Addr::new(11, 19, 11, 11)));
        assert_eq!(rec.destination_port, 3003);
        assert_eq!(rec.app, "UDPv4");
        assert_eq!(rec.reduction, 0);
        assert_eq!(rec.since, Since::PreExisting);
        assert!(rec.is_pre_existing());
    }

    #[test]
    fn ipv6_row() {
        let rec = parse_row("N  [10::190:f0:1]:146    [10::190:e5:2]:203    FTP-DAT 20% 2014/02/01 10:10:11")
            .expect("row");
        assert!(rec.is_ipv6());
        assert_eq!(rec.destination_ip, "10::190:e5:2".parse::<IpAddr>().expect("literal"));
        assert_eq!(rec.app, "FTP-DAT");
        let ts = rec.since.timestamp().expect("timestamp");
        assert_eq!((ts.hour.as_str(), ts.min.as_str(), ts.secs.as_str()), ("10", "10", "11"));
    }

    #[test]
    fn field_count_is_checked() {
        assert_eq!(
            parse_row("N 10.0.0.1:1 10.0.0.2:2 TCPv4 5%"),
            Err(CoerceError::FieldCount { found: 5 })
        );
        assert_eq!(
            parse_row("N 10.0.0.1:1 10.0.0.2:2 TCPv4 5% 2014/02/01 00:00:01 extra"),
            Err(CoerceError::FieldCount { found: 8 })
        );
        assert_eq!(parse_row(""), Err(CoerceError::FieldCount { found: 0 }));
    }

    #[test]
    fn unlisted_type_code_is_kept() {
        let rec = parse_row("Z 10.0.0.1:1 10.0.0.2:2 TCPv4 5% pre_existing").expect("row");
        assert_eq!(rec.flow_type, FlowType::Other("Z".into()));
        assert_eq!(rec.reduction, 5);

        let json = serde_json::to_value(&rec).expect("json");
        assert_eq!(json["type"], "Z");
        let back: FlowRecord = serde_json::from_value(json).expect("record");
        assert_eq!(back, rec);
    }

    #[test]
    fn bad_row_is_reported_with_its_index() {
        let text = "\
O  192.168.0.1:80        192.168.5.1:80        SRDF_V2 11% 2014/02/01 00:00:01

N  10.190.0.1:406        10.190.5.2:1003       UDPv4   99X 2014/02/10 23:58:01
";
        let lines = number_lines(text);
        let err = parse_rows(&lines).expect_err("bad percentage");
        assert_eq!(
            err,
            ParseError::MalformedRow {
                row: 1,
                line_no: 3,
                line: lines[2].text.to_string(),
                reason: CoerceError::BadPercentage("99X".into()),
            }
        );
    }
}
