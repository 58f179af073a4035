//! Parser for appliance "show flows" reports.
//!
//! Takes the verbatim text of the command and returns a [`FlowReport`]: the
//! active-flow table as typed [`FlowRecord`]s and the flow-state counters as a
//! flat map of hierarchical category keys.
//!
//! ## What we do
//!
//! - Locate the flow table and the counter summary by their header and rule
//!   lines; a missing marker is a [`ParseError::MissingSection`]
//! - Split each table row into type, endpoints, app, reduction and since, and
//!   coerce them (bracketed endpoint means IPv6, `NN%` means integer percent)
//! - Keep timestamps as the zero-padded text the appliance printed
//! - Rebuild the counter hierarchy from indentation with an explicit stack
//!   and the dialect's fixed key and arity rules
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock-dependent output, no shared mutable state. Same text and
//! config, same result, from any thread.
//!
//! ## Example
//!
//! ```rust
//! use report::{parse_report, Since};
//!
//! let text = "\
//! T  Source                Destination           App     Rdn Since
//! --------------------------------------------------------------------
//! N  10.190.0.1:406        10.190.5.2:1003       UDPv4   99% 2014/02/10 23:58:01
//! --------------------------------------------------------------------
//!                                            All    V4     V6
//! --------------------------------------------------------------------
//! Passthrough :                              11     22     33
//!   Passthrough unintentional (PU):          11     22     33
//!     Packet-mode:                           11     22     33
//! Denied (terminated):                       1
//!
//! Total:                                     11     40     70
//! ";
//!
//! let report = parse_report(text).unwrap();
//! assert_eq!(report.flows_list.len(), 1);
//! assert_eq!(report.flows_list[0].app, "UDPv4");
//! assert!(matches!(report.flows_list[0].since, Since::At(_)));
//!
//! let nested = report.flows_summary.get("passthrough unintentional packet_mode").unwrap();
//! assert_eq!((nested.all, nested.v4, nested.v6), (11, Some(22), Some(33)));
//! assert_eq!(report.total().unwrap().v6, Some(70));
//! ```

mod coerce;
mod config;
mod dialect;
mod error;
mod flow;
mod label;
mod pipeline;
mod report;
mod section;
mod summary;
mod table;

pub use crate::coerce::{
    parse_counter, parse_endpoint, parse_port, parse_reduction, parse_since, PRE_EXISTING,
};
pub use crate::config::{ParserConfig, PARSER_VERSION};
pub use crate::dialect::{Arity, Dialect, Ruleset};
pub use crate::error::{CoerceError, ParseError, Section};
pub use crate::flow::{FlowRecord, FlowType, Since, Timestamp};
pub use crate::label::{collapse_whitespace, normalize_label, Label};
pub use crate::pipeline::{parse_report, parse_report_with_config, FlowReportParser};
pub use crate::report::{CounterTriple, FlowReport, SummaryCounters, TOTAL_KEY};
pub use crate::summary::{parse_counter_line, CounterLine};
pub use crate::table::parse_row;

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    use super::*;

    const FIXTURE: &str = include_str!("../tests/fixtures/show_flows_all.txt");

    fn timestamp(parts: [&str; 6]) -> Since {
        let [year, month, day, hour, min, secs] = parts.map(String::from);
        Since::At(Timestamp {
            year,
            month,
            day,
            hour,
            min,
            secs,
        })
    }

    #[test]
    fn fixture_first_row() {
        let report = parse_report(FIXTURE).expect("fixture parses");
        let first = &report.flows_list[0];

        assert_eq!(first.flow_type, FlowType::PacketMode);
        assert_eq!(first.source_ip, IpAddr::V4(Ipv4Addr::new(10, 190, 0, 1)));
        assert_eq!(first.source_port, 406);
        assert_eq!(first.destination_ip, IpAddr::V4(Ipv4Addr::new(10, 190, 5, 2)));
        assert_eq!(first.destination_port, 1003);
        assert_eq!(first.app, "UDPv4");
        assert_eq!(first.reduction, 99);
        assert_eq!(first.since, timestamp(["2014", "02", "10", "23", "58", "01"]));
    }

    #[test]
    fn fixture_rows_keep_order_and_shape() {
        let report = parse_report(FIXTURE).expect("fixture parses");
        assert_eq!(report.flows_list.len(), 8);

        let apps: Vec<&str> = report.flows_list.iter().map(|f| f.app.as_str()).collect();
        assert_eq!(
            apps,
            vec!["UDPv4", "SRDF_V2", "CIFS", "MAPI", "TCPv4", "FTP-DAT", "FTP-DAT", "UDPv4"]
        );

        for flow in &report.flows_list {
            assert!(flow.reduction <= 100);
            assert_ne!(flow.since.timestamp().is_some(), flow.is_pre_existing());
        }

        let v6 = &report.flows_list[6];
        assert_eq!(
            v6.source_ip,
            IpAddr::V6(Ipv6Addr::new(0x10, 0, 0, 0, 0, 0x190, 0xf0, 0x1))
        );
        assert_eq!(v6.destination_port, 203);

        let last = &report.flows_list[7];
        assert_eq!(last.since, Since::PreExisting);
        assert_eq!(last.source_ip, IpAddr::V4(Ipv4Addr::new(11, 19, 11, 11)));
    }

    #[test]
    fn fixture_summary_matches_reference() {
        let report = parse_report(FIXTURE).expect("fixture parses");
        let t = CounterTriple::triple;
        let expected = [
            ("denied", CounterTriple::single(1)),
            ("discarded", CounterTriple::single(1)),
            ("establishing", t(1, 2, 3)),
            ("forwarded", t(1, 2, 3)),
            ("half_closed optimized", t(11, 22, 33)),
            ("half_opened optimized", t(1, 2, 3)),
            ("established optimized", t(1, 2, 3)),
            ("packet_mode optimized", t(11, 22, 33)),
            ("passthrough", t(11, 22, 33)),
            ("passthrough intentional", t(1, 2, 3)),
            ("passthrough unintentional", t(11, 22, 33)),
            ("passthrough unintentional packet_mode", t(11, 22, 33)),
            ("passthrough unintentional terminated", t(1, 2, 3)),
            ("rios only", t(1, 3, 3)),
            ("rios scps", t(1, 2, 3)),
            ("scps only", t(11, 22, 33)),
            ("tcp proxy", t(1, 2, 3)),
            ("total", t(11, 40, 70)),
        ];

        let expected: SummaryCounters = expected.into_iter().collect();
        assert_eq!(report.flows_summary, expected);
    }

    #[test]
    fn missing_total_line() {
        let text = FIXTURE.replace("Total:", "");
        let res = parse_report(&text);
        assert_eq!(
            res,
            Err(ParseError::MissingSection {
                section: Section::Total
            })
        );
    }

    #[test]
    fn corrupt_percentage_names_row() {
        let text = FIXTURE.replacen("UDPv4   99%", "UDPv4   99X", 1);
        match parse_report(&text) {
            Err(ParseError::MalformedRow {
                row,
                line_no,
                line,
                reason,
            }) => {
                assert_eq!(row, 0);
                assert_eq!(line_no, 3);
                assert!(line.contains("99X"));
                assert_eq!(reason, CoerceError::BadPercentage("99X".into()));
            }
            other => panic!("expected malformed row, got {other:?}"),
        }
    }

    #[test]
    fn parse_is_idempotent() {
        let once = parse_report(FIXTURE).expect("first");
        let twice = parse_report(FIXTURE).expect("second");
        assert_eq!(once, twice);
    }

    #[test]
    fn input_limit_and_config_validation() {
        let cfg = ParserConfig {
            max_input_bytes: Some(16),
            ..Default::default()
        };
        assert_eq!(
            parse_report_with_config(FIXTURE, &cfg),
            Err(ParseError::InputTooLarge {
                len: FIXTURE.len(),
                limit: 16
            })
        );

        let cfg = ParserConfig {
            indent_step: 0,
            ..Default::default()
        };
        assert!(matches!(
            FlowReportParser::new(cfg),
            Err(ParseError::InvalidConfig(_))
        ));
    }

    #[test]
    fn pinned_dialect_and_crlf_input() {
        let parser = FlowReportParser::new(ParserConfig {
            dialect: Some(Dialect::V8_5),
            ..Default::default()
        })
        .expect("valid config");

        let crlf = FIXTURE.replace('\n', "\r\n");
        let report = parser.parse(&crlf).expect("crlf parses");
        assert_eq!(report, parse_report(FIXTURE).expect("lf parses"));
    }

    #[test]
    fn empty_table_is_allowed() {
        let text = "\
T  Source                Destination           App     Rdn Since
--------------------------------------------------------------------------------
--------------------------------------------------------------------------------
                                           All    V4     V6
---------------------------------------------------------------
Total:                                     0      0      0
";
        let report = parse_report(text).expect("empty table");
        assert!(report.flows_list.is_empty());
        assert_eq!(report.total(), Some(&CounterTriple::triple(0, 0, 0)));
    }
}
