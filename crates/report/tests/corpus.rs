use report::{parse_report, CoerceError, CounterTriple, FlowType, ParseError, Section};

const FIXTURE: &str = include_str!("fixtures/show_flows_all.txt");

struct Case<'a> {
    name: &'static str,
    input: String,
    expected_rows: usize,
    expected_keys: &'a [(&'static str, CounterTriple)],
}

fn report(rows: &[&str], summary: &[&str]) -> String {
    let rule = "-".repeat(80);
    let mut text = String::new();
    text.push_str("T  Source                Destination           App     Rdn Since\n");
    text.push_str(&rule);
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text.push_str(&rule);
    text.push('\n');
    text.push_str("                                           All    V4     V6\n");
    text.push_str(&"-".repeat(63));
    text.push('\n');
    for line in summary {
        text.push_str(line);
        text.push('\n');
    }
    text
}

#[test]
fn golden_corpus_regression() {
    let cases = [
        Case {
            name: "reference_fixture",
            input: FIXTURE.to_string(),
            expected_rows: 8,
            expected_keys: &[
                ("rios only", CounterTriple::triple(1, 3, 3)),
                ("passthrough unintentional terminated", CounterTriple::triple(1, 2, 3)),
                ("discarded", CounterTriple::single(1)),
                ("total", CounterTriple::triple(11, 40, 70)),
            ],
        },
        Case {
            name: "ipv6_only_table",
            input: report(
                &[
                    "PU [2001:db8::1]:22     [2001:db8::2]:51000   SSH      0% 2015/06/30 07:05:09",
                    "PI [::1]:80             [::1]:8080            HTTP    42% pre_existing",
                ],
                &[
                    "Passthrough :                              2      0      2",
                    "  Passthrough intentional (PI):            1      0      1",
                    "  Passthrough unintentional (PU):          1      0      1",
                    "Total:                                     2      0      2",
                ],
            ),
            expected_rows: 2,
            expected_keys: &[
                ("passthrough", CounterTriple::triple(2, 0, 2)),
                ("passthrough intentional", CounterTriple::triple(1, 0, 1)),
                ("total", CounterTriple::triple(2, 0, 2)),
            ],
        },
        Case {
            name: "deep_nesting_without_blank_lines",
            input: report(
                &["F  10.0.0.1:1            10.0.0.2:2            TCPv4  100% 2020/01/01 00:00:00"],
                &[
                    "Passthrough :                              5      5      0",
                    "  Passthrough unintentional (PU):          5      5      0",
                    "    Terminated:                            3      3      0",
                    "    Packet-mode:                           2      2      0",
                    "Forwarded (F):                             1      1      0",
                    "Total:                                     6      6      0",
                ],
            ),
            expected_rows: 1,
            expected_keys: &[
                ("passthrough unintentional terminated", CounterTriple::triple(3, 3, 0)),
                ("passthrough unintentional packet_mode", CounterTriple::triple(2, 2, 0)),
                ("forwarded", CounterTriple::triple(1, 1, 0)),
            ],
        },
    ];

    for case in cases {
        let parsed = parse_report(&case.input)
            .unwrap_or_else(|e| panic!("case {} failed: {e}", case.name));

        assert_eq!(
            parsed.flows_list.len(),
            case.expected_rows,
            "row count for {}",
            case.name
        );
        for (key, triple) in case.expected_keys {
            assert_eq!(
                parsed.flows_summary.get(key),
                Some(triple),
                "key {key:?} for {}",
                case.name
            );
        }
        // Every report ends in its Total: line.
        assert!(parsed.total().is_some(), "total for {}", case.name);
    }
}

#[test]
fn rejected_inputs() {
    let cases: [(&str, String, fn(&ParseError) -> bool); 4] = [
        (
            "no_total",
            report(&[], &["Forwarded (F):   1 1 0"]),
            |e| {
                *e == ParseError::MissingSection {
                    section: Section::Total,
                }
            },
        ),
        (
            "unbracketed_ipv6",
            report(
                &["N  2001:db8::1:22   2001:db8::2:80   SSH   0% pre_existing"],
                &["Total:   1 0 1"],
            ),
            |e| matches!(e.reason(), Some(CoerceError::BadAddress(_))),
        ),
        (
            "fractional_reduction",
            report(
                &["N  10.0.0.1:1  10.0.0.2:2  TCPv4  12.5% pre_existing"],
                &["Total:   1 1 0"],
            ),
            |e| matches!(e.reason(), Some(CoerceError::FractionalPercentage(_))),
        ),
        (
            "garbage_summary_line",
            report(&[], &["Forwarded (F):   one two three", "Total:   0 0 0"]),
            |e| matches!(e, ParseError::MalformedSummaryLine { .. }),
        ),
    ];

    for (name, input, check) in cases {
        let err = parse_report(&input).expect_err(name);
        assert!(check(&err), "unexpected error for {name}: {err}");
    }
}

#[test]
fn unlisted_flow_type_keeps_the_report() {
    let text = FIXTURE.replacen("N  11.19.11.11:146", "D  11.19.11.11:146", 1);
    let parsed = parse_report(&text).expect("report with a new type code");

    assert_eq!(parsed.flows_list.len(), 8);
    assert_eq!(parsed.flows_list[7].flow_type, FlowType::Other("D".into()));
    assert_eq!(parsed.flows_list[7].source_port, 146);
    assert_eq!(parsed.flows_summary, parse_report(FIXTURE).expect("fixture").flows_summary);
}
