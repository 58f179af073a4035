use report::{parse_report, Since};
use std::fs;

fn main() {
    let file_path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/show_flows_all.txt");
    let content = fs::read_to_string(file_path).expect("file path invalid");

    let report = parse_report(&content).expect("report parses");

    for flow in &report.flows_list {
        let since = match &flow.since {
            Since::At(ts) => ts.to_string(),
            Since::PreExisting => "pre-existing".to_string(),
        };
        println!(
            "{:<2} {}:{} -> {}:{} {:<8} {:>3}% since {}",
            flow.flow_type,
            flow.source_ip,
            flow.source_port,
            flow.destination_ip,
            flow.destination_port,
            flow.app,
            flow.reduction,
            since
        );
    }
    let passthrough = report
        .flows_list
        .iter()
        .filter(|f| f.flow_type.is_passthrough())
        .count();
    println!(
        "{} flows, {} optimized, {} passed through",
        report.flows_list.len(),
        report.flows_list.len() - passthrough,
        passthrough
    );
    println!();

    for (key, counters) in &report.flows_summary {
        match (counters.v4, counters.v6) {
            (Some(v4), Some(v6)) => println!("{key:<40} {:>6} {v4:>6} {v6:>6}", counters.all),
            _ => println!("{key:<40} {:>6}", counters.all),
        }
    }
}
