use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use report::{parse_report, parse_row};

const FIXTURE: &str = include_str!("../tests/fixtures/show_flows_all.txt");
const ROW: &str = "N  [10::190:f0:1]:146    [10::190:e5:2]:203    FTP-DAT 20% 2014/02/01 10:10:11";

/// Repeat the fixture's data rows so the table holds roughly `rows` flows.
fn widen_table(rows: usize) -> String {
    let (head, rest) = FIXTURE.split_at(FIXTURE.find("N  10.190.0.1:406").expect("first row"));
    let end = rest.find("\n----").expect("table end") + 1;
    let (body, tail) = rest.split_at(end);
    let per_copy = body.lines().count().max(1);
    format!("{head}{}{tail}", body.repeat(rows / per_copy + 1))
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_report");

    for rows in [8usize, 256, 4096].iter() {
        let text = widen_table(*rows);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(format!("rows_{rows}"), |b| {
            b.iter(|| parse_report(black_box(&text)).expect("parse"))
        });
    }

    group.finish();
}

fn bench_row(c: &mut Criterion) {
    c.bench_function("parse_row_ipv6", |b| {
        b.iter(|| parse_row(black_box(ROW)).expect("row"))
    });
}

criterion_group!(benches, bench_parse, bench_row);
criterion_main!(benches);
