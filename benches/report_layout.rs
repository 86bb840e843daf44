//! Report Layout Benchmarks
//!
//! Layout and rendering cost of the table report as the row count grows.
//!
//! Run with: `cargo bench --bench report_layout`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use request_pdf_server::report::{table, FontSupport, ReportGenerator};
use request_pdf_server::request::RequestRecord;

fn records(n: usize) -> Vec<RequestRecord> {
    (0..n)
        .map(|i| {
            RequestRecord::default()
                .with("Request Number", format!("R-{}", i))
                .with("Status", "Processing")
                .with("College", "College of Engineering")
                .with("Department", "Electrical")
                .with("Location", "Building 4")
                .with("Description", "Broken light fixture in the corridor near room 120")
                .with("Request Date", "2024-01-05")
        })
        .collect()
}

fn bench_table_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_layout");
    for size in [10, 100, 1000] {
        let input = records(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| table::layout(black_box(input), "now"))
        });
    }
    group.finish();
}

fn bench_table_render(c: &mut Criterion) {
    let generator = ReportGenerator::new(FontSupport::builtin());
    let mut group = c.benchmark_group("table_render");
    group.sample_size(20);
    for size in [10, 100] {
        let input = records(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| generator.table(black_box(input), "now"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_table_layout, bench_table_render);
criterion_main!(benches);
