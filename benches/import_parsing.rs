//! Benchmark suite for the client importer
//!
//! Compares parsing a structured report, a tabular export and free text of
//! the same clients, and the full import into an in-memory registry.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! Inputs are generated in memory, so no fixture files are needed.

use bank_clients::io::{parse_text, write_structured, write_tabular};
use bank_clients::{create_client, BankService, Category, ClientRecord, InMemoryGateway};
use chrono::NaiveDate;
use divan::Bencher;
use rust_decimal::Decimal;

const SIZES: [usize; 3] = [100, 1_000, 10_000];

fn main() {
    divan::main();
}

fn clients(count: usize) -> Vec<ClientRecord> {
    (0..count)
        .map(|i| {
            let category = Category::ALL[i % Category::ALL.len()];
            let principal = Decimal::new(100_000 + (i as i64) * 37, 2);
            create_client(category, "Ivan Petrov", &format!("{:010}", i), principal)
                .expect("valid generated client")
        })
        .collect()
}

fn structured_report(count: usize) -> String {
    let exported_at = NaiveDate::from_ymd_opt(2026, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid timestamp");
    let mut output = Vec::new();
    write_structured(&clients(count), exported_at, &mut output).expect("export failed");
    String::from_utf8(output).expect("utf-8 export")
}

fn tabular_export(count: usize) -> String {
    let mut output = Vec::new();
    write_tabular(&clients(count), &mut output).expect("export failed");
    String::from_utf8(output).expect("utf-8 export")
}

fn free_text(count: usize) -> String {
    (0..count)
        .map(|i| format!("Ivan Petrov\nvip client\ndoc {:010}\ndeposit {} rub\n\n", i, 1000 + i))
        .collect()
}

/// Parse a structured report into candidates
#[divan::bench(args = SIZES)]
fn parse_structured(bencher: Bencher, count: usize) {
    let text = structured_report(count);
    bencher.bench(|| parse_text(divan::black_box(&text)));
}

/// Parse a tabular export into candidates
#[divan::bench(args = SIZES)]
fn parse_tabular(bencher: Bencher, count: usize) {
    let text = tabular_export(count);
    bencher.bench(|| parse_text(divan::black_box(&text)));
}

/// Parse unlabeled free text into candidates
#[divan::bench(args = SIZES)]
fn parse_free_text(bencher: Bencher, count: usize) {
    let text = free_text(count);
    bencher.bench(|| parse_text(divan::black_box(&text)));
}

/// Full import of a structured report into an empty in-memory registry
#[divan::bench(args = [100, 1_000])]
fn import_structured(bencher: Bencher, count: usize) {
    let text = structured_report(count);
    bencher.bench(|| {
        let mut bank = BankService::open(InMemoryGateway::new()).expect("open failed");
        bank.import_text(divan::black_box(&text))
    });
}
