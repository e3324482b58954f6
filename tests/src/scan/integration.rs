#![cfg(test)]
use battcheck_common::config::ScanConfig;
use battcheck_common::network::address::AddressList;
use battcheck_common::network::source::AddressSource;
use battcheck_core::aggregator::Summary;
use battcheck_core::report::{CsvReport, MemoryReport};
use battcheck_core::scanner::Scan;

use crate::device::{battery_page, page_with_tables, refused_address, MockDevice};

fn test_config() -> ScanConfig {
    ScanConfig {
        timeout_secs: 5,
        workers: 4,
        ..ScanConfig::default()
    }
}

/// The mock device only speaks plain HTTP, so this exercises the
/// HTTPS attempt, the mismatch detection and the HTTP retry.
#[tokio::test]
async fn plain_http_device_is_reached_through_fallback() {
    let device = MockDevice::serve(battery_page("Good", "35 degrees Celsius")).await;
    let list: AddressList = [device.address()].iter().collect();

    let cfg: ScanConfig = test_config();
    let mut report = MemoryReport::new();
    let summary: Summary = Scan::new(&cfg).run(&list, &mut report).await.unwrap();

    assert_eq!(summary.good, 1, "device not read: {:?}", report.all);
    assert_eq!(summary.unreachable, 0);
    assert_eq!(report.all[0].health, "Good");
    assert_eq!(report.all[0].temperature, "35 degrees Celsius");
    assert!(report.bad.is_empty());
}

#[tokio::test]
async fn refused_connection_is_unknown() {
    let address: String = refused_address().await;
    let list: AddressList = [address.as_str()].into_iter().collect();

    let cfg: ScanConfig = test_config();
    let mut report = MemoryReport::new();
    let summary: Summary = Scan::new(&cfg).run(&list, &mut report).await.unwrap();

    assert_eq!(summary.bad, 1);
    assert_eq!(summary.unreachable, 1);
    assert_eq!(summary.hightemp, 0);
    assert!(report.in_bad(&address));
    assert_eq!(report.bad[0].health, "Unknown");
    assert_eq!(report.bad[0].temperature, "");
}

#[tokio::test]
async fn only_the_third_table_is_read() {
    let page: String = page_with_tables(&[
        "<tr><td>Battery health</td><td>Replace</td></tr>",
        "<tr><td>Battery temperature: </td><td>80 degrees Celsius</td></tr>",
        "<tr><td>Battery health</td><td>Good</td></tr>",
    ]);
    let device = MockDevice::serve(page).await;
    let list: AddressList = [device.address()].iter().collect();

    let cfg: ScanConfig = test_config();
    let mut report = MemoryReport::new();
    let summary: Summary = Scan::new(&cfg).run(&list, &mut report).await.unwrap();

    assert_eq!(summary.good, 1);
    assert_eq!(summary.hightemp, 0);
    assert_eq!(report.all[0].temperature, "");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn mixed_fleet_from_file_to_csv() {
    let cool = MockDevice::serve(battery_page("Good", "31.5 degrees Celsius")).await;
    let hot = MockDevice::serve(battery_page("Good", "61 degrees Celsius")).await;
    let worn = MockDevice::serve(battery_page("Replace soon", "40 degrees Celsius")).await;
    let dead: String = refused_address().await;

    let dir = tempfile::tempdir().unwrap();
    let infile = dir.path().join("phones.txt");
    let content: String = format!(
        "{}\n{}\nnot-an-ip\n\n{}\n{}\n",
        cool.address(),
        hot.address(),
        worn.address(),
        dead
    );
    std::fs::write(&infile, content).unwrap();

    let list: AddressList = AddressSource::File(infile).load().unwrap();
    assert_eq!(list.valid_count(), 4);
    assert_eq!(list.invalid_count(), 2, "the malformed and the blank line");

    let cfg: ScanConfig = test_config();
    let mut report: CsvReport = CsvReport::create(dir.path(), "20240101-120000").unwrap();
    let summary: Summary = Scan::new(&cfg).run(&list, &mut report).await.unwrap();

    assert_eq!(
        summary,
        Summary {
            valid: 4,
            invalid: 2,
            good: 2,
            bad: 2,
            unreachable: 1,
            hightemp: 1,
            parse_errors: 0,
        }
    );
    assert_eq!(summary.health_failures(), 0);

    let all: String = std::fs::read_to_string(dir.path().join("20240101-120000-ALL.csv")).unwrap();
    let bad: String = std::fs::read_to_string(dir.path().join("20240101-120000-BAD.csv")).unwrap();

    assert!(all.starts_with("IP Address, Battery Health, Battery Temp\n"));
    assert_eq!(all.lines().count(), 5);
    assert!(all.contains(&format!("{},Good,31.5 degrees Celsius\n", cool.address())));

    assert!(bad.starts_with("IP Address, Battery Health, Battery Temp\n"));
    assert_eq!(bad.lines().count(), 4);
    assert!(!bad.contains(&cool.address()));
    assert!(bad.contains(&format!("{},Good,61 degrees Celsius\n", hot.address())));
    assert!(bad.contains(&format!("{},Replace soon,40 degrees Celsius\n", worn.address())));
    assert!(bad.contains(&format!("{dead},Unknown,\n")));
}

#[tokio::test]
async fn threshold_controls_escalation() {
    let device = MockDevice::serve(battery_page("Good", "42.5 degrees Celsius")).await;
    let list: AddressList = [device.address()].iter().collect();

    for (threshold, escalated) in [(50.0, false), (40.0, true)] {
        let cfg = ScanConfig {
            temp_threshold: threshold,
            ..test_config()
        };
        let mut report = MemoryReport::new();
        let summary: Summary = Scan::new(&cfg).run(&list, &mut report).await.unwrap();

        assert_eq!(summary.good, 1);
        assert_eq!(summary.hightemp == 1, escalated);
        assert_eq!(report.bad.len() == 1, escalated);
    }
}
