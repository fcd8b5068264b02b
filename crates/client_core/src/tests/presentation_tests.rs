use super::*;
use crate::test_support::{analysis_body, roadmap_body, sample_server};
use shared::domain::{ComputeRecommendation, ComputeSpecs, QuotaUsage, Recommendations};

#[test]
fn formats_bytes_across_units() {
    assert_eq!(format_bytes(500.0), "500.00 B");
    assert_eq!(format_bytes(1024.0), "1.00 KB");
    assert_eq!(format_bytes(1536.0), "1.50 KB");
    assert_eq!(format_bytes(1_073_741_824.0), "1.00 GB");
    assert_eq!(format_bytes(0.0), "0.00 B");
}

#[test]
fn byte_formatting_stops_at_terabytes() {
    let five_pb = 5.0 * 1024f64.powi(5);
    assert_eq!(format_bytes(five_pb), "5120.00 TB");
}

#[test]
fn usage_percentage_rounds_to_one_decimal() {
    let metric = CapacityMetric {
        used: 12288.0,
        total: 16384.0,
    };
    assert_eq!(usage_percentage(&metric), 75.0);

    let metric = CapacityMetric {
        used: 1.0,
        total: 3.0,
    };
    assert_eq!(usage_percentage(&metric), 33.3);
}

#[test]
fn usage_percentage_of_zero_total_is_zero() {
    let metric = CapacityMetric {
        used: 0.0,
        total: 0.0,
    };
    let percentage = usage_percentage(&metric);
    assert_eq!(percentage, 0.0);
    assert!(!percentage.is_nan());
}

#[test]
fn status_buckets_use_exclusive_thresholds() {
    assert_eq!(status_bucket(60.0), StatusBucket::Success);
    assert_eq!(status_bucket(60.1), StatusBucket::Warning);
    assert_eq!(status_bucket(80.0), StatusBucket::Warning);
    assert_eq!(status_bucket(80.1), StatusBucket::Danger);
    assert_eq!(status_bucket(0.0).as_str(), "success");
}

#[test]
fn currency_keeps_explicit_zero_and_placeholders_missing_values() {
    assert_eq!(format_currency(Some(0.0)), "₹0");
    assert_eq!(format_currency(None), PLACEHOLDER);
    assert_eq!(format_currency(Some(1_234_567.5)), "₹1,234,567.5");
    assert_eq!(format_currency(Some(-2500.0)), "₹-2,500");
    assert_eq!(format_currency(Some(999.999)), "₹1,000");
}

#[test]
fn months_render_with_one_decimal() {
    assert_eq!(format_months(Some(12.0)), "12.0 months");
    assert_eq!(format_months(None), PLACEHOLDER);
}

#[test]
fn server_card_summarises_metrics() {
    let server = sample_server("srv-1", "Sample Web Server");
    let card = ServerCard::from_server(&server);

    assert_eq!(card.status_label, "Active");
    assert_eq!(card.status, StatusBucket::Warning);
    assert_eq!(card.os, "Ubuntu 20.04");
    assert_eq!(card.cpu, "4 cores (65% used)");
    assert_eq!(card.memory, "16.00 KB (75.0% used)");
    assert_eq!(card.storage, "500.00 KB (70.0% used)");
}

#[test]
fn analysis_view_exposes_risk_class() {
    let analysis: AnalysisResult =
        serde_json::from_value(analysis_body("Medium")).expect("analysis");
    let view = AnalysisView::from_result(&analysis);

    assert_eq!(view.complexity_score, "6/10");
    assert_eq!(view.risk_class, "medium");
    assert_eq!(view.dependencies.len(), 2);
    assert_eq!(view.dependencies[0].kind, "Database");
}

#[test]
fn estimate_view_uses_placeholders_for_absent_fields() {
    let estimate = CostEstimate {
        current_monthly_cost: Some(0.0),
        recommendations: Some(Recommendations {
            compute: Some(ComputeRecommendation {
                instance_type: Some("t3.large".to_string()),
                specs: Some(ComputeSpecs {
                    cpu: Some(2.0),
                    memory: None,
                }),
                monthly_cost: None,
            }),
            storage: None,
        }),
        ..CostEstimate::default()
    };
    let view = CostEstimateView::from_estimate(&estimate);

    assert_eq!(view.current_monthly_cost, "₹0");
    assert_eq!(view.projected_monthly_cost, PLACEHOLDER);
    assert_eq!(view.instance_type, "t3.large");
    assert_eq!(view.vcpus, "2");
    assert_eq!(view.memory, PLACEHOLDER);
    assert_eq!(view.compute_monthly_cost, PLACEHOLDER);
    assert_eq!(view.storage_type, PLACEHOLDER);
    assert_eq!(view.storage_size, PLACEHOLDER);
    assert_eq!(view.break_even, PLACEHOLDER);
}

#[test]
fn roadmap_view_joins_critical_path() {
    let roadmap: Roadmap = serde_json::from_value(roadmap_body(4)).expect("roadmap");
    let view = RoadmapView::from_roadmap(&roadmap);

    assert_eq!(view.phases.len(), 1);
    assert_eq!(view.phases[0].schedule, "2 weeks (2024-01-01 - 2024-01-14)");
    assert_eq!(view.total_servers, "4");
    assert_eq!(view.total_effort, "480 hours");
    assert_eq!(view.critical_path, "Database Server > Web Server");
}

#[test]
fn quota_lines_carry_service_units() {
    let mut snapshot = QuotaSnapshot::new();
    snapshot.insert(
        "lambda".to_string(),
        QuotaUsage {
            used: 500000.0,
            limit: 1000000.0,
        },
    );
    snapshot.insert(
        "s3".to_string(),
        QuotaUsage {
            used: 2.5,
            limit: 5.0,
        },
    );
    snapshot.insert(
        "custom".to_string(),
        QuotaUsage {
            used: 1.0,
            limit: 2.0,
        },
    );

    let lines = quota_lines(&snapshot);
    let rendered: Vec<(&str, &str)> = lines
        .iter()
        .map(|line| (line.service.as_str(), line.usage.as_str()))
        .collect();
    assert_eq!(
        rendered,
        vec![
            ("custom", "1/2"),
            ("lambda", "500000/1000000 invocations"),
            ("s3", "2.5/5 GB"),
        ]
    );
}
