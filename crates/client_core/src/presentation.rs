use shared::domain::{
    AnalysisResult, CapacityMetric, CostEstimate, QuotaSnapshot, Roadmap, Server,
};

pub const PLACEHOLDER: &str = "N/A";
pub const CURRENCY_SYMBOL: &str = "₹";

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBucket {
    Success,
    Warning,
    Danger,
}

impl StatusBucket {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusBucket::Success => "success",
            StatusBucket::Warning => "warning",
            StatusBucket::Danger => "danger",
        }
    }
}

pub fn format_bytes(bytes: f64) -> String {
    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", BYTE_UNITS[unit])
}

/// `used / total * 100` rounded to one decimal; zero when `total` is zero.
pub fn usage_percentage(metric: &CapacityMetric) -> f64 {
    if metric.total == 0.0 {
        return 0.0;
    }
    round_to(metric.used / metric.total * 100.0, 1)
}

/// Thresholds are exclusive: exactly 80 is a warning, exactly 60 a success.
pub fn status_bucket(cpu_utilization: f64) -> StatusBucket {
    if cpu_utilization > 80.0 {
        StatusBucket::Danger
    } else if cpu_utilization > 60.0 {
        StatusBucket::Warning
    } else {
        StatusBucket::Success
    }
}

pub fn format_currency(amount: Option<f64>) -> String {
    match amount {
        Some(amount) => format!("{CURRENCY_SYMBOL}{}", format_grouped(amount)),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn format_months(months: Option<f64>) -> String {
    match months {
        Some(months) => format!("{months:.1} months"),
        None => PLACEHOLDER.to_string(),
    }
}

fn format_quantity(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(value) => format!("{}{suffix}", format_plain(value)),
        None => PLACEHOLDER.to_string(),
    }
}

fn text_or_placeholder(value: Option<&str>) -> String {
    value
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn format_plain(value: f64) -> String {
    let text = format!("{:.2}", round_to(value, 2));
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn format_grouped(value: f64) -> String {
    let plain = format_plain(value);
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerCard {
    pub id: String,
    pub name: String,
    pub status_label: String,
    pub status: StatusBucket,
    pub server_type: String,
    pub os: String,
    pub cpu: String,
    pub memory: String,
    pub storage: String,
}

impl ServerCard {
    pub fn from_server(server: &Server) -> Self {
        let metrics = &server.metrics;
        Self {
            id: server.id.to_string(),
            name: server.name.clone(),
            status_label: server
                .status
                .clone()
                .unwrap_or_else(|| "Active".to_string()),
            status: status_bucket(metrics.cpu.utilization),
            server_type: server.server_type.clone(),
            os: format!("{} {}", server.os_name, server.os_version),
            cpu: format!(
                "{} cores ({}% used)",
                metrics.cpu.cores,
                format_plain(metrics.cpu.utilization)
            ),
            memory: capacity_line(&metrics.memory),
            storage: capacity_line(&metrics.storage),
        }
    }
}

fn capacity_line(metric: &CapacityMetric) -> String {
    format!(
        "{} ({:.1}% used)",
        format_bytes(metric.total),
        usage_percentage(metric)
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct DependencyLine {
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisView {
    pub complexity_level: String,
    pub complexity_score: String,
    pub complexity_description: String,
    pub strategy: String,
    pub risk_level: String,
    pub risk_class: String,
    pub strategy_description: String,
    pub dependencies: Vec<DependencyLine>,
}

impl AnalysisView {
    pub fn from_result(analysis: &AnalysisResult) -> Self {
        let strategy = &analysis.migration_strategy;
        Self {
            complexity_level: analysis.complexity.level.clone(),
            complexity_score: format!("{}/10", format_plain(analysis.complexity.score)),
            complexity_description: analysis.complexity.description.clone(),
            strategy: strategy.strategy.clone(),
            risk_level: strategy.risk_level.clone(),
            risk_class: strategy.risk_level.to_ascii_lowercase(),
            strategy_description: strategy.description.clone(),
            dependencies: analysis
                .dependencies
                .iter()
                .map(|dep| DependencyLine {
                    kind: dep.kind.clone(),
                    name: dep.name.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostEstimateView {
    pub current_monthly_cost: String,
    pub projected_monthly_cost: String,
    pub monthly_savings: String,
    pub instance_type: String,
    pub vcpus: String,
    pub memory: String,
    pub compute_monthly_cost: String,
    pub storage_type: String,
    pub storage_size: String,
    pub storage_monthly_cost: String,
    pub migration_cost: String,
    pub break_even: String,
    pub three_year_savings: String,
}

impl CostEstimateView {
    pub fn from_estimate(estimate: &CostEstimate) -> Self {
        let recommendations = estimate.recommendations.as_ref();
        let compute = recommendations.and_then(|r| r.compute.as_ref());
        let specs = compute.and_then(|c| c.specs.as_ref());
        let storage = recommendations.and_then(|r| r.storage.as_ref());

        Self {
            current_monthly_cost: format_currency(estimate.current_monthly_cost),
            projected_monthly_cost: format_currency(estimate.projected_monthly_cost),
            monthly_savings: format_currency(estimate.monthly_savings),
            instance_type: text_or_placeholder(compute.and_then(|c| c.instance_type.as_deref())),
            vcpus: format_quantity(specs.and_then(|s| s.cpu), ""),
            memory: format_quantity(specs.and_then(|s| s.memory), " GB"),
            compute_monthly_cost: format_currency(compute.and_then(|c| c.monthly_cost)),
            storage_type: text_or_placeholder(storage.and_then(|s| s.kind.as_deref())),
            storage_size: format_quantity(storage.and_then(|s| s.size_gb), " GB"),
            storage_monthly_cost: format_currency(storage.and_then(|s| s.monthly_cost)),
            migration_cost: format_currency(estimate.migration_cost),
            break_even: format_months(estimate.roi_months),
            three_year_savings: format_currency(estimate.three_year_savings),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseView {
    pub name: String,
    pub schedule: String,
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoadmapView {
    pub phases: Vec<PhaseView>,
    pub total_duration: String,
    pub total_servers: String,
    pub total_effort: String,
    pub critical_path: String,
}

impl RoadmapView {
    pub fn from_roadmap(roadmap: &Roadmap) -> Self {
        let summary = &roadmap.project_summary;
        Self {
            phases: roadmap
                .timeline
                .iter()
                .map(|phase| PhaseView {
                    name: phase.name.clone(),
                    schedule: format!(
                        "{} ({} - {})",
                        phase.duration, phase.start_date, phase.end_date
                    ),
                    tasks: phase.tasks.clone(),
                })
                .collect(),
            total_duration: summary.duration.clone(),
            total_servers: summary.total_servers.to_string(),
            total_effort: format!("{} hours", format_plain(summary.total_effort)),
            critical_path: summary.critical_path.join(" > "),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuotaLine {
    pub service: String,
    pub usage: String,
}

pub fn quota_lines(snapshot: &QuotaSnapshot) -> Vec<QuotaLine> {
    snapshot
        .iter()
        .map(|(service, usage)| QuotaLine {
            service: service.clone(),
            usage: format!(
                "{}/{} {}",
                format_plain(usage.used),
                format_plain(usage.limit),
                quota_unit(service)
            )
            .trim_end()
            .to_string(),
        })
        .collect()
}

fn quota_unit(service: &str) -> &'static str {
    match service {
        "lambda" => "invocations",
        "s3" | "dynamodb" => "GB",
        "apiGateway" => "calls",
        _ => "",
    }
}

#[cfg(test)]
#[path = "tests/presentation_tests.rs"]
mod tests;
