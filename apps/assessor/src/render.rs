use std::fmt::Write;

use client_core::{
    presentation::{AnalysisView, CostEstimateView, QuotaLine, RoadmapView, ServerCard},
    Notification, NotificationKind,
};

pub fn server_card(card: &ServerCard) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} [{}] {} ({})",
        card.name,
        card.id,
        card.status_label,
        card.status.as_str()
    );
    let _ = writeln!(out, "  type:    {}", card.server_type);
    let _ = writeln!(out, "  os:      {}", card.os);
    let _ = writeln!(out, "  cpu:     {}", card.cpu);
    let _ = writeln!(out, "  memory:  {}", card.memory);
    let _ = write!(out, "  storage: {}", card.storage);
    out
}

pub fn analysis(view: &AnalysisView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Complexity: {} ({})",
        view.complexity_level, view.complexity_score
    );
    let _ = writeln!(out, "  {}", view.complexity_description);
    let _ = writeln!(
        out,
        "Strategy: {} (risk: {})",
        view.strategy, view.risk_level
    );
    let _ = writeln!(out, "  {}", view.strategy_description);
    if view.dependencies.is_empty() {
        let _ = write!(out, "Dependencies: none");
    } else {
        let _ = write!(out, "Dependencies:");
        for dep in &view.dependencies {
            let _ = write!(out, "\n  - {}: {}", dep.kind, dep.name);
        }
    }
    out
}

pub fn estimate(view: &CostEstimateView) -> String {
    let rows = [
        ("Current monthly cost", &view.current_monthly_cost),
        ("Projected monthly cost", &view.projected_monthly_cost),
        ("Monthly savings", &view.monthly_savings),
        ("Instance type", &view.instance_type),
        ("vCPUs", &view.vcpus),
        ("Memory", &view.memory),
        ("Compute monthly cost", &view.compute_monthly_cost),
        ("Storage type", &view.storage_type),
        ("Storage size", &view.storage_size),
        ("Storage monthly cost", &view.storage_monthly_cost),
        ("Migration cost", &view.migration_cost),
        ("Break-even", &view.break_even),
        ("3-year savings", &view.three_year_savings),
    ];
    rows.iter()
        .map(|(label, value)| format!("{label:<24}{value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn roadmap(view: &RoadmapView) -> String {
    let mut out = String::new();
    for (index, phase) in view.phases.iter().enumerate() {
        let _ = writeln!(out, "{}. {} {}", index + 1, phase.name, phase.schedule);
        for task in &phase.tasks {
            let _ = writeln!(out, "   - {task}");
        }
    }
    let _ = writeln!(out, "Total duration: {}", view.total_duration);
    let _ = writeln!(out, "Servers: {}", view.total_servers);
    let _ = writeln!(out, "Effort: {}", view.total_effort);
    let _ = write!(out, "Critical path: {}", view.critical_path);
    out
}

pub fn quota(lines: &[QuotaLine]) -> String {
    if lines.is_empty() {
        return "no quota data".to_string();
    }
    lines
        .iter()
        .map(|line| format!("{:<12}{}", line.service, line.usage))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn notification(entry: &Notification) -> String {
    let tag = match entry.kind {
        NotificationKind::Info => "info",
        NotificationKind::Error => "error",
    };
    format!("[{tag}] {}", entry.message)
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
