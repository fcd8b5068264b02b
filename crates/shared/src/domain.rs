use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Deserializer, Serialize};

macro_rules! text_id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

text_id_newtype!(ServerId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    #[serde(rename = "serverId", alias = "id")]
    pub id: ServerId,
    #[serde(rename = "serverName", alias = "name")]
    pub name: String,
    #[serde(rename = "serverType", alias = "type")]
    pub server_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "osName")]
    pub os_name: String,
    #[serde(rename = "osVersion")]
    pub os_version: String,
    pub metrics: ServerMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerMetrics {
    pub cpu: CpuMetrics,
    pub memory: CapacityMetric,
    pub storage: CapacityMetric,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpuMetrics {
    pub cores: u32,
    pub utilization: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityMetric {
    pub used: f64,
    pub total: f64,
}

impl CapacityMetric {
    pub fn is_overcommitted(&self) -> bool {
        self.used > self.total
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub complexity: Complexity,
    pub migration_strategy: MigrationStrategy,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complexity {
    pub level: String,
    pub score: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationStrategy {
    pub strategy: String,
    #[serde(rename = "risk_level", alias = "riskLevel")]
    pub risk_level: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    #[serde(default)]
    pub current_monthly_cost: Option<f64>,
    #[serde(default)]
    pub projected_monthly_cost: Option<f64>,
    #[serde(default)]
    pub monthly_savings: Option<f64>,
    #[serde(default)]
    pub migration_cost: Option<f64>,
    #[serde(default, alias = "breakEvenMonths")]
    pub roi_months: Option<f64>,
    #[serde(default)]
    pub three_year_savings: Option<f64>,
    #[serde(default)]
    pub recommendations: Option<Recommendations>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub compute: Option<ComputeRecommendation>,
    #[serde(default)]
    pub storage: Option<StorageRecommendation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRecommendation {
    #[serde(default)]
    pub instance_type: Option<String>,
    #[serde(default)]
    pub specs: Option<ComputeSpecs>,
    #[serde(default)]
    pub monthly_cost: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputeSpecs {
    #[serde(default)]
    pub cpu: Option<f64>,
    #[serde(default)]
    pub memory: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageRecommendation {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, rename = "sizeGB")]
    pub size_gb: Option<f64>,
    #[serde(default, rename = "monthlyCost")]
    pub monthly_cost: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    #[serde(alias = "phases")]
    pub timeline: Vec<Phase>,
    pub project_summary: ProjectSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub name: String,
    #[serde(deserialize_with = "text_or_number")]
    pub duration: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    #[serde(deserialize_with = "text_or_number")]
    pub duration: String,
    pub total_servers: u32,
    #[serde(alias = "totalEffortHours")]
    pub total_effort: f64,
    #[serde(default)]
    pub critical_path: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuotaUsage {
    pub used: f64,
    pub limit: f64,
}

pub type QuotaSnapshot = BTreeMap<String, QuotaUsage>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigStatus {
    pub configured: bool,
    pub mode: String,
}

impl ConfigStatus {
    pub fn is_test_mode(&self) -> bool {
        self.mode.eq_ignore_ascii_case("test")
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => format!("{number} days"),
    })
}
