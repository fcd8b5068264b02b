use serde::{Deserialize, Serialize};

use crate::domain::{Server, ServerId};

pub const API_PREFIX: &str = "/api";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CheckConfig,
    ListServers,
    Analyze,
    Estimate,
    Roadmap,
    UploadTestData,
    UsageQuota,
}

impl Endpoint {
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::CheckConfig => "check-config",
            Endpoint::ListServers => "list-servers",
            Endpoint::Analyze => "analyze",
            Endpoint::Estimate => "estimate",
            Endpoint::Roadmap => "roadmap",
            Endpoint::UploadTestData => "upload-test-data",
            Endpoint::UsageQuota => "usage-quota",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Endpoint::CheckConfig | Endpoint::ListServers | Endpoint::UsageQuota => Method::Get,
            Endpoint::Analyze
            | Endpoint::Estimate
            | Endpoint::Roadmap
            | Endpoint::UploadTestData => Method::Post,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::CheckConfig => "/api/check-config",
            Endpoint::ListServers => "/api/servers",
            Endpoint::Analyze => "/api/analyze",
            Endpoint::Estimate => "/api/estimate",
            Endpoint::Roadmap => "/api/roadmap",
            Endpoint::UploadTestData => "/api/upload-test-data",
            Endpoint::UsageQuota => "/api/free-tier-usage",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerIdRequest {
    pub server_id: ServerId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapRequest {
    pub servers: Vec<Server>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerListResponse {
    pub servers: Vec<Server>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub servers: Vec<Server>,
}
