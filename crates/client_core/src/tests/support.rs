use async_trait::async_trait;
use serde_json::{json, Value};
use shared::{
    domain::{Server, ServerId},
    protocol::Endpoint,
};
use tokio::sync::{mpsc, oneshot};

use crate::{
    error::TransportError,
    transport::{Transport, UploadFile},
};

pub(crate) fn server_json(id: &str, name: &str, cpu_utilization: f64) -> Value {
    json!({
        "serverId": id,
        "serverName": name,
        "serverType": "Linux",
        "osName": "Ubuntu",
        "osVersion": "20.04",
        "metrics": {
            "cpu": {"cores": 4, "utilization": cpu_utilization},
            "memory": {"total": 16384, "used": 12288},
            "storage": {"total": 512000, "used": 358400}
        }
    })
}

pub(crate) fn sample_server(id: &str, name: &str) -> Server {
    serde_json::from_value(server_json(id, name, 65.0)).expect("sample server")
}

pub(crate) fn servers_body(ids: &[&str]) -> Value {
    let servers: Vec<Value> = ids
        .iter()
        .map(|id| server_json(id, &format!("{id}-host"), 50.0))
        .collect();
    json!({ "servers": servers })
}

pub(crate) fn analysis_body(level: &str) -> Value {
    json!({
        "complexity": {"level": level, "score": 6, "description": "custom configuration"},
        "migrationStrategy": {
            "strategy": "Re-platform",
            "risk_level": "Medium",
            "description": "adopt managed services"
        },
        "dependencies": [
            {"name": "MySQL Database", "type": "Database"},
            {"name": "Redis Cache", "type": "Cache"}
        ]
    })
}

pub(crate) fn estimate_body(current_monthly_cost: f64) -> Value {
    json!({
        "currentMonthlyCost": current_monthly_cost,
        "projectedMonthlyCost": 8000,
        "monthlySavings": current_monthly_cost - 8000.0,
        "migrationCost": 50000,
        "roiMonths": 12.5,
        "threeYearSavings": 100000
    })
}

pub(crate) fn roadmap_body(total_servers: u32) -> Value {
    json!({
        "timeline": [{
            "name": "Assessment Phase",
            "duration": "2 weeks",
            "startDate": "2024-01-01",
            "endDate": "2024-01-14",
            "tasks": ["Infrastructure assessment", "Dependency mapping"]
        }],
        "projectSummary": {
            "duration": "77 days",
            "totalServers": total_servers,
            "totalEffort": 480,
            "criticalPath": ["Database Server", "Web Server"]
        }
    })
}

/// A request the scripted transport is holding until the test answers it.
pub(crate) struct PendingCall {
    pub endpoint: Endpoint,
    pub body: Option<Value>,
    reply: oneshot::Sender<Result<Value, TransportError>>,
}

impl PendingCall {
    pub fn server_id(&self) -> Option<ServerId> {
        self.body
            .as_ref()?
            .get("serverId")?
            .as_str()
            .map(ServerId::from)
    }

    pub fn respond(self, body: Value) {
        let _ = self.reply.send(Ok(body));
    }

    pub fn fail(self, err: TransportError) {
        let _ = self.reply.send(Err(err));
    }
}

pub(crate) struct ScriptedTransport {
    calls: mpsc::UnboundedSender<PendingCall>,
}

impl ScriptedTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PendingCall>) {
        let (calls, rx) = mpsc::unbounded_channel();
        (Self { calls }, rx)
    }

    async fn hold(&self, endpoint: Endpoint, body: Option<Value>) -> Result<Value, TransportError> {
        let (reply, answer) = oneshot::channel();
        self.calls
            .send(PendingCall {
                endpoint,
                body,
                reply,
            })
            .map_err(|_| TransportError::network("scripted transport closed"))?;
        answer
            .await
            .map_err(|_| TransportError::network("scripted call dropped"))?
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(
        &self,
        endpoint: Endpoint,
        body: Option<Value>,
    ) -> Result<Value, TransportError> {
        self.hold(endpoint, body).await
    }

    async fn upload(&self, endpoint: Endpoint, file: UploadFile) -> Result<Value, TransportError> {
        let body = json!({ "fileName": file.file_name, "size": file.bytes.len() });
        self.hold(endpoint, Some(body)).await
    }
}

/// Receives the next held call, failing the test if none arrives.
pub(crate) async fn next_call(calls: &mut mpsc::UnboundedReceiver<PendingCall>) -> PendingCall {
    tokio::time::timeout(std::time::Duration::from_secs(5), calls.recv())
        .await
        .expect("timed out waiting for a request")
        .expect("transport closed")
}
