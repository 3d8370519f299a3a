use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;

use crate::compliance::ComplianceType;
use crate::event::InvokingEvent;

/// Logging handle handed to the evaluator; tags records with the invocation.
#[derive(Debug, Clone)]
pub struct EvaluationLogger {
    request_id: String,
    resource_id: String,
}

impl EvaluationLogger {
    pub fn new(request_id: &str, resource_id: &str) -> Self {
        EvaluationLogger {
            request_id: request_id.to_string(),
            resource_id: resource_id.to_string(),
        }
    }

    pub fn debug(&self, message: &str) {
        debug!("[{}] {}: {}", self.request_id, self.resource_id, message);
    }

    pub fn info(&self, message: &str) {
        info!("[{}] {}: {}", self.request_id, self.resource_id, message);
    }
}

#[async_trait]
pub trait EvaluateCompliance: Send + Sync {
    async fn evaluate_compliance(
        &self,
        invoking_event: &InvokingEvent,
        rule_parameters: &Value,
        logger: &EvaluationLogger,
    ) -> anyhow::Result<ComplianceType>;
}

/// Rule logic for this deployment.
pub struct RuleCode;

#[async_trait]
impl EvaluateCompliance for RuleCode {
    async fn evaluate_compliance(
        &self,
        invoking_event: &InvokingEvent,
        rule_parameters: &Value,
        logger: &EvaluationLogger,
    ) -> anyhow::Result<ComplianceType> {
        logger.info("Beginning Custom Config Rule Evaluation");
        logger.debug(&format!("rule parameters: {}", rule_parameters));

        // Fill in the compliance check here.

        Err(anyhow::anyhow!(
            "no compliance logic has been provided for {} notifications",
            invoking_event.message_type
        ))
    }
}
