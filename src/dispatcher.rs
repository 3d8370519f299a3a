use log::{debug, info};

use crate::compliance::{parse_capture_time, ComplianceType, EvaluationResult};
use crate::config_evaluation_client::Report;
use crate::error::RuleHandlerError;
use crate::evaluator::{EvaluateCompliance, EvaluationLogger};
use crate::event::ConfigEvent;

/// Runs one AWS Config rule invocation: parse, classify, evaluate, report.
pub struct RuleDispatcher<E, R> {
    evaluator: E,
    reporter: R,
}

impl<E, R> RuleDispatcher<E, R>
where
    E: EvaluateCompliance,
    R: Report,
{
    pub fn new(evaluator: E, reporter: R) -> Self {
        RuleDispatcher {
            evaluator,
            reporter,
        }
    }

    pub async fn handle(
        &self,
        event: &ConfigEvent,
        request_id: &str,
    ) -> Result<EvaluationResult, RuleHandlerError> {
        let rule_parameters = event.parse_rule_parameters()?;
        let invoking_event = event.parse_invoking_event()?;
        info!(
            "[{}] {} for rule {} in account {}",
            request_id,
            invoking_event.message_type,
            event.config_rule_name.as_deref().unwrap_or("-"),
            event.account_id.as_deref().unwrap_or("-")
        );
        invoking_event.ensure_compatible()?;
        let configuration_item = invoking_event.configuration_item()?;

        let compliance_type =
            if configuration_item.is_status_not_applicable() || event.event_left_scope {
                info!(
                    "[{}] {} is not applicable (status {}, left scope {})",
                    request_id,
                    configuration_item.resource_id,
                    configuration_item.configuration_item_status,
                    event.event_left_scope
                );
                ComplianceType::NotApplicable
            } else {
                let logger = EvaluationLogger::new(request_id, &configuration_item.resource_id);
                self.evaluator
                    .evaluate_compliance(&invoking_event, &rule_parameters, &logger)
                    .await
                    .map_err(RuleHandlerError::Evaluator)?
            };

        let evaluation = EvaluationResult {
            resource_id: configuration_item.resource_id.clone(),
            resource_type: configuration_item.resource_type.clone(),
            compliance_type,
            ordering_timestamp: parse_capture_time(
                &configuration_item.configuration_item_capture_time,
            )?,
            annotation: None,
        };
        debug!("[{}] reporting {}", request_id, evaluation);

        let failed = self
            .reporter
            .put_evaluations(std::slice::from_ref(&evaluation), &event.result_token)
            .await?;
        if !failed.is_empty() {
            return Err(RuleHandlerError::FailedEvaluations(failed));
        }

        info!(
            "[{}] reported {} for {} {}",
            request_id, evaluation.compliance_type, evaluation.resource_type, evaluation.resource_id
        );
        Ok(evaluation)
    }
}
