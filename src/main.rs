mod compliance;
mod config;
mod config_evaluation_client;
mod dispatcher;
mod error;
mod evaluator;
mod event;

use lambda_runtime::{handler_fn, Context, Error};
use log::info;
use once_cell::sync::OnceCell;

use crate::compliance::EvaluationResult;
use crate::config::RuleHandlerConfig;
use crate::config_evaluation_client::ConfigEvaluationClient;
use crate::dispatcher::RuleDispatcher;
use crate::error::RuleHandlerError;
use crate::evaluator::RuleCode;
use crate::event::ConfigEvent;

static DISPATCHER: OnceCell<RuleDispatcher<RuleCode, ConfigEvaluationClient>> = OnceCell::new();

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = RuleHandlerConfig::from_env()?;
    simple_logger::init_with_level(config.log_level)?;
    info!(
        "Starting Config rule handler in {} (test mode {})",
        config.region.name(),
        config.test_mode
    );

    let client = ConfigEvaluationClient::new(config.region, config.test_mode);
    DISPATCHER
        .set(RuleDispatcher::new(RuleCode, client))
        .map_err(|_| RuleHandlerError::InvalidConfig("dispatcher initialized twice".to_string()))?;

    lambda_runtime::run(handler_fn(rule_handler)).await?;
    Ok(())
}

async fn rule_handler(event: ConfigEvent, context: Context) -> Result<EvaluationResult, Error> {
    let dispatcher = DISPATCHER.get().ok_or_else(|| {
        RuleHandlerError::InvalidConfig("dispatcher is not initialized".to_string())
    })?;
    let evaluation = dispatcher.handle(&event, &context.request_id).await?;
    Ok(evaluation)
}
