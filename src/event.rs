use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::RuleHandlerError;

pub const CONFIGURATION_ITEM_CHANGE_NOTIFICATION: &str = "ConfigurationItemChangeNotification";

const NOT_APPLICABLE_STATUSES: [&'static str; 3] = [
    "ResourceDeleted",
    "ResourceDeletedNotRecorded",
    "ResourceNotRecorded",
];

/// Event AWS Config sends to the rule's Lambda function.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEvent {
    pub invoking_event: String,
    #[serde(default)]
    pub rule_parameters: Option<String>,
    pub result_token: String,
    #[serde(default)]
    pub event_left_scope: bool,
    #[serde(default)]
    pub config_rule_name: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

impl ConfigEvent {
    pub fn parse_invoking_event(&self) -> Result<InvokingEvent, RuleHandlerError> {
        serde_json::from_str(&self.invoking_event).map_err(|source| {
            RuleHandlerError::InvalidPayload {
                payload: "invokingEvent",
                source,
            }
        })
    }

    /// Missing or blank parameters are an empty object.
    pub fn parse_rule_parameters(&self) -> Result<Value, RuleHandlerError> {
        match self.rule_parameters.as_deref().map(str::trim) {
            None | Some("") => Ok(Value::Object(Map::new())),
            Some(raw) => {
                serde_json::from_str(raw).map_err(|source| RuleHandlerError::InvalidPayload {
                    payload: "ruleParameters",
                    source,
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokingEvent {
    pub message_type: String,
    #[serde(default)]
    pub configuration_item: Option<ConfigurationItem>,
    #[serde(default)]
    pub notification_creation_time: Option<String>,
    #[serde(default)]
    pub record_version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InvokingEvent {
    pub fn is_compatible(&self) -> bool {
        self.message_type == CONFIGURATION_ITEM_CHANGE_NOTIFICATION
    }

    pub fn ensure_compatible(&self) -> Result<(), RuleHandlerError> {
        if self.is_compatible() {
            Ok(())
        } else {
            Err(RuleHandlerError::IncompatibleMessageType(
                self.message_type.clone(),
            ))
        }
    }

    pub fn configuration_item(&self) -> Result<&ConfigurationItem, RuleHandlerError> {
        self.configuration_item
            .as_ref()
            .ok_or(RuleHandlerError::MissingConfigurationItem)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationItem {
    pub resource_id: String,
    pub resource_type: String,
    pub configuration_item_status: String,
    pub configuration_item_capture_time: String,
    #[serde(default)]
    pub configuration: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigurationItem {
    /// Deleted or unrecorded resources are never evaluated.
    pub fn is_status_not_applicable(&self) -> bool {
        NOT_APPLICABLE_STATUSES.contains(&self.configuration_item_status.as_str())
    }
}
