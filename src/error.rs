use std::error::Error;

use rusoto_config::PutEvaluationsError;
use rusoto_core::RusotoError;
use std::fmt;
use std::fmt::{Display, Formatter};

use crate::compliance::EvaluationResult;

#[derive(Debug)]
pub enum RuleHandlerError {
    InvalidPayload {
        payload: &'static str,
        source: serde_json::Error,
    },
    MissingConfigurationItem,
    InvalidCaptureTime(chrono::ParseError),
    InvalidOrderingTimestamp(f64),
    IncompatibleMessageType(String),
    Evaluator(anyhow::Error),
    FailedEvaluations(Vec<EvaluationResult>),
    PutEvaluationsError(RusotoError<PutEvaluationsError>),
    UnknownComplianceType(String),
    InvalidConfig(String),
}

impl Display for RuleHandlerError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            RuleHandlerError::InvalidPayload {
                payload,
                ref source,
            } => write!(f, "Failed to parse {}: {}", payload, source),
            RuleHandlerError::MissingConfigurationItem => {
                write!(f, "Invoking event has no configurationItem")
            }
            RuleHandlerError::InvalidCaptureTime(ref error) => {
                write!(f, "Failed to parse configurationItemCaptureTime: {}", error)
            }
            RuleHandlerError::InvalidOrderingTimestamp(timestamp) => {
                write!(f, "Ordering timestamp {} is out of range", timestamp)
            }
            RuleHandlerError::IncompatibleMessageType(ref message_type) => write!(
                f,
                "Events with the message type '{}' are not evaluated for this Config rule.",
                message_type
            ),
            RuleHandlerError::Evaluator(ref error) => std::fmt::Display::fmt(error, f),
            RuleHandlerError::FailedEvaluations(ref evaluations) => {
                write!(
                    f,
                    "The following evaluations were not successfully reported to AWS Config: ["
                )?;
                for (index, evaluation) in evaluations.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", evaluation)?;
                }
                write!(f, "]")
            }
            RuleHandlerError::PutEvaluationsError(ref error) => std::fmt::Display::fmt(error, f),
            RuleHandlerError::UnknownComplianceType(ref value) => {
                write!(f, "Unknown compliance type '{}'", value)
            }
            RuleHandlerError::InvalidConfig(ref message) => {
                write!(f, "Invalid configuration: {}", message)
            }
        }
    }
}

impl Error for RuleHandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            RuleHandlerError::InvalidPayload { ref source, .. } => Some(source),
            RuleHandlerError::InvalidCaptureTime(ref error) => Some(error),
            RuleHandlerError::Evaluator(ref error) => Some(&**error),
            RuleHandlerError::PutEvaluationsError(ref error) => Some(error),
            _ => None,
        }
    }
}

impl From<chrono::ParseError> for RuleHandlerError {
    fn from(e: chrono::ParseError) -> RuleHandlerError {
        RuleHandlerError::InvalidCaptureTime(e)
    }
}

impl From<RusotoError<PutEvaluationsError>> for RuleHandlerError {
    fn from(e: RusotoError<PutEvaluationsError>) -> RuleHandlerError {
        RuleHandlerError::PutEvaluationsError(e)
    }
}
