use std::convert::TryFrom;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use rusoto_config::Evaluation;
use serde::{Deserialize, Serialize};

use crate::error::RuleHandlerError;

/// Verdict reported to AWS Config for a single resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceType {
    Compliant,
    NonCompliant,
    NotApplicable,
}

impl ComplianceType {
    pub fn as_str(&self) -> &'static str {
        match *self {
            ComplianceType::Compliant => "COMPLIANT",
            ComplianceType::NonCompliant => "NON_COMPLIANT",
            ComplianceType::NotApplicable => "NOT_APPLICABLE",
        }
    }
}

impl Display for ComplianceType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplianceType {
    type Err = RuleHandlerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "COMPLIANT" => Ok(ComplianceType::Compliant),
            "NON_COMPLIANT" => Ok(ComplianceType::NonCompliant),
            "NOT_APPLICABLE" => Ok(ComplianceType::NotApplicable),
            other => Err(RuleHandlerError::UnknownComplianceType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub resource_id: String,
    pub resource_type: String,
    pub compliance_type: ComplianceType,
    pub ordering_timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl Display for EvaluationResult {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{{ComplianceResourceType: {}, ComplianceResourceId: {}, ComplianceType: {}, OrderingTimestamp: {}",
            self.resource_type,
            self.resource_id,
            self.compliance_type,
            format_capture_time(&self.ordering_timestamp)
        )?;
        if let Some(ref annotation) = self.annotation {
            write!(f, ", Annotation: {}", annotation)?;
        }
        write!(f, "}}")
    }
}

// UTC only, uppercase `T` and `Z`; offsets and other separators are rejected.
const CAPTURE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Parses `configurationItemCaptureTime`, e.g. `2017-02-15T00:53:37.870Z`.
pub fn parse_capture_time(capture_time: &str) -> Result<DateTime<Utc>, RuleHandlerError> {
    let parsed = NaiveDateTime::parse_from_str(capture_time, CAPTURE_TIME_FORMAT)?;
    Ok(Utc.from_utc_datetime(&parsed))
}

/// Inverse of `parse_capture_time` for UTC timestamps carrying `Z`.
pub fn format_capture_time(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl From<&EvaluationResult> for Evaluation {
    fn from(result: &EvaluationResult) -> Evaluation {
        Evaluation {
            annotation: result.annotation.clone(),
            compliance_resource_id: result.resource_id.clone(),
            compliance_resource_type: result.resource_type.clone(),
            compliance_type: result.compliance_type.to_string(),
            ordering_timestamp: result.ordering_timestamp.timestamp_millis() as f64 / 1000.0,
        }
    }
}

impl TryFrom<Evaluation> for EvaluationResult {
    type Error = RuleHandlerError;

    fn try_from(evaluation: Evaluation) -> Result<Self, Self::Error> {
        let millis = (evaluation.ordering_timestamp * 1000.0).round() as i64;
        let ordering_timestamp = Utc
            .timestamp_millis_opt(millis)
            .single()
            .ok_or(RuleHandlerError::InvalidOrderingTimestamp(
                evaluation.ordering_timestamp,
            ))?;
        Ok(EvaluationResult {
            resource_id: evaluation.compliance_resource_id,
            resource_type: evaluation.compliance_resource_type,
            compliance_type: ComplianceType::from_str(&evaluation.compliance_type)?,
            ordering_timestamp,
            annotation: evaluation.annotation,
        })
    }
}
