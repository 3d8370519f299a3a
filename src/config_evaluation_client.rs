use async_trait::async_trait;
use log::debug;
use rusoto_config::{ConfigService, ConfigServiceClient, Evaluation, PutEvaluationsRequest};
use rusoto_core::Region;

use std::convert::TryFrom;

use crate::compliance::EvaluationResult;
use crate::error::RuleHandlerError;

pub struct ConfigEvaluationClient {
    client: ConfigServiceClient,
    test_mode: bool,
}

#[async_trait]
pub trait Report: Send + Sync {
    /// Returns the evaluations the sink rejected.
    async fn put_evaluations(
        &self,
        evaluations: &[EvaluationResult],
        result_token: &str,
    ) -> Result<Vec<EvaluationResult>, RuleHandlerError>;
}

#[async_trait]
impl Report for ConfigEvaluationClient {
    async fn put_evaluations(
        &self,
        evaluations: &[EvaluationResult],
        result_token: &str,
    ) -> Result<Vec<EvaluationResult>, RuleHandlerError> {
        let request = PutEvaluationsRequest {
            evaluations: Some(evaluations.iter().map(Evaluation::from).collect()),
            result_token: result_token.to_string(),
            test_mode: if self.test_mode { Some(true) } else { None },
        };
        debug!(
            "PutEvaluations with {} evaluation(s), test mode {}",
            evaluations.len(),
            self.test_mode
        );

        let response = self.client.put_evaluations(request).await?;

        response
            .failed_evaluations
            .unwrap_or_default()
            .into_iter()
            .map(EvaluationResult::try_from)
            .collect()
    }
}

impl ConfigEvaluationClient {
    pub fn new(region: Region, test_mode: bool) -> Self {
        Self::new_with_client(ConfigServiceClient::new(region), test_mode)
    }

    pub fn new_with_client(client: ConfigServiceClient, test_mode: bool) -> Self {
        ConfigEvaluationClient { client, test_mode }
    }
}

#[cfg(test)]
mod tests {
    use crate::compliance::{ComplianceType, EvaluationResult};
    use crate::config_evaluation_client::{ConfigEvaluationClient, Report};
    use crate::error::RuleHandlerError;
    use chrono::{TimeZone, Utc};
    use rusoto_config::ConfigServiceClient;
    use rusoto_core::signature::{SignedRequest, SignedRequestPayload};
    use rusoto_mock::{
        MockCredentialsProvider, MockRequestDispatcher, MockResponseReader, ReadMockResponse,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    fn instance_result() -> EvaluationResult {
        EvaluationResult {
            resource_id: "i-1".to_string(),
            resource_type: "AWS::EC2::Instance".to_string(),
            compliance_type: ComplianceType::Compliant,
            ordering_timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            annotation: None,
        }
    }

    #[tokio::test]
    async fn test_put_evaluations() {
        let mock = ConfigServiceClient::new_with(
            MockRequestDispatcher::default().with_body(&*MockResponseReader::read_response(
                "test_resources/valid",
                "put_evaluations.json",
            )),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = ConfigEvaluationClient::new_with_client(mock, false);
        let result = client.put_evaluations(&[instance_result()], "token").await;

        assert_eq!(result.unwrap(), vec![]);
    }

    fn recording_client(test_mode: bool) -> (ConfigEvaluationClient, Arc<Mutex<Vec<Value>>>) {
        let bodies = Arc::new(Mutex::new(Vec::new()));
        let recorded = bodies.clone();
        let mock = ConfigServiceClient::new_with(
            MockRequestDispatcher::default()
                .with_body(&*MockResponseReader::read_response(
                    "test_resources/valid",
                    "put_evaluations.json",
                ))
                .with_request_checker(move |request: &SignedRequest| {
                    let body = match request.payload {
                        Some(SignedRequestPayload::Buffer(ref buffer)) => {
                            serde_json::from_slice::<Value>(&buffer[..]).unwrap()
                        }
                        _ => Value::Null,
                    };
                    recorded.lock().unwrap().push(body);
                }),
            MockCredentialsProvider,
            Default::default(),
        );
        (ConfigEvaluationClient::new_with_client(mock, test_mode), bodies)
    }

    #[tokio::test]
    async fn test_put_evaluations_request_body() {
        let (client, bodies) = recording_client(false);
        let annotated = EvaluationResult {
            annotation: Some("tag missing".to_string()),
            ..instance_result()
        };

        client
            .put_evaluations(&[annotated], "result-token")
            .await
            .unwrap();

        let bodies = bodies.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        let body = &bodies[0];
        assert_eq!(body["ResultToken"], json!("result-token"));
        assert!(body.get("TestMode").is_none());
        let evaluations = body["Evaluations"].as_array().unwrap();
        assert_eq!(evaluations.len(), 1);
        assert_eq!(evaluations[0]["ComplianceResourceId"], json!("i-1"));
        assert_eq!(
            evaluations[0]["ComplianceResourceType"],
            json!("AWS::EC2::Instance")
        );
        assert_eq!(evaluations[0]["ComplianceType"], json!("COMPLIANT"));
        assert_eq!(evaluations[0]["Annotation"], json!("tag missing"));
        assert_eq!(
            evaluations[0]["OrderingTimestamp"].as_f64(),
            Some(1704067200.0)
        );
    }

    #[tokio::test]
    async fn test_put_evaluations_in_test_mode() {
        let (client, bodies) = recording_client(true);

        client
            .put_evaluations(&[instance_result()], "result-token")
            .await
            .unwrap();

        let bodies = bodies.lock().unwrap();
        assert_eq!(bodies[0]["TestMode"], json!(true));
        assert_eq!(bodies[0]["ResultToken"], json!("result-token"));
    }

    #[tokio::test]
    async fn test_put_evaluations_returns_rejected() {
        let mock = ConfigServiceClient::new_with(
            MockRequestDispatcher::default().with_body(&*MockResponseReader::read_response(
                "test_resources/valid",
                "put_evaluations_failed.json",
            )),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = ConfigEvaluationClient::new_with_client(mock, true);
        let result = client.put_evaluations(&[instance_result()], "token").await;

        assert_eq!(
            result.unwrap(),
            vec![
                instance_result(),
                EvaluationResult {
                    resource_id: "i-2".to_string(),
                    resource_type: "AWS::EC2::Instance".to_string(),
                    compliance_type: ComplianceType::NonCompliant,
                    ordering_timestamp: Utc.timestamp_millis_opt(1704067200500).unwrap(),
                    annotation: Some("instance type t3.micro is not allowed".to_string()),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_put_evaluations_error() {
        let mock = ConfigServiceClient::new_with(
            MockRequestDispatcher::with_status(400).with_body(&*MockResponseReader::read_response(
                "test_resources/error",
                "put_evaluations.json",
            )),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = ConfigEvaluationClient::new_with_client(mock, false);
        let result = client.put_evaluations(&[instance_result()], "token").await;

        assert!(matches!(
            result.err().unwrap(),
            RuleHandlerError::PutEvaluationsError(_)
        ));
    }
}
