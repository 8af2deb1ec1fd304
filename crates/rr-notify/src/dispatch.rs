// dispatch.rs — Single-attempt delivery to the queue endpoint.
//
// No retry, no backoff. A completed run must either be reported or the
// operator must be loudly told it was not; a silent second attempt could
// double-report.

use rr_exec::CommandRunner;
use serde_json::Value;

use crate::error::{DispatchError, DispatchFailure};
use crate::payload::NotificationPayload;

/// Acknowledgment returned by a successful delivery.
#[derive(Debug, Clone)]
pub struct DispatchReceipt {
    /// Queue-assigned message identifier, when the response carried one.
    pub message_id: Option<String>,

    /// Raw response body, kept for the audit log.
    pub response: String,
}

/// Serialize `payload` and deliver it to `queue_url` in exactly one
/// `aws sqs send-message` invocation.
pub fn send(
    runner: &dyn CommandRunner,
    queue_url: &str,
    region: &str,
    payload: &NotificationPayload,
) -> Result<DispatchReceipt, DispatchError> {
    let body = payload.to_json()?;

    let out = runner.run(
        "aws",
        &[
            "sqs",
            "send-message",
            "--queue-url",
            queue_url,
            "--region",
            region,
            "--message-body",
            &body,
        ],
    )?;

    if !out.success() {
        let classification = DispatchFailure::classify(&out.stderr);
        tracing::error!(
            "queue delivery rejected ({}): {}",
            classification,
            out.stderr.trim()
        );
        return Err(DispatchError::Rejected {
            classification,
            diagnostic: out.stderr.trim().to_string(),
        });
    }

    let message_id = serde_json::from_str::<Value>(&out.stdout)
        .ok()
        .and_then(|v| v.get("MessageId")?.as_str().map(str::to_string));
    match &message_id {
        Some(id) => tracing::info!("message delivered, id {}", id),
        None => tracing::info!("message delivered (no message id in response)"),
    }
    tracing::debug!("queue response: {}", out.stdout.trim());

    Ok(DispatchReceipt {
        message_id,
        response: out.stdout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use chrono::TimeZone;
    use rr_exec::{CommandOutput, ExecError};

    use crate::build;
    use crate::context::RunContext;

    /// Double returning one fixed output and recording every call.
    struct FixedRunner {
        output: CommandOutput,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl FixedRunner {
        fn new(output: CommandOutput) -> Self {
            Self {
                output,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for FixedRunner {
        fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, ExecError> {
            let mut call = vec![program.to_string()];
            call.extend(args.iter().map(|a| a.to_string()));
            self.calls.lock().unwrap().push(call);
            Ok(self.output.clone())
        }
    }

    fn payload() -> NotificationPayload {
        let context = RunContext {
            outdir: "s3://bucket/run1".to_string(),
            queue_url: "https://sqs.us-east-1.amazonaws.com/123456789012/packager".to_string(),
            region: "us-east-1".to_string(),
            tool_version: Some("24.10.0".to_string()),
            run_name: None,
            run_id: Some("4Xyz12ab".to_string()),
            session_id: None,
            container: None,
            success: true,
        };
        build(
            &context,
            &BTreeMap::new(),
            chrono::Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
        )
    }

    #[test]
    fn successful_send_parses_message_id_and_calls_once() {
        let runner = FixedRunner::new(CommandOutput {
            code: Some(0),
            stdout: "{\"MD5OfMessageBody\": \"9b0c...\", \"MessageId\": \"7a62c49f-347e-4fc4-9331-6e8e7a96aa73\"}".to_string(),
            stderr: String::new(),
        });

        let receipt = send(
            &runner,
            "https://sqs.us-east-1.amazonaws.com/123456789012/packager",
            "us-east-1",
            &payload(),
        )
        .unwrap();

        assert_eq!(
            receipt.message_id.as_deref(),
            Some("7a62c49f-347e-4fc4-9331-6e8e7a96aa73")
        );

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1, "delivery must be a single attempt");
        assert_eq!(calls[0][0], "aws");
        assert_eq!(&calls[0][1..3], &["sqs", "send-message"]);
        assert!(calls[0].contains(&"us-east-1".to_string()));
        // The body travels as one compact JSON argument.
        let body = calls[0].last().unwrap();
        assert!(body.starts_with('{') && body.contains("\"source_prefix\""));
    }

    #[test]
    fn unparsable_response_still_succeeds_without_message_id() {
        let runner = FixedRunner::new(CommandOutput {
            code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        });
        let receipt = send(&runner, "q", "us-east-1", &payload()).unwrap();
        assert_eq!(receipt.message_id, None);
    }

    #[test]
    fn rejected_send_is_classified_and_not_retried() {
        let runner = FixedRunner::new(CommandOutput {
            code: Some(254),
            stdout: String::new(),
            stderr: "An error occurred (AccessDenied) when calling the SendMessage operation"
                .to_string(),
        });

        let err = send(&runner, "q", "us-east-1", &payload()).unwrap_err();
        match err {
            DispatchError::Rejected { classification, .. } => {
                assert_eq!(classification, DispatchFailure::AccessDenied);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(runner.calls.lock().unwrap().len(), 1);
    }
}
