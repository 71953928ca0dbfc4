//! Decides which failed RPC requests are worth retrying. See [TransportError].
use alloy_json_rpc::ErrorPayload;
use alloy_transport::{TransportError, layers::RetryPolicy};
use serde::Deserialize;
use std::time::Duration;

/// Retries requests that were rate limited or failed on the way to the node.
///
/// Public nodes (the Rootstock public nodes included) answer bursts of `eth_call`s with HTTP 429
/// or JSON-RPC rate limit errors. Execution errors, like reverts, are never retried.
#[derive(Clone, Copy, Debug, Default)]
pub struct RpcRetryPolicy;

impl RetryPolicy for RpcRetryPolicy {
    fn should_retry(&self, error: &TransportError) -> bool {
        match error {
            TransportError::Transport(_) => true,
            TransportError::DeserError { text, .. } => {
                // some nodes send invalid JSON RPC in the error case (no `id:u64`), but the
                // text should be a `JsonRpcError`
                #[derive(Deserialize)]
                struct Resp {
                    error: ErrorPayload,
                }

                if let Ok(resp) = serde_json::from_str::<Resp>(text) {
                    return should_retry_json_rpc_error(&resp.error);
                }
                false
            }
            TransportError::ErrorResp(err) => should_retry_json_rpc_error(err),
            _ => false,
        }
    }

    fn backoff_hint(&self, error: &TransportError) -> Option<Duration> {
        if let TransportError::ErrorResp(resp) = error
            && let Some(Ok(data)) = resp.try_data_as::<serde_json::Value>()
        {
            let backoff_seconds = &data["rate"]["backoff_seconds"];
            if let Some(seconds) = backoff_seconds.as_u64() {
                return Some(Duration::from_secs(seconds));
            }
            if let Some(seconds) = backoff_seconds.as_f64() {
                return Some(Duration::from_secs(seconds as u64 + 1));
            }
        }
        None
    }
}

/// Analyzes the [ErrorPayload] and decides if the request should be retried based on the
/// error code or the message.
fn should_retry_json_rpc_error(error: &ErrorPayload) -> bool {
    let ErrorPayload { code, message, .. } = error;
    // too many requests
    if *code == 429 {
        return true;
    }

    // limit exceeded
    if *code == -32005 {
        return true;
    }

    if *code == -32016 && message.contains("rate limit") {
        return true;
    }

    match message.as_ref() {
        "header not found" => true,
        "daily request count exceeded, request rate limited" => true,
        msg => msg.contains("rate limit") || msg.contains("too many requests"),
    }
}
