//! Operation and Execute traits

use crate::ExecutionResult;
use async_trait::async_trait;

/// Metadata describing an operation.
///
/// The canonical op string ("reorder statuses", "update task") is used as the
/// `op` field of activity log entries.
pub trait Operation {
    /// The action, e.g. "create"
    fn verb(&self) -> &'static str;

    /// The target entity, e.g. "status"
    fn noun(&self) -> &'static str;

    /// Human readable description
    fn description(&self) -> &'static str;

    /// Canonical "verb noun" string
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// Execute an operation against a context `C`, failing with `E`.
#[async_trait]
pub trait Execute<C, E>: Operation + Send + Sync
where
    C: Send + Sync,
{
    /// The value produced on success
    type Output: Send;

    /// Run the operation
    async fn execute(&self, ctx: &C) -> ExecutionResult<Self::Output, E>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;

    impl Operation for Ping {
        fn verb(&self) -> &'static str {
            "ping"
        }
        fn noun(&self) -> &'static str {
            "server"
        }
        fn description(&self) -> &'static str {
            "Check the server is reachable"
        }
    }

    #[async_trait]
    impl Execute<(), String> for Ping {
        type Output = &'static str;

        async fn execute(&self, _ctx: &()) -> ExecutionResult<&'static str, String> {
            ExecutionResult::Unlogged { value: "pong" }
        }
    }

    #[test]
    fn test_op_string() {
        assert_eq!(Ping.op_string(), "ping server");
    }

    #[tokio::test]
    async fn test_execute_unlogged() {
        let result = Ping.execute(&()).await;
        assert!(!result.should_log());
        assert_eq!(result.into_result(), Ok("pong"));
    }
}
