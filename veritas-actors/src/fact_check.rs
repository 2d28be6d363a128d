use crate::actor::{Actor, Context};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::oneshot;
use veritas_common::AnalysisResult;
use veritas_llm::traits::GroundedClient;

/// Request to fact-check one claim.
pub struct CheckCmd {
    /// Sequence number chosen by the requester; echoed back untouched.
    pub token: u64,
    pub claim: String,
    pub reply: oneshot::Sender<CheckReply>,
}

pub struct CheckReply {
    pub token: u64,
    pub outcome: veritas_common::Result<AnalysisResult>,
}

/// Runs fact checks against a grounded model client.
///
/// Each check runs in its own task so the mailbox keeps draining (and
/// shutdown is not held up) while the model call is in flight. A reply whose
/// receiver has gone away is dropped.
pub struct FactCheckActor {
    client: Arc<dyn GroundedClient>,
}

impl FactCheckActor {
    pub fn new(client: Arc<dyn GroundedClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Actor for FactCheckActor {
    type Msg = CheckCmd;

    async fn handle(&mut self, msg: Self::Msg, _ctx: &mut Context<Self>) -> Result<()> {
        let CheckCmd {
            token,
            claim,
            reply,
        } = msg;

        tracing::info!(token, model = %self.client.model_name(), "fact_check.start");
        let client = self.client.clone();
        tokio::spawn(async move {
            let outcome = client.check_fact(&claim).await;
            match &outcome {
                Ok(result) => tracing::info!(
                    token,
                    verdict = %result.verdict,
                    confidence = result.confidence_score,
                    sources = result.sources.len(),
                    "fact_check.done"
                ),
                // Detail is already logged by `check_fact`.
                Err(_) => tracing::debug!(token, "fact_check.failed"),
            }
            if reply.send(CheckReply { token, outcome }).is_err() {
                tracing::debug!(token, "fact_check.reply_dropped");
            }
        });
        Ok(())
    }
}
