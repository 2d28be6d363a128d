use anyhow::{Context, Result};
use std::sync::Arc;
use veritas_actors::{FactCheckActor, actor::Addr, builder::Builder};
use veritas_config::{Provider, VeritasConfig};
use veritas_llm::{GeminiClient, GroundedClient};
use veritas_tui::{TuiActor, spawn_tui_feeders};

const FACT_CHECK_NAME: &str = "fact-check:main";
const FACT_CHECK_MAILBOX: usize = 16;
const TUI_MAILBOX: usize = 256;

pub struct Tether {
    builder: Builder,
}

impl Tether {
    pub fn new() -> Self {
        Self {
            builder: Builder::new(),
        }
    }
    pub fn builder_mut(&mut self) -> &mut Builder {
        &mut self.builder
    }
    pub async fn run(self) -> Result<()> {
        self.builder.run_until_ctrl_c().await
    }
}

pub fn build_from_config(t: &mut Tether, cfg: &VeritasConfig) -> Result<()> {
    // Resolve the client before the TUI takes over the terminal so config
    // errors print normally.
    let client = build_grounded_client(cfg)?;

    let b = t.builder_mut();
    let shutdown = b.shutdown_handle();

    spawn_workers(b, client);
    let fact_check: Addr<FactCheckActor> = b
        .addr(FACT_CHECK_NAME)
        .context("fact-check actor was not registered")?;

    // ui (start last)
    let tui = TuiActor::new(fact_check, shutdown.clone())?;
    let tui_addr = b.spawn("tui:main", TUI_MAILBOX, tui);
    spawn_tui_feeders(tui_addr, shutdown);

    Ok(())
}

/// Spawn every actor the UI talks to. The TUI resolves them by name.
pub fn spawn_workers(b: &mut Builder, client: Arc<dyn GroundedClient>) {
    b.spawn(
        FACT_CHECK_NAME,
        FACT_CHECK_MAILBOX,
        FactCheckActor::new(client),
    );
}

pub fn build_grounded_client(cfg: &VeritasConfig) -> Result<Arc<dyn GroundedClient>> {
    let api_key = cfg.require_api_key()?.to_string();
    match cfg.llm.provider {
        Provider::Gemini => {
            let client = GeminiClient::new(api_key, cfg.llm.model.clone())?
                .with_base_url(cfg.llm.base_url.clone())
                .with_temperature(cfg.llm.temperature);
            tracing::debug!(
                model = %cfg.llm.model,
                base_url = %cfg.llm.base_url,
                "llm.client_ready"
            );
            Ok(Arc::new(client))
        }
    }
}
