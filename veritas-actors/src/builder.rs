use crate::actor::{spawn_actor_with_shutdown, Actor, ActorHandle, Addr};
use crate::registry::Registry;
use crate::system::{ActorSystem, ShutdownHandle};
use anyhow::Result;

/// Spawns actors under the shared shutdown signal and publishes their addresses.
pub struct Builder {
    sys: ActorSystem,
    reg: Registry,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            sys: ActorSystem::new(),
            reg: Registry::default(),
        }
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.sys.shutdown_handle()
    }

    /// Spawn an actor, track its task, and publish its `Addr` under `name`.
    pub fn spawn<A>(&mut self, name: &str, mailbox: usize, actor: A) -> Addr<A>
    where
        A: Actor,
        Addr<A>: Send + Sync + 'static,
    {
        let shutdown_rx = self.sys.shutdown_notifier();
        let h: ActorHandle<A> = spawn_actor_with_shutdown(actor, mailbox, Some(shutdown_rx));
        let addr = h.addr.clone();
        self.sys.track(async move {
            h.task.await??;
            Ok(())
        });
        self.reg.insert_addr::<A>(name, addr.clone());
        tracing::debug!(actor = name, mailbox, "actor.spawned");
        addr
    }

    /// Get a typed address by name for wiring.
    pub fn addr<A: Actor>(&self, name: &str) -> Option<Addr<A>>
    where
        Addr<A>: Send + Sync + 'static,
    {
        self.reg.get_addr::<A>(name)
    }

    /// Signal shutdown and wait for every actor to stop.
    pub async fn graceful_shutdown(self) -> Result<()> {
        self.reg.clear();
        self.sys.graceful_shutdown().await
    }

    /// Block until CTRL-C or an internal shutdown signal, then shut down.
    pub async fn run_until_ctrl_c(self) -> Result<()> {
        let mut shutdown_rx = self.sys.shutdown_notifier();
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("ctrl-c received; shutting down");
            }
            _ = shutdown_rx.recv() => {
                tracing::info!("shutdown requested");
            }
        }
        self.graceful_shutdown().await
    }
}
