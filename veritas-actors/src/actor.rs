//! Mailbox actors on tokio tasks.
//!
//! An actor owns its state and processes one message at a time. Anything
//! slow (model calls, reply waits) should be spawned so the mailbox keeps
//! draining.
//!
//! ```
//! use anyhow::Result;
//! use async_trait::async_trait;
//! use veritas_actors::actor::{self, Actor, Context};
//!
//! /// Counts claims until it has seen `limit`, then stops.
//! struct ClaimTally {
//!     seen: usize,
//!     limit: usize,
//! }
//!
//! #[async_trait]
//! impl Actor for ClaimTally {
//!     type Msg = String;
//!
//!     async fn handle(&mut self, claim: String, ctx: &mut Context<Self>) -> Result<()> {
//!         anyhow::ensure!(!claim.trim().is_empty(), "blank claim");
//!         self.seen += 1;
//!         if self.seen == self.limit {
//!             ctx.stop();
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     let handle = actor::spawn_actor(ClaimTally { seen: 0, limit: 2 }, 4);
//!     handle.addr.try_send("The moon is made of cheese".into()).unwrap();
//!     handle.addr.send("Water boils at 100C at sea level".into()).await.unwrap();
//!     handle.task.await.unwrap().unwrap();
//!
//!     // A handler error ends the loop and surfaces from the task.
//!     let handle = actor::spawn_actor(ClaimTally { seen: 0, limit: 9 }, 4);
//!     handle.addr.send("   ".into()).await.unwrap();
//!     assert!(handle.task.await.unwrap().is_err());
//! });
//! ```
use anyhow::Result;
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
};

/// `Self: Sized` keeps `Context<Self>` usable in the signature.
#[async_trait::async_trait]
pub trait Actor: Send + Sized + 'static {
    type Msg: Send + 'static;

    /// Handle a single message. Return `Err` to stop the actor.
    async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()>;
}

/// Per-actor runtime handle passed to every `handle` call.
pub struct Context<A: Actor> {
    addr: Addr<A>,
    stop: bool,
}

impl<A: Actor> Context<A> {
    /// Own address, e.g. for tasks that report back with a follow-up message.
    pub fn addr(&self) -> Addr<A> {
        self.addr.clone()
    }

    /// Leave the mailbox loop once the current message is handled.
    pub fn stop(&mut self) {
        self.stop = true;
    }
}

/// Sending half of an actor's mailbox.
pub struct Addr<A: Actor>(mpsc::Sender<A::Msg>);

// Derive would demand `A: Clone`.
impl<A: Actor> Clone for Addr<A> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<A: Actor> Addr<A> {
    /// Wait for mailbox space. Hands the message back if the actor is gone.
    pub async fn send(&self, msg: A::Msg) -> std::result::Result<(), A::Msg> {
        self.0.send(msg).await.map_err(|e| e.0)
    }

    /// Enqueue without waiting. Hands the message back if the mailbox is full
    /// or closed.
    pub fn try_send(&self, msg: A::Msg) -> std::result::Result<(), A::Msg> {
        self.0.try_send(msg).map_err(|e| e.into_inner())
    }

    /// For non-async threads such as the terminal input reader. Panics when
    /// called on a runtime thread.
    pub fn blocking_send(&self, msg: A::Msg) -> std::result::Result<(), A::Msg> {
        self.0.blocking_send(msg).map_err(|e| e.0)
    }

    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }
}

pub struct ActorHandle<A: Actor> {
    pub addr: Addr<A>,
    pub task: JoinHandle<anyhow::Result<()>>,
}

/// Spawn `actor` with a mailbox of `capacity` messages.
///
/// The loop ends when `handle` errors or `ctx.stop()` is called. The context
/// holds an `Addr` of its own, so dropping every external sender does not
/// end it.
pub fn spawn_actor<A: Actor>(actor: A, capacity: usize) -> ActorHandle<A> {
    spawn_actor_with_shutdown(actor, capacity, None)
}

/// Like [`spawn_actor`], but also stops when `shutdown` fires.
pub fn spawn_actor_with_shutdown<A: Actor>(
    actor: A,
    capacity: usize,
    shutdown: Option<broadcast::Receiver<()>>,
) -> ActorHandle<A> {
    let (tx, rx) = mpsc::channel::<A::Msg>(capacity);
    let addr = Addr(tx);
    let ctx = Context {
        addr: addr.clone(),
        stop: false,
    };

    let task = tokio::spawn(run_mailbox(actor, ctx, rx, shutdown));
    ActorHandle { addr, task }
}

async fn run_mailbox<A: Actor>(
    mut actor: A,
    mut ctx: Context<A>,
    mut rx: mpsc::Receiver<A::Msg>,
    mut shutdown: Option<broadcast::Receiver<()>>,
) -> Result<()> {
    loop {
        let next = match shutdown.as_mut() {
            Some(shutdown_rx) => tokio::select! {
                _ = shutdown_rx.recv() => None,
                maybe_msg = rx.recv() => maybe_msg,
            },
            None => rx.recv().await,
        };

        let Some(msg) = next else { break };
        if let Err(e) = actor.handle(msg, &mut ctx).await {
            tracing::error!(target = "veritas-actors", error = ?e, "actor returned error; stopping");
            return Err(e);
        }
        if ctx.stop {
            break;
        }
    }
    Ok(())
}
