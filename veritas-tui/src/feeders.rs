use crate::tui::{TuiActor, TuiMsg};
use std::time::Duration;
use tokio::{sync::broadcast::error::TryRecvError, time};
use veritas_actors::actor::Addr;
use veritas_actors::system::ShutdownHandle;

const INPUT_POLL: Duration = Duration::from_millis(100);
const TICK: Duration = Duration::from_millis(80);

/// Start the terminal input reader and the redraw ticker for `tui`.
/// Both stop when the shutdown signal fires or the TUI mailbox closes.
pub fn spawn_tui_feeders(tui: Addr<TuiActor>, shutdown: ShutdownHandle) {
    // One long-lived blocking thread; polling keeps it responsive to shutdown.
    let tui_in = tui.clone();
    let mut shutdown_input = shutdown.subscribe();
    tokio::task::spawn_blocking(move || {
        loop {
            if !matches!(shutdown_input.try_recv(), Err(TryRecvError::Empty)) {
                break;
            }
            match crossterm::event::poll(INPUT_POLL) {
                Ok(true) => match crossterm::event::read() {
                    Ok(ev) => {
                        if tui_in.blocking_send(TuiMsg::InputEvent(ev)).is_err() {
                            break;
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "tui.input_read_failed"),
                },
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(error = %e, "tui.input_poll_failed");
                    break;
                }
            }
        }
        tracing::debug!("tui.input_feeder_stopped");
    });

    let tui_tick = tui;
    let mut shutdown_tick = shutdown.subscribe();
    tokio::spawn(async move {
        let mut interval = time::interval(TICK);
        loop {
            tokio::select! {
                _ = shutdown_tick.recv() => break,
                _ = interval.tick() => {
                    if tui_tick.is_closed() {
                        break;
                    }
                    let _ = tui_tick.try_send(TuiMsg::Tick);
                }
            }
        }
    });
}
