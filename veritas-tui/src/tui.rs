use crate::{
    command::{Command, EXAMPLE_CLAIMS, example_claim, parse_command},
    input::{InputBuffer, KeyAction, classify_key},
    state::{Effect, UiEvent, UiState, transition},
    view::{self, ViewSnap},
};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::{
    event::{
        DisableBracketedPaste, EnableBracketedPaste, Event as CtEvent, KeyEvent,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};
use tokio::sync::oneshot;
use veritas_actors::{
    CheckCmd, CheckReply, FactCheckActor,
    actor::{Actor, Addr, Context},
    system::ShutdownHandle,
};
use veritas_common::VeritasError;

const BRAILLE_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const HELP_NOTICE: &str =
    "/try <1-3> load an example • /clear reset • /quit exit • Shift+Enter new line";

pub enum TuiMsg {
    InputEvent(CtEvent),
    Tick,
    Submit(String),
    CheckDone(CheckReply),
    Shutdown,
}

pub struct TuiActor {
    // deps
    fact_check: Addr<FactCheckActor>,

    // terminal
    term: Terminal<CrosstermBackend<Stdout>>,
    tick_rate: Duration,
    last_tick: Instant,
    keyboard_enhanced: bool,
    restored: bool,

    // ui state
    input: InputBuffer,
    state: UiState,
    scroll: u16,
    notice: Option<String>,
    dirty: bool,
    spin_idx: usize,

    // shutdown coordination
    shutdown: ShutdownHandle,
}

impl TuiActor {
    pub fn new(fact_check: Addr<FactCheckActor>, shutdown: ShutdownHandle) -> Result<Self> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

        // Needed for Shift+Enter to be distinguishable from Enter.
        let keyboard_enhanced = matches!(supports_keyboard_enhancement(), Ok(true));
        if keyboard_enhanced {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
            )?;
        }
        tracing::debug!(keyboard_enhanced, "tui.init");

        let backend = CrosstermBackend::new(stdout);
        let mut term = Terminal::new(backend)?;
        term.clear()?;

        Ok(Self {
            fact_check,
            term,
            tick_rate: Duration::from_millis(80),
            last_tick: Instant::now(),
            keyboard_enhanced,
            restored: false,
            input: InputBuffer::default(),
            state: UiState::default(),
            scroll: 0,
            notice: None,
            dirty: true,
            spin_idx: 0,
            shutdown,
        })
    }

    fn restore_terminal(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        let mut stdout = io::stdout();
        if self.keyboard_enhanced {
            let _ = execute!(stdout, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(stdout, DisableBracketedPaste, LeaveAlternateScreen);
        disable_raw_mode().ok();
        let _ = self.term.show_cursor();
    }

    fn spinner(&self) -> &'static str {
        if self.state.is_pending() {
            BRAILLE_FRAMES[self.spin_idx % BRAILLE_FRAMES.len()]
        } else {
            " "
        }
    }

    fn step_spinner(&mut self) {
        if self.state.is_pending() {
            self.spin_idx = (self.spin_idx + 1) % BRAILLE_FRAMES.len();
            self.dirty = true;
        }
    }

    fn draw(&mut self) -> Result<()> {
        let snap = ViewSnap {
            input: &self.input,
            phase: self.state.phase(),
            scroll: self.scroll,
            spinner: self.spinner(),
            notice: self.notice.as_deref(),
        };
        self.scroll = view::draw(&mut self.term, &snap)?;
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<TuiMsg> {
        match classify_key(&key) {
            KeyAction::Quit => return Some(TuiMsg::Shutdown),
            KeyAction::Submit => return Some(TuiMsg::Submit(self.input.text().to_string())),
            KeyAction::Ignore => return None,
            KeyAction::Newline => self.input.newline(),
            KeyAction::Insert(ch) => self.input.insert_char(ch),
            KeyAction::Backspace => self.input.backspace(),
            KeyAction::Delete => self.input.delete(),
            KeyAction::Left => self.input.left(),
            KeyAction::Right => self.input.right(),
            KeyAction::Home => self.input.home(),
            KeyAction::End => self.input.end(),
            KeyAction::ClearInput => self.input.clear(),
            KeyAction::ScrollUp(n) => self.scroll = self.scroll.saturating_sub(n),
            KeyAction::ScrollDown(n) => self.scroll = self.scroll.saturating_add(n),
        }
        self.dirty = true;
        None
    }

    /// Feed an event through the state machine and start whatever it asks for.
    fn apply(&mut self, event: UiEvent, me: &Addr<TuiActor>) {
        let (next, effect) = transition(std::mem::take(&mut self.state), event);
        self.state = next;
        self.dirty = true;

        if let Some(Effect::Dispatch { token, claim }) = effect {
            self.scroll = 0;
            self.notice = None;
            self.dispatch(token, claim, me.clone());
        }
    }

    fn dispatch(&mut self, token: u64, claim: String, me: Addr<TuiActor>) {
        tracing::info!(token, chars = claim.chars().count(), "check.dispatch");
        let (tx, rx) = oneshot::channel::<CheckReply>();
        if self
            .fact_check
            .try_send(CheckCmd {
                token,
                claim,
                reply: tx,
            })
            .is_err()
        {
            // The returned command (and its reply sender) is dropped here, so
            // the waiter below resolves the request as failed.
            tracing::error!(token, "check.dispatch_failed: fact-check mailbox full or closed");
        }

        tokio::spawn(async move {
            let reply = rx.await.unwrap_or_else(|_| CheckReply {
                token,
                outcome: Err(VeritasError::Actor(
                    "fact-check worker dropped the request".into(),
                )),
            });
            let _ = me.send(TuiMsg::CheckDone(reply)).await;
        });
    }

    fn route_submit(&mut self, line: String, me: &Addr<TuiActor>) {
        match parse_command(&line) {
            Some(cmd) => {
                self.input.clear();
                self.handle_command(cmd, me);
            }
            None => self.apply(UiEvent::Submit(line), me),
        }
    }

    fn handle_command(&mut self, cmd: Command, me: &Addr<TuiActor>) {
        self.dirty = true;
        match cmd {
            Command::Quit => {
                let _ = me.try_send(TuiMsg::Shutdown);
            }
            Command::Help => self.notice = Some(HELP_NOTICE.into()),
            Command::Clear => {
                if self.state.is_pending() {
                    self.notice = Some("A check is still running.".into());
                    return;
                }
                self.notice = None;
                self.scroll = 0;
                self.apply(UiEvent::Reset, me);
            }
            Command::Try(n) => {
                if let Some(claim) = example_claim(n) {
                    self.input.set(claim);
                    self.notice = Some(format!("Loaded example {n}. Press Enter to check."));
                }
            }
            Command::Invalid(s) => {
                self.notice = Some(format!(
                    "{s}: expected /try <1-{}>.",
                    EXAMPLE_CLAIMS.len()
                ));
            }
        }
    }

    fn handle_reply(&mut self, reply: CheckReply, me: &Addr<TuiActor>) {
        if let Some(event) = reply_event(&self.state, reply) {
            self.apply(event, me);
        }
    }
}

/// `None` when the reply answers a request the UI is no longer waiting on.
fn reply_event(state: &UiState, reply: CheckReply) -> Option<UiEvent> {
    let CheckReply { token, outcome } = reply;
    if state.pending_token() != Some(token) {
        tracing::debug!(token, "check.stale_reply_ignored");
        return None;
    }
    // Users only ever see the fixed failure message; keep the detail here.
    let outcome = outcome.map_err(|e| {
        tracing::error!(token, error = %e, "check.failed");
        e.to_string()
    });
    Some(UiEvent::Resolved { token, outcome })
}

impl Drop for TuiActor {
    fn drop(&mut self) {
        self.restore_terminal();
    }
}

#[async_trait]
impl Actor for TuiActor {
    type Msg = TuiMsg;

    async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()> {
        match msg {
            TuiMsg::InputEvent(ev) => match ev {
                CtEvent::Key(k) => {
                    if let Some(next) = self.handle_key(k) {
                        let _ = ctx.addr().try_send(next);
                    }
                }
                CtEvent::Paste(text) => {
                    self.input.insert_str(&text);
                    self.dirty = true;
                }
                CtEvent::Resize(..) => self.dirty = true,
                _ => {}
            },
            TuiMsg::Submit(line) => self.route_submit(line, &ctx.addr()),
            TuiMsg::CheckDone(reply) => self.handle_reply(reply, &ctx.addr()),
            TuiMsg::Tick => {
                self.step_spinner();
                if self.dirty || self.last_tick.elapsed() >= self.tick_rate {
                    if let Err(e) = self.draw() {
                        tracing::error!(error = ?e, "tui.draw_failed");
                        self.restore_terminal();
                        self.shutdown.signal();
                        return Err(e);
                    }
                    self.last_tick = Instant::now();
                    self.dirty = false;
                }
            }
            TuiMsg::Shutdown => {
                self.restore_terminal();
                self.shutdown.signal();
                ctx.stop();
            }
        }

        Ok(())
    }
}
