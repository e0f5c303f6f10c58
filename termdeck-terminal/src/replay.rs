//! Profile replay: drives a freshly shown shell through titling and the
//! profile's commands, then optionally closes it.
//!
//! Replay is split in two. [`ReplayPlan::build`] compiles a profile into an
//! ordered list of steps without touching any shell, and [`ReplayEngine`]
//! executes that list against a [`ShellHandle`] on the tokio runtime.
//! State progression:
//!
//! ```text
//! Created -> Settling -> Titled -> Running(0..n) -> [Closing] -> Terminated
//! ```
//!
//! Commands are fire-and-forget: nothing waits for a command to finish
//! before the next one is sent. Runs are not cancellable once started.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use termdeck_config::{MessageKey, Messages, Profile, ReplaySettings};

use crate::dialect::ShellDialect;
use crate::handle::ShellHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    /// Shell exists and is shown; waiting for it to finish starting up
    Created,
    /// Settle delay elapsed; title and banner are being sent
    Settling,
    Titled,
    /// About to send command `index` (zero-based) of `total`
    Running { index: usize, total: usize },
    /// Close warning and `exit` are being sent before disposal
    Closing,
    Terminated,
}

impl fmt::Display for ReplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayState::Created => write!(f, "Created"),
            ReplayState::Settling => write!(f, "Settling"),
            ReplayState::Titled => write!(f, "Titled"),
            ReplayState::Running { index, total } => write!(f, "Running({}/{})", index + 1, total),
            ReplayState::Closing => write!(f, "Closing"),
            ReplayState::Terminated => write!(f, "Terminated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayStep {
    Enter(ReplayState),
    Wait(Duration),
    /// Inject one line into the shell
    Send(String),
    Dispose,
}

/// The full, ordered step list for one replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayPlan {
    title: String,
    steps: Vec<ReplayStep>,
}

impl ReplayPlan {
    /// Compile the replay of `profile` (or of a plain shell when `None`).
    pub fn build(
        profile: Option<&Profile>,
        dialect: ShellDialect,
        settings: &ReplaySettings,
        messages: &dyn Messages,
    ) -> Self {
        let title = profile
            .map(|p| p.name.clone())
            .unwrap_or_else(|| messages.text(MessageKey::Terminal));
        let commands = profile.map(Profile::command_list).unwrap_or_default();
        let total = commands.len();

        let mut steps = vec![
            ReplayStep::Enter(ReplayState::Created),
            ReplayStep::Wait(settings.settle_delay()),
            ReplayStep::Enter(ReplayState::Settling),
            ReplayStep::Send(dialect.set_title(&title)),
            ReplayStep::Send(dialect.clear()),
            ReplayStep::Send(dialect.echo(&format!(
                "{}: {}",
                messages.text(MessageKey::Terminal),
                title
            ))),
            ReplayStep::Enter(ReplayState::Titled),
        ];

        if total > 0 {
            let count = total.to_string();
            steps.push(ReplayStep::Send(dialect.echo(
                &messages.format(MessageKey::ExecutingConfiguredCommands, &[count.as_str()]),
            )));

            for (index, command) in commands.iter().enumerate() {
                steps.push(ReplayStep::Enter(ReplayState::Running { index, total }));
                steps.push(ReplayStep::Send(dialect.echo(&format!(
                    "[{}/{}] > {}",
                    index + 1,
                    total,
                    command
                ))));
                steps.push(ReplayStep::Send(command.clone()));
            }

            steps.push(ReplayStep::Send(
                dialect.echo(&messages.text(MessageKey::AllCommandsExecuted)),
            ));

            if profile.is_some_and(|p| p.close_on_finish.is_enabled()) {
                let secs = settings.close_countdown_secs().to_string();
                steps.push(ReplayStep::Enter(ReplayState::Closing));
                steps.push(ReplayStep::Send(
                    dialect.warn(&messages.format(MessageKey::TerminalClosingIn, &[secs.as_str()])),
                ));
                steps.push(ReplayStep::Send(dialect.exit()));
                steps.push(ReplayStep::Wait(settings.close_delay()));
                steps.push(ReplayStep::Dispose);
            }
        }

        steps.push(ReplayStep::Enter(ReplayState::Terminated));

        Self { title, steps }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn steps(&self) -> &[ReplayStep] {
        &self.steps
    }

    /// Every line the plan sends, in order
    pub fn sent_lines(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|step| match step {
            ReplayStep::Send(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether the plan ends by disposing the shell
    pub fn disposes(&self) -> bool {
        self.steps.contains(&ReplayStep::Dispose)
    }

    /// States the plan passes through, in order
    pub fn states(&self) -> Vec<ReplayState> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                ReplayStep::Enter(state) => Some(*state),
                _ => None,
            })
            .collect()
    }
}

/// Called on every state transition
pub type TransitionObserver = Arc<dyn Fn(&ReplayState) + Send + Sync>;

/// Summary of a finished replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    pub final_state: ReplayState,
    pub lines_sent: usize,
    /// Sends the shell rejected (e.g. it exited early); replay continues past them
    pub failed_sends: usize,
    pub disposed: bool,
}

/// Executes a [`ReplayPlan`] against one shell handle.
///
/// Each engine owns its plan and shares only the handle with its creator,
/// so any number of engines can run concurrently.
pub struct ReplayEngine {
    plan: ReplayPlan,
    handle: Arc<dyn ShellHandle>,
    observers: Vec<TransitionObserver>,
}

impl fmt::Debug for ReplayEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplayEngine")
            .field("plan", &self.plan)
            .field("shell", &self.handle.name())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ReplayEngine {
    pub fn new(plan: ReplayPlan, handle: Arc<dyn ShellHandle>) -> Self {
        Self {
            plan,
            handle,
            observers: Vec::new(),
        }
    }

    /// Register a transition observer
    pub fn on_transition(mut self, observer: impl Fn(&ReplayState) + Send + Sync + 'static) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    pub fn plan(&self) -> &ReplayPlan {
        &self.plan
    }

    /// Run every step to completion.
    pub async fn run(self) -> ReplayReport {
        let mut report = ReplayReport {
            final_state: ReplayState::Created,
            lines_sent: 0,
            failed_sends: 0,
            disposed: false,
        };

        for step in self.plan.steps() {
            match step {
                ReplayStep::Enter(state) => {
                    log::debug!("Replay \"{}\": {}", self.plan.title(), state);
                    report.final_state = *state;
                    for observer in &self.observers {
                        observer(state);
                    }
                }
                ReplayStep::Wait(delay) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(*delay).await;
                    }
                }
                ReplayStep::Send(text) => match self.handle.send_text(text, true) {
                    Ok(()) => report.lines_sent += 1,
                    Err(e) => {
                        report.failed_sends += 1;
                        log::warn!(
                            "Replay \"{}\": failed to send {:?}: {}",
                            self.plan.title(),
                            text,
                            e
                        );
                    }
                },
                ReplayStep::Dispose => {
                    if let Err(e) = self.handle.dispose() {
                        log::warn!("Replay \"{}\": failed to dispose shell: {}", self.plan.title(), e);
                    }
                    report.disposed = true;
                }
            }
        }

        log::info!(
            "Replay \"{}\" finished: {} lines sent, {} failed, disposed = {}",
            self.plan.title(),
            report.lines_sent,
            report.failed_sends,
            report.disposed
        );
        report
    }

    /// Run on `runtime` in the background
    pub fn spawn(self, runtime: &tokio::runtime::Handle) -> tokio::task::JoinHandle<ReplayReport> {
        runtime.spawn(self.run())
    }
}
