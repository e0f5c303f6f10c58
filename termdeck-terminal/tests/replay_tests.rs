//! Replay behavior through the launcher, with a recording shell
//!
//! Covers:
//! - Command ordering with per-command progress lines
//! - No disposal without the close flag
//! - The close path (warning, exit, dispose)
//! - Concurrent replays against separate shells
//! - Stale working directories

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use termdeck_config::{EnglishMessages, Profile, ReplaySettings};
use termdeck_terminal::{
    HostFamily, ReplayLauncher, ReplayState, ShellFactory, ShellHandle, ShellLaunch,
};

#[derive(Debug)]
struct RecordingShell {
    launch: ShellLaunch,
    lines: Mutex<Vec<String>>,
    shown: Mutex<bool>,
    disposals: Mutex<usize>,
}

impl RecordingShell {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    fn disposals(&self) -> usize {
        *self.disposals.lock()
    }
}

impl ShellHandle for RecordingShell {
    fn name(&self) -> &str {
        &self.launch.name
    }

    fn send_text(&self, text: &str, _add_newline: bool) -> anyhow::Result<()> {
        self.lines.lock().push(text.to_string());
        Ok(())
    }

    fn show(&self) {
        *self.shown.lock() = true;
    }

    fn dispose(&self) -> anyhow::Result<()> {
        *self.disposals.lock() += 1;
        Ok(())
    }
}

#[derive(Default)]
struct RecordingFactory;

impl ShellFactory for RecordingFactory {
    type Handle = RecordingShell;

    fn create(&self, launch: &ShellLaunch) -> anyhow::Result<Arc<RecordingShell>> {
        Ok(Arc::new(RecordingShell {
            launch: launch.clone(),
            lines: Mutex::new(Vec::new()),
            shown: Mutex::new(false),
            disposals: Mutex::new(0),
        }))
    }
}

fn launcher(family: HostFamily) -> ReplayLauncher<RecordingFactory> {
    ReplayLauncher::new(
        RecordingFactory,
        ReplaySettings::immediate(),
        Arc::new(EnglishMessages),
        PathBuf::from("/fallback"),
    )
    .with_family(family)
}

/// Lines that are not banner or control lines
fn executed(lines: &[String]) -> Vec<&str> {
    lines
        .iter()
        .map(String::as_str)
        .filter(|l| !l.starts_with("echo") && *l != "clear")
        .collect()
}

#[tokio::test]
async fn test_commands_run_in_order_each_after_its_progress_line() {
    let profile = Profile::new("Seq").commands(["c1", "c2", "c3"]);
    let launched = launcher(HostFamily::Other).launch(Some(&profile)).unwrap();
    let shell = Arc::clone(&launched.shell);

    launched.engine.run().await;

    let lines = shell.lines();
    assert_eq!(executed(&lines), ["c1", "c2", "c3"]);
    for (i, cmd) in ["c1", "c2", "c3"].iter().enumerate() {
        let at = lines.iter().position(|l| l == cmd).unwrap();
        assert_eq!(lines[at - 1], format!("echo \"[{}/3] > {}\"", i + 1, cmd));
    }
}

#[tokio::test]
async fn test_build_scenario_sends_two_commands_and_keeps_shell() {
    let profile = Profile::new("Build").commands(["npm ci", "npm test"]);
    let launched = launcher(HostFamily::Other).launch(Some(&profile)).unwrap();
    let shell = Arc::clone(&launched.shell);

    let report = launched.engine.run().await;

    assert_eq!(executed(&shell.lines()), ["npm ci", "npm test"]);
    assert_eq!(report.final_state, ReplayState::Terminated);
    assert!(!report.disposed);
    assert_eq!(shell.disposals(), 0);
    assert!(*shell.shown.lock());
}

#[tokio::test]
async fn test_default_close_flag_never_disposes() {
    let profile = Profile::new("Hi").commands(["echo hi"]);
    let launched = launcher(HostFamily::Mac).launch(Some(&profile)).unwrap();
    let shell = Arc::clone(&launched.shell);

    let report = launched.engine.run().await;

    assert_eq!(report.final_state, ReplayState::Terminated);
    assert_eq!(shell.disposals(), 0);
}

#[tokio::test]
async fn test_close_flag_exits_then_disposes() {
    let profile = Profile::new("Once").commands(["make"]).close_on_finish(true);
    let launched = launcher(HostFamily::Windows).launch(Some(&profile)).unwrap();
    let shell = Arc::clone(&launched.shell);

    let report = launched.engine.run().await;

    // Immediate settings: the announced countdown follows the zero close delay
    let lines = shell.lines();
    let n = lines.len();
    assert_eq!(
        lines[n - 2],
        r#"Write-Host "Terminal will close in 0 seconds..." -ForegroundColor Yellow"#
    );
    assert_eq!(lines[n - 1], "exit");
    assert!(report.disposed);
    assert_eq!(shell.disposals(), 1);
    assert_eq!(shell.launch.program.path, "powershell.exe");
}

#[tokio::test]
async fn test_empty_profile_only_titles() {
    let launched = launcher(HostFamily::Other)
        .launch(Some(&Profile::new("Empty")))
        .unwrap();
    let shell = Arc::clone(&launched.shell);

    launched.engine.run().await;

    assert_eq!(shell.lines().len(), 3);
    assert_eq!(shell.lines()[2], r#"echo "Terminal: Empty""#);
}

#[tokio::test]
async fn test_plain_shell_uses_platform_label() {
    let launched = launcher(HostFamily::Other).launch(None).unwrap();
    assert_eq!(launched.shell.name(), "Bash");
    assert_eq!(launched.engine.plan().title(), "Terminal");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_replays_do_not_interleave() {
    let launcher = launcher(HostFamily::Other);
    let a = launcher
        .launch(Some(&Profile::new("A").commands(["a1", "a2", "a3"])))
        .unwrap();
    let b = launcher
        .launch(Some(&Profile::new("B").commands(["b1", "b2"])))
        .unwrap();
    let (shell_a, shell_b) = (Arc::clone(&a.shell), Arc::clone(&b.shell));

    let runtime = tokio::runtime::Handle::current();
    let (ra, rb) = tokio::join!(a.engine.spawn(&runtime), b.engine.spawn(&runtime));

    assert_eq!(ra.unwrap().final_state, ReplayState::Terminated);
    assert_eq!(rb.unwrap().final_state, ReplayState::Terminated);
    assert_eq!(executed(&shell_a.lines()), ["a1", "a2", "a3"]);
    assert_eq!(executed(&shell_b.lines()), ["b1", "b2"]);
}

#[test]
fn test_stale_directory_falls_back() {
    let profile = Profile::new("Gone").working_directory("/nonexistent/termdeck/gone");
    let launched = launcher(HostFamily::Other).launch(Some(&profile)).unwrap();

    assert!(launched.directory.stale.is_some());
    assert_eq!(launched.shell.launch.working_directory, Path::new("/fallback"));
}

#[test]
fn test_existing_directory_is_used() {
    let temp = tempfile::tempdir().unwrap();
    let profile = Profile::new("Here").working_directory(temp.path().to_string_lossy());
    let launched = launcher(HostFamily::Other).launch(Some(&profile)).unwrap();

    assert!(launched.directory.stale.is_none());
    assert_eq!(launched.shell.launch.working_directory, temp.path());
}
