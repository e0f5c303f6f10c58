//! Opening a shell for a profile and preparing its replay.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use termdeck_config::{Messages, Profile, ReplaySettings};

use crate::dialect::ShellDialect;
use crate::handle::{ShellFactory, ShellHandle, ShellLaunch};
use crate::platform::HostFamily;
use crate::replay::{ReplayEngine, ReplayPlan};
use crate::shell::select_shell;
use crate::working_dir::{ResolvedDirectory, resolve_working_directory};

/// A shown shell and the (not yet started) replay that will drive it
pub struct LaunchedReplay<H> {
    pub shell: Arc<H>,
    pub directory: ResolvedDirectory,
    pub engine: ReplayEngine,
}

impl<H> std::fmt::Debug for LaunchedReplay<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchedReplay")
            .field("directory", &self.directory)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

pub struct ReplayLauncher<F> {
    factory: F,
    family: HostFamily,
    settings: ReplaySettings,
    messages: Arc<dyn Messages>,
    fallback_directory: PathBuf,
}

impl<F: ShellFactory> ReplayLauncher<F> {
    pub fn new(
        factory: F,
        settings: ReplaySettings,
        messages: Arc<dyn Messages>,
        fallback_directory: PathBuf,
    ) -> Self {
        Self {
            factory,
            family: HostFamily::current(),
            settings,
            messages,
            fallback_directory,
        }
    }

    /// Override the detected host family
    pub fn with_family(mut self, family: HostFamily) -> Self {
        self.family = family;
        self
    }

    /// Create and show a shell for `profile` (a plain shell when `None`) and
    /// compile its replay. The caller starts the returned engine.
    pub fn launch(&self, profile: Option<&Profile>) -> Result<LaunchedReplay<F::Handle>> {
        let directory = resolve_working_directory(profile, &self.fallback_directory);
        let launch = ShellLaunch {
            name: profile
                .map(|p| p.name.clone())
                .unwrap_or_else(|| self.family.terminal_label().to_string()),
            program: select_shell(self.family),
            working_directory: directory.path.clone(),
        };

        let shell = self.factory.create(&launch)?;
        shell.show();

        let plan = ReplayPlan::build(
            profile,
            ShellDialect::for_family(self.family),
            &self.settings,
            self.messages.as_ref(),
        );
        let handle: Arc<dyn ShellHandle> = shell.clone();
        let engine = ReplayEngine::new(plan, handle);

        Ok(LaunchedReplay {
            shell,
            directory,
            engine,
        })
    }
}
