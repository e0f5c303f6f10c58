//! User-visible text, looked up by key.
//!
//! The replay engine and the CLI never hard-code visible strings; they take a
//! [`Messages`] implementation and resolve [`MessageKey`]s through it.
//! Templates use positional `{0}`, `{1}` placeholders.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::{Arc, LazyLock};

/// Matches `{N}` positional placeholders.
static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(\d+)\}").expect("placeholder regex is a compile-time constant and must be valid")
});

/// Every piece of user-visible text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    // Errors
    ErrorInitializingConfig,
    ErrorLoadingConfig,
    ErrorUpdatingProperty,
    ErrorOpeningTerminal,
    ErrorCreatingTerminal,
    ErrorConfiguringCommands,
    ErrorRenamingTerminal,
    ErrorDeletingTerminal,
    ErrorJsonFormat,
    NoProjectFolder,
    NameAlreadyExists,

    // Success
    TerminalCreated,
    TerminalOpenedAt,
    TerminalRenamed,
    TerminalDeleted,
    ConfigurationUpdated,
    CommandsUpdated,
    PropertyUpdated,

    // Prompts and confirmations
    ConfirmDeleteTerminal,
    Yes,
    TerminalDeletionCancelled,

    // Warnings and info
    DirectoryNotExists,
    EditingConfiguration,
    TerminalNotFound,

    // Replay banners
    Terminal,
    ExecutingConfiguredCommands,
    AllCommandsExecuted,
    TerminalClosingIn,

    // List view
    OpenTerminalLabel,
    SavedTerminals,
    SavedTerminalsTooltip,
    OpenTerminalTooltip,
    CommandsTooltip,
    DirectoryTooltip,
    ProjectDirectory,
    CommandsCount,
}

/// Resolves message keys to localized templates.
pub trait Messages: Send + Sync {
    /// Raw template for `key`, placeholders untouched
    fn template(&self, key: MessageKey) -> Cow<'_, str>;

    /// Template for `key` with no arguments substituted
    fn text(&self, key: MessageKey) -> String {
        self.template(key).into_owned()
    }

    /// Template for `key` with `{N}` replaced by `args[N]`
    fn format(&self, key: MessageKey, args: &[&str]) -> String {
        format_template(&self.template(key), args)
    }
}

/// Replace `{N}` placeholders with positional arguments.
///
/// Placeholders without a matching argument are left as written.
pub fn format_template(template: &str, args: &[&str]) -> String {
    PLACEHOLDER_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| args.get(i))
                .map(|arg| (*arg).to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Built-in English table
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishMessages;

impl Messages for EnglishMessages {
    fn template(&self, key: MessageKey) -> Cow<'_, str> {
        use MessageKey::*;
        Cow::Borrowed(match key {
            ErrorInitializingConfig => "Could not initialize terminal configuration",
            ErrorLoadingConfig => "Error loading terminal configurations",
            ErrorUpdatingProperty => "Error updating terminal property",
            ErrorOpeningTerminal => "Error opening terminal",
            ErrorCreatingTerminal => "Error creating terminal",
            ErrorConfiguringCommands => "Error configuring commands",
            ErrorRenamingTerminal => "Error renaming terminal",
            ErrorDeletingTerminal => "Error deleting terminal",
            ErrorJsonFormat => "JSON format error",
            NoProjectFolder => "No project folder is open; saved terminals are unavailable",
            NameAlreadyExists => "A terminal named \"{0}\" already exists",
            TerminalCreated => "Terminal \"{0}\" created successfully",
            TerminalOpenedAt => "Terminal{0} opened at: {1}",
            TerminalRenamed => "Terminal renamed to \"{0}\"",
            TerminalDeleted => "Terminal \"{0}\" deleted",
            ConfigurationUpdated => "Configuration updated for \"{0}\"",
            CommandsUpdated => "Commands updated for terminal \"{0}\": {1} commands",
            PropertyUpdated => "Property \"{1}\" updated for \"{0}\"",
            ConfirmDeleteTerminal => "Are you sure you want to delete terminal \"{0}\"?",
            Yes => "Yes",
            TerminalDeletionCancelled => "Terminal deletion cancelled",
            DirectoryNotExists => "Directory {0} does not exist. Project directory will be used.",
            EditingConfiguration => {
                "Editing configuration for \"{0}\". Look for the \"comandos\" section to add startup commands."
            }
            TerminalNotFound => "Terminal \"{0}\" not found",
            Terminal => "Terminal",
            ExecutingConfiguredCommands => "Executing {0} configured commands:",
            AllCommandsExecuted => "All commands have been executed.",
            TerminalClosingIn => "Terminal will close in {0} seconds...",
            OpenTerminalLabel => "Open {0}",
            SavedTerminals => "Saved terminals",
            SavedTerminalsTooltip => "Saved terminals for this project",
            OpenTerminalTooltip => "Open a new {0} terminal",
            CommandsTooltip => "Commands: {0}\nDirectory: {1}",
            DirectoryTooltip => "Directory: {0}",
            ProjectDirectory => "project directory",
            CommandsCount => "({0} cmds)",
        })
    }
}

/// Built-in Spanish table
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanishMessages;

impl Messages for SpanishMessages {
    fn template(&self, key: MessageKey) -> Cow<'_, str> {
        use MessageKey::*;
        Cow::Borrowed(match key {
            ErrorInitializingConfig => "No se pudo inicializar la configuración de terminales",
            ErrorLoadingConfig => "Error al cargar las configuraciones de terminales",
            ErrorUpdatingProperty => "Error al actualizar propiedad de terminal",
            ErrorOpeningTerminal => "Error al abrir terminal",
            ErrorCreatingTerminal => "Error al crear terminal",
            ErrorConfiguringCommands => "Error al configurar comandos",
            ErrorRenamingTerminal => "Error al renombrar terminal",
            ErrorDeletingTerminal => "Error al eliminar terminal",
            ErrorJsonFormat => "Error en el formato JSON",
            NoProjectFolder => "No hay una carpeta de proyecto abierta; las terminales guardadas no están disponibles",
            NameAlreadyExists => "Ya existe una terminal llamada \"{0}\"",
            TerminalCreated => "Terminal \"{0}\" creada con éxito",
            TerminalOpenedAt => "Terminal{0} abierto en: {1}",
            TerminalRenamed => "Terminal renombrada a \"{0}\"",
            TerminalDeleted => "Terminal \"{0}\" eliminada",
            ConfigurationUpdated => "Configuración actualizada para \"{0}\"",
            CommandsUpdated => "Comandos actualizados para terminal \"{0}\": {1} comandos",
            PropertyUpdated => "Propiedad \"{1}\" actualizada para \"{0}\"",
            ConfirmDeleteTerminal => "¿Está seguro de eliminar la terminal \"{0}\"?",
            Yes => "Sí",
            TerminalDeletionCancelled => "Eliminación de terminal cancelada",
            DirectoryNotExists => {
                "El directorio {0} no existe. Se usará el directorio del proyecto."
            }
            EditingConfiguration => {
                "Editando configuración para \"{0}\". Busca la sección \"comandos\" para agregar comandos de inicio."
            }
            TerminalNotFound => "Terminal \"{0}\" no encontrado",
            Terminal => "Terminal",
            ExecutingConfiguredCommands => "Ejecutando {0} comandos configurados:",
            AllCommandsExecuted => "Todos los comandos han sido ejecutados.",
            TerminalClosingIn => "La terminal se cerrará en {0} segundos...",
            OpenTerminalLabel => "Abrir {0}",
            SavedTerminals => "Terminales guardadas",
            SavedTerminalsTooltip => "Terminales guardadas para este proyecto",
            OpenTerminalTooltip => "Abrir una nueva terminal {0}",
            CommandsTooltip => "Comandos: {0}\nDirectorio: {1}",
            DirectoryTooltip => "Directorio: {0}",
            ProjectDirectory => "directorio del proyecto",
            CommandsCount => "({0} cmds)",
        })
    }
}

/// Language of the built-in message tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    /// Guess the locale from `LC_ALL`, `LC_MESSAGES` or `LANG`; English when unknown.
    pub fn from_env() -> Self {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.is_empty())
            .map(|value| Self::from_tag(&value))
            .unwrap_or_default()
    }

    /// Parse a language tag such as `es_ES.UTF-8` or `en-US`
    pub fn from_tag(tag: &str) -> Self {
        if tag.to_ascii_lowercase().starts_with("es") {
            Locale::Es
        } else {
            Locale::En
        }
    }

    /// Message table for this locale
    pub fn messages(self) -> Arc<dyn Messages> {
        match self {
            Locale::En => Arc::new(EnglishMessages),
            Locale::Es => Arc::new(SpanishMessages),
        }
    }
}
