//! Saved-terminal list as plain data.
//!
//! The list is rebuilt from the store every time it is shown (and on every
//! change notification), so items never hold state beyond what they render.

use termdeck_config::{MessageKey, Messages, Profile};
use termdeck_terminal::HostFamily;

pub const ICON_TERMINAL: &str = "terminal";
pub const ICON_POWERSHELL: &str = "terminal-powershell";
/// Icon for saved profiles without commands
pub const ICON_PLAIN: &str = "terminal-view-icon";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListItemKind {
    /// Opens a plain shell for the host platform
    OpenDefault,
    /// Heading above the saved profiles; not actionable
    Separator,
    SavedProfile,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub label: String,
    pub description: Option<String>,
    pub tooltip: String,
    pub icon: Option<&'static str>,
    pub profile: Option<Profile>,
    pub kind: ListItemKind,
}

/// Build the list shown for `profiles` on `family`.
pub fn build_list_items(
    profiles: &[Profile],
    family: HostFamily,
    messages: &dyn Messages,
) -> Vec<ListItem> {
    let platform = family.terminal_label();
    let mut items = vec![ListItem {
        label: messages.format(MessageKey::OpenTerminalLabel, &[platform]),
        description: None,
        tooltip: messages.format(MessageKey::OpenTerminalTooltip, &[platform]),
        icon: Some(ICON_TERMINAL),
        profile: None,
        kind: ListItemKind::OpenDefault,
    }];

    if profiles.is_empty() {
        return items;
    }

    items.push(ListItem {
        label: messages.text(MessageKey::SavedTerminals),
        description: None,
        tooltip: messages.text(MessageKey::SavedTerminalsTooltip),
        icon: None,
        profile: None,
        kind: ListItemKind::Separator,
    });

    let project_dir = messages.text(MessageKey::ProjectDirectory);
    items.extend(profiles.iter().map(|profile| {
        let directory = profile.working_directory.as_deref().unwrap_or(&project_dir);
        let (description, tooltip, icon) = if profile.has_commands() {
            let count = profile.command_count().to_string();
            let commands = profile.command_list().join(", ");
            let icon = if family.is_windows() {
                ICON_POWERSHELL
            } else {
                ICON_TERMINAL
            };
            (
                Some(messages.format(MessageKey::CommandsCount, &[count.as_str()])),
                messages.format(MessageKey::CommandsTooltip, &[commands.as_str(), directory]),
                icon,
            )
        } else {
            (
                None,
                messages.format(MessageKey::DirectoryTooltip, &[directory]),
                ICON_PLAIN,
            )
        };

        ListItem {
            label: profile.name.clone(),
            description,
            tooltip,
            icon: Some(icon),
            profile: Some(profile.clone()),
            kind: ListItemKind::SavedProfile,
        }
    }));

    items
}

/// Render items as text lines for the terminal
pub fn render_list(items: &[ListItem]) -> String {
    let mut out = String::new();
    for item in items {
        let line = match item.kind {
            ListItemKind::OpenDefault => format!("> {}", item.label),
            ListItemKind::Separator => format!("\n{}:", item.label),
            ListItemKind::SavedProfile => match &item.description {
                Some(description) => format!("  {} {}", item.label, description),
                None => format!("  {}", item.label),
            },
        };
        out.push_str(&line);
        out.push('\n');
        if item.kind == ListItemKind::SavedProfile {
            for tooltip_line in item.tooltip.lines() {
                out.push_str("      ");
                out.push_str(tooltip_line);
                out.push('\n');
            }
        }
    }
    out
}
