//! Banner and control lines in each shell's dialect.
//!
//! PowerShell hosts get `$host.UI.RawUI` and `Write-Host`; everything else
//! gets POSIX `echo -e` with ANSI escapes. Interpolated text is quoted for
//! the target dialect so a command containing quotes or `$` is echoed
//! literally instead of being expanded by the shell.

use crate::platform::HostFamily;

/// Control-line dialect, chosen from the host family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellDialect {
    PowerShell,
    Posix,
}

impl ShellDialect {
    pub fn for_family(family: HostFamily) -> Self {
        if family.is_windows() {
            ShellDialect::PowerShell
        } else {
            ShellDialect::Posix
        }
    }

    /// Line that sets the terminal window title
    pub fn set_title(self, title: &str) -> String {
        match self {
            ShellDialect::PowerShell => {
                format!("$host.UI.RawUI.WindowTitle = '{}'", title.replace('\'', "''"))
            }
            ShellDialect::Posix => {
                format!("echo -e \"\\033]0;{}\\007\"", escape_posix(title))
            }
        }
    }

    /// `clear` is an alias of `Clear-Host` in PowerShell
    pub fn clear(self) -> String {
        "clear".to_string()
    }

    /// Line that prints `text` as-is
    pub fn echo(self, text: &str) -> String {
        match self {
            ShellDialect::PowerShell => format!("Write-Host \"{}\"", escape_powershell(text)),
            ShellDialect::Posix => format!("echo \"{}\"", escape_posix(text)),
        }
    }

    /// Line that prints `text` in yellow
    pub fn warn(self, text: &str) -> String {
        match self {
            ShellDialect::PowerShell => format!(
                "Write-Host \"{}\" -ForegroundColor Yellow",
                escape_powershell(text)
            ),
            ShellDialect::Posix => {
                format!("echo -e \"\\033[33m{}\\033[0m\"", escape_posix(text))
            }
        }
    }

    pub fn exit(self) -> String {
        "exit".to_string()
    }
}

/// Escape for a POSIX double-quoted string
fn escape_posix(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Escape for a PowerShell double-quoted string (backtick is the escape char)
fn escape_powershell(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '`' | '"' | '$') {
            out.push('`');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_for_family() {
        assert_eq!(ShellDialect::for_family(HostFamily::Windows), ShellDialect::PowerShell);
        assert_eq!(ShellDialect::for_family(HostFamily::Mac), ShellDialect::Posix);
        assert_eq!(ShellDialect::for_family(HostFamily::Other), ShellDialect::Posix);
    }

    #[test]
    fn test_posix_lines() {
        let d = ShellDialect::Posix;
        assert_eq!(d.set_title("Build"), r#"echo -e "\033]0;Build\007""#);
        assert_eq!(d.clear(), "clear");
        assert_eq!(d.echo("Terminal: Build"), r#"echo "Terminal: Build""#);
        assert_eq!(
            d.warn("Terminal will close in 3 seconds..."),
            r#"echo -e "\033[33mTerminal will close in 3 seconds...\033[0m""#
        );
        assert_eq!(d.exit(), "exit");
    }

    #[test]
    fn test_powershell_lines() {
        let d = ShellDialect::PowerShell;
        assert_eq!(d.set_title("Build"), "$host.UI.RawUI.WindowTitle = 'Build'");
        assert_eq!(d.clear(), "clear");
        assert_eq!(d.echo("Terminal: Build"), r#"Write-Host "Terminal: Build""#);
        assert_eq!(
            d.warn("closing"),
            r#"Write-Host "closing" -ForegroundColor Yellow"#
        );
    }

    #[test]
    fn test_quoting() {
        assert_eq!(
            ShellDialect::Posix.echo(r#"[1/1] > echo "$HOME""#),
            r#"echo "[1/1] > echo \"\$HOME\"""#
        );
        assert_eq!(
            ShellDialect::PowerShell.echo(r#"say "$x""#),
            r#"Write-Host "say `"`$x`"""#
        );
        assert_eq!(
            ShellDialect::PowerShell.set_title("Bob's"),
            "$host.UI.RawUI.WindowTitle = 'Bob''s'"
        );
    }
}
