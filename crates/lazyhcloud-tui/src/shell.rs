//! SSH launching: multiplexer windows, new terminal emulators and the
//! foreground session that temporarily takes over the TUI's terminal

use lazyhcloud_core::{ShellTarget, ShellVariant};
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Linux emulators probed when no terminal is configured, in order
const LINUX_TERMINALS: [&str; 6] = [
    "gnome-terminal",
    "konsole",
    "xterm",
    "alacritty",
    "kitty",
    "foot",
];

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("No terminal emulator found (tried {0})")]
    NoTerminal(String),

    #[error("{0} cannot be launched in the background")]
    Unsupported(&'static str),

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}")]
    Exit { program: String, status: String },
}

/// A fully built process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Wait for exit and treat a failure status as an error
    pub wait: bool,
    /// Status line shown once the process has started
    pub report: String,
}

impl LaunchCommand {
    fn new(program: &str, args: Vec<String>, wait: bool, report: String) -> Self {
        Self {
            program: program.to_string(),
            args,
            wait,
            report,
        }
    }

    /// Shell-quoted rendering for logs
    pub fn display(&self) -> String {
        let mut words = vec![self.program.clone()];
        words.extend(self.args.iter().cloned());
        shell_words::join(words)
    }
}

/// `ssh-1-2-3-4` for `1.2.3.4`
pub fn window_name(host: &str) -> String {
    format!("ssh-{}", host.replace(['.', ':'], "-"))
}

/// `ssh user@host` as a single shell string, for tmux
fn ssh_line(target: &ShellTarget) -> String {
    shell_words::join(["ssh", target.destination().as_str()])
}

/// Whether `program` resolves to a file on PATH (or is a path itself)
pub fn on_path(program: &str) -> bool {
    if program.contains(std::path::MAIN_SEPARATOR) {
        return Path::new(program).is_file();
    }
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}

/// Build the process for a background launch variant
///
/// `find` reports whether a program is installed; `macos` selects the
/// AppleScript launcher for new terminals.
pub fn launch_command(
    variant: ShellVariant,
    target: &ShellTarget,
    macos: bool,
    find: &dyn Fn(&str) -> bool,
) -> Result<LaunchCommand, LaunchError> {
    let dest = target.destination();
    let name = window_name(&target.host);

    let cmd = match variant {
        ShellVariant::TmuxWindow => LaunchCommand::new(
            "tmux",
            vec!["new-window".into(), "-n".into(), name.clone(), ssh_line(target)],
            true,
            format!("SSH session launched in new tmux window: {}", name),
        ),
        ShellVariant::TmuxPane => LaunchCommand::new(
            "tmux",
            vec!["split-window".into(), "-h".into(), ssh_line(target)],
            true,
            "SSH session launched in new tmux pane".to_string(),
        ),
        ShellVariant::ZellijTab => LaunchCommand::new(
            "zellij",
            vec![
                "action".into(),
                "new-tab".into(),
                "--name".into(),
                name.clone(),
                "--".into(),
                "ssh".into(),
                dest,
            ],
            true,
            format!("SSH session launched in new zellij tab: {}", name),
        ),
        ShellVariant::ZellijPane => LaunchCommand::new(
            "zellij",
            vec![
                "action".into(),
                "new-pane".into(),
                "--".into(),
                "ssh".into(),
                dest,
            ],
            true,
            "SSH session launched in new zellij pane".to_string(),
        ),
        ShellVariant::NewTerminal => terminal_command(target, macos, find)?,
        ShellVariant::CurrentTerminal => {
            return Err(LaunchError::Unsupported("SSH in current terminal"))
        }
    };
    Ok(cmd)
}

fn terminal_command(
    target: &ShellTarget,
    macos: bool,
    find: &dyn Fn(&str) -> bool,
) -> Result<LaunchCommand, LaunchError> {
    let dest = target.destination();

    if let Some(term) = target.terminal.as_deref().filter(|t| !t.trim().is_empty()) {
        return Ok(emulator_command(term.trim(), &dest));
    }

    if macos {
        let script = format!("tell application \"Terminal\" to do script \"ssh {}\"", dest);
        return Ok(LaunchCommand::new(
            "osascript",
            vec!["-e".into(), script],
            false,
            "SSH session launched in Terminal".to_string(),
        ));
    }

    LINUX_TERMINALS
        .iter()
        .find(|term| find(term))
        .map(|term| emulator_command(term, &dest))
        .ok_or_else(|| LaunchError::NoTerminal(LINUX_TERMINALS.join(", ")))
}

fn emulator_command(term: &str, dest: &str) -> LaunchCommand {
    let separator = if term == "gnome-terminal" { "--" } else { "-e" };
    LaunchCommand::new(
        term,
        vec![separator.into(), "ssh".into(), dest.to_string()],
        false,
        format!("SSH session launched in {}", term),
    )
}

/// Run a background launch, returning the status text to show
pub fn spawn_launch(cmd: &LaunchCommand) -> Result<String, LaunchError> {
    tracing::debug!("Launching: {}", cmd.display());
    let spawn_err = |source| LaunchError::Spawn {
        program: cmd.program.clone(),
        source,
    };

    let mut process = Command::new(&cmd.program);
    process
        .args(&cmd.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    if cmd.wait {
        let status = process.status().map_err(spawn_err)?;
        if !status.success() {
            return Err(LaunchError::Exit {
                program: cmd.program.clone(),
                status: status.to_string(),
            });
        }
    } else {
        // Emulators outlive us; the child is not waited on
        process.spawn().map_err(spawn_err)?;
    }
    Ok(cmd.report.clone())
}

/// Run `ssh user@host` attached to the current terminal until it exits
///
/// The caller must have left raw mode and the alternate screen first.
pub fn run_foreground(target: &ShellTarget) -> Result<(), String> {
    let dest = target.destination();
    tracing::info!("Starting foreground ssh to {}", dest);
    println!("Connecting to {} ({})...", target.server_name, dest);

    let status = Command::new("ssh")
        .arg(&dest)
        .status()
        .map_err(|e| format!("failed to run ssh: {}", e))?;

    if status.success() {
        Ok(())
    } else {
        Err(status.to_string())
    }
}

/// Reset terminal to sane state using stty
#[cfg(unix)]
pub fn reset_terminal() {
    let _ = Command::new("stty")
        .arg("sane")
        .stdin(Stdio::inherit())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    let _ = io::stdout().flush();
}

#[cfg(not(unix))]
pub fn reset_terminal() {
    let _ = io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> ShellTarget {
        ShellTarget {
            user: "root".to_string(),
            host: "1.2.3.4".to_string(),
            server_name: "web-1".to_string(),
            terminal: None,
        }
    }

    fn nothing_installed(_: &str) -> bool {
        false
    }

    fn args(cmd: &LaunchCommand) -> Vec<&str> {
        cmd.args.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_window_name() {
        assert_eq!(window_name("1.2.3.4"), "ssh-1-2-3-4");
        assert_eq!(window_name("2001:db8::1"), "ssh-2001-db8--1");
    }

    #[test]
    fn test_tmux_window() {
        let cmd =
            launch_command(ShellVariant::TmuxWindow, &target(), false, &nothing_installed).unwrap();
        assert_eq!(cmd.program, "tmux");
        assert_eq!(
            args(&cmd),
            vec!["new-window", "-n", "ssh-1-2-3-4", "ssh root@1.2.3.4"]
        );
        assert!(cmd.wait);
        assert_eq!(
            cmd.report,
            "SSH session launched in new tmux window: ssh-1-2-3-4"
        );
    }

    #[test]
    fn test_tmux_pane() {
        let cmd =
            launch_command(ShellVariant::TmuxPane, &target(), false, &nothing_installed).unwrap();
        assert_eq!(args(&cmd), vec!["split-window", "-h", "ssh root@1.2.3.4"]);
    }

    #[test]
    fn test_zellij_variants() {
        let tab =
            launch_command(ShellVariant::ZellijTab, &target(), false, &nothing_installed).unwrap();
        assert_eq!(tab.program, "zellij");
        assert_eq!(
            args(&tab),
            vec!["action", "new-tab", "--name", "ssh-1-2-3-4", "--", "ssh", "root@1.2.3.4"]
        );

        let pane =
            launch_command(ShellVariant::ZellijPane, &target(), false, &nothing_installed).unwrap();
        assert_eq!(
            args(&pane),
            vec!["action", "new-pane", "--", "ssh", "root@1.2.3.4"]
        );
    }

    #[test]
    fn test_configured_user_in_destination() {
        let mut t = target();
        t.user = "deploy".to_string();
        let cmd = launch_command(ShellVariant::TmuxPane, &t, false, &nothing_installed).unwrap();
        assert_eq!(cmd.args[2], "ssh deploy@1.2.3.4");
    }

    #[test]
    fn test_preferred_terminal_wins() {
        let mut t = target();
        t.terminal = Some("wezterm".to_string());
        let cmd = launch_command(ShellVariant::NewTerminal, &t, true, &|_| true).unwrap();
        assert_eq!(cmd.program, "wezterm");
        assert_eq!(args(&cmd), vec!["-e", "ssh", "root@1.2.3.4"]);
        assert!(!cmd.wait);
    }

    #[test]
    fn test_macos_uses_osascript() {
        let cmd =
            launch_command(ShellVariant::NewTerminal, &target(), true, &nothing_installed).unwrap();
        assert_eq!(cmd.program, "osascript");
        assert_eq!(
            cmd.args[1],
            "tell application \"Terminal\" to do script \"ssh root@1.2.3.4\""
        );
    }

    #[test]
    fn test_linux_terminal_probe_order() {
        let cmd = launch_command(ShellVariant::NewTerminal, &target(), false, &|t| {
            t == "xterm" || t == "kitty"
        })
        .unwrap();
        assert_eq!(cmd.program, "xterm");
        assert_eq!(args(&cmd), vec!["-e", "ssh", "root@1.2.3.4"]);

        let gnome = launch_command(ShellVariant::NewTerminal, &target(), false, &|_| true).unwrap();
        assert_eq!(gnome.program, "gnome-terminal");
        assert_eq!(args(&gnome), vec!["--", "ssh", "root@1.2.3.4"]);
    }

    #[test]
    fn test_no_terminal_found() {
        let err = launch_command(ShellVariant::NewTerminal, &target(), false, &nothing_installed)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "No terminal emulator found (tried gnome-terminal, konsole, xterm, alacritty, kitty, foot)"
        );
    }

    #[test]
    fn test_current_terminal_is_not_a_background_launch() {
        let err = launch_command(
            ShellVariant::CurrentTerminal,
            &target(),
            false,
            &nothing_installed,
        )
        .unwrap_err();
        assert!(matches!(err, LaunchError::Unsupported(_)));
    }

    #[test]
    fn test_display_quotes_arguments() {
        let cmd =
            launch_command(ShellVariant::TmuxPane, &target(), false, &nothing_installed).unwrap();
        assert_eq!(cmd.display(), "tmux split-window -h 'ssh root@1.2.3.4'");
    }

    #[test]
    fn test_spawn_missing_program() {
        let cmd = LaunchCommand::new(
            "lazyhcloud-test-no-such-program",
            Vec::new(),
            true,
            String::new(),
        );
        assert!(matches!(spawn_launch(&cmd), Err(LaunchError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_failure_status() {
        let cmd = LaunchCommand::new("false", Vec::new(), true, String::new());
        assert!(matches!(spawn_launch(&cmd), Err(LaunchError::Exit { .. })));
    }
}
