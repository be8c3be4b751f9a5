use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tabedit::app::workbench::Severity;
use tabedit::app::Workbench;
use tabedit::services::config;
use tabedit::services::{EditorConfig, KeybindingService};
use tabedit::tui::{self, ShutdownFlag, TerminalGuard, View};

mod logging;

const USAGE: &str = "\
usage: tabedit [PATH]

Browse PATH (default: the current directory) and edit files in tabs.
When PATH is a file it is opened, with its directory as the explorer root.

options:
  -h, --help       print this help
  -V, --version    print the version
";

#[derive(Debug)]
struct StartupPaths {
    root: PathBuf,
    open_file: Option<PathBuf>,
}

/// Never fails: a path that does not exist still becomes the root, and the
/// explorer shows the error in place of a listing.
fn resolve_startup_paths(cwd: &Path, arg: Option<&str>) -> StartupPaths {
    let Some(arg) = arg.filter(|a| !a.is_empty()) else {
        return StartupPaths {
            root: cwd.to_path_buf(),
            open_file: None,
        };
    };

    let raw = PathBuf::from(arg);
    let candidate = if raw.is_absolute() { raw } else { cwd.join(raw) };
    match std::fs::metadata(&candidate) {
        Ok(meta) if meta.is_file() => {
            let file = candidate.canonicalize().unwrap_or(candidate);
            let root = file
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.to_path_buf());
            StartupPaths {
                root,
                open_file: Some(file),
            }
        }
        Ok(_) => StartupPaths {
            root: candidate.canonicalize().unwrap_or(candidate),
            open_file: None,
        },
        Err(err) => {
            tracing::warn!(path = %candidate.display(), error = %err, "startup path unavailable");
            StartupPaths {
                root: candidate,
                open_file: None,
            }
        }
    }
}

fn main() -> io::Result<()> {
    let mut path_arg: Option<String> = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                print!("{USAGE}");
                return Ok(());
            }
            "-V" | "--version" => {
                println!("tabedit {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            _ if path_arg.is_none() => path_arg = Some(arg),
            _ => {
                eprintln!("tabedit: unexpected argument '{arg}'");
                eprint!("{USAGE}");
                std::process::exit(2);
            }
        }
    }

    let _logging = logging::init();

    let cwd = std::env::current_dir()?;
    let startup = resolve_startup_paths(&cwd, path_arg.as_deref());
    tracing::info!(root = %startup.root.display(), "starting");

    if let Err(err) = config::ensure_settings_file() {
        tracing::warn!(error = %err, "settings file not created");
    }
    let settings = config::load_settings().unwrap_or_default();
    let (keybindings, rejected) = KeybindingService::with_overrides(&settings.keybindings);
    let editor_config = EditorConfig::from_settings(&settings);

    let mut workbench = Workbench::new(&startup.root, editor_config, keybindings)?;
    for rule in rejected {
        tracing::warn!(key = %rule.key, command = %rule.command, "keybinding rejected");
        workbench.notify(
            Severity::Warning,
            format!("Invalid keybinding '{}' for {}", rule.key, rule.command),
        );
    }
    if let Some(file) = &startup.open_file {
        workbench.open_path(file);
    }

    let shutdown = ShutdownFlag::new();
    if let Err(err) = shutdown.install_signal_handlers() {
        tracing::warn!(error = %err, "signal handlers not installed");
    }

    let guard = TerminalGuard::new()?;
    logging::install_panic_hook(guard.restorer());
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = run(&mut terminal, &mut workbench, &shutdown);
    drop(terminal);
    drop(guard);
    if let Err(err) = &result {
        tracing::error!(error = %err, "event loop failed");
    }
    tracing::info!("shut down");
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    workbench: &mut Workbench,
    shutdown: &ShutdownFlag,
) -> io::Result<()> {
    let mut needs_redraw = true;
    while !workbench.should_quit() && !shutdown.is_requested() {
        if needs_redraw {
            terminal.draw(|frame| {
                let area = frame.area();
                workbench.render(frame, area);
            })?;
            needs_redraw = false;
        }

        let wait = workbench.next_wakeup(Instant::now());
        match crossterm::event::poll(wait) {
            Ok(true) => {
                let event = crossterm::event::read()?;
                if let Some(input) = tui::crossterm::translate(event) {
                    if workbench.handle_input(&input).is_quit() {
                        break;
                    }
                    needs_redraw = true;
                }
            }
            Ok(false) => {}
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }

        needs_redraw |= workbench.tick(Instant::now());
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/cli_startup_paths.rs"]
mod cli_startup_paths_tests;
