//! ansi-ui demo
//!
//! Draws a canned buffer with a status line, a completion menu and an info
//! box, and echoes decoded keys in the status line.
//!
//! Keys: `q` quits, `m` toggles the menu, `i` toggles the info box, `<tab>`
//! moves the menu selection.

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

use ansi_ui::core::{Color, DisplayAtom, DisplayCoord, DisplayLine, Face};
use ansi_ui::layout::{InfoStyle, MenuStyle};
use ansi_ui::{CursorMode, Key, KeyCode, Modifiers, Terminal, TerminalUi, UiOptions};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable naming the log file when `--log` is not given
const LOG_ENV: &str = "ANSI_UI_LOG";

#[derive(Parser, Debug)]
#[command(name = "ansi-ui-demo")]
#[command(version)]
#[command(about = "Interactive demo of the ansi-ui terminal backend", long_about = None)]
struct Args {
    /// TOML file with ui options
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file (stdout is the drawing surface)
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Put the status line on the first row
    #[arg(long)]
    status_on_top: bool,

    /// Menu style: inline, prompt or search
    #[arg(long, value_name = "STYLE", default_value = "inline")]
    menu_style: String,
}

fn init_logging(path: Option<PathBuf>) {
    let Some(path) = path.or_else(|| std::env::var_os(LOG_ENV).map(PathBuf::from)) else {
        return;
    };
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot open log file {}: {}", path.display(), e);
            return;
        },
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
}

fn menu_style(name: &str) -> MenuStyle {
    match name {
        "prompt" => MenuStyle::Prompt,
        "search" => MenuStyle::Search,
        _ => MenuStyle::Inline,
    }
}

fn sample_buffer() -> Vec<DisplayLine> {
    let keyword = Face::new(Color::MAGENTA, Color::Default);
    let name = Face::new(Color::CYAN, Color::Default);
    let string = Face::new(Color::GREEN, Color::Default);
    vec![
        DisplayLine::new(vec![
            DisplayAtom::new("fn", keyword),
            DisplayAtom::plain(" "),
            DisplayAtom::new("main", name),
            DisplayAtom::plain("() {\n"),
        ]),
        DisplayLine::new(vec![
            DisplayAtom::plain("    println!("),
            DisplayAtom::new("\"héllo, 世界\"", string),
            DisplayAtom::plain(");\n"),
        ]),
        DisplayLine::from("}\n"),
    ]
}

fn completions() -> Vec<DisplayLine> {
    [
        "print", "println", "eprint", "eprintln", "format", "write", "writeln", "panic",
        "assert", "assert_eq", "debug_assert", "todo", "unreachable", "vec", "matches",
    ]
    .iter()
    .map(|item| DisplayLine::from(*item))
    .collect()
}

struct Demo {
    buffer: Vec<DisplayLine>,
    menu_style: MenuStyle,
    menu_shown: bool,
    info_shown: bool,
    selected: i32,
    last_key: String,
}

impl Demo {
    fn draw<T: Terminal>(&self, ui: &mut TerminalUi<T>) {
        let padding = Face::new(Color::BLUE, Color::Default);
        ui.draw(&self.buffer, Face::default(), padding);

        let status = DisplayLine::new(vec![DisplayAtom::new(
            format!("key: {}", self.last_key),
            Face::new(Color::YELLOW, Color::Default),
        )]);
        let mode = DisplayLine::new(vec![DisplayAtom::new(
            "demo.rs 2:5 [q quit, m menu, i info]",
            Face::new(Color::BLACK, Color::CYAN),
        )]);
        ui.draw_status(&status, &mode, Face::default());
        ui.set_cursor(CursorMode::Buffer, DisplayCoord::new(1, 4));
        ui.refresh(false);
    }

    fn toggle_menu<T: Terminal>(&mut self, ui: &mut TerminalUi<T>) {
        self.menu_shown = !self.menu_shown;
        if self.menu_shown {
            self.selected = -1;
            ui.menu_show(
                completions(),
                DisplayCoord::new(1, 4),
                Face::new(Color::WHITE, Color::BLUE),
                Face::new(Color::BLACK, Color::WHITE),
                self.menu_style,
            );
        } else {
            ui.menu_hide();
        }
    }

    fn toggle_info<T: Terminal>(&mut self, ui: &mut TerminalUi<T>) {
        self.info_shown = !self.info_shown;
        if self.info_shown {
            ui.info_show(
                "println!",
                "Prints to the standard output, with a newline.\n\nEquivalent to print! followed by a newline character.",
                DisplayCoord::new(1, 4),
                Face::new(Color::BLACK, Color::YELLOW),
                InfoStyle::Prompt,
            );
        } else {
            ui.info_hide();
        }
    }

    /// Returns false when the demo should exit
    fn handle_key<T: Terminal>(&mut self, ui: &mut TerminalUi<T>, key: Key) -> bool {
        self.last_key = key.to_string();
        if key.modifiers.is_empty() {
            match key.code {
                KeyCode::Char('q') => return false,
                KeyCode::Char('m') => self.toggle_menu(ui),
                KeyCode::Char('i') => self.toggle_info(ui),
                KeyCode::Tab if self.menu_shown => {
                    self.selected += 1;
                    ui.menu_select(self.selected);
                },
                _ => {},
            }
        } else if key.modifiers == Modifiers::SHIFT && key.code == KeyCode::Tab && self.menu_shown {
            self.selected -= 1;
            ui.menu_select(self.selected);
        }
        true
    }
}

fn run(args: Args) -> ansi_ui::UiResult<()> {
    let mut options = match &args.config {
        Some(path) => UiOptions::load(path)?,
        None => UiOptions::default(),
    };
    options.status_on_top |= args.status_on_top;

    let mut ui = TerminalUi::open(options)?;
    let mut demo = Demo {
        buffer: sample_buffer(),
        menu_style: menu_style(&args.menu_style),
        menu_shown: false,
        info_shown: false,
        selected: -1,
        last_key: String::new(),
    };
    demo.draw(&mut ui);

    loop {
        ui.wait_for_input(Some(Duration::from_millis(250)));
        let mut changed = false;
        while let Some(key) = ui.get_next_key() {
            if !demo.handle_key(&mut ui, key) {
                return Ok(());
            }
            changed = true;
        }
        if ui.is_detached() {
            tracing::info!("terminal went away");
            return Ok(());
        }
        if changed {
            demo.draw(&mut ui);
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log.clone());

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("ansi-ui-demo: {}", e);
            ExitCode::FAILURE
        },
    }
}
