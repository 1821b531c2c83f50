//! ansi-ui key inspector
//!
//! Puts the terminal in raw mode and prints every decoded key event
//! together with the bytes it was decoded from. Useful for checking what a
//! given terminal emulator sends.

use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use ansi_ui::parser::{ByteSource, Decoded, InputDecoder};
use ansi_ui::tty::Tty;
use ansi_ui::{Key, KeyCode, Terminal, UiOptions};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ansi-ui-keys")]
#[command(version)]
#[command(about = "Print decoded terminal key events", long_about = None)]
struct Args {
    /// Report mouse and focus events too
    #[arg(short, long)]
    mouse: bool,

    /// Milliseconds to wait for the rest of an escape sequence
    #[arg(long, value_name = "MS", default_value_t = 0)]
    wait: u64,

    /// Offset above which function keys are reported shifted
    #[arg(long, value_name = "N", default_value_t = UiOptions::default().shift_function_key)]
    shift_function_key: i32,
}

/// Byte source that remembers what it handed out
struct Recording<'a, S> {
    inner: &'a mut S,
    bytes: Vec<u8>,
}

impl<S: ByteSource> ByteSource for Recording<'_, S> {
    fn next_byte(&mut self, wait: Duration) -> Option<u8> {
        let byte = self.inner.next_byte(wait)?;
        self.bytes.push(byte);
        Some(byte)
    }
}

fn escape_bytes(bytes: &[u8]) -> String {
    bytes.iter().flat_map(|b| std::ascii::escape_default(*b)).map(char::from).collect()
}

fn run(args: &Args) -> ansi_ui::UiResult<()> {
    let mut tty = Tty::open()?;
    tty.set_raw_mode()?;
    if args.mouse {
        tty.write_all(b"\x1b[?1006h\x1b[?1004h\x1b[?1000h\x1b[?1002h")?;
    }
    tty.write_all(b"press keys, ctrl-c or q quits\r\n")?;
    tty.flush()?;

    let mut decoder = InputDecoder::new();
    decoder.set_shift_function_key(args.shift_function_key);
    decoder.set_continuation_wait(Duration::from_millis(args.wait));

    let result = loop {
        if tty.hung_up() {
            break Ok(());
        }
        if !tty.wait_for_input(None) {
            continue;
        }

        let mut recording = Recording {
            inner: &mut tty,
            bytes: Vec::new(),
        };
        let decoded = decoder.decode(&mut recording);
        let bytes = escape_bytes(&recording.bytes);
        let line = match decoded {
            Decoded::Key(key) => format!("{:<24} {}\r\n", key.to_string(), bytes),
            Decoded::Suspend => format!("{:<24} {}\r\n", "(suspend)", bytes),
            Decoded::None => format!("{:<24} {}\r\n", "(ignored)", bytes),
        };
        tty.write_all(line.as_bytes())?;
        tty.flush()?;

        if let Decoded::Key(key) = decoded {
            if key == Key::ctrl('c') || key == Key::new(KeyCode::Char('q')) {
                break Ok(());
            }
        }
    };

    if args.mouse {
        tty.write_all(b"\x1b[?1002l\x1b[?1000l\x1b[?1004l\x1b[?1006l")?;
        tty.flush()?;
    }
    result
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ansi-ui-keys: {}", e);
            ExitCode::FAILURE
        },
    }
}
