#[macro_use]
extern crate clap;
extern crate env_logger;
#[cfg(unix)]
extern crate libc;
#[macro_use]
extern crate log;
extern crate termcolor;
extern crate wintty;

use std::error::Error;
use std::io::{self, Write};
use std::process;
use std::result;

use termcolor::{Color, ColorSpec, WriteColor};

use args::{Args, Mode};
use atty::Stream;

mod app;
mod args;
mod atty;

pub type Result<T> = result::Result<T, Box<dyn Error + Send + Sync>>;

fn main() {
    match Args::parse().and_then(run) {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(err) => {
            if is_broken_pipe(&*err) {
                process::exit(0);
            }
            eprintln!("{}", err);
            process::exit(2);
        }
    }
}

/// Run ttyprobe and return whether the exit status should indicate success.
fn run(args: Args) -> Result<bool> {
    match *args.mode() {
        Mode::Probe(ref streams) => probe(&args, streams),
        Mode::Classify(ref names) => classify(&args, names),
    }
}

fn probe(args: &Args, streams: &[Stream]) -> Result<bool> {
    let mut stdout = args.stdout();
    let mut all = true;
    for &stream in streams {
        let kind = atty::probe(stream);
        debug!("{} is attached to: {:?}", stream.name(), kind);
        all = all && kind.is_terminal();
        if !args.quiet() {
            let terminal = kind.is_terminal();
            report(&mut stdout, stream.name(), kind.name(), terminal)?;
        }
    }
    Ok(!args.quiet() || all)
}

fn classify(args: &Args, names: &[String]) -> Result<bool> {
    let mut stdout = args.stdout();
    let mut all = true;
    for name in names {
        let yes = wintty::is_pty_name(name);
        all = all && yes;
        if !args.quiet() {
            report(&mut stdout, name, if yes { "pty" } else { "none" }, yes)?;
        }
    }
    Ok(all)
}

/// Write `subject: verdict`, coloring the verdict green when it indicates a
/// terminal and red otherwise.
fn report<W: WriteColor>(
    wtr: &mut W,
    subject: &str,
    verdict: &str,
    terminal: bool,
) -> io::Result<()> {
    let color = if terminal { Color::Green } else { Color::Red };
    write!(wtr, "{}: ", subject)?;
    wtr.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(wtr, "{}", verdict)?;
    wtr.reset()?;
    writeln!(wtr)?;
    wtr.flush()
}

fn is_broken_pipe(err: &(dyn Error + 'static)) -> bool {
    match err.downcast_ref::<io::Error>() {
        Some(err) => err.kind() == io::ErrorKind::BrokenPipe,
        None => false,
    }
}
