// This module defines the set of command line arguments that ttyprobe
// supports, including some light validation.
//
// This module is purposely written in a bare-bones way, since it is included
// in ttyprobe's build.rs file as a way to generate completion files for
// common shells.

use clap::{App, AppSettings, Arg};

const ABOUT: &str = "
ttyprobe reports whether the standard streams of this process are attached to
a terminal.

Each stream is reported as one of:

    console  a native terminal (a Windows console, or isatty on Unix)
    pty      an MSYS2 or Cygwin pseudo terminal pipe (Windows only)
    none     anything else: a file, a pipe, /dev/null, ...

Use -q/--quiet to test streams from a script, like `test -t`.";

const USAGE: &str = "
    ttyprobe [OPTIONS] [<stream> ...]
    ttyprobe [OPTIONS] --classify <name> ...";

/// The streams that can be probed, in the order they are reported by
/// default.
pub const STREAMS: &[&str] = &["stdin", "stdout", "stderr"];

/// Build a clap application parameterized by usage strings.
pub fn app() -> App<'static, 'static> {
    App::new("ttyprobe")
        .author(crate_authors!())
        .version(crate_version!())
        .about(ABOUT)
        .max_term_width(100)
        .setting(AppSettings::UnifiedHelpMessage)
        .usage(USAGE)
        .arg(Arg::with_name("stream")
             .help("A standard stream to probe. Defaults to all three.")
             .multiple(true)
             .possible_values(STREAMS)
             .conflicts_with("classify"))
        .arg(Arg::with_name("classify")
             .long("classify")
             .value_name("NAME")
             .takes_value(true)
             .multiple(true)
             .help("Classify pipe names instead of probing streams.")
             .long_help(
                 "Check each NAME against the naming convention of MSYS2 and \
                  Cygwin pseudo terminal pipes, e.g., \
                  \\msys-1888ae32e00d56aa-pty0-to-master. No streams are \
                  probed. The exit status is 0 if and only if every name \
                  matched."))
        .arg(Arg::with_name("color")
             .long("color")
             .value_name("WHEN")
             .takes_value(true)
             .possible_values(&["never", "auto", "always", "ansi"])
             .default_value("auto")
             .help("When to use color in the output.")
             .long_help(
                 "When to use color in the output. 'auto' uses color only \
                  when stdout is a terminal: the console API for a console \
                  and ANSI escapes for a pseudo terminal. 'ansi' always \
                  emits ANSI escapes, even on Windows."))
        .arg(Arg::with_name("quiet")
             .short("q")
             .long("quiet")
             .help("Print nothing; report through the exit status.")
             .long_help(
                 "Print nothing. The exit status is 0 if and only if every \
                  probed stream is a terminal (console or pty)."))
        .arg(Arg::with_name("debug")
             .long("debug")
             .help("Show debug messages."))
}
