use clap;
use env_logger;
use log;
use termcolor::{ColorChoice, StandardStream};

use app;
use atty::{self, Kind, Stream};

use Result;

/// What ttyprobe was asked to do.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Probe each of these streams, in order.
    Probe(Vec<Stream>),
    /// Classify each of these pipe names, in order.
    Classify(Vec<String>),
}

/// `Args` are transformed/normalized from `clap::ArgMatches`.
#[derive(Debug)]
pub struct Args {
    mode: Mode,
    color: ColorChoice,
    quiet: bool,
}

impl Args {
    /// Parse the command line arguments for this process.
    ///
    /// If a CLI usage error occurred, then exit the process and print a usage
    /// or error message. Similarly, if the user requested the version of
    /// ttyprobe, then print the version and exit.
    ///
    /// Also, initialize a global logger.
    pub fn parse() -> Result<Args> {
        let matches = app::app().get_matches();

        let mut logb = env_logger::Builder::new();
        if matches.is_present("debug") {
            logb.filter_level(log::LevelFilter::Debug);
        } else {
            logb.filter_level(log::LevelFilter::Warn);
        }
        if let Err(err) = logb.try_init() {
            return Err(From::from(
                format!("failed to initialize logger: {}", err)));
        }
        Args::from_matches(&matches)
    }

    fn from_matches(matches: &clap::ArgMatches) -> Result<Args> {
        let mode = match matches.values_of("classify") {
            Some(names) => Mode::Classify(names.map(String::from).collect()),
            None => Mode::Probe(streams(matches)?),
        };
        Ok(Args {
            mode: mode,
            color: color_choice(matches.value_of("color").unwrap_or("auto"))?,
            quiet: matches.is_present("quiet"),
        })
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Returns true if nothing should be printed to stdout.
    pub fn quiet(&self) -> bool {
        self.quiet
    }

    /// Create a new writer for stdout that respects the color choice.
    pub fn stdout(&self) -> StandardStream {
        StandardStream::stdout(self.color)
    }
}

/// The streams to probe, with duplicates removed. When none are given, all
/// three standard streams are probed.
fn streams(matches: &clap::ArgMatches) -> Result<Vec<Stream>> {
    let names: Vec<&str> = match matches.values_of("stream") {
        Some(names) => names.collect(),
        None => app::STREAMS.to_vec(),
    };
    let mut streams = vec![];
    for name in names {
        let stream = match Stream::from_name(name) {
            Some(stream) => stream,
            None => {
                return Err(From::from(format!("unknown stream: {}", name)));
            }
        };
        if !streams.contains(&stream) {
            streams.push(stream);
        }
    }
    Ok(streams)
}

/// Translate the `--color` flag into a color choice for termcolor.
///
/// In `auto` mode, stdout is probed: a console gets the console API (or ANSI
/// on Unix), while an emulated pseudo terminal only understands ANSI escapes.
fn color_choice(when: &str) -> Result<ColorChoice> {
    Ok(match when {
        "never" => ColorChoice::Never,
        "always" => ColorChoice::Always,
        "ansi" => ColorChoice::AlwaysAnsi,
        "auto" => {
            match atty::probe(Stream::Stdout) {
                Kind::Console => ColorChoice::Always,
                Kind::Pty => ColorChoice::AlwaysAnsi,
                Kind::NotTerminal => ColorChoice::Never,
            }
        }
        _ => return Err(From::from(format!("unknown color choice: {}", when))),
    })
}

#[cfg(test)]
mod tests {
    use termcolor::ColorChoice;

    use app;
    use atty::Stream;
    use super::{Args, Mode, color_choice};

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["ttyprobe"];
        full.extend_from_slice(argv);
        let matches = app::app().get_matches_from_safe(full).unwrap();
        Args::from_matches(&matches).unwrap()
    }

    #[test]
    fn default_streams() {
        let args = args(&[]);
        assert_eq!(
            *args.mode(),
            Mode::Probe(vec![Stream::Stdin, Stream::Stdout, Stream::Stderr]));
        assert!(!args.quiet());
    }

    #[test]
    fn streams_deduplicated_in_order() {
        let args = args(&["stderr", "stdin", "stderr", "-q"]);
        assert_eq!(
            *args.mode(),
            Mode::Probe(vec![Stream::Stderr, Stream::Stdin]));
        assert!(args.quiet());
    }

    #[test]
    fn classify_mode() {
        let args = args(&["--classify", r"\msys-1-pty0-to-master", "foo"]);
        assert_eq!(
            *args.mode(),
            Mode::Classify(vec![
                r"\msys-1-pty0-to-master".to_string(),
                "foo".to_string(),
            ]));
    }

    #[test]
    fn bad_stream_rejected() {
        let result =
            app::app().get_matches_from_safe(vec!["ttyprobe", "stdio"]);
        assert!(result.is_err());
    }

    #[test]
    fn explicit_colors() {
        assert_eq!(color_choice("never").unwrap(), ColorChoice::Never);
        assert_eq!(color_choice("always").unwrap(), ColorChoice::Always);
        assert_eq!(color_choice("ansi").unwrap(), ColorChoice::AlwaysAnsi);
        assert!(color_choice("sometimes").is_err());
    }
}
