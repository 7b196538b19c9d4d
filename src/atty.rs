/*!
This atty module contains functions for detecting whether ttyprobe's standard
streams are attached to a terminal. Windows and Unix do this differently, so
implement both here.
*/

/// One of the three standard streams of this process.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stream {
    Stdin,
    Stdout,
    Stderr,
}

impl Stream {
    /// Parse a stream from its name, as accepted on the command line.
    pub fn from_name(name: &str) -> Option<Stream> {
        match name {
            "stdin" => Some(Stream::Stdin),
            "stdout" => Some(Stream::Stdout),
            "stderr" => Some(Stream::Stderr),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match *self {
            Stream::Stdin => "stdin",
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}

/// What a stream turned out to be attached to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// A native terminal.
    Console,
    /// An MSYS2 or Cygwin pseudo terminal pipe.
    Pty,
    /// Not a terminal.
    NotTerminal,
}

impl Kind {
    pub fn is_terminal(&self) -> bool {
        *self != Kind::NotTerminal
    }

    pub fn name(&self) -> &'static str {
        match *self {
            Kind::Console => "console",
            Kind::Pty => "pty",
            Kind::NotTerminal => "none",
        }
    }
}

#[cfg(unix)]
pub fn probe(stream: Stream) -> Kind {
    use libc;

    let fd = match stream {
        Stream::Stdin => libc::STDIN_FILENO,
        Stream::Stdout => libc::STDOUT_FILENO,
        Stream::Stderr => libc::STDERR_FILENO,
    };
    if 0 < unsafe { libc::isatty(fd) } {
        Kind::Console
    } else {
        Kind::NotTerminal
    }
}

#[cfg(windows)]
pub fn probe(stream: Stream) -> Kind {
    use std::io;
    use std::os::windows::io::AsRawHandle;

    use wintty;

    let handle = match stream {
        Stream::Stdin => io::stdin().as_raw_handle(),
        Stream::Stdout => io::stdout().as_raw_handle(),
        Stream::Stderr => io::stderr().as_raw_handle(),
    };
    if wintty::is_terminal(handle) {
        Kind::Console
    } else if wintty::is_emulated_terminal(handle) {
        Kind::Pty
    } else {
        Kind::NotTerminal
    }
}

#[cfg(not(any(unix, windows)))]
pub fn probe(_: Stream) -> Kind {
    Kind::NotTerminal
}
