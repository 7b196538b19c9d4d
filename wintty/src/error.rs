use std::error;
use std::fmt;
use std::io;

/// An error that occurred while retrieving the kernel object name of a
/// handle.
///
/// None of these errors are surfaced by `is_emulated_terminal`. They exist so
/// that each retrieval strategy can say why it gave up, which is logged at
/// the debug level before the next strategy is tried.
#[derive(Debug)]
pub enum Error {
    /// The OS entry point needed by a strategy could not be resolved on this
    /// machine. The string names the library and symbol.
    Unsupported(&'static str),
    /// The OS call ran but reported a failure.
    Query(io::Error),
    /// The object is unnamed, or its name could not be acquired.
    Unnamed,
    /// The handle does not refer to a pipe, so it cannot be a pseudo
    /// terminal.
    NotPipe,
}

impl Error {
    /// Returns true if this error indicates a missing OS entry point.
    pub fn is_unsupported(&self) -> bool {
        match *self {
            Error::Unsupported(_) => true,
            _ => false,
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Query(ref err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Unsupported(sym) => write!(f, "{}: not supported", sym),
            Error::Query(ref err) => write!(f, "query failed: {}", err),
            Error::Unnamed => {
                write!(f, "cannot acquire name or object is unnamed")
            }
            Error::NotPipe => write!(f, "handle is not a pipe"),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Query(err)
    }
}
