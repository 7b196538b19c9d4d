/*!
This crate answers one question about a Windows handle: is it an interactive
terminal?

There are two kinds of terminals on Windows. The first is the console, which
is detected by asking the console subsystem for the handle's mode. The second
is the pseudo terminal emulated by MSYS2 and Cygwin (used by mintty, for
example). These are ordinary named pipes, so the console subsystem knows
nothing about them. They are instead detected by retrieving the pipe's kernel
object name and checking it against the naming convention used by those
environments.

Two strategies are used to retrieve the name:

1. `NtQueryObject` from `ntdll.dll`, which is undocumented but available on
   every version of Windows.
2. `GetFileInformationByHandleEx` from `kernel32.dll`, which only exists on
   Vista and newer. This is only attempted for pipes.

Both entry points are resolved once at runtime. If either is missing, the
other is used. If both are missing, no handle is considered an emulated
terminal.

The parsing and classification of names doesn't depend on any OS calls, and
is available on every platform.

# Example

```rust,no_run
# #[cfg(windows)]
# fn example() {
use std::io;
use std::os::windows::io::AsRawHandle;

let handle = io::stdout().as_raw_handle();
if wintty::is_terminal(handle) || wintty::is_emulated_terminal(handle) {
    println!("stdout is a terminal");
}
# }
```
*/

#![deny(missing_docs)]

#[cfg(windows)]
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[cfg(windows)]
extern crate winapi;
#[cfg(windows)]
extern crate winapi_util;

pub use error::Error;
pub use name::{classify_first, file_name, is_pty_name, object_name};
#[cfg(windows)]
pub use win::{EntryPoints, is_emulated_terminal, is_terminal};

mod error;
mod name;
#[cfg(windows)]
mod win;
