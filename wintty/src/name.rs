/*!
Parsing and classification of kernel object names.

Nothing in here talks to the OS. The buffers handed to these functions are
exactly what the Windows name queries write, which means the offset arithmetic
can be tested on any platform.
*/

use error::Error;

/// The prefixes used by MSYS2 and Cygwin for the pipes backing their pseudo
/// terminals. `NtQueryObject` reports the full device path while
/// `GetFileInformationByHandleEx` reports the path relative to the named pipe
/// file system.
const PTY_PREFIXES: &'static [&'static str] = &[
    r"\msys",
    r"\cygwin",
    r"\Device\NamedPipe\msys",
    r"\Device\NamedPipe\cygwin",
];

/// Returns true if and only if the given pipe name follows the naming
/// convention of an MSYS2 or Cygwin pseudo terminal.
///
/// Such names look like
/// `\{cygwin,msys}-XXXXXXXXXXXXXXXX-ptyN-{from,to}-master`, optionally
/// prefixed with `\Device\NamedPipe`.
pub fn is_pty_name(name: &str) -> bool {
    let tokens: Vec<&str> = name.split('-').collect();
    if tokens.len() < 5 {
        return false;
    }
    if !PTY_PREFIXES.contains(&tokens[0]) {
        return false;
    }
    if tokens[1].is_empty() {
        return false;
    }
    if !tokens[2].starts_with("pty") {
        return false;
    }
    if tokens[3] != "from" && tokens[3] != "to" {
        return false;
    }
    tokens[4] == "master"
}

/// Classify the first non-empty name produced by a sequence of retrieval
/// attempts.
///
/// Attempts are pulled one at a time, so a lazy iterator stops invoking
/// strategies as soon as one of them yields a name. Failed attempts and empty
/// names fall through to the next attempt. If no attempt yields a name, then
/// this returns false.
pub fn classify_first<I>(attempts: I) -> bool
where I: IntoIterator<Item=Result<String, Error>>
{
    for attempt in attempts {
        match attempt {
            Ok(ref name) if !name.is_empty() => {
                let yes = is_pty_name(name);
                debug!("object name {:?}: pty? {}", name, yes);
                return yes;
            }
            Ok(_) => debug!("object name is empty"),
            Err(ref err) if err.is_unsupported() => {
                debug!("name strategy unavailable: {}", err)
            }
            Err(err) => debug!("object name unavailable: {}", err),
        }
    }
    false
}

/// Extract the object name from a buffer filled by `NtQueryObject` with
/// `ObjectNameInformation`.
///
/// `returned` is the `ReturnLength` reported by the call, in bytes.
///
/// The buffer starts with a `UNICODE_STRING` header: a `u16` length, a `u16`
/// maximum length, padding and a pointer to the name. The name itself follows
/// the header. The maximum length counts the terminating NUL, so the header
/// size is `returned - max_len` bytes and the name spans `max_len / 2` wide
/// characters after it.
pub fn object_name(buf: &[u16], returned: u32) -> Result<String, Error> {
    if buf.len() < 2 {
        return Err(Error::Unnamed);
    }
    let max_len = buf[1] as u32;
    if max_len == 0 || returned <= max_len {
        return Err(Error::Unnamed);
    }
    let start = ((returned - max_len) / 2) as usize;
    let end = start + (max_len / 2) as usize;
    if end > buf.len() {
        return Err(Error::Unnamed);
    }
    Ok(decode(&buf[start..end]))
}

/// Extract the file name from a buffer filled by
/// `GetFileInformationByHandleEx` with `FileNameInfo`.
///
/// The first two wide characters hold `FILE_NAME_INFO.FileNameLength`, a
/// little endian `u32` byte count. The name follows immediately.
pub fn file_name(buf: &[u16]) -> Result<String, Error> {
    if buf.len() < 2 {
        return Err(Error::Unnamed);
    }
    let len = (buf[0] as u32) | ((buf[1] as u32) << 16);
    let end = 2 + (len / 2) as usize;
    if end > buf.len() {
        return Err(Error::Unnamed);
    }
    Ok(decode(&buf[2..end]))
}

/// Decode UTF-16 up to (but not including) the first NUL.
fn decode(wide: &[u16]) -> String {
    let end = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
    String::from_utf16_lossy(&wide[..end])
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use error::Error;
    use super::{classify_first, file_name, is_pty_name, object_name};

    const PIPE: &'static str =
        r"\Device\NamedPipe\msys-1888ae32e00d56aa-pty0-from-master";

    fn wide(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    /// Lay out a buffer the way `NtQueryObject` does, with a header of
    /// `header` bytes in front of the name.
    fn object_buf(name: &str, header: usize) -> (Vec<u16>, u32) {
        let name = wide(name);
        let len = 2 * name.len();
        let max_len = len + 2;
        let mut buf = vec![0xFFFF; 520];
        buf[0] = len as u16;
        buf[1] = max_len as u16;
        let start = header / 2;
        buf[start..start + name.len()].copy_from_slice(&name);
        buf[start + name.len()] = 0;
        (buf, (header + max_len) as u32)
    }

    fn file_buf(name: &str) -> Vec<u16> {
        let name = wide(name);
        let len = (2 * name.len()) as u32;
        let mut buf = vec![0xAAAA; 262];
        buf[0] = (len & 0xFFFF) as u16;
        buf[1] = (len >> 16) as u16;
        buf[2..2 + name.len()].copy_from_slice(&name);
        buf
    }

    #[test]
    fn pty_names() {
        assert!(is_pty_name(r"\msys-1234567890abcdef-pty3-from-master"));
        assert!(is_pty_name(r"\cygwin-abc-pty0-to-master"));
        assert!(is_pty_name(PIPE));
        assert!(is_pty_name(
            r"\Device\NamedPipe\cygwin-e022582115c10879-pty12-to-master"));
        assert!(is_pty_name(r"\msys-1234-pty0-from-master-extra"));
    }

    #[test]
    fn not_pty_names() {
        assert!(!is_pty_name(""));
        assert!(!is_pty_name(r"\msys-pty3-from-master"));
        assert!(!is_pty_name(r"\msys--pty3-from-master"));
        assert!(!is_pty_name(r"\msys-1234-ptyX-sideways-master"));
        assert!(!is_pty_name(r"\unknownprefix-1234-pty0-from-master"));
        assert!(!is_pty_name(r"msys-1234-pty0-from-master"));
        assert!(!is_pty_name(r"\MSYS-1234-pty0-from-master"));
        assert!(!is_pty_name(r"\msys-1234-tty0-from-master"));
        assert!(!is_pty_name(r"\msys-1234-pty0-From-master"));
        assert!(!is_pty_name(r"\msys-1234-pty0-from-slave"));
        assert!(!is_pty_name(r"\Device\NamedPipe\rust_anonymous_pipe1__.1.2"));
    }

    #[test]
    fn object_name_64bit_header() {
        let (buf, returned) = object_buf(PIPE, 16);
        assert_eq!(object_name(&buf, returned).unwrap(), PIPE);
    }

    #[test]
    fn object_name_32bit_header() {
        let (buf, returned) = object_buf(PIPE, 8);
        assert_eq!(object_name(&buf, returned).unwrap(), PIPE);
    }

    #[test]
    fn object_name_literal_layout() {
        // Length = 6, MaximumLength = 8, then 12 bytes of padding and
        // pointer, then "\ab" and its NUL.
        let buf = [
            6, 8, 0xDEAD, 0xDEAD, 0xBEEF, 0xBEEF, 0xBEEF, 0xBEEF,
            b'\\' as u16, b'a' as u16, b'b' as u16, 0, 0x4141,
        ];
        assert_eq!(object_name(&buf, 24).unwrap(), r"\ab");
    }

    #[test]
    fn object_name_unnamed() {
        let (mut buf, returned) = object_buf(PIPE, 16);
        buf[1] = 0;
        match object_name(&buf, returned) {
            Err(Error::Unnamed) => {}
            r => panic!("expected unnamed, got {:?}", r),
        }
    }

    #[test]
    fn object_name_inconsistent_lengths() {
        let (buf, _) = object_buf(PIPE, 16);
        let max_len = buf[1] as u32;
        assert!(object_name(&buf, max_len).is_err());
        assert!(object_name(&buf, max_len - 2).is_err());
        assert!(object_name(&buf, 0).is_err());
    }

    #[test]
    fn object_name_out_of_bounds() {
        let (buf, _) = object_buf(PIPE, 16);
        assert!(object_name(&buf, 4000).is_err());
        assert!(object_name(&[], 16).is_err());
    }

    #[test]
    fn file_name_exact_length() {
        let name = r"\msys-1888ae32e00d56aa-pty0-to-master";
        assert_eq!(file_name(&file_buf(name)).unwrap(), name);
    }

    #[test]
    fn file_name_literal_layout() {
        // FileNameLength = 4 bytes, followed by "\x" and trailing garbage
        // that must not be included.
        let buf = [4, 0, b'\\' as u16, b'x' as u16, b'y' as u16, b'z' as u16];
        assert_eq!(file_name(&buf).unwrap(), r"\x");
    }

    #[test]
    fn file_name_high_length_word() {
        let mut buf = file_buf(r"\msys");
        buf[1] = 1;
        assert!(file_name(&buf).is_err());
    }

    #[test]
    fn file_name_empty() {
        assert_eq!(file_name(&[0, 0, 0x41]).unwrap(), "");
        assert!(file_name(&[0]).is_err());
    }

    #[test]
    fn classify_short_circuits() {
        let calls = Cell::new(0);
        let names = vec![PIPE, r"\unrelated"];
        let yes = classify_first(names.iter().map(|name| {
            calls.set(calls.get() + 1);
            Ok(name.to_string())
        }));
        assert!(yes);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn classify_first_name_wins() {
        let attempts = vec![
            Ok(r"\Device\NamedPipe\unrelated".to_string()),
            Ok(PIPE.to_string()),
        ];
        assert!(!classify_first(attempts));
    }

    #[test]
    fn classify_falls_through() {
        let attempts = vec![
            Err(Error::Unsupported("ntdll.dll: NtQueryObject")),
            Ok(PIPE.to_string()),
        ];
        assert!(classify_first(attempts));

        let attempts = vec![Ok(String::new()), Ok(PIPE.to_string())];
        assert!(classify_first(attempts));
    }

    #[test]
    fn classify_nothing() {
        let attempts = vec![Err(Error::Unnamed), Err(Error::NotPipe)];
        assert!(!classify_first(attempts));
        assert!(!classify_first(vec![Ok(String::new()), Ok(String::new())]));
        assert!(!classify_first(Vec::new()));
    }
}
