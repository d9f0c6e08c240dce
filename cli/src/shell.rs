//! Line-oriented command shell over a [`Transport`]
//!
//! One command per line:
//!
//! ```text
//! list                      units and open fds
//! open NAME                 open a session, prints the fd
//! close FD
//! write FD TEXT...          TEXT is the rest of the line
//! read FD N                at most MAX_READ bytes
//! seek FD set|cur|end OFF
//! clear FD
//! ioctl FD CODE             CODE in decimal or 0x-hex
//! quit
//! ```

use memdev::{ControlCommand, Transport};
use std::fmt::Write as _;

/// Largest read a single `read` command performs
pub const MAX_READ: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Open(String),
    Close(i32),
    Write(i32, String),
    Read(i32, usize),
    Seek(i32, i64, i32),
    Control(i32, u32),
    Quit,
}

/// Parse one input line; `Ok(None)` for a blank line
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    let Some((word, rest)) = split_word(line) else {
        return Ok(None);
    };

    let command = match word {
        "list" => Command::List,
        "quit" | "exit" => Command::Quit,
        "open" => Command::Open(arg(rest, "NAME")?.0.to_string()),
        "close" => Command::Close(number(rest, "FD")?.0),
        "clear" => Command::Control(number(rest, "FD")?.0, ControlCommand::Clear.code()),
        "write" => {
            let (fd, text) = number(rest, "FD")?;
            Command::Write(fd, text.to_string())
        }
        "read" => {
            let (fd, rest) = number(rest, "FD")?;
            Command::Read(fd, number(rest, "N")?.0)
        }
        "seek" => {
            let (fd, rest) = number(rest, "FD")?;
            let (whence, rest) = arg(rest, "set|cur|end")?;
            let whence = match whence {
                "set" => 0,
                "cur" => 1,
                "end" => 2,
                other => other
                    .parse()
                    .map_err(|_| format!("bad seek mode '{other}'"))?,
            };
            Command::Seek(fd, number(rest, "OFF")?.0, whence)
        }
        "ioctl" => {
            let (fd, rest) = number(rest, "FD")?;
            let (code, _) = arg(rest, "CODE")?;
            let code = match code.strip_prefix("0x") {
                Some(hex) => u32::from_str_radix(hex, 16),
                None => code.parse(),
            }
            .map_err(|_| format!("bad control code '{code}'"))?;
            Command::Control(fd, code)
        }
        other => return Err(format!("unknown command '{other}'")),
    };
    Ok(Some(command))
}

/// Run a command and describe the outcome
pub fn execute(transport: &Transport, command: &Command) -> String {
    match command {
        Command::List => {
            let mut out = String::new();
            for unit in transport.table().iter() {
                let _ = writeln!(out, "{} (id {})", unit.name(), unit.id());
            }
            let _ = write!(out, "open fds: {:?}", transport.open_fds());
            out
        }
        Command::Open(name) => status(i64::from(transport.open(name)), "fd"),
        Command::Close(fd) => status(i64::from(transport.release(*fd)), "ok"),
        Command::Write(fd, text) => {
            status(transport.write(*fd, text.as_bytes()) as i64, "written")
        }
        Command::Read(fd, len) => {
            let mut buf = vec![0u8; (*len).min(MAX_READ)];
            let n = transport.read(*fd, &mut buf);
            match usize::try_from(n) {
                Ok(n) => format!("{n} bytes: {:?}", String::from_utf8_lossy(&buf[..n])),
                Err(_) => status(n as i64, ""),
            }
        }
        Command::Seek(fd, offset, whence) => {
            status(transport.lseek(*fd, *offset, *whence), "position")
        }
        Command::Control(fd, code) => status(i64::from(transport.ioctl(*fd, *code)), "ok"),
        Command::Quit => String::new(),
    }
}

fn status(result: i64, label: &str) -> String {
    if result < 0 {
        format!("error: errno {}", -result)
    } else {
        format!("{label} {result}")
    }
}

fn split_word(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    Some(match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (s, ""),
    })
}

fn arg<'a>(s: &'a str, what: &str) -> Result<(&'a str, &'a str), String> {
    split_word(s).ok_or_else(|| format!("missing {what}"))
}

fn number<'a, T: std::str::FromStr>(s: &'a str, what: &str) -> Result<(T, &'a str), String> {
    let (word, rest) = arg(s, what)?;
    let value = word.parse().map_err(|_| format!("bad {what} '{word}'"))?;
    Ok((value, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use memdev::{Config, UnitTable};

    fn transport() -> Transport {
        let config = Config {
            unit_count: 2,
            initial_capacity: 1024,
            ..Config::default()
        };
        Transport::new(UnitTable::new(&config).unwrap())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("   "), Ok(None));
        assert_eq!(parse("list"), Ok(Some(Command::List)));
        assert_eq!(
            parse("open memdev1"),
            Ok(Some(Command::Open("memdev1".to_string())))
        );
        assert_eq!(
            parse("write 0 hello  world"),
            Ok(Some(Command::Write(0, "hello  world".to_string())))
        );
        assert_eq!(parse("read 3 16"), Ok(Some(Command::Read(3, 16))));
        assert_eq!(parse("seek 0 end -5"), Ok(Some(Command::Seek(0, -5, 2))));
        assert_eq!(
            parse("ioctl 1 0x40045a01"),
            Ok(Some(Command::Control(1, ControlCommand::CLEAR_CODE)))
        );
        assert_eq!(
            parse("clear 2"),
            Ok(Some(Command::Control(2, ControlCommand::CLEAR_CODE)))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("frobnicate").is_err());
        assert!(parse("read x 4").is_err());
        assert!(parse("seek 0 sideways 1").is_err());
        assert!(parse("open").is_err());
    }

    #[test]
    fn test_oversized_read_is_bounded() {
        let t = transport();
        let run = |line: &str| execute(&t, &parse(line).unwrap().unwrap());

        assert_eq!(run("open memdev0"), "fd 0");
        assert_eq!(run("write 0 hello"), "written 5");
        assert_eq!(run("seek 0 set 0"), "position 0");

        let out = run("read 0 18446744073709551615");
        assert!(out.starts_with("1024 bytes: \"hello"), "{out}");
        assert_eq!(run("seek 0 cur 0"), "position 1024");
    }

    #[test]
    fn test_session_through_shell() {
        let t = transport();
        let run = |line: &str| execute(&t, &parse(line).unwrap().unwrap());

        assert_eq!(run("open memdev0"), "fd 0");
        assert_eq!(run("write 0 hello"), "written 5");
        assert_eq!(run("seek 0 set 0"), "position 0");
        assert_eq!(run("read 0 5"), "5 bytes: \"hello\"");
        assert_eq!(run("seek 0 end -5"), "position 1019");
        assert_eq!(run("ioctl 0 7"), "error: errno 25");
        assert_eq!(run("clear 0"), "ok 0");
        assert_eq!(run("close 0"), "ok 0");
        assert_eq!(run("close 0"), "error: errno 9");
        assert!(run("list").contains("memdev1 (id 1)"));
    }
}
