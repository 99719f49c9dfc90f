use serde_json::Value;
use std::io::{self, Write};

/// Pretty-print JSON to stdout, newline terminated.
pub fn print_json(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_json(&mut stdout.lock(), value) {
        eprintln!("JSON output error: {}", e);
    }
}

fn write_json<W: Write>(out: &mut W, value: &Value) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_pretty_json_ends_with_newline() {
        let mut buf = Vec::new();
        write_json(&mut buf, &json!({ "annual_rate": "0.0398" })).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "{\n  \"annual_rate\": \"0.0398\"\n}\n");
    }

    #[test]
    fn test_write_failure_is_reported() {
        let err = write_json(&mut Broken, &json!({ "a": 1 })).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
