//! In-memory stand-in for a server connection in unit tests.

use std::io::{self, Cursor, Read, Write};

/// Serves `script` in small reads and records everything written.
pub struct ScriptedStream {
    input: Cursor<Vec<u8>>,
    pub output: Vec<u8>,
}

impl ScriptedStream {
    pub fn new(script: &str) -> Self {
        Self {
            input: Cursor::new(script.as_bytes().to_vec()),
            output: Vec::new(),
        }
    }

    pub fn sent(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len().min(7);
        self.input.read(&mut buf[..len])
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
