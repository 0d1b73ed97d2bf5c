use std::io::{self, ErrorKind, Read, Write};

/// Single read that transparently retries when a signal interrupts the call.
/// `Ok(0)` means the peer closed its side.
pub fn read_retrying<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Ok(n) => return Ok(n),
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Write the whole buffer, looping over short writes and interrupted calls.
/// A write that accepts zero bytes is reported as `WriteZero`.
pub fn write_fully<W: Write + ?Sized>(writer: &mut W, mut buf: &[u8]) -> io::Result<()> {
    while !buf.is_empty() {
        match writer.write(buf) {
            Ok(0) => {
                return Err(io::Error::new(
                    ErrorKind::WriteZero,
                    "socket accepted zero bytes",
                ));
            }
            Ok(n) => buf = &buf[n..],
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    loop {
        match writer.flush() {
            Ok(()) => return Ok(()),
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts at most `chunk` bytes per call and fails every other call
    /// with `Interrupted`.
    struct TrickleWriter {
        written: Vec<u8>,
        chunk: usize,
        calls: usize,
    }

    impl Write for TrickleWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls % 2 == 0 {
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            let n = buf.len().min(self.chunk);
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FullWriter;

    impl Write for FullWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct InterruptedOnceReader {
        interrupted: bool,
        data: &'static [u8],
    }

    impl Read for InterruptedOnceReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            let n = self.data.len().min(buf.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_write_fully_handles_short_and_interrupted_writes() {
        let mut writer = TrickleWriter {
            written: Vec::new(),
            chunk: 3,
            calls: 0,
        };
        let payload = b"HTTP/1.1 200 OK\r\n\r\nhello";
        write_fully(&mut writer, payload).unwrap();
        assert_eq!(writer.written, payload);
        assert!(writer.calls > payload.len() / 3);
    }

    #[test]
    fn test_write_fully_zero_write_is_error() {
        let err = write_fully(&mut FullWriter, b"data").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WriteZero);
    }

    #[test]
    fn test_write_fully_empty_buffer() {
        write_fully(&mut FullWriter, b"").unwrap();
    }

    #[test]
    fn test_read_retrying_skips_interruption() {
        let mut reader = InterruptedOnceReader {
            interrupted: false,
            data: b"ping",
        };
        let mut buf = [0u8; 16];
        let n = read_retrying(&mut reader, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"ping");
        assert_eq!(read_retrying(&mut reader, &mut buf).unwrap(), 0);
    }
}
