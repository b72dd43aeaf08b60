use crate::process::log::ProcessLog;
use crate::process::sink::OutputSink;
use std::io::{BufRead, BufReader, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// State shared between a supervisor and its drain thread.
pub(crate) struct DrainShared {
    pub log: Arc<ProcessLog>,
    pub sink: Arc<dyn OutputSink>,
    /// Set before an intentional termination; read errors after that are expected.
    pub closing: Arc<AtomicBool>,
    pub failure: Arc<Mutex<Option<String>>>,
}

/// Read `source` line by line until EOF, recording and forwarding each line.
pub(crate) fn spawn_drain<R>(source: R, shared: DrainShared) -> std::io::Result<JoinHandle<()>>
where
    R: Read + Send + 'static,
{
    thread::Builder::new()
        .name("keycloak-output".to_string())
        .spawn(move || drain(source, shared))
}

fn drain<R: Read>(source: R, shared: DrainShared) {
    let mut reader = BufReader::new(source);
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buffer);
                let line = line.trim_end_matches(['\n', '\r']).to_string();
                shared.sink.line(&line);
                shared.log.push(line);
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                if !shared.closing.load(Ordering::SeqCst) {
                    log::warn!("Error while reading process output: {e}");
                    let mut failure = shared
                        .failure
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    failure.get_or_insert_with(|| e.to_string());
                }
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::sink::NullSink;
    use std::io::{self, Cursor};

    fn shared(log: Arc<ProcessLog>, closing: bool) -> (DrainShared, Arc<Mutex<Option<String>>>) {
        let failure = Arc::new(Mutex::new(None));
        (
            DrainShared {
                log,
                sink: Arc::new(NullSink),
                closing: Arc::new(AtomicBool::new(closing)),
                failure: failure.clone(),
            },
            failure,
        )
    }

    struct FailingReader {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn drains_every_line_in_order() {
        let log = Arc::new(ProcessLog::new());
        let (shared, failure) = shared(log.clone(), false);

        let input = Cursor::new(b"first\r\nsecond\nno newline".to_vec());
        spawn_drain(input, shared).unwrap().join().unwrap();

        assert_eq!(log.lines(), vec!["first", "second", "no newline"]);
        assert!(failure.lock().unwrap().is_none());
    }

    #[test]
    fn replaces_invalid_utf8() {
        let log = Arc::new(ProcessLog::new());
        let (shared, _) = shared(log.clone(), false);

        spawn_drain(Cursor::new(b"caf\xe9\n".to_vec()), shared)
            .unwrap()
            .join()
            .unwrap();

        assert_eq!(log.lines(), vec!["caf\u{fffd}"]);
    }

    #[test]
    fn records_unexpected_read_failure_once() {
        let log = Arc::new(ProcessLog::new());
        let (shared, failure) = shared(log.clone(), false);
        let reader = FailingReader {
            data: Cursor::new(b"line\n".to_vec()),
        };

        spawn_drain(reader, shared).unwrap().join().unwrap();

        assert_eq!(log.lines(), vec!["line"]);
        assert_eq!(failure.lock().unwrap().as_deref(), Some("pipe closed"));
    }

    #[test]
    fn swallows_read_failure_while_closing() {
        let log = Arc::new(ProcessLog::new());
        let (shared, failure) = shared(log, true);
        let reader = FailingReader {
            data: Cursor::new(Vec::new()),
        };

        spawn_drain(reader, shared).unwrap().join().unwrap();

        assert!(failure.lock().unwrap().is_none());
    }
}
