use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;

use super::container_interface::ExecSession;
use super::error::{classify_stderr, EngineError, Result};

const CHUNK_SIZE: usize = 4096;

/// Status the engine CLI exits with when the exec never reached the container.
const ENGINE_FAILURE_STATUS: i32 = 125;

/// Cap on the stderr kept for classifying an engine failure.
const STDERR_CAPTURE_LIMIT: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

type Chunk = (Stream, io::Result<Vec<u8>>);

/// Exec session backed by an engine CLI child process.
///
/// In batch mode stdout and stderr are drained by one reader thread each and
/// funnelled through a single channel, so the caller sees one combined
/// stream in arrival order. An attached session hands our terminal straight
/// to the child and yields no chunks.
pub(crate) struct ProcessExecSession {
    child: Child,
    container_id: String,
    chunks: mpsc::Receiver<Chunk>,
    readers: Vec<thread::JoinHandle<()>>,
    seen_stdout: bool,
    /// stderr received before any stdout, for telling engine errors apart
    /// from the remote command's own output.
    leading_stderr: String,
}

impl ProcessExecSession {
    pub fn spawn(mut cmd: Command, container_id: &str) -> Result<Self> {
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        let mut child = cmd.spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::ExecFailed("missing stdout pipe".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| EngineError::ExecFailed("missing stderr pipe".to_string()))?;

        let (tx, rx) = mpsc::channel();
        let readers = vec![
            spawn_reader(stdout, Stream::Stdout, tx.clone()),
            spawn_reader(stderr, Stream::Stderr, tx),
        ];

        Ok(Self {
            child,
            container_id: container_id.to_string(),
            chunks: rx,
            readers,
            seen_stdout: false,
            leading_stderr: String::new(),
        })
    }

    /// Run with stdout and stderr inherited, so a remote TTY talks to our
    /// terminal directly.
    pub fn attached(mut cmd: Command, container_id: &str) -> Result<Self> {
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
        let child = cmd.spawn()?;

        // No senders: the stream is over before it starts
        let (tx, rx) = mpsc::channel();
        drop(tx);

        Ok(Self {
            child,
            container_id: container_id.to_string(),
            chunks: rx,
            readers: Vec::new(),
            seen_stdout: false,
            leading_stderr: String::new(),
        })
    }

    fn observe(&mut self, stream: Stream, chunk: &[u8]) {
        match stream {
            Stream::Stdout => self.seen_stdout = true,
            Stream::Stderr if !self.seen_stdout => {
                if self.leading_stderr.len() < STDERR_CAPTURE_LIMIT {
                    self.leading_stderr.push_str(&String::from_utf8_lossy(chunk));
                }
            }
            Stream::Stderr => {}
        }
    }

    /// The engine's own failure, if the exit status and output show the
    /// command never ran in the container.
    fn engine_failure(&self, code: i32) -> Option<EngineError> {
        let stderr = self.leading_stderr.trim();
        if code == ENGINE_FAILURE_STATUS {
            let message = if stderr.is_empty() {
                format!("engine exited with status {}", code)
            } else {
                stderr.to_string()
            };
            return Some(classify_stderr(
                &message,
                &self.container_id,
                EngineError::ExecFailed,
            ));
        }
        if code != 0 && !self.seen_stdout && is_engine_message(stderr) {
            return Some(classify_stderr(
                stderr,
                &self.container_id,
                EngineError::ExecFailed,
            ));
        }
        None
    }
}

/// Whether stderr reads like the engine client reporting on itself.
fn is_engine_message(stderr: &str) -> bool {
    stderr.starts_with("Error response from daemon:")
        || stderr.contains("Cannot connect to the Docker daemon")
        || stderr.to_lowercase().contains("unable to connect to podman")
}

fn spawn_reader<R: Read + Send + 'static>(
    mut reader: R,
    stream: Stream,
    tx: mpsc::Sender<Chunk>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut buf = [0u8; CHUNK_SIZE];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send((stream, Ok(buf[..n].to_vec()))).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    let _ = tx.send((stream, Err(e)));
                    break;
                }
            }
        }
    })
}

impl ExecSession for ProcessExecSession {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        match self.chunks.recv() {
            Ok((stream, chunk)) => {
                let chunk = chunk?;
                self.observe(stream, &chunk);
                Ok(Some(chunk))
            }
            // Both readers hit EOF and dropped their senders
            Err(mpsc::RecvError) => Ok(None),
        }
    }

    fn exit_code(mut self: Box<Self>) -> Result<i64> {
        // The channel is unbounded, so the readers finish without us reading.
        for reader in self.readers.drain(..) {
            let _ = reader.join();
        }
        while let Ok((stream, Ok(chunk))) = self.chunks.try_recv() {
            self.observe(stream, &chunk);
        }

        let status = self.child.wait()?;
        match status.code() {
            Some(code) => match self.engine_failure(code) {
                Some(err) => Err(err),
                None => Ok(i64::from(code)),
            },
            // Killed by a signal
            None => Ok(-1),
        }
    }
}
