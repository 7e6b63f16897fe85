use std::{
    fs::File,
    io::{LineWriter, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock},
};

use eyre::Context;

use super::LogSink;

/// The shared standard output sink every logger starts with.
pub fn stdout() -> Arc<dyn LogSink> {
    static STDOUT: OnceLock<Arc<StdoutSink>> = OnceLock::new();
    STDOUT.get_or_init(|| Arc::new(StdoutSink::new())).clone()
}

/// Two handles name the same sink when they share an allocation.
pub fn same_sink(a: &Arc<dyn LogSink>, b: &Arc<dyn LogSink>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

pub struct StdoutSink {
    handle: std::io::Stdout,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            handle: std::io::stdout(),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) -> eyre::Result<()> {
        let mut writer = self.handle.lock();

        writeln!(writer, "{}", line)?;
        writer.flush().context("Can't flush stdout")
    }

    fn flush(&self) {
        self.handle.lock().flush().ok();
    }
}

pub struct StderrSink {
    handle: std::io::Stderr,
}

impl StderrSink {
    pub fn new() -> Self {
        Self {
            handle: std::io::stderr(),
        }
    }
}

impl Default for StderrSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for StderrSink {
    fn write_line(&self, line: &str) -> eyre::Result<()> {
        let mut writer = self.handle.lock();

        writeln!(writer, "{}", line)?;
        writer.flush().context("Can't flush stderr")
    }

    fn flush(&self) {
        self.handle.lock().flush().ok();
    }
}

/// Appends lines to a file, creating it when missing.
pub struct FileSink {
    file: Mutex<LineWriter<File>>,
    file_path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed opening or creating log file {}", path.display()))?;

        Ok(Self {
            file: Mutex::new(LineWriter::new(file)),
            file_path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl LogSink for FileSink {
    fn write_line(&self, line: &str) -> eyre::Result<()> {
        let mut file = self.file.lock().map_err(|e| eyre::eyre!(e.to_string()))?;
        writeln!(file, "{}", line)?;
        file.flush()
            .with_context(|| format!("Can't flush {}", self.file_path.display()))
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            file.flush().ok();
        }
    }
}

/// Wraps any writer, e.g. a socket or an in-memory buffer owned elsewhere.
pub struct WriterSink {
    output: Mutex<Box<dyn Write + Send>>,
}

impl WriterSink {
    pub fn new(output: Box<dyn Write + Send>) -> Self {
        Self {
            output: Mutex::new(output),
        }
    }
}

impl LogSink for WriterSink {
    fn write_line(&self, line: &str) -> eyre::Result<()> {
        let mut output = self.output.lock().map_err(|e| eyre::eyre!(e.to_string()))?;
        writeln!(output, "{}", line)?;
        output.flush().context("Can't flush writer")
    }

    fn flush(&self) {
        if let Ok(mut output) = self.output.lock() {
            output.flush().ok();
        }
    }
}

/// Keeps every line in memory. Handy for capturing output in tests.
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Everything written so far, one terminator per line.
    pub fn contents(&self) -> String {
        self.lines()
            .iter()
            .map(|line| format!("{}\n", line))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().map(|lines| lines.is_empty()).unwrap_or(true)
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) -> eyre::Result<()> {
        self.lines
            .lock()
            .map_err(|e| eyre::eyre!(e.to_string()))?
            .push(line.to_string());
        Ok(())
    }

    fn flush(&self) {}
}

pub struct NullSink {}

impl NullSink {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for NullSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for NullSink {
    fn write_line(&self, _line: &str) -> eyre::Result<()> {
        Ok(())
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stdout_is_shared() {
        assert!(same_sink(&stdout(), &stdout()));

        let other: Arc<dyn LogSink> = Arc::new(StdoutSink::new());
        assert!(!same_sink(&stdout(), &other));
    }

    #[test]
    fn memory_sink_keeps_lines() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.write_line("one").unwrap();
        sink.write_line("two").unwrap();

        assert_eq!(sink.lines(), vec!["one", "two"]);
        assert_eq!(sink.contents(), "one\ntwo\n");

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn file_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");

        let sink = FileSink::new(&path).unwrap();
        sink.write_line("first").unwrap();
        drop(sink);

        let sink = FileSink::new(&path).unwrap();
        sink.write_line("second").unwrap();
        assert_eq!(sink.path(), path.as_path());

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn file_sink_reports_unopenable_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSink::new(dir.path()).err().unwrap();
        assert!(err.to_string().contains("Failed opening or creating log file"));
    }

    #[test]
    fn writer_sink_terminates_lines() {
        struct Shared(Arc<Mutex<Vec<u8>>>);

        impl Write for Shared {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let buffer = Arc::new(Mutex::new(Vec::new()));
        let sink = WriterSink::new(Box::new(Shared(buffer.clone())));
        sink.write_line("line").unwrap();

        assert_eq!(buffer.lock().unwrap().as_slice(), b"line\n");
    }
}
