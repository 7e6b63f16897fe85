use std::{backtrace::Backtrace, error::Error, fmt};

/// One entry of a captured call stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    pub class: String,
    pub method: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl StackFrame {
    pub fn new(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
            file: None,
            line: None,
        }
    }

    pub fn at(self, file: impl Into<String>, line: u32) -> Self {
        Self {
            file: Some(file.into()),
            line: Some(line),
            ..self
        }
    }

    /// Splits a symbol such as `app::db::Pool::get` into `app::db::Pool` and `get`.
    fn from_symbol(symbol: &str) -> Self {
        match symbol.rsplit_once("::") {
            Some((class, method)) => Self::new(class, method),
            None => Self::new("", symbol),
        }
    }
}

/// Anything that can be reported through [`Logger::exception`](super::Logger::exception).
pub trait Throwable {
    fn kind(&self) -> &str;
    fn message(&self) -> Option<&str>;
    fn stack_trace(&self) -> &[StackFrame];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionReport {
    kind: String,
    message: Option<String>,
    frames: Vec<StackFrame>,
}

impl ExceptionReport {
    pub fn new(kind: impl Into<String>, message: Option<String>) -> Self {
        Self {
            kind: kind.into(),
            message,
            frames: Vec::new(),
        }
    }

    pub fn with_frame(mut self, frame: StackFrame) -> Self {
        self.frames.push(frame);
        self
    }

    /// Records `err` together with the stack of the current thread.
    ///
    /// The kind is the error's type name. Frames come from a forced
    /// [`Backtrace`]; when the platform cannot produce one the report simply
    /// has no frames.
    pub fn capture<E: Error>(err: &E) -> Self {
        let backtrace = Backtrace::force_capture();

        Self {
            kind: std::any::type_name::<E>().to_string(),
            message: Some(err.to_string()),
            frames: parse_backtrace(&backtrace.to_string()),
        }
    }

    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }
}

impl Throwable for ExceptionReport {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn stack_trace(&self) -> &[StackFrame] {
        &self.frames
    }
}

impl fmt::Display for ExceptionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.kind, message),
            None => f.write_str(&self.kind),
        }
    }
}

/// Reads the frames out of the text form of a [`Backtrace`].
///
/// ```text
///    4: app::db::Pool::get
///              at ./src/db.rs:42:13
/// ```
///
/// Frames up to and including the capture itself are dropped.
pub(crate) fn parse_backtrace(text: &str) -> Vec<StackFrame> {
    let mut frames: Vec<StackFrame> = Vec::new();

    for line in text.lines().map(str::trim) {
        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                if frame.file.is_none() {
                    let (file, line) = split_location(location);
                    frame.file = Some(file);
                    frame.line = line;
                }
            }
            continue;
        }

        let Some((index, symbol)) = line.split_once(": ") else {
            continue;
        };
        if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        frames.push(StackFrame::from_symbol(symbol.trim()));
    }

    let capture_frame = frames
        .iter()
        .rposition(|frame| frame.method == "capture" && frame.class.ends_with("ExceptionReport"));
    if let Some(index) = capture_frame {
        frames.drain(..=index);
    }

    frames
}

fn split_location(location: &str) -> (String, Option<u32>) {
    // file:line:column
    let mut parts = location.rsplitn(3, ':');
    let column = parts.next();
    let line = parts.next();
    let file = parts.next();

    match (file, line, column) {
        (Some(file), Some(line), Some(_)) => match line.parse() {
            Ok(line) => (file.to_string(), Some(line)),
            Err(_) => (location.to_string(), None),
        },
        _ => (location.to_string(), None),
    }
}
