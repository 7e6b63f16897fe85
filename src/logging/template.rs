use std::{fmt, ops::Range};

/// Errors raised while substituting arguments into a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("too many arguments provided for format string: {template}")]
    TooManyArguments { template: String },

    #[error("missing argument for {placeholder} in format string: {template}")]
    MissingArgument {
        template: String,
        placeholder: String,
    },
}

/// Displays the wrapped value, or `null` when there is none.
#[derive(Debug, Clone, Copy)]
pub struct OrNull<T>(pub Option<T>);

impl<T: fmt::Display> fmt::Display for OrNull<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("null"),
        }
    }
}

/// An absent argument.
pub const NULL: OrNull<&'static str> = OrNull(None);

pub fn or_null<T: fmt::Display>(value: Option<T>) -> OrNull<T> {
    OrNull(value)
}

/// Substitutes `args` positionally into the `{...}` placeholders of `template`.
///
/// The text between the braces is only a label and is never interpreted. A
/// brace written as `\{` is not a placeholder and comes out as a plain `{`.
/// The number of placeholders must match the number of arguments exactly:
/// arguments are consumed left to right, so surplus arguments are reported
/// before unfilled placeholders would be.
///
/// ```
/// use flarelog::render;
///
/// let line = render!("Hello {name}, you have {n} messages", "Ann", 5).unwrap();
/// assert_eq!(line, "Hello Ann, you have 5 messages");
/// ```
pub fn format(template: &str, args: &[&dyn fmt::Display]) -> Result<String, FormatError> {
    let mut working = template.to_string();

    for arg in args {
        let Some(span) = next_placeholder(&working) else {
            return Err(FormatError::TooManyArguments {
                template: template.to_string(),
            });
        };

        // Braces inside a value must not turn into placeholders for the next argument.
        working.replace_range(span, &escape(&arg.to_string()));
    }

    if let Some(span) = next_placeholder(&working) {
        return Err(FormatError::MissingArgument {
            template: template.to_string(),
            placeholder: working[span].to_string(),
        });
    }

    Ok(unescape(&working))
}

fn next_placeholder(s: &str) -> Option<Range<usize>> {
    let bytes = s.as_bytes();
    let mut from = 0;

    while let Some(offset) = s[from..].find('{') {
        let open = from + offset;
        if open > 0 && bytes[open - 1] == b'\\' {
            from = open + 1;
            continue;
        }

        let close = open + s[open..].find('}')?;
        return Some(open..close + 1);
    }

    None
}

fn escape(s: &str) -> String {
    s.replace('{', "\\{")
}

fn unescape(s: &str) -> String {
    s.replace("\\{", "{")
}
