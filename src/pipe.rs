//! Plain-text formatting of bound values.
use serde_json::{Map, Value};
use std::fmt::{Arguments, Display, Result, Write};

/// Format the [`Value`] as plain text.
///
/// - Objects become one `key: value` line per entry, in insertion order.
/// - Arrays become one `- element` line per element.
/// - Strings are written as-is, everything else with its display form.
///
/// # Examples
///
/// ```
/// use plume::format_value;
/// use serde_json::json;
///
/// assert_eq!(format_value(&json!(["a", "b"])), "- a\n- b");
/// assert_eq!(format_value(&json!({"file": "main.rs", "line": 4})), "file: main.rs\nline: 4");
/// assert_eq!(format_value(&json!(true)), "true");
/// ```
pub fn format_value(value: &Value) -> String {
    let mut buffer = String::new();
    // Writing to a String cannot fail.
    let _ = Pipe::new(&mut buffer).write_value(value);

    buffer
}

/// Wraps some underlying buffer by providing methods that write to it
/// in different formats.
pub struct Pipe<'buffer> {
    buffer: &'buffer mut (dyn Write + 'buffer),
}

impl<'buffer> Pipe<'buffer> {
    /// Create a new Pipe that writes to the given buffer.
    pub fn new(buffer: &'buffer mut String) -> Self {
        Self { buffer }
    }

    /// Write the given Value to the Pipe buffer.
    ///
    /// The Pipe will handle formatting the value.
    ///
    /// # Errors
    ///
    /// The Pipe supports all Value types, so the only error that will
    /// be returned is propagated from the [write!] macro itself.
    pub fn write_value(&mut self, value: &Value) -> Result {
        match value {
            Value::String(string) => self.write_str(string),
            Value::Array(array) => self.write_array(array),
            Value::Object(object) => self.write_object(object),
            _ => self.write_display(value),
        }
    }

    /// Write the value to the buffer using the Display implementation.
    fn write_display(&mut self, value: impl Display) -> Result {
        write!(self.buffer, "{}", value)
    }

    /// Write the value to the buffer as one "- " prefixed line per element.
    fn write_array(&mut self, value: &[Value]) -> Result {
        for (index, item) in value.iter().enumerate() {
            if index > 0 {
                self.write_char('\n')?;
            }
            self.write_str("- ")?;
            self.write_value(item)?;
        }

        Ok(())
    }

    /// Write the value to the buffer as one "key: value" line per entry.
    fn write_object(&mut self, value: &Map<String, Value>) -> Result {
        for (index, (key, item)) in value.iter().enumerate() {
            if index > 0 {
                self.write_char('\n')?;
            }
            write!(self.buffer, "{key}: ")?;
            self.write_value(item)?;
        }

        Ok(())
    }
}

impl Write for Pipe<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> Result {
        Write::write_str(self.buffer, s)
    }

    #[inline]
    fn write_char(&mut self, c: char) -> Result {
        Write::write_char(self.buffer, c)
    }

    #[inline]
    fn write_fmt(&mut self, args: Arguments<'_>) -> Result {
        Write::write_fmt(self.buffer, args)
    }
}
