use crate::value::Value;
use std::io::{self, Write};

/// The interpreter's only collaborator: a sink for printed values and a
/// source for `INPUT` reads.
///
/// `prompt` blocks until a value is available; that blocking call is the
/// one suspension point in an otherwise synchronous, single-threaded
/// execution. At most one prompt is ever in flight. The core does not
/// validate, retry, or time out the result.
pub trait Runtime {
    /// Must preserve call order and must not alter the value.
    fn print(&mut self, value: &Value);

    /// Delivers the next input as a raw string.
    fn prompt(&mut self) -> io::Result<String>;
}

/// Runtime on top of the OS console: prints to stdout, prompts read one
/// line from stdin.
pub struct ConsoleRuntime;

impl Runtime for ConsoleRuntime {
    fn print(&mut self, value: &Value) {
        println!("{}", value);
    }

    fn prompt(&mut self) -> io::Result<String> {
        print!("? ");
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }
}

/// Test double: captures everything printed and serves queued input.
/// Prompts pop from the tail of `values_to_read`.
#[derive(Debug, Default)]
pub struct MockRuntime {
    pub values_printed: Vec<Value>,
    pub values_to_read: Vec<String>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Runtime for MockRuntime {
    fn print(&mut self, value: &Value) {
        self.values_printed.push(value.clone());
    }

    fn prompt(&mut self) -> io::Result<String> {
        Ok(self.values_to_read.pop().unwrap_or_default())
    }
}
