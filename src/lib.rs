// HtmlPl Interpreter Library
//
// This is the core library for HtmlPl, a tree-walking interpreter for a
// small language whose concrete syntax is a restricted vocabulary of HTML
// tags: variable declaration, output, input, conditional selection,
// iteration, list literals, and arithmetic.

// Public modules
pub mod error;
pub mod interpreter;
pub mod math;
pub mod node;
pub mod parser;
pub mod runner;
pub mod runtime;
pub mod value;

// Re-export commonly used items
pub use error::{ErrorKind, HtmlPlError, Span};
pub use interpreter::{Environment, Interpreter};
pub use node::{filter_nodes, Construct, Node};
pub use parser::parse;
pub use runtime::{ConsoleRuntime, MockRuntime, Runtime};
pub use value::Value;

// Re-export main functions
pub use runner::run;
