use crate::interpreter::Interpreter;
use crate::parser;
use crate::runtime::Runtime;

/// Parses and executes one program against the given runtime. Errors are
/// rendered as diagnostics against the source; the return value says
/// whether the run completed. Output printed before a failure stands.
pub fn run(source: &str, filename: Option<&str>, runtime: &mut dyn Runtime) -> bool {
    // Markup front end
    let root = match parser::parse(source) {
        Ok(root) => root,
        Err(error) => {
            error.report(source, filename);
            return false;
        }
    };

    // Execution
    let mut interpreter = Interpreter::new(runtime);
    if let Err(error) = interpreter.execute_program(&root) {
        error.report(source, filename);
        return false;
    }
    true
}
