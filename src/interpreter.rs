use crate::error::HtmlPlError;
use crate::math;
use crate::node::{filter_nodes, Construct, Node};
use crate::runtime::Runtime;
use crate::value::Value;
use std::collections::HashMap;

/// The language has exactly one scope: a single global mapping from
/// variable name to value, created per program run and discarded at run
/// end. No nesting, no shadowing, no deletion.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Unconditional overwrite; re-declaring a name is how the language
    /// assigns.
    pub fn set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Pure lookup. An unbound name reads as [`Value::Absent`], never an
    /// error; constructs that need a concrete value check for that
    /// themselves.
    pub fn get(&self, name: &str) -> Value {
        self.values.get(name).cloned().unwrap_or(Value::Absent)
    }
}

/// Tree-walking interpreter. A program is the filtered child list of the
/// document root, executed strictly in order; statements mutate the
/// environment and print through the runtime, expressions compute values.
///
/// One interpreter drives one program execution; reusing an instance
/// across overlapping executions is unsupported.
pub struct Interpreter<'a> {
    environment: Environment,
    runtime: &'a mut dyn Runtime,
}

impl<'a> Interpreter<'a> {
    pub fn new(runtime: &'a mut dyn Runtime) -> Self {
        Self {
            environment: Environment::new(),
            runtime,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn execute_program(&mut self, root: &Node) -> Result<(), HtmlPlError> {
        if !matches!(root, Node::Document { .. }) {
            return Err(HtmlPlError::structure_error(
                root.span().clone(),
                format!(
                    "Expected the document root, found <{}>",
                    display_tag(root)
                ),
            ));
        }

        for statement in filter_nodes(root.children()) {
            self.execute_statement(statement)?;
        }
        Ok(())
    }

    fn execute_statement(&mut self, node: &Node) -> Result<(), HtmlPlError> {
        let Node::Element { tag, .. } = node else {
            return Err(HtmlPlError::unknown_construct(
                node.span().clone(),
                "Expected a statement element, found text".to_string(),
            ));
        };

        match Construct::from_tag(tag) {
            Some(Construct::Var) => self.execute_var_statement(node),
            Some(Construct::Output) => self.execute_output_statement(node),
            Some(Construct::Form) => self.execute_form_statement(node),
            _ => Err(HtmlPlError::unknown_construct_with_help(
                node.span().clone(),
                format!("<{}> is not a statement", display_tag(node)),
                "Statements are <var>, <output>, and <form>.".to_string(),
            )),
        }
    }

    /// `<var name="x">...</var>` at statement position: evaluate the
    /// single value child and bind the result.
    fn execute_var_statement(&mut self, node: &Node) -> Result<(), HtmlPlError> {
        let name = require_attribute(node, "name")?;

        let children = filter_nodes(node.children());
        if children.is_empty() {
            return Err(HtmlPlError::structure_error(
                node.span().clone(),
                "Expected a value child in <var>".to_string(),
            ));
        }
        if children.len() > 1 {
            return Err(HtmlPlError::structure_error(
                node.span().clone(),
                "Expected a single value child in <var>".to_string(),
            ));
        }

        let value = self.evaluate_expression(children[0])?;
        self.environment.set(name, value);
        Ok(())
    }

    /// `<output value="x"/>` prints a variable's current value;
    /// `<output>...</output>` prints its child expression. Either way the
    /// value keeps its run-time type; the runtime decides how to render
    /// it.
    fn execute_output_statement(&mut self, node: &Node) -> Result<(), HtmlPlError> {
        if let Some(name) = node.attribute("value") {
            let value = self.environment.get(name);
            self.runtime.print(&value);
            return Ok(());
        }

        let children = filter_nodes(node.children());
        if children.len() != 1 {
            return Err(HtmlPlError::structure_error_with_help(
                node.span().clone(),
                "Expected a single child expression in <output>".to_string(),
                "Either give <output> a value attribute naming a variable, or exactly one \
                 child expression."
                    .to_string(),
            ));
        }

        let value = self.evaluate_expression(children[0])?;
        self.runtime.print(&value);
        Ok(())
    }

    /// `<form value="n">...</form>` runs its body while the condition
    /// variable is not loosely equal to "0", re-reading it on every pass.
    /// The body shares the global environment and is expected to mutate
    /// the variable; nothing bounds the iteration count.
    fn execute_form_statement(&mut self, node: &Node) -> Result<(), HtmlPlError> {
        let name = require_attribute(node, "value")?;
        let zero = Value::String("0".to_string());

        loop {
            let condition = self.environment.get(name);
            if matches!(condition, Value::Absent) {
                return Err(HtmlPlError::eval_error_with_help(
                    node.span().clone(),
                    format!("Loop condition variable '{}' is not defined", name),
                    "Declare the variable with <var> before the <form> loop.".to_string(),
                ));
            }
            if condition.loosely_equals(&zero) {
                break;
            }

            for statement in filter_nodes(node.children()) {
                self.execute_statement(statement)?;
            }
        }
        Ok(())
    }

    pub fn evaluate_expression(&mut self, node: &Node) -> Result<Value, HtmlPlError> {
        match node {
            // Literal text, verbatim. Whitespace-only text never gets
            // here; it is filtered out with the comments.
            Node::Text { content, .. } => Ok(Value::String(content.clone())),
            Node::Element { tag, .. } => match Construct::from_tag(tag) {
                // At expression position <var name="x"/> is a reference,
                // not a declaration.
                Some(Construct::Var) => {
                    let name = require_attribute(node, "name")?;
                    Ok(self.environment.get(name))
                }
                Some(Construct::List) => Ok(self.evaluate_list_expression(node)),
                Some(Construct::Select) => self.evaluate_select_expression(node),
                Some(Construct::Input) => self.evaluate_input_expression(node),
                Some(Construct::Math) => self.evaluate_math_expression(node),
                _ => Err(HtmlPlError::unknown_construct_with_help(
                    node.span().clone(),
                    format!("<{}> is not an expression", display_tag(node)),
                    "Expressions are text, <var>, <ol>/<ul>, <select>, <input>, and <math>."
                        .to_string(),
                )),
            },
            _ => Err(HtmlPlError::unknown_construct(
                node.span().clone(),
                "Expected an expression".to_string(),
            )),
        }
    }

    /// `<ol>`/`<ul>`: the ordered raw texts of the `<li>` children.
    /// Children that are not list items are silently dropped.
    fn evaluate_list_expression(&self, node: &Node) -> Value {
        let items = filter_nodes(node.children())
            .into_iter()
            .filter(|child| child.tag().and_then(Construct::from_tag) == Some(Construct::ListItem))
            .map(|child| child.text_content())
            .collect();
        Value::List(items)
    }

    /// `<select value="x">`: first option whose value attribute loosely
    /// equals the target variable's current value wins; no match yields
    /// absent. A matched option must hold exactly one child expression.
    fn evaluate_select_expression(&mut self, node: &Node) -> Result<Value, HtmlPlError> {
        let target_name = require_attribute(node, "value")?;
        let target = self.environment.get(target_name);

        for option in filter_nodes(node.children()) {
            if option.tag().and_then(Construct::from_tag) != Some(Construct::SelectOption) {
                continue;
            }
            let Some(literal) = option.attribute("value") else {
                continue;
            };
            if !target.loosely_equals(&Value::String(literal.to_string())) {
                continue;
            }

            let children = filter_nodes(option.children());
            if children.len() != 1 {
                return Err(HtmlPlError::structure_error(
                    option.span().clone(),
                    "Expected a single child in the matched <option>".to_string(),
                ));
            }
            return self.evaluate_expression(children[0]);
        }

        Ok(Value::Absent)
    }

    /// `<input/>`: one blocking prompt round trip. The result is taken
    /// verbatim as a string; nothing is parsed or validated here.
    fn evaluate_input_expression(&mut self, node: &Node) -> Result<Value, HtmlPlError> {
        let line = self.runtime.prompt().map_err(|e| {
            HtmlPlError::eval_error(node.span().clone(), format!("Reading input failed: {}", e))
        })?;
        Ok(Value::String(line))
    }

    /// `<math>`: nested expression children are evaluated and their
    /// values spliced as text into the surrounding formula, which is then
    /// run through the restricted arithmetic grammar. Never through a
    /// host-language evaluator.
    fn evaluate_math_expression(&mut self, node: &Node) -> Result<Value, HtmlPlError> {
        let mut formula = String::new();
        for child in filter_nodes(node.children()) {
            match child {
                Node::Text { content, .. } => formula.push_str(content),
                _ => {
                    let value = self.evaluate_expression(child)?;
                    formula.push_str(&value.to_string());
                }
            }
        }

        match math::evaluate(&formula) {
            Ok(number) => Ok(Value::Number(number)),
            Err(e) => Err(HtmlPlError::eval_error_with_help(
                node.span().clone(),
                e.message,
                format!("The formula after substitution was `{}`.", formula.trim()),
            )),
        }
    }
}

fn require_attribute<'n>(node: &'n Node, name: &str) -> Result<&'n str, HtmlPlError> {
    node.attribute(name).ok_or_else(|| {
        HtmlPlError::structure_error(
            node.span().clone(),
            format!(
                "<{}> is missing its '{}' attribute",
                display_tag(node),
                name
            ),
        )
    })
}

fn display_tag(node: &Node) -> String {
    node.tag().unwrap_or("#text").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_name_reads_as_absent() {
        let env = Environment::new();
        assert_eq!(env.get("missing"), Value::Absent);
    }

    #[test]
    fn set_overwrites_unconditionally() {
        let mut env = Environment::new();
        env.set("x", Value::String("1".to_string()));
        env.set("x", Value::Number(2.0));
        assert_eq!(env.get("x"), Value::Number(2.0));
    }

    #[test]
    fn get_does_not_mutate() {
        let mut env = Environment::new();
        env.set("x", Value::Number(1.0));
        let _ = env.get("y");
        assert_eq!(env.get("x"), Value::Number(1.0));
        assert_eq!(env.get("y"), Value::Absent);
    }
}
