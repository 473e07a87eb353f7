use std::fmt;

/// Dynamic result of evaluating an expression. The language itself is
/// untyped; these are the shapes a value can take at run time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value: an unbound variable read, or a selection with no
    /// matching option.
    Absent,
    String(String),
    Number(f64),
    /// List literals hold the raw item texts, in document order.
    List(Vec<String>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::List(_) => "list",
        }
    }

    /// Loose equality: a number and a numeric string compare equal after
    /// coercion. The coercion table is fixed here rather than borrowed
    /// from any host language:
    ///
    /// - string vs string: byte equality
    /// - number vs number: f64 equality
    /// - number vs string: equal if the trimmed string parses fully as
    ///   f64 and compares equal; an unparseable string is not equal
    ///   (never an error)
    /// - list vs list: elementwise; lists never equal scalars
    /// - absent equals only absent
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Absent, Value::Absent) => true,
            (Value::String(l), Value::String(r)) => l == r,
            (Value::Number(l), Value::Number(r)) => l == r,
            (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
                s.trim().parse::<f64>().map(|p| p == *n).unwrap_or(false)
            }
            (Value::List(l), Value::List(r)) => l == r,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "null"),
            Value::String(s) => write!(f, "{}", s),
            Value::Number(n) => {
                // Whole numbers print without a decimal point; the same
                // text is spliced into arithmetic formulas.
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_string_coerces_against_number() {
        assert!(Value::Number(0.0).loosely_equals(&Value::String("0".to_string())));
        assert!(Value::String("3.5".to_string()).loosely_equals(&Value::Number(3.5)));
        assert!(Value::Number(10.0).loosely_equals(&Value::String(" 10 ".to_string())));
    }

    #[test]
    fn unparseable_string_is_unequal_not_an_error() {
        assert!(!Value::Number(0.0).loosely_equals(&Value::String("zero".to_string())));
        assert!(!Value::Number(1.0).loosely_equals(&Value::String("".to_string())));
    }

    #[test]
    fn absent_equals_only_absent() {
        assert!(Value::Absent.loosely_equals(&Value::Absent));
        assert!(!Value::Absent.loosely_equals(&Value::String("0".to_string())));
        assert!(!Value::Absent.loosely_equals(&Value::Number(0.0)));
    }

    #[test]
    fn lists_never_equal_scalars() {
        let list = Value::List(vec!["1".to_string()]);
        assert!(!list.loosely_equals(&Value::String("1".to_string())));
        assert!(list.loosely_equals(&Value::List(vec!["1".to_string()])));
    }

    #[test]
    fn whole_numbers_display_without_decimal_point() {
        assert_eq!(Value::Number(55.0).to_string(), "55");
        assert_eq!(Value::Number(-2.0).to_string(), "-2");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
    }
}
