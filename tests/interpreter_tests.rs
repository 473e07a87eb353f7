// End-to-end interpreter tests: each test parses a complete program and
// executes it against the mock runtime, then checks the environment and
// the captured print sequence.

use htmlpl::{parse, ErrorKind, Interpreter, MockRuntime, Value};

fn string(s: &str) -> Value {
    Value::String(s.to_string())
}

#[test]
fn list_literal_binds_ordered_item_texts() {
    let root = parse(
        r#"
        <var name="myVariable">
            <ul>
                <li>1</li>
                <li>2</li>
            </ul>
        </var>
        "#,
    )
    .unwrap();

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    interpreter.execute_program(&root).unwrap();

    assert_eq!(
        interpreter.environment().get("myVariable"),
        Value::List(vec!["1".to_string(), "2".to_string()])
    );
}

#[test]
fn ol_and_ul_are_synonyms_and_non_items_are_dropped() {
    let root = parse(
        r#"
        <var name="a"><ol><li>x</li><!-- noise --><input/><li>y</li></ol></var>
        <var name="b"><ul><li>x</li><li>y</li></ul></var>
        "#,
    )
    .unwrap();

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    interpreter.execute_program(&root).unwrap();

    let expected = Value::List(vec!["x".to_string(), "y".to_string()]);
    assert_eq!(interpreter.environment().get("a"), expected);
    assert_eq!(interpreter.environment().get("b"), expected);
}

#[test]
fn select_matches_first_loosely_equal_option() {
    let root = parse(
        r#"
        <var name="myVariable">1</var>
        <var name="myCalculatedVariable">
            <select value="myVariable">
                <option value="0">It's false</option>
                <option value="1">It's true</option>
            </select>
        </var>
        "#,
    )
    .unwrap();

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    interpreter.execute_program(&root).unwrap();

    assert_eq!(interpreter.environment().get("myVariable"), string("1"));
    assert_eq!(
        interpreter.environment().get("myCalculatedVariable"),
        string("It's true")
    );
}

#[test]
fn select_with_no_matching_option_yields_absent() {
    let root = parse(
        r#"
        <var name="x">7</var>
        <var name="y">
            <select value="x">
                <option value="0">zero</option>
                <option value="1">one</option>
            </select>
        </var>
        "#,
    )
    .unwrap();

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    interpreter.execute_program(&root).unwrap();

    assert_eq!(interpreter.environment().get("y"), Value::Absent);
}

#[test]
fn select_coerces_number_against_option_literal() {
    let root = parse(
        r#"
        <var name="x"><math>2 - 1</math></var>
        <var name="y">
            <select value="x">
                <option value="1">matched</option>
            </select>
        </var>
        "#,
    )
    .unwrap();

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    interpreter.execute_program(&root).unwrap();

    // x is the number 1; the option literal is the string "1".
    assert_eq!(interpreter.environment().get("y"), string("matched"));
}

#[test]
fn output_of_named_variable_preserves_type() {
    let root = parse(
        r#"
        <var name="myVariable"><math>1</math></var>
        <output value="myVariable"/>
        "#,
    )
    .unwrap();

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    interpreter.execute_program(&root).unwrap();
    drop(interpreter);

    assert_eq!(mock.values_printed, vec![Value::Number(1.0)]);
}

#[test]
fn output_evaluates_its_child_expression() {
    let root = parse(
        r#"
        <var name="greeting">hello</var>
        <output><var name="greeting"/></output>
        "#,
    )
    .unwrap();

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    interpreter.execute_program(&root).unwrap();
    drop(interpreter);

    assert_eq!(mock.values_printed, vec![string("hello")]);
}

#[test]
fn input_pops_from_the_tail_of_the_queue() {
    let root = parse(
        r#"
        <var name="first"><input/></var>
        <var name="second"><input/></var>
        "#,
    )
    .unwrap();

    let mut mock = MockRuntime::new();
    mock.values_to_read.push("b".to_string());
    mock.values_to_read.push("a".to_string());

    let mut interpreter = Interpreter::new(&mut mock);
    interpreter.execute_program(&root).unwrap();

    assert_eq!(interpreter.environment().get("first"), string("a"));
    assert_eq!(interpreter.environment().get("second"), string("b"));
}

#[test]
fn loop_rereads_condition_each_pass() {
    let root = parse(
        r#"
        <var name="n">3</var>
        <form value="n">
            <output value="n"/>
            <var name="n"><math><var name="n"/> - 1</math></var>
        </form>
        "#,
    )
    .unwrap();

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    interpreter.execute_program(&root).unwrap();

    // First pass prints the declared string; later passes print the
    // number the arithmetic produced. The loop stops once n coerces
    // equal to "0".
    assert_eq!(interpreter.environment().get("n"), Value::Number(0.0));
    drop(interpreter);
    assert_eq!(
        mock.values_printed,
        vec![string("3"), Value::Number(2.0), Value::Number(1.0)]
    );
}

#[test]
fn loop_body_never_runs_when_condition_starts_at_zero() {
    let root = parse(
        r#"
        <var name="n">0</var>
        <form value="n">
            <output value="n"/>
        </form>
        "#,
    )
    .unwrap();

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    interpreter.execute_program(&root).unwrap();
    drop(interpreter);

    assert!(mock.values_printed.is_empty());
}

#[test]
fn evaluating_the_same_expression_twice_is_idempotent() {
    let root = parse(r#"<ul><li>1</li><li>2</li></ul>"#).unwrap();
    let list = htmlpl::filter_nodes(root.children())[0];

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    let first = interpreter.evaluate_expression(list).unwrap();
    let second = interpreter.evaluate_expression(list).unwrap();

    assert_eq!(first, second);
}

#[test]
fn nested_variable_references_are_substituted_by_value() {
    let root = parse(
        r#"
        <var name="sum">0</var>
        <var name="n">10</var>
        <var name="total"><math><var name="sum"/> + <var name="n"/></math></var>
        "#,
    )
    .unwrap();

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    interpreter.execute_program(&root).unwrap();

    assert_eq!(interpreter.environment().get("total"), Value::Number(10.0));
}

#[test]
fn sum_of_the_first_n_numbers() {
    let root = parse(
        r#"
        <!-- Sum of the first N numbers -->
        <var name="sum">0</var>
        <var name="n"><input/></var>

        <form value="n">
            <!-- Increment the sum by n -->
            <var name="sum">
                <math>
                    <var name="sum"/>
                    +
                    <var name="n"/>
                </math>
            </var>

            <!-- Decrement n by 1 -->
            <var name="n">
                <math>
                    <var name="n"/>
                    - 1
                </math>
            </var>
        </form>

        <output>
            <var name="sum"/>
        </output>
        "#,
    )
    .unwrap();

    let mut mock = MockRuntime::new();
    mock.values_to_read.push("10".to_string());

    let mut interpreter = Interpreter::new(&mut mock);
    interpreter.execute_program(&root).unwrap();
    drop(interpreter);

    assert_eq!(mock.values_printed, vec![Value::Number(55.0)]);
}

#[test]
fn var_without_a_value_child_is_a_structure_error() {
    let root = parse(r#"<var name="x"></var>"#).unwrap();

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    let err = interpreter.execute_program(&root).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::StructureError));
}

#[test]
fn var_with_two_value_children_is_a_structure_error() {
    let root = parse(r#"<var name="x"><input/><input/></var>"#).unwrap();

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    let err = interpreter.execute_program(&root).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::StructureError));
}

#[test]
fn matched_option_with_two_children_is_a_structure_error() {
    let root = parse(
        r#"
        <var name="x">1</var>
        <var name="y">
            <select value="x">
                <option value="1"><input/><input/></option>
            </select>
        </var>
        "#,
    )
    .unwrap();

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    let err = interpreter.execute_program(&root).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::StructureError));
}

#[test]
fn unknown_tag_at_statement_position_is_fatal() {
    let root = parse(r#"<div>hello</div>"#).unwrap();

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    let err = interpreter.execute_program(&root).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::UnknownConstruct));
}

#[test]
fn unknown_tag_at_expression_position_is_fatal() {
    let root = parse(r#"<var name="x"><span>1</span></var>"#).unwrap();

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    let err = interpreter.execute_program(&root).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::UnknownConstruct));
}

#[test]
fn non_root_node_is_rejected() {
    let root = parse(r#"<var name="x">1</var>"#).unwrap();
    let element = htmlpl::filter_nodes(root.children())[0];

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    let err = interpreter.execute_program(element).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::StructureError));
}

#[test]
fn non_numeric_operand_after_splicing_is_an_eval_error() {
    let root = parse(
        r#"
        <var name="word">ten</var>
        <var name="x"><math><var name="word"/> + 1</math></var>
        "#,
    )
    .unwrap();

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    let err = interpreter.execute_program(&root).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::EvalError));
}

#[test]
fn loop_over_an_undeclared_variable_is_an_eval_error() {
    let root = parse(r#"<form value="missing"><output value="missing"/></form>"#).unwrap();

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    let err = interpreter.execute_program(&root).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::EvalError));
}

#[test]
fn output_printed_before_a_failure_stands() {
    let root = parse(
        r#"
        <var name="x">1</var>
        <output value="x"/>
        <div>boom</div>
        "#,
    )
    .unwrap();

    let mut mock = MockRuntime::new();
    let mut interpreter = Interpreter::new(&mut mock);
    assert!(interpreter.execute_program(&root).is_err());
    drop(interpreter);

    assert_eq!(mock.values_printed, vec![string("1")]);
}
