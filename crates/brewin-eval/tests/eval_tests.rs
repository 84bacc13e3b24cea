//! Integration tests for the Brewin tree-walking evaluator.
//!
//! Tests key evaluator features:
//! - program driver (entry point, duplicate functions)
//! - variable declaration, assignment and lookup
//! - arithmetic and string concatenation
//! - builtins (`print`, `inputi`) and user calls
//! - per-call environment isolation
//! - error taxonomy and positions
//! - the `run_source` pipeline

use brewin_eval::{
    run_source, BufferedConsole, ErrorType, EvalError, Interpreter, RunError,
};
use brewin_lexer::Lexer;
use brewin_parser::Parser;
use brewin_types::ast::Program;
use brewin_types::{ErrorCode, SourceFile};
use pretty_assertions::assert_eq;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Parse Brewin source into a Program AST (panics on parse errors).
fn parse(source: &str) -> Program {
    let sf = SourceFile::new("test.br", source);
    let lex = Lexer::new(&sf).lex();
    let result = Parser::new(lex.tokens, &sf).parse();
    if result.errors.has_errors() {
        panic!(
            "parse errors:\n{}",
            result
                .errors
                .errors
                .iter()
                .map(|e| format!("  [{}] {}", e.code, e.message))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
    result.program.expect("no program after successful parse")
}

/// Run a program with scripted input; returns the outcome and every line written.
fn run_with_input(source: &str, inputs: &[&str]) -> (Result<(), EvalError>, Vec<String>) {
    let program = parse(source);
    let mut interp = Interpreter::new(BufferedConsole::new(inputs.iter().copied()));
    let result = interp.run(&program);
    (result, interp.into_console().into_output())
}

/// Run a program that must succeed; returns its output lines.
fn run_ok(source: &str, inputs: &[&str]) -> Vec<String> {
    match run_with_input(source, inputs) {
        (Ok(()), output) => output,
        (Err(e), output) => panic!("unexpected error: {e}\noutput so far: {output:?}"),
    }
}

/// Run a program that must fail; returns the error and the output written before it.
fn run_err(source: &str, inputs: &[&str]) -> (EvalError, Vec<String>) {
    match run_with_input(source, inputs) {
        (Err(e), output) => (e, output),
        (Ok(()), output) => panic!("expected an error, program finished with {output:?}"),
    }
}

fn error_type(source: &str) -> ErrorType {
    run_err(source, &[]).0.error_type()
}

fn lines(expected: &[&str]) -> Vec<String> {
    expected.iter().map(|s| s.to_string()).collect()
}

const SUM_PROGRAM: &str = r#"
func main() {
  var first;
  var second;
  first = inputi("Enter a first #: ");
  second = inputi("Enter a second #: ");
  var sum;
  sum = (first + second);
  print("The sum is ", sum, "!");
}
"#;

// ══════════════════════════════════════════════════════════════════════════════
// Program Driver
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_sum_program_end_to_end() {
    let output = run_ok(SUM_PROGRAM, &["3", "4"]);
    assert_eq!(
        output,
        lines(&["Enter a first #: ", "Enter a second #: ", "The sum is 7!"])
    );
}

#[test]
fn test_missing_main_is_a_name_error_with_no_output() {
    let (err, output) = run_err("func helper() { print(\"never\"); }", &[]);
    assert_eq!(err.error_type(), ErrorType::Name);
    assert!(err.message().contains("main"), "message: {}", err.message());
    assert!(output.is_empty());
}

#[test]
fn test_duplicate_functions_fault_before_anything_runs() {
    let source = r#"
func main() { print("first"); }
func main() { print("second"); }
"#;
    let (err, output) = run_err(source, &[]);
    assert_eq!(err.error_type(), ErrorType::Fault);
    assert_eq!(err.span().start_line, 3);
    assert!(output.is_empty());
}

#[test]
fn test_duplicate_helper_faults_even_when_never_called() {
    let source = "func main() {} func helper() {} func helper() {}";
    assert_eq!(error_type(source), ErrorType::Fault);
}

#[test]
fn test_empty_main_produces_no_output() {
    assert!(run_ok("func main() {}", &[]).is_empty());
}

#[test]
fn test_main_need_not_be_first() {
    let source = r#"
func helper() { print("helper"); }
func main() { print("main"); helper(); }
"#;
    assert_eq!(run_ok(source, &[]), lines(&["main", "helper"]));
}

// ══════════════════════════════════════════════════════════════════════════════
// Variables
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_assign_and_read_back() {
    let source = "func main() { var x; x = 2 + 3; print(x); }";
    assert_eq!(run_ok(source, &[]), lines(&["5"]));
}

#[test]
fn test_reassignment_may_change_kind() {
    let source = r#"func main() { var x; x = 1; x = "one"; print(x); }"#;
    assert_eq!(run_ok(source, &[]), lines(&["one"]));
}

#[test]
fn test_values_are_copied_on_read() {
    let source = "func main() { var a; var b; a = 1; b = a; a = 2; print(a, b); }";
    assert_eq!(run_ok(source, &[]), lines(&["21"]));
}

#[test]
fn test_redeclaration_is_a_name_error() {
    assert_eq!(
        error_type("func main() { var x; var x; }"),
        ErrorType::Name
    );
}

#[test]
fn test_assignment_to_undeclared_is_a_name_error() {
    assert_eq!(error_type("func main() { y = 1; }"), ErrorType::Name);
}

#[test]
fn test_undeclared_target_is_checked_before_right_hand_side() {
    // With no input queued, evaluating `inputi()` would fault.
    let (err, output) = run_err(r#"func main() { y = inputi("prompt"); }"#, &[]);
    assert_eq!(err.error_type(), ErrorType::Name);
    assert!(output.is_empty());
}

#[test]
fn test_undeclared_read_is_a_name_error() {
    assert_eq!(error_type("func main() { print(nope); }"), ErrorType::Name);
}

#[test]
fn test_uninitialized_read_is_a_name_error() {
    let (err, _) = run_err("func main() { var x; print(x); }", &[]);
    assert_eq!(err.error_type(), ErrorType::Name);
    assert!(err.message().contains("before it is assigned"));
}

#[test]
fn test_error_position_points_at_the_variable() {
    let (err, _) = run_err("func main() {\n  print(y);\n}", &[]);
    assert_eq!(err.span().start_line, 2);
    assert_eq!(err.span().start_col, 9);
}

// ══════════════════════════════════════════════════════════════════════════════
// Arithmetic & Strings
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_precedence_and_negation() {
    let source = "func main() { print(2 + 3 * 4, \" \", (2 + 3) * 4, \" \", -5 - -7, \" \", 1 - 2 - 3); }";
    assert_eq!(run_ok(source, &[]), lines(&["14 20 2 -4"]));
}

#[test]
fn test_string_concatenation() {
    let source = r#"func main() { var s; s = "brew" + "in"; print(s + "!"); }"#;
    assert_eq!(run_ok(source, &[]), lines(&["brewin!"]));
}

#[test]
fn test_mixed_kinds_are_type_errors() {
    for op in ["+", "-", "*"] {
        let source = format!(r#"func main() {{ var x; x = 1 {op} "a"; }}"#);
        assert_eq!(error_type(&source), ErrorType::Type, "operator {op}");
        let source = format!(r#"func main() {{ var x; x = "a" {op} 1; }}"#);
        assert_eq!(error_type(&source), ErrorType::Type, "operator {op}");
    }
}

#[test]
fn test_string_multiplication_is_a_type_error() {
    assert_eq!(
        error_type(r#"func main() { var x; x = "a" * "b"; }"#),
        ErrorType::Type
    );
}

#[test]
fn test_string_subtraction_is_a_type_error() {
    assert_eq!(
        error_type(r#"func main() { var x; x = "ab" - "b"; }"#),
        ErrorType::Type
    );
}

#[test]
fn test_negating_a_string_is_a_type_error() {
    assert_eq!(
        error_type(r#"func main() { var x; x = -"a"; }"#),
        ErrorType::Type
    );
}

#[test]
fn test_overflow_is_a_fault() {
    let source = "func main() { var x; x = 9223372036854775807 + 1; }";
    assert_eq!(error_type(source), ErrorType::Fault);
    let source = "func main() { var x; x = 4611686018427387904 * 2; }";
    assert_eq!(error_type(source), ErrorType::Fault);
}

#[test]
fn test_most_negative_integer_is_reachable() {
    let source = "func main() { print(-9223372036854775807 - 1); }";
    assert_eq!(run_ok(source, &[]), lines(&["-9223372036854775808"]));
}

// ══════════════════════════════════════════════════════════════════════════════
// Builtins
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_print_concatenates_without_separator() {
    assert_eq!(
        run_ok(r#"func main() { print("a", 1, "b"); }"#, &[]),
        lines(&["a1b"])
    );
}

#[test]
fn test_print_without_arguments_writes_empty_line() {
    assert_eq!(run_ok("func main() { print(); }", &[]), lines(&[""]));
}

#[test]
fn test_inputi_trims_and_accepts_negatives() {
    let source = "func main() { var n; n = inputi(); print(n * 2); }";
    assert_eq!(run_ok(source, &["  -21 \t"]), lines(&["-42"]));
}

#[test]
fn test_inputi_without_prompt_writes_nothing_before_reading() {
    let source = "func main() { var n; n = inputi(); }";
    assert!(run_ok(source, &["1"]).is_empty());
}

#[test]
fn test_inputi_concatenates_prompt_arguments() {
    let source = r#"func main() { var n; n = inputi("value ", 1, ": "); }"#;
    assert_eq!(run_ok(source, &["5"]), lines(&["value 1: "]));
}

#[test]
fn test_inputi_rejects_non_integer_input() {
    let source = r#"func main() { var n; n = inputi("n: "); }"#;
    let (err, output) = run_err(source, &["twelve"]);
    assert_eq!(err.error_type(), ErrorType::Type);
    assert_eq!(output, lines(&["n: "]));
}

#[test]
fn test_inputi_at_end_of_input_is_a_fault() {
    let source = "func main() { var n; n = inputi(); }";
    assert_eq!(run_err(source, &[]).0.error_type(), ErrorType::Fault);
}

#[test]
fn test_inputi_used_inside_expressions() {
    let source = "func main() { print(inputi() + inputi() * 10); }";
    assert_eq!(run_ok(source, &["1", "2"]), lines(&["21"]));
}

#[test]
fn test_print_as_value_is_a_type_error() {
    let (err, output) = run_err("func main() { var x; x = print(1); }", &[]);
    assert_eq!(err.error_type(), ErrorType::Type);
    assert_eq!(output, lines(&["1"]));
}

#[test]
fn test_builtins_shadow_user_functions() {
    let source = r#"
func print() { var unused; }
func main() { print("builtin"); }
"#;
    assert_eq!(run_ok(source, &[]), lines(&["builtin"]));
}

// ══════════════════════════════════════════════════════════════════════════════
// User Functions
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_nested_calls_run_in_order() {
    let source = r#"
func main() { print("start"); a(); print("end"); }
func a() { print("a in"); b(); print("a out"); }
func b() { print("b"); }
"#;
    assert_eq!(
        run_ok(source, &[]),
        lines(&["start", "a in", "b", "a out", "end"])
    );
}

#[test]
fn test_callee_cannot_see_caller_variables() {
    let source = r#"
func main() { var x; x = 1; peek(); }
func peek() { print(x); }
"#;
    assert_eq!(error_type(source), ErrorType::Name);
}

#[test]
fn test_callee_variables_do_not_leak_to_caller() {
    let source = r#"
func main() { var x; x = 1; shadow(); print(x); }
func shadow() { var x; x = 99; print(x); }
"#;
    assert_eq!(run_ok(source, &[]), lines(&["99", "1"]));
}

#[test]
fn test_each_call_starts_with_a_fresh_environment() {
    let source = r#"
func main() { once(); once(); }
func once() { var x; x = 7; print(x); }
"#;
    assert_eq!(run_ok(source, &[]), lines(&["7", "7"]));
}

#[test]
fn test_undefined_function_statement_is_a_name_error() {
    assert_eq!(error_type("func main() { foo(); }"), ErrorType::Name);
}

#[test]
fn test_undefined_function_in_expression_is_a_name_error() {
    assert_eq!(
        error_type("func main() { var x; x = 1 + foo(); }"),
        ErrorType::Name
    );
}

#[test]
fn test_user_call_as_value_is_a_type_error() {
    let source = r#"
func main() { var x; x = helper(); }
func helper() { print("ran"); }
"#;
    let (err, output) = run_err(source, &[]);
    assert_eq!(err.error_type(), ErrorType::Type);
    assert_eq!(output, lines(&["ran"]));
}

#[test]
fn test_arguments_to_user_function_are_a_name_error() {
    let source = "func main() { helper(1); } func helper() {}";
    assert_eq!(error_type(source), ErrorType::Name);
}

#[test]
fn test_output_before_error_is_kept() {
    let source = r#"func main() { print("one"); print("two"); nope(); print("three"); }"#;
    let (err, output) = run_err(source, &[]);
    assert_eq!(err.error_type(), ErrorType::Name);
    assert_eq!(output, lines(&["one", "two"]));
}

// ══════════════════════════════════════════════════════════════════════════════
// Pipeline
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_run_source_executes_program() {
    let sf = SourceFile::new("sum.br", SUM_PROGRAM);
    let mut console = BufferedConsole::new(["10", "-3"]);
    run_source(&sf, &mut console).expect("program runs");
    assert_eq!(console.output().last().map(String::as_str), Some("The sum is 7!"));
}

#[test]
fn test_run_source_reports_syntax_errors_without_running() {
    let sf = SourceFile::new("bad.br", "func main() { print(\"hi\"); var x = 1; }");
    let mut console = BufferedConsole::default();
    match run_source(&sf, &mut console) {
        Err(RunError::Syntax(errors)) => assert!(errors.has_errors()),
        other => panic!("expected syntax error, got {other:?}"),
    }
    assert!(console.output().is_empty());
}

#[test]
fn test_run_source_rejects_runaway_expressions_as_syntax_errors() {
    let signs = format!("{}1", "-".repeat(20_000));
    let chain = vec!["1"; 200_000].join(" + ");
    for expr in [signs, chain] {
        let sf = SourceFile::new("deep.br", format!("func main() {{ var x; x = {expr}; print(x); }}"));
        let mut console = BufferedConsole::default();
        match run_source(&sf, &mut console) {
            Err(RunError::Syntax(errors)) => {
                assert_eq!(errors.errors[0].code, ErrorCode::NESTING_TOO_DEEP)
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
        assert!(console.output().is_empty());
    }
}

#[test]
fn test_deepest_accepted_expression_evaluates() {
    let source = format!("func main() {{ print({}); }}", vec!["1"; 256].join(" + "));
    assert_eq!(run_ok(&source, &[]), lines(&["256"]));
}

#[test]
fn test_run_source_wraps_runtime_errors() {
    let sf = SourceFile::new("nomain.br", "func other() {}");
    match run_source(&sf, BufferedConsole::default()) {
        Err(RunError::Eval(e)) => assert_eq!(e.error_type(), ErrorType::Name),
        other => panic!("expected runtime error, got {other:?}"),
    }
}

#[test]
fn test_determinism_100_iterations() {
    let program = parse(SUM_PROGRAM);
    let mut first = None;
    for i in 0..100 {
        let mut interp = Interpreter::new(BufferedConsole::new(["3", "4"]));
        interp.run(&program).expect("program runs");
        let output = interp.into_console().into_output();
        match &first {
            None => first = Some(output),
            Some(expected) => assert_eq!(expected, &output, "Determinism failure at iteration {i}"),
        }
    }
}
