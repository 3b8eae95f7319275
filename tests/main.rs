use bargon::{Program, Value};

fn v(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|s| s.to_string()).collect()
}

#[test]
fn compiles_a_minimal_program() {
    Program::compile(r#"a/alpha :flag => A"#).unwrap();
}

#[test]
fn bundling_scenario_one() {
    let program = Program::compile(
        "a/alpha :flag => A\n\
         b/beta :flag => B\n\
         c/cat :str => C",
    )
    .unwrap();
    let outcome = program.try_parse(&v(&["-abc", "value"])).unwrap();
    assert_eq!(outcome.get("A"), Some(&Value::Bool(true)));
    assert_eq!(outcome.get("B"), Some(&Value::Bool(true)));
    assert_eq!(outcome.get("C"), Some(&Value::Str("value".to_string())));
    assert!(outcome.spare_args().is_empty());
}

#[test]
fn attached_numeric_scenario_two() {
    let program = Program::compile("t/times :int => T").unwrap();
    let outcome = program.try_parse(&v(&["-t2"])).unwrap();
    assert_eq!(outcome.get("T"), Some(&Value::Int(2)));
    assert!(outcome.was_set("T"));
}

#[test]
fn enum_validation_scenario_three() {
    let program = Program::compile(r#"l/level ["debug" "info" "warn" "error"] => L"#).unwrap();

    let outcome = program.try_parse(&v(&["--level", "warn"])).unwrap();
    assert_eq!(outcome.get("L"), Some(&Value::Str("warn".to_string())));

    let err = program.try_parse(&v(&["--level", "nope"])).unwrap_err();
    assert!(err.to_string().contains("nope"));
}

#[test]
fn switch_scenario_four() {
    let program =
        Program::compile(r#"! {l/list:"list" g/get:"download" r/remove:"remove"} => MODE"#).unwrap();

    let outcome = program.try_parse(&v(&["-g"])).unwrap();
    assert_eq!(outcome.get("MODE"), Some(&Value::Str("download".to_string())));

    program.try_parse(&v(&[])).unwrap_err();
}

#[test]
fn subcommand_routing_scenario_five() {
    let program = Program::compile(
        "commands { install: \"i\" *remove: \"r\" }\n\
         @install u/update :flag => U\n\
         @remove k/keep :flag => K",
    )
    .unwrap();

    // Starred subcommand with no spare arguments supplied is an error.
    program.try_parse(&v(&["remove", "-k"])).unwrap_err();

    let outcome = program.try_parse(&v(&["remove", "-k", "pkg"])).unwrap();
    assert_eq!(outcome.subcommand(), Some("remove"));
    assert_eq!(outcome.get("K"), Some(&Value::Bool(true)));
    assert_eq!(outcome.get("U"), Some(&Value::Bool(false)));
    assert_eq!(outcome.spare_args(), &["pkg".to_string()]);
}

#[test]
fn escape_scenario_six() {
    let program = Program::compile("o/out :str => O").unwrap();
    let outcome = program.try_parse(&v(&["-o", "--", "--weird"])).unwrap();
    assert_eq!(outcome.get("O"), Some(&Value::Str("--weird".to_string())));
    assert!(outcome.spare_args().is_empty());
}
