//! End-to-end CLI smoke tests: stage a CSV-derived model and check the
//! printed verdict and exit code, mirroring the teacher's own
//! `assert_cli`-based binary tests.

#[test]
fn provable_hypothesis_prints_provable_and_exits_zero() {
    assert_cli::Assert::main_binary()
        .with_args(&[
            "--csv",
            "tests/fixtures/linear.csv",
            "--granularity",
            "10.0",
            "a",
            "0",
            "10",
            "mono",
            "5",
            "15",
            "b",
        ])
        .succeeds()
        .stdout()
        .is("provable")
        .unwrap();
}

#[test]
fn unprovable_hypothesis_prints_not_provable_and_exits_zero() {
    assert_cli::Assert::main_binary()
        .with_args(&[
            "--csv",
            "tests/fixtures/linear.csv",
            "--granularity",
            "10.0",
            "a",
            "0",
            "10",
            "constant",
            "5",
            "15",
            "b",
        ])
        .succeeds()
        .stdout()
        .contains("not provable")
        .unwrap();
}

#[test]
fn missing_csv_file_fails_with_exit_code_one() {
    assert_cli::Assert::main_binary()
        .with_args(&[
            "--csv",
            "tests/fixtures/does-not-exist.csv",
            "a",
            "0",
            "10",
            "mono",
            "0",
            "1",
            "b",
        ])
        .fails_with(1)
        .unwrap();
}
