//! Runs tests using actual binary, apapted from 'fd' method: https://github.com/sharkdp/fd/blob/master/tests/testenv/mod.rs
#![allow(dead_code)]
use std::env;
use std::path::PathBuf;
use std::process;

/// Heading every usage text
pub const USAGE_HEADING: &str = "usage: usbreset [-ald]";

/// Environment for the integration tests.
pub struct TestEnv {
    /// Path to the *usbreset* executable.
    usbreset_exe: PathBuf,
}

/// Find the *usbreset* executable.
fn find_usbreset_exe() -> PathBuf {
    // Tests exe is in target/debug/deps, the *usbreset* exe is in target/debug
    let root = env::current_exe()
        .expect("tests executable")
        .parent()
        .expect("tests executable directory")
        .parent()
        .expect("usbreset executable directory")
        .to_path_buf();

    let exe_name = if cfg!(windows) {
        "usbreset.exe"
    } else {
        "usbreset"
    };

    root.join(exe_name)
}

/// Format an error message for when *usbreset* exited with an unexpected code.
fn format_exit_error(args: &[&str], expected: i32, output: &process::Output) -> String {
    format!(
        "`usbreset {}` did not exit with {}, got {:?}.\nstdout:\n---\n{}---\nstderr:\n---\n{}---",
        args.join(" "),
        expected,
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

/// Format an error message for when the output of *usbreset* did not match the expected output.
fn format_output_error(args: &[&str], expected: &str, actual: &str) -> String {
    // Generate diff text.
    let diff_text = diff::lines(expected, actual)
        .into_iter()
        .map(|diff| match diff {
            diff::Result::Left(l) => format!("-{}", l),
            diff::Result::Both(l, _) => format!(" {}", l),
            diff::Result::Right(r) => format!("+{}", r),
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        concat!(
            "`usbreset {}` did not produce the expected output.\n",
            "Showing diff between expected and actual:\n{}\n"
        ),
        args.join(" "),
        diff_text
    )
}

impl TestEnv {
    pub fn new() -> TestEnv {
        TestEnv {
            usbreset_exe: find_usbreset_exe(),
        }
    }

    /// Get the path of the usbreset executable.
    #[cfg_attr(windows, allow(unused))]
    pub fn test_exe(&self) -> &PathBuf {
        &self.usbreset_exe
    }

    /// Run *usbreset* with `args` and return its output
    pub fn run(&self, args: &[&str]) -> process::Output {
        process::Command::new(&self.usbreset_exe)
            .args(args)
            .output()
            .expect("usbreset output")
    }

    /// Assert that calling *usbreset* with `args` exits with `code` and return the output
    pub fn assert_exit_code(&self, args: &[&str], code: i32) -> process::Output {
        let output = self.run(args);

        if output.status.code() != Some(code) {
            panic!("{}", format_exit_error(args, code, &output));
        }

        output
    }

    /// Assert stdout of a successful run starts with `expected`
    pub fn assert_success_stdout_starts_with(&self, args: &[&str], expected: &str) {
        let output = self.assert_exit_code(args, 0);
        let actual = String::from_utf8_lossy(&output.stdout);

        if !actual.starts_with(expected) {
            panic!("{}", format_output_error(args, expected, &actual));
        }
    }

    /// Assert that calling *usbreset* with `args` fails with exit code 1, stderr starting with `expected` and usage on stdout
    pub fn assert_usage_error(&self, args: &[&str], expected: &str) {
        let output = self.assert_exit_code(args, 1);
        let actual_err = String::from_utf8_lossy(&output.stderr);

        if !actual_err.trim_start().starts_with(expected) {
            panic!("{}", format_output_error(args, expected, &actual_err));
        }

        let actual_out = String::from_utf8_lossy(&output.stdout);
        if !actual_out.starts_with(USAGE_HEADING) {
            panic!("{}", format_output_error(args, USAGE_HEADING, &actual_out));
        }
    }
}
