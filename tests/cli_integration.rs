//! CLI integration tests for cxrun.
//!
//! Each test runs the real binary against a throwaway project with a `PATH`
//! holding only fake `cmake`/`cc` shell scripts. The "source files" are
//! themselves shell scripts: the fake tools copy them to where the binary is
//! expected, so running the build product runs the script.

use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the cxrun binary command.
fn cxrun() -> Command {
    Command::cargo_bin("cxrun").unwrap()
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// A project directory, a tools directory used as the whole `PATH`, and a
/// private temp directory.
struct Sandbox {
    project: TempDir,
    tools: TempDir,
    tmp: TempDir,
    config_home: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Sandbox {
            project: temp_dir(),
            tools: temp_dir(),
            tmp: temp_dir(),
            config_home: temp_dir(),
        }
    }

    fn root(&self) -> PathBuf {
        self.project.path().canonicalize().unwrap()
    }

    fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.project.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Command running in the project with an isolated environment.
    fn cmd(&self) -> Command {
        let mut cmd = cxrun();
        cmd.current_dir(self.project.path())
            .env("PATH", self.tools.path())
            .env("TMPDIR", self.tmp.path())
            .env("XDG_CONFIG_HOME", self.config_home.path())
            .env("HOME", self.config_home.path())
            .env_remove("CMAKE_BUILD_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }

    fn tmp_is_empty(&self) -> bool {
        std::fs::read_dir(self.tmp.path()).unwrap().next().is_none()
    }

    fn log(&self) -> String {
        std::fs::read_to_string(self.project.path().join("build_output.log")).unwrap()
    }
}

// ============================================================================
// Argument handling
// ============================================================================

#[test]
fn test_help_mentions_usage() {
    cxrun()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--list-generators"));
}

#[test]
fn test_missing_file_is_usage_error() {
    cxrun()
        .assert()
        .failure()
        .stderr(predicate::str::contains("FILE"));
}

#[test]
fn test_completions_bash() {
    cxrun()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cxrun"));
}

// ============================================================================
// Fake toolchain (unix only)
// ============================================================================

#[cfg(unix)]
mod fake {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Copies its first argument (the source) to the `-o` output.
    pub const CC: &str = r#"src="$1"
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then out="$2"; fi
  shift
done
if [ -n "$FAKE_COMPILE_FAIL" ]; then
  echo "$src:1:1: error: expected declaration"
  exit "$FAKE_COMPILE_FAIL"
fi
/bin/cp "$src" "$out"
/bin/chmod +x "$out""#;

    /// Reports `$FAKE_GENERATOR` and builds a target by copying
    /// `$FAKE_PROGRAM` to where CMake would put the binary.
    pub const CMAKE: &str = r#"case "$1" in
  -E)
    echo "{\"generators\":[{\"name\":\"${FAKE_GENERATOR:-Unix Makefiles}\"}]}"
    ;;
  --build)
    dir="$2"; target="$4"
    if [ -n "$FAKE_BUILD_FAIL" ]; then
      echo "fake-make: *** No rule to make target '$target'"
      exit "$FAKE_BUILD_FAIL"
    fi
    out="$dir"
    if [ "$5" = "--config" ]; then out="$dir/$6"; fi
    /bin/mkdir -p "$out"
    /bin/cp "$FAKE_PROGRAM" "$out/$target"
    /bin/chmod +x "$out/$target"
    ;;
  *)
    /bin/mkdir -p "$4"
    echo "-- Configuring done"
    ;;
esac"#;

    pub fn install(dir: &Path, name: &str, script: &str) {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// A "program" that echoes its arguments and exits with `code`.
    pub fn program(code: i32) -> String {
        format!("#!/bin/sh\necho \"program args: $*\"\nexit {}\n", code)
    }
}

// ============================================================================
// Direct compilation
// ============================================================================

#[cfg(unix)]
mod direct {
    use super::*;

    #[test]
    fn test_direct_compile_mirrors_exit_code_and_cleans_up() {
        let sb = Sandbox::new();
        fake::install(sb.tools.path(), "cc", fake::CC);
        sb.write("main.c", &fake::program(7));

        sb.cmd()
            .args(["main.c", "one", "--two"])
            .assert()
            .code(7)
            .stdout(predicate::str::contains("program args: one --two"))
            .stderr(predicate::str::contains("CMake is not installed"))
            .stderr(predicate::str::contains("build log").not());

        assert!(sb.tmp_is_empty());
        assert!(sb.log().contains("Compiling with cc"));
    }

    #[test]
    fn test_direct_compile_success() {
        let sb = Sandbox::new();
        fake::install(sb.tools.path(), "c++", fake::CC);
        sb.write("hello.cpp", &fake::program(0));

        sb.cmd()
            .arg("hello.cpp")
            .assert()
            .success()
            .stdout(predicate::str::contains("program args:"))
            .stderr(predicate::str::contains("Running"));

        assert!(sb.tmp_is_empty());
    }

    #[test]
    fn test_compile_failure_dumps_log() {
        let sb = Sandbox::new();
        fake::install(sb.tools.path(), "gcc", fake::CC);
        sb.write("broken.c", &fake::program(0));

        let output = sb
            .cmd()
            .arg("broken.c")
            .env("FAKE_COMPILE_FAIL", "4")
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(4));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("compilation with `gcc` failed"));
        assert_eq!(stderr.matches("---- build log").count(), 1);
        assert_eq!(stderr.matches("error: expected declaration").count(), 1);
        assert!(stderr.contains("---- end log ----"));
        assert!(sb.tmp_is_empty());
    }

    #[test]
    fn test_no_compiler() {
        let sb = Sandbox::new();
        sb.write("main.c", &fake::program(0));

        sb.cmd()
            .arg("main.c")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("no C compiler found"))
            .stderr(predicate::str::contains("cc, gcc, clang, cl"));
    }

    #[test]
    fn test_file_outside_project_is_compiled_directly() {
        let sb = Sandbox::new();
        let elsewhere = temp_dir();
        fake::install(sb.tools.path(), "cmake", fake::CMAKE);
        fake::install(sb.tools.path(), "cc", fake::CC);
        let source = elsewhere.path().join("scratch.c");
        std::fs::write(&source, fake::program(0)).unwrap();

        sb.cmd()
            .arg(&source)
            .assert()
            .success()
            .stderr(predicate::str::contains("outside this project"));

        assert!(!sb.project.path().join("build").exists());
    }
}

// ============================================================================
// Project builds
// ============================================================================

#[cfg(unix)]
mod project {
    use super::*;

    fn sandbox_with_cmake() -> Sandbox {
        let sb = Sandbox::new();
        fake::install(sb.tools.path(), "cmake", fake::CMAKE);
        sb.write("CMakeLists.txt", "cmake_minimum_required(VERSION 3.20)\n");
        sb
    }

    #[test]
    fn test_single_config_build_runs_target() {
        let sb = sandbox_with_cmake();
        let source = sb.write("src/hello.c", &fake::program(0));

        sb.cmd()
            .args(["src/hello.c", "alpha", "-b"])
            .env("FAKE_PROGRAM", &source)
            .assert()
            .success()
            .stdout(predicate::str::contains("program args: alpha -b"));

        assert!(sb.root().join("build").join("src_hello_c").is_file());
        let log = sb.log();
        assert!(log.contains("Configuring with generator: Unix Makefiles"));
        assert!(log.contains("-DCMAKE_BUILD_TYPE=Debug"));
        assert!(log.contains("Building target: src_hello_c"));
    }

    #[test]
    fn test_options_after_file_are_forwarded() {
        let sb = sandbox_with_cmake();
        let source = sb.write("main.c", &fake::program(0));

        sb.cmd()
            .args(["main.c", "-v", "--config", "X"])
            .env("FAKE_PROGRAM", &source)
            .assert()
            .success()
            .stdout(predicate::str::contains("program args: -v --config X"));

        let log = sb.log();
        assert!(log.contains("-DCMAKE_BUILD_TYPE=Debug"));
        assert!(!log.contains("CMAKE_BUILD_TYPE=X"));
    }

    #[test]
    fn test_multi_config_build_uses_config_dir() {
        let sb = sandbox_with_cmake();
        let source = sb.write("src/hello.c", &fake::program(0));

        sb.cmd()
            .args(["--config", "Release", "src/hello.c"])
            .env("FAKE_PROGRAM", &source)
            .env("FAKE_GENERATOR", "Ninja Multi-Config")
            .assert()
            .success();

        assert!(sb.root().join("build/Release/src_hello_c").is_file());
        let log = sb.log();
        assert!(log.contains("--config Release"));
        assert!(!log.contains("CMAKE_BUILD_TYPE"));
    }

    #[test]
    fn test_build_config_from_environment() {
        let sb = sandbox_with_cmake();
        let source = sb.write("app.cpp", &fake::program(0));

        sb.cmd()
            .arg("app.cpp")
            .env("FAKE_PROGRAM", &source)
            .env("FAKE_GENERATOR", "Ninja Multi-Config")
            .env("CMAKE_BUILD_CONFIG", "RelWithDebInfo")
            .assert()
            .success();

        assert!(sb.root().join("build/RelWithDebInfo/app_cpp").is_file());
    }

    #[test]
    fn test_build_failure_mirrors_code_and_dumps_log_once() {
        let sb = sandbox_with_cmake();
        let source = sb.write("src/hello.c", &fake::program(0));

        let output = sb
            .cmd()
            .arg("src/hello.c")
            .env("FAKE_PROGRAM", &source)
            .env("FAKE_BUILD_FAIL", "3")
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(3));
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(!stdout.contains("No rule to make target"));
        assert_eq!(stderr.matches("---- build log").count(), 1);
        assert_eq!(stderr.matches("No rule to make target").count(), 1);
        assert_eq!(stderr.matches("failed with exit code 3").count(), 1);
        assert!(stderr.contains("`src_hello_c`"));
    }

    #[test]
    fn test_program_failure_does_not_dump_log() {
        let sb = sandbox_with_cmake();
        let source = sb.write("main.c", &fake::program(7));

        sb.cmd()
            .arg("main.c")
            .env("FAKE_PROGRAM", &source)
            .assert()
            .code(7)
            .stderr(predicate::str::contains("non-zero exit code 7"))
            .stderr(predicate::str::contains("build log").not());
    }

    #[test]
    fn test_no_generator() {
        let sb = sandbox_with_cmake();
        sb.write("main.c", &fake::program(0));

        sb.cmd()
            .arg("main.c")
            .env("FAKE_GENERATOR", "Borland Makefiles")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("no suitable CMake generator"));
    }

    #[test]
    fn test_project_config_file() {
        let sb = sandbox_with_cmake();
        let source = sb.write("main.c", &fake::program(0));
        sb.write(
            ".cxrun/config.toml",
            "[run]\nbuild_dir = \"out\"\ncmake_args = [\"-DFROM_CONFIG=ON\"]\n",
        );

        sb.cmd()
            .args(["--cmake-arg", "-DFROM_CLI=ON", "main.c"])
            .env("FAKE_PROGRAM", &source)
            .assert()
            .success();

        assert!(sb.root().join("out").join("main_c").is_file());
        let log = sb.log();
        let from_config = log.find("-DFROM_CONFIG=ON").unwrap();
        let from_cli = log.find("-DFROM_CLI=ON").unwrap();
        assert!(from_config < from_cli);
    }
}

// ============================================================================
// --list-generators / --print-binary
// ============================================================================

#[cfg(unix)]
mod inspect {
    use super::*;

    #[test]
    fn test_list_generators_without_cmake() {
        let sb = Sandbox::new();

        sb.cmd()
            .arg("--list-generators")
            .assert()
            .success()
            .stdout(predicate::str::contains("No generators found"));
    }

    #[test]
    fn test_list_generators_with_cmake() {
        let sb = Sandbox::new();
        fake::install(sb.tools.path(), "cmake", fake::CMAKE);

        sb.cmd()
            .arg("--list-generators")
            .env("FAKE_GENERATOR", "Ninja")
            .assert()
            .success()
            .stdout("Available CMake generators:\n- Ninja\n");
    }

    #[test]
    fn test_print_binary_with_generator_override() {
        let sb = Sandbox::new();

        let expected = sb.root().join("build").join("src_foo_c");
        sb.cmd()
            .args(["--print-binary", "-G", "Ninja", "src/foo.c"])
            .assert()
            .success()
            .stdout(format!("{}\n", expected.display()));
    }

    #[test]
    fn test_print_binary_multi_config() {
        let sb = Sandbox::new();

        let expected = sb.root().join("build").join("Release").join("main_cpp");
        sb.cmd()
            .args(["--print-binary", "-G", "Ninja Multi-Config", "--config", "Release", "main.cpp"])
            .assert()
            .success()
            .stdout(format!("{}\n", expected.display()));
    }

    #[test]
    fn test_print_binary_outside_project() {
        let sb = Sandbox::new();
        let elsewhere = temp_dir();

        sb.cmd()
            .arg("--print-binary")
            .arg(elsewhere.path().join("x.c"))
            .assert()
            .success()
            .stdout("(file outside project)\n");
    }

    #[test]
    fn test_print_binary_without_generator() {
        let sb = Sandbox::new();

        sb.cmd()
            .args(["--print-binary", "main.c"])
            .assert()
            .success()
            .stdout("(no generator available)\n");
    }
}
