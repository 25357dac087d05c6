use serde::{Deserialize, Serialize};

/// A command given either as an argument vector or as a single shell-like line.
///
/// # Example
/// `["make", "clean", "poly_exp_test"]` and `"make clean poly_exp_test"` describe the same
/// command. The line form is split with shell quoting rules but never run through a shell.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(untagged)]
pub enum CommandLine {
    Argv(Vec<String>),
    Line(String),
}

impl CommandLine {
    pub fn argv(&self) -> Result<Vec<String>, &'static str> {
        let argv = match self {
            CommandLine::Argv(argv) => argv.clone(),
            CommandLine::Line(line) => shlex::split(line).ok_or("command has unbalanced quotes")?,
        };
        if argv.first().is_none_or(|program| program.is_empty()) {
            return Err("command must name a program");
        }
        Ok(argv)
    }
}

/// One step of the grading pipeline, with its parameters.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(tag = "check", rename_all = "snake_case", deny_unknown_fields)]
pub enum CheckDescriptor {
    MissingContributors {
        #[serde(default)]
        points: u32,
    },
    StarterContributors {
        #[serde(default)]
        points: u32,
    },
    FilesExist {
        paths: Vec<String>,
        #[serde(default)]
        points: u32,
    },
    /// The student had to edit this starter file.
    FileUnchanged {
        path: String,
        digest: String,
        #[serde(default)]
        points: u32,
    },
    /// The student must not edit this file.
    FileChanged {
        path: String,
        digest: String,
        #[serde(default)]
        points: u32,
    },
    CommandSucceeds {
        command: CommandLine,
        #[serde(default)]
        points: u32,
    },
    StringRemoved {
        label: String,
        points: u32,
        needle: String,
        files: Vec<String>,
    },
    GtestRun {
        binary: String,
    },
    GtestSuite {
        suite: String,
        points: u32,
    },
}

impl CheckDescriptor {
    pub fn points(&self) -> u32 {
        match self {
            CheckDescriptor::MissingContributors { points }
            | CheckDescriptor::StarterContributors { points }
            | CheckDescriptor::FilesExist { points, .. }
            | CheckDescriptor::FileUnchanged { points, .. }
            | CheckDescriptor::FileChanged { points, .. }
            | CheckDescriptor::CommandSucceeds { points, .. }
            | CheckDescriptor::StringRemoved { points, .. }
            | CheckDescriptor::GtestSuite { points, .. } => *points,
            CheckDescriptor::GtestRun { .. } => 0,
        }
    }

    /// Checks the parameters that can be validated without a submission.
    pub fn validate(&self) -> Result<(), &'static str> {
        match self {
            CheckDescriptor::MissingContributors { .. }
            | CheckDescriptor::StarterContributors { .. } => Ok(()),
            CheckDescriptor::FilesExist { paths, .. } => {
                if paths.is_empty() || paths.iter().any(String::is_empty) {
                    return Err("files_exist needs at least one non-empty path");
                }
                Ok(())
            }
            CheckDescriptor::FileUnchanged { path, digest, .. }
            | CheckDescriptor::FileChanged { path, digest, .. } => {
                if path.is_empty() {
                    return Err("digest checks need a non-empty path");
                }
                if !crate::fingerprint::is_sha256_hex(digest) {
                    return Err("digest must be 64 hexadecimal characters (sha256)");
                }
                Ok(())
            }
            CheckDescriptor::CommandSucceeds { command, .. } => command.argv().map(|_| ()),
            CheckDescriptor::StringRemoved {
                label,
                needle,
                files,
                ..
            } => {
                if label.is_empty() || needle.is_empty() {
                    return Err("string_removed needs a label and a non-empty needle");
                }
                if files.is_empty() {
                    return Err("string_removed needs at least one file");
                }
                Ok(())
            }
            CheckDescriptor::GtestRun { binary } => {
                if binary.is_empty() {
                    return Err("gtest_run needs a binary");
                }
                Ok(())
            }
            CheckDescriptor::GtestSuite { suite, .. } => {
                if suite.is_empty() {
                    return Err("gtest_suite needs a suite name");
                }
                Ok(())
            }
        }
    }
}
