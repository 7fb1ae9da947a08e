//! Per-target project descriptors.
//!
//! A descriptor is the structured, format-agnostic record a serializer
//! turns into a project file. All paths in it are `/`-separated and
//! relative to the workspace output directory, which is where the project
//! files themselves would live.

use std::path::Path;

use serde::Serialize;

use crate::builder::solution::{ResolvedEdge, Solution, SolutionEntry};
use crate::core::identifier::Identifier;
use crate::core::target::{Target, TargetKind};
use crate::core::workspace::Workspace;
use crate::util::fs::relative;

/// Build configurations every project carries.
pub const CONFIGURATIONS: [&str; 2] = ["Debug", "Release"];

/// What a project produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfigurationType {
    StaticLibrary,
    Application,
}

impl ConfigurationType {
    pub fn of(kind: TargetKind) -> Self {
        if kind.is_library() {
            ConfigurationType::StaticLibrary
        } else {
            ConfigurationType::Application
        }
    }

    pub fn target_extension(&self) -> &'static str {
        match self {
            ConfigurationType::StaticLibrary => "lib",
            ConfigurationType::Application => "exe",
        }
    }
}

/// Settings for one build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfiguration {
    pub name: String,
    pub debug_libraries: bool,
    /// Per-target intermediate directory, with trailing separator.
    pub intermediate_dir: String,
    /// Shared binary directory, with trailing separator.
    pub output_dir: String,
    /// Command run after a successful build.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_build: Option<String>,
}

/// A compiled source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileItem {
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub defines: Vec<String>,
}

/// Generated entry point of a test target.
///
/// Each test source has its `main` renamed to `main_<stem>`; the runner
/// declares those and calls them in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRunner {
    pub file_name: String,
    pub contents: String,
}

/// Everything a serializer needs to write one project file.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDescriptor {
    pub name: String,
    pub file_name: String,
    pub id: Identifier,
    pub kind: TargetKind,
    pub configuration_type: ConfigurationType,
    pub target_extension: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_toolset: Option<String>,
    pub configurations: Vec<BuildConfiguration>,
    pub compile_items: Vec<CompileItem>,
    pub include_items: Vec<String>,
    pub include_dirs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_compiler_args: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_run_args: Option<String>,
    pub link_libraries: Vec<String>,
    pub references: Vec<ResolvedEdge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_runner: Option<TestRunner>,
}

/// Describe every entry of `solution`, in emission order.
pub fn describe_all(solution: &Solution, ws: &Workspace) -> Vec<ProjectDescriptor> {
    let toolset = ws.config().solution.platform_toolset();
    solution
        .entries()
        .iter()
        .map(|entry| describe(entry, solution, ws, toolset.as_deref()))
        .collect()
}

/// Describe a single solution entry.
pub fn describe(
    entry: &SolutionEntry,
    solution: &Solution,
    ws: &Workspace,
    platform_toolset: Option<&str>,
) -> ProjectDescriptor {
    let target = &entry.target;
    let out = ws.output_dir();
    let configuration_type = ConfigurationType::of(target.kind());
    let is_test = target.kind().is_runnable() && !target.kind().is_script();

    let mut compile_items = target
        .files()
        .sources
        .iter()
        .map(|file| CompileItem {
            path: relative(file, out),
            defines: if is_test {
                vec![format!("main={}", entry_point(file))]
            } else {
                Vec::new()
            },
        })
        .collect::<Vec<_>>();

    let runner = is_test.then(|| test_runner(target));
    if let Some(runner) = &runner {
        compile_items.push(CompileItem {
            path: runner.file_name.clone(),
            defines: Vec::new(),
        });
    }

    // Test projects only compile their sources.
    let include_items = if is_test {
        Vec::new()
    } else {
        target
            .files()
            .headers
            .iter()
            .map(|file| relative(file, out))
            .collect()
    };

    let mut include_dirs = vec![relative(ws.source_dir(), out)];
    include_dirs.extend(target.manifest().extra_include_dirs.iter().cloned());

    let configurations = CONFIGURATIONS
        .iter()
        .map(|&name| configuration(target, ws, name))
        .collect();

    ProjectDescriptor {
        name: target.name().to_string(),
        file_name: entry.file_name.clone(),
        id: target.id(),
        kind: target.kind(),
        configuration_type,
        target_extension: configuration_type.target_extension(),
        platform_toolset: platform_toolset.map(String::from),
        configurations,
        compile_items,
        include_items,
        include_dirs,
        extra_compiler_args: target.manifest().extra_compiler_args.clone(),
        default_run_args: target.manifest().default_run_args.clone(),
        link_libraries: link_libraries(target, solution),
        references: entry.edges.clone(),
        test_runner: runner,
    }
}

fn configuration(target: &Target, ws: &Workspace, name: &str) -> BuildConfiguration {
    let dir_name = name.to_lowercase();
    let out = ws.output_dir();

    let mut intermediate = ws.intermediate_dir(&dir_name);
    for seg in target.relative_dir().split('/').filter(|s| !s.is_empty()) {
        intermediate.push(seg);
    }
    let output_dir = with_trailing_separator(relative(&ws.binary_dir(&dir_name), out));

    let post_build = target.kind().is_script().then(|| {
        let binary = format!("{}{}.exe", output_dir, target.name());
        match &target.manifest().default_run_args {
            Some(args) => format!("{} {}", binary, args),
            None => binary,
        }
    });

    BuildConfiguration {
        name: name.to_string(),
        debug_libraries: name == "Debug",
        intermediate_dir: with_trailing_separator(relative(&intermediate, out)),
        output_dir,
        post_build,
    }
}

/// Runnables link the static library of the directory they belong to.
fn link_libraries(target: &Target, solution: &Solution) -> Vec<String> {
    target
        .owner()
        .filter(|_| target.kind().is_runnable())
        .and_then(|owner| solution.entry(&owner.name))
        .filter(|owner| owner.target.kind().is_library())
        .map(|owner| vec![format!("{}.lib", owner.target.name())])
        .unwrap_or_default()
}

fn entry_point(file: &Path) -> String {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("main_{}", stem)
}

fn test_runner(target: &Target) -> TestRunner {
    let mains: Vec<String> = target.files().sources.iter().map(|f| entry_point(f)).collect();

    let mut contents = String::new();
    for main in &mains {
        contents.push_str(&format!("int {}(int argc, char *argv[]);\n", main));
    }
    contents.push_str("\nint main(int argc, char *argv[])\n{\n");
    for main in &mains {
        contents.push_str(&format!("    {}(argc, argv);\n", main));
    }
    contents.push_str("}\n");

    TestRunner {
        file_name: format!("{}_main.cpp", target.name()),
        contents,
    }
}

fn with_trailing_separator(mut path: String) -> String {
    if !path.is_empty() && !path.ends_with('/') {
        path.push('/');
    }
    path
}
