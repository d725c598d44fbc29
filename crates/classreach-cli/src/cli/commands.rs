use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::enums::OutputFormat;

/// Available classreach subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the classes a single class file references directly
    ///
    /// Reads one .class file and prints every class named in its constant
    /// pool, descriptors, generic signatures and annotations, after the
    /// configured name filter.
    Imports(ImportsArgs),

    /// Compute the transitive closure of one or more root classes
    ///
    /// Follows references breadth-first through the classpath until no new
    /// class is found. Names that no classpath root defines are reported as
    /// unresolved.
    Resolve(ResolveArgs),

    /// Validate configuration and classpath roots
    ///
    /// Loads classreach.toml with the selected profile, checks that filter
    /// patterns compile and every classpath root exists, then prints a
    /// summary of the indexed classpath.
    Check(CheckArgs),
}

/// Name filter flags shared by `imports` and `resolve`
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Only follow classes under these package prefixes
    ///
    /// Examples:
    ///   --include com.example --include org.acme.core
    #[arg(short = 'i', long = "include", value_name = "PREFIX")]
    pub include: Vec<String>,

    /// Never follow classes under these package prefixes
    #[arg(short = 'x', long = "exclude", value_name = "PREFIX")]
    pub exclude: Vec<String>,

    /// Never follow classes whose name matches this regex
    #[arg(long = "exclude-pattern", value_name = "REGEX")]
    pub exclude_pattern: Vec<String>,

    /// Follow platform classes (java.*, javax.*, jdk.*, sun.*, ...) too
    #[arg(long)]
    pub no_default_excludes: bool,
}

/// Arguments for the imports command
#[derive(Args, Debug)]
pub struct ImportsArgs {
    /// Class file to inspect
    #[arg(value_name = "CLASS_FILE")]
    pub class_file: PathBuf,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the resolve command
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Root classes: a path to a .class file, or a class name on the classpath
    ///
    /// Examples:
    ///   classreach resolve build/classes/com/example/Main.class
    ///   classreach resolve com.example.Main -C build/classes -C lib/util.jar
    #[arg(required = true, value_name = "ROOT")]
    pub roots: Vec<String>,

    /// Classpath roots (directories, .jar or .zip), searched in order
    ///
    /// Replaces [classpath] roots from the config file when given.
    #[arg(short = 'C', long = "classpath", value_name = "PATH")]
    pub classpath: Vec<PathBuf>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Print the shortest reference chain from a root to CLASS
    #[arg(long, value_name = "CLASS")]
    pub why: Option<String>,

    /// Exit with an error when a class file fails to parse or a name is unresolved
    #[arg(long)]
    pub strict: bool,

    /// Abort on the first class file that fails to parse
    #[arg(long)]
    pub fail_fast: bool,

    /// Expand each traversal level on a single thread
    #[arg(long)]
    pub jobs_sequential: bool,

    /// Report classes defined by more than one classpath root
    #[arg(long)]
    pub show_shadowed: bool,

    /// Stop once the closure grows beyond this many classes
    #[arg(long, value_name = "N")]
    pub max_classes: Option<usize>,
}

/// Arguments for the check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Classpath roots to validate instead of the configured ones
    #[arg(short = 'C', long = "classpath", value_name = "PATH")]
    pub classpath: Vec<PathBuf>,
}
