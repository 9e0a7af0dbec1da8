//! Command line surface
//!
//! The command tree is declared once with clap and each subcommand carries its
//! own typed arguments and handler.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_PACKAGES_DIR;
use crate::package::{
    FsRepository, ListError, ListOptions, ListRange, list_packages, read_package_info,
};

#[derive(Debug, Parser)]
#[command(name = "check-conan-info", arg_required_else_help = true)]
#[command(
    version,
    about = "Read package data information",
    long_about = "This tool is used to read version information and parse sources data from conandata.yml files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Exit status for a command line clap did not run.
///
/// Help and version output, including the help shown for a bare invocation,
/// succeed. Everything else is a usage error.
pub fn exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        | ErrorKind::MissingSubcommand => 0,
        _ => 1,
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read information of the specified package
    Read(ReadArgs),
    /// List information for multiple packages
    ///
    /// Starts from the specified position and shows the specified number of packages.
    List(ListArgs),
}

impl Command {
    /// Run the subcommand, writing its report to `out`.
    ///
    /// Data errors are part of the report; only a failure to write is returned.
    pub fn run<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        match self {
            Command::Read(args) => args.run(out),
            Command::List(args) => args.run(out),
        }
    }
}

#[derive(Debug, Args)]
pub struct ReadArgs {
    /// Package name
    pub package: String,

    /// Directory containing package information
    #[arg(long, default_value = DEFAULT_PACKAGES_DIR)]
    pub dir: PathBuf,
}

impl ReadArgs {
    pub fn run<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        match read_package_info(&self.dir, &self.package) {
            Ok(info) => writeln!(out, "{info}"),
            Err(err) => writeln!(out, "Error: {err}"),
        }
    }
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Position of the first package to list (0-based)
    #[arg(allow_negative_numbers = true)]
    pub start: Option<String>,

    /// Number of packages to list (negative for no limit)
    #[arg(allow_negative_numbers = true)]
    pub count: Option<String>,

    /// Directory containing package information
    #[arg(long, default_value = DEFAULT_PACKAGES_DIR)]
    pub dir: PathBuf,

    /// Process all packages in the directory
    #[arg(long)]
    pub all: bool,

    /// Count how many packages have their first URL starting with https://github.com/
    #[arg(long)]
    pub count_github: bool,
}

impl ListArgs {
    /// Resolve the positional arguments into listing options
    pub fn options(&self) -> Result<ListOptions, ListError> {
        let range = if self.all {
            ListRange::all()
        } else {
            let (Some(start), Some(count)) = (&self.start, &self.count) else {
                return Err(ListError::MissingArguments);
            };
            ListRange::new(
                parse_number("start position", start)?,
                parse_number("count", count)?,
            )
        };

        Ok(ListOptions {
            range,
            count_github: self.count_github,
        })
    }

    pub fn run<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        let repository = FsRepository::new(&self.dir);
        let result = self
            .options()
            .and_then(|options| list_packages(&repository, &options, &mut *out));

        match result {
            Ok(_) => Ok(()),
            Err(ListError::Output(err)) => Err(err),
            Err(err) => writeln!(out, "Error: {err}"),
        }
    }
}

fn parse_number(name: &'static str, value: &str) -> Result<i64, ListError> {
    value
        .parse()
        .map_err(|source| ListError::InvalidArgument { name, source })
}
