use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for the `mailsort` binary.
#[derive(Debug, Parser)]
#[command(name = "mailsort", version, about = "Automatic email categorization pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Label an export and write the report.
    Run {
        /// JSON file or directory of JSON files.
        input: PathBuf,
        /// Where to write the report.
        output: PathBuf,
    },
    /// Process one storage queue event naming an export blob.
    ProcessEvent {
        /// File holding the queue message (JSON or base64 JSON).
        message_file: PathBuf,
        /// Local directory mirroring the input container.
        #[arg(long)]
        input_dir: PathBuf,
        /// Directory receiving `<blob>.classified.json`.
        #[arg(long)]
        output_dir: PathBuf,
        /// Input container name as it appears in blob URLs.
        #[arg(long, default_value = "input-email")]
        container: String,
    },
    /// Serve health checks over HTTP.
    Serve {
        /// Listen port (defaults to `server.port`).
        #[arg(long)]
        port: Option<u16>,
    },
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::{Cli, Commands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_takes_two_positionals() {
        let cli = Cli::try_parse_from(["mailsort", "--verbose", "run", "in.json", "out.json"])
            .expect("cli should parse");
        assert!(cli.verbose);
        let Commands::Run { input, output } = cli.command else {
            panic!("expected run");
        };
        assert_eq!(input, PathBuf::from("in.json"));
        assert_eq!(output, PathBuf::from("out.json"));
    }

    #[test]
    fn process_event_defaults_container() {
        let cli = Cli::try_parse_from([
            "mailsort",
            "process-event",
            "msg.txt",
            "--input-dir",
            "in",
            "--output-dir",
            "out",
        ])
        .expect("cli should parse");
        let Commands::ProcessEvent { container, .. } = cli.command else {
            panic!("expected process-event");
        };
        assert_eq!(container, "input-email");
    }

    #[test]
    fn serve_port_is_optional() {
        let cli = Cli::try_parse_from(["mailsort", "-q", "serve"]).expect("cli should parse");
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Serve { port: None }));
    }
}
