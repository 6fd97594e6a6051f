pub mod process_event;
pub mod run;
pub mod serve;

use ms_config::MailsortConfig;

use crate::cli::Commands;

/// Dispatch a parsed command to its handler.
pub async fn dispatch(command: Commands, config: &MailsortConfig) -> anyhow::Result<()> {
    match command {
        Commands::Run { input, output } => run::handle(&input, &output, config).await,
        Commands::ProcessEvent {
            message_file,
            input_dir,
            output_dir,
            container,
        } => {
            process_event::handle(&message_file, &input_dir, &output_dir, &container, config).await
        }
        Commands::Serve { port } => serve::handle(port.unwrap_or(config.server.port)).await,
    }
}
