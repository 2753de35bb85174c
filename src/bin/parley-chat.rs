//! Interactive terminal chat against a JSON reply endpoint.
//!
//! # Usage
//!
//! ```bash
//! # Endpoint from the environment
//! PARLEY_ENDPOINT=http://localhost:8080/chat parley-chat
//!
//! # Explicit endpoint and a request timeout
//! parley-chat --endpoint https://example.com/reply --timeout-secs 30
//!
//! # Disable colors (useful for piping output)
//! parley-chat --no-color --no-greeting
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/history` - Show the whole conversation
//! - `/stats` - Show session statistics
//! - `/config` - Show the current configuration
//! - `/quit` - Exit the application

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use parley::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, help_text,
    parse_command,
};
use parley::render::PROMPT;
use parley::{ReplyClient, ReplyEndpoint};

/// Main entry point for the parley-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("parley-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    init_logging(config.verbose);

    let mut session = ChatSession::new(&config)?;
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    println!("Parley chat (endpoint: {})", session.endpoint().describe());
    println!("Type /help for commands, /quit to exit\n");
    renderer.print_transcript(session.messages());

    loop {
        // The prompt is only offered between request cycles, so nothing can
        // be sent while a reply is awaited.
        let readline = rl.readline(PROMPT);

        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line.as_str());

                if let Some(cmd) = parse_command(&line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::History => {
                            renderer.print_transcript(session.messages());
                        }
                        ChatCommand::Stats => {
                            print_stats(&session);
                        }
                        ChatCommand::ShowConfig => {
                            print_config(&session, &config);
                        }
                        ChatCommand::Draft => {
                            if session.draft().is_empty() {
                                renderer.print_info("Draft is empty.");
                            } else {
                                renderer.print_info(&format!("Draft: {}", session.draft()));
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                session.update_draft(line);
                session.submit(&mut renderer).await;
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - discard the line
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("parley=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_stats(session: &ChatSession<ReplyClient>) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Endpoint: {}", stats.endpoint);
    println!("      Messages: {}", stats.message_count);
    println!(
        "      Requests: {} ({} answered, {} empty, {} failed)",
        stats.total_requests, stats.answered, stats.empty_replies, stats.failures
    );
    println!("      Rejected sends: {}", stats.rejected_submits);
}

fn print_config(session: &ChatSession<ReplyClient>, config: &ChatConfig) {
    println!("    Current Configuration:");
    println!("      Endpoint: {}", session.endpoint().endpoint());
    match session.endpoint().timeout() {
        Some(timeout) => println!("      Timeout: {}s", timeout.as_secs_f64()),
        None => println!("      Timeout: (none)"),
    }
    match config.greeting.as_deref() {
        Some(greeting) => println!("      Greeting: {}", greeting),
        None => println!("      Greeting: (none)"),
    }
    println!(
        "      Colors: {}",
        if config.use_color { "on" } else { "off" }
    );
}
