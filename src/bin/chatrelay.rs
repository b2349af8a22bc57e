//! Interactive terminal chat against a `POST /chat` server.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a server on the default http://127.0.0.1:5000/
//! chatrelay
//!
//! # Point at another server and greet the user on start
//! chatrelay --url http://chat.example.com/ --greeting "Hello! How can I help you today?"
//!
//! # Disable colors (useful for piping output)
//! chatrelay --no-color
//! ```
//!
//! Set `RUST_LOG=chatrelay=debug` to see request details on stderr.
//!
//! # Commands
//!
//! - `/history` - Show the conversation so far
//! - `/stats` - Show session statistics
//! - `/help` - Show available commands
//! - `/quit` - Exit the application

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use chatrelay::ChatClient;
use chatrelay::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatController, TerminalView, help_text, parse_command,
};

/// Main entry point for the chatrelay application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("chatrelay [OPTIONS]");
    let config = ChatConfig::from(args);
    tracing::debug!(?config, "configuration loaded");

    let client = ChatClient::with_options(config.base_url.clone(), config.timeout)?;
    let view = TerminalView::with_color(config.bot_name.clone(), config.use_color).echo_user(false);
    let mut rl = DefaultEditor::new()?;

    println!("Chat with {} ({})", config.bot_name, client.endpoint());
    println!("Type /help for commands, /quit to exit\n");

    let mut session = ChatController::attach(client, view, config);

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                if let Some(cmd) = parse_command(&line) {
                    let _ = rl.add_history_entry(line.trim());
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
                        ChatCommand::History => print_history(&mut session),
                        ChatCommand::Stats => print_stats(&session),
                        ChatCommand::Invalid(message) => {
                            session.view_mut().print_error(&message);
                        }
                    }
                    continue;
                }

                if session.submit(&line).await.is_turn() {
                    let _ = rl.add_history_entry(line.trim());
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                session
                    .view_mut()
                    .print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_history(session: &mut ChatController<ChatClient, TerminalView>) {
    if session.message_count() == 0 {
        session.view_mut().print_info("    (no messages yet)");
        return;
    }
    let messages: Vec<_> = session.messages().cloned().collect();
    session.view_mut().print_history(&messages);
}

fn print_stats(session: &ChatController<ChatClient, TerminalView>) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Bot: {}", session.config().bot_name);
    println!("      Messages: {}", stats.message_count);
    println!(
        "      Turns: {} ({} replied, {} failed)",
        stats.turns, stats.replies, stats.failures
    );
    println!("      Ignored inputs: {}", stats.ignored);
    match session.config().timeout {
        Some(timeout) => println!("      Timeout: {}s", timeout.as_secs()),
        None => println!("      Timeout: (none)"),
    }
}
