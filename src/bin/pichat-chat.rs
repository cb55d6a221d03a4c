//! Interactive chat application for conversing with DeepSeek models.
//!
//! This binary provides a streaming REPL interface for chatting via the
//! DeepSeek chat-completions API.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with default settings
//! pichat-chat
//!
//! # Specify a model
//! pichat-chat --model deepseek-reasoner
//!
//! # Disable streaming and colors (useful for piping output)
//! pichat-chat --no-stream --no-color
//! ```
//!
//! The API key is read from the config file (see `pichat-config`) or the
//! DEEPSEEK_API_KEY environment variable.
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/clear` - Clear conversation history
//! - `/model <name>` - Change the model
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use pichat::chat::{
    ChatArgs, ChatCommand, ChatConfig, PlainTextRenderer, Renderer, help_text, parse_command,
};
use pichat::{ChatSession, CompletionOptions, ConfigStore, DeepSeek, Model};

/// Main entry point for the pichat-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("pichat-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    let use_color = config.use_color;

    let store = match &config.config_path {
        Some(path) => ConfigStore::at(path.clone()),
        None => ConfigStore::open_default(),
    };

    // The config file wins over the environment; DeepSeek::new(None) falls
    // back to DEEPSEEK_API_KEY.
    let client = match DeepSeek::new(store.api_key()) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("Set a key with: pichat-config --set-key <KEY>");
            std::process::exit(1);
        }
    };

    // Remember the resolved startup temperature so /temperature clear
    // restores what the user asked for, not a hardcoded default.
    let startup_temperature = config.temperature;
    let options = CompletionOptions::new()
        .with_model(config.model.clone())
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens);
    let mut session = ChatSession::new(client, options);
    let mut streaming = config.streaming;
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    // Flag for interrupt handling during streaming
    let interrupted = Arc::new(AtomicBool::new(false));

    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!("PiChat (model: {})", session.model());
    println!("Type /help for commands, /quit to exit\n");

    loop {
        // Reset interrupt flag before each input
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.clear_history();
                            renderer.print_info("Conversation cleared.");
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Model(model_name) => {
                            let model = model_name
                                .parse()
                                .unwrap_or_else(|_| Model::Custom(model_name.clone()));
                            session.set_model(model);
                            renderer.print_info(&format!("Model changed to: {}", model_name));
                        }
                        ChatCommand::Temperature(value) => {
                            session.set_temperature(value);
                            renderer.print_info(&format!("temperature set to {:.2}", value));
                        }
                        ChatCommand::ClearTemperature => {
                            session.set_temperature(startup_temperature);
                            renderer.print_info(&format!(
                                "temperature reset to {:.2}",
                                session.temperature()
                            ));
                        }
                        ChatCommand::MaxTokens(value) => {
                            session.set_max_tokens(value);
                            renderer.print_info(&format!("max_tokens set to {value}"));
                        }
                        ChatCommand::Stream(enabled) => {
                            streaming = enabled;
                            if enabled {
                                renderer.print_info("Streaming enabled.");
                            } else {
                                renderer.print_info("Streaming disabled.");
                            }
                        }
                        ChatCommand::Language(code) => match store.set_language(&code) {
                            Ok(()) => {
                                renderer.print_info(&format!("Language set to: {}", code));
                            }
                            Err(err) => {
                                renderer.print_error(&format!("Failed to save language: {}", err));
                            }
                        },
                        ChatCommand::Stats => {
                            print_stats(&session, streaming);
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to API
                println!("Assistant:");
                let reply = if streaming {
                    let flag = interrupted.clone();
                    let renderer = &mut renderer;
                    session
                        .send_streaming(line, |chunk| {
                            // A Ctrl+C mid-stream stops display; the request
                            // itself runs to completion.
                            if !flag.load(Ordering::Relaxed) {
                                renderer.print_text(chunk);
                            }
                        })
                        .await
                } else {
                    session.send(line).await
                };

                if interrupted.load(Ordering::Relaxed) {
                    renderer.print_interrupted();
                } else if pichat::codec::is_error_reply(&reply) {
                    renderer.print_error(&reply);
                } else if streaming {
                    renderer.finish_response();
                } else {
                    renderer.print_text(&reply);
                    renderer.finish_response();
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
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_stats(session: &ChatSession, streaming: bool) {
    println!("    Session Statistics:");
    println!("      Model: {}", session.model());
    println!("      Messages: {}", session.message_count());
    println!("      Temperature: {:.2}", session.temperature());
    println!("      Max tokens: {}", session.max_tokens());
    println!(
        "      Streaming: {}",
        if streaming { "on" } else { "off" }
    );
}
