#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use henry_assistant::{Assistant, ChatContext, Conversation, GenerationParams, MockAssistant};
use henry_auth::{AuthError, AuthService, ProfileFields};
use henry_common::logging::init_logging_with_exclusions;
use henry_common::{Config, Locale, Role};
use serde::Serialize;
use serde_json::Value;

/// HENRY - accounts and a teaching assistant, from the terminal.
///
/// Every invocation starts from the seeded demo directory; nothing persists
/// between runs.
#[derive(Parser, Debug)]
#[command(name = "henry")]
#[command(version = "0.1.0")]
#[command(about = "HENRY platform core: accounts, sessions and the teaching assistant.", long_about = None)]
struct Cli {
    /// Config file (default: ~/.henry/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip every simulated delay
    #[arg(long, global = true)]
    no_latency: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the accounts in the directory
    Accounts,

    /// Sign in and print the identity and profile
    SignIn {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Create an account and sign it in
    SignUp {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Full name, also used as display name
        #[arg(short, long)]
        name: Option<String>,

        /// teacher, student or admin (Spanish tags accepted)
        #[arg(short, long)]
        role: Option<String>,

        /// Extra profile fields as key=value
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },

    /// Talk to the assistant. Without a message, reads lines from stdin.
    Chat {
        /// Role tag of the user
        #[arg(short, long, default_value = "student")]
        role: String,

        /// Full name of the user
        #[arg(short, long)]
        name: Option<String>,

        message: Vec<String>,
    },

    /// Generate structured content
    Generate {
        /// presentation, quiz, lesson_plan or summary
        kind: String,

        topic: String,

        #[arg(long)]
        duration: Option<String>,

        #[arg(long)]
        audience: Option<String>,

        #[arg(long)]
        difficulty: Option<String>,
    },

    /// Check the assistant connection
    Status,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_with_env(cli.config.as_deref())?;
    if cli.no_latency {
        config.disable_latency();
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn auth_failure(err: AuthError, locale: Locale) -> anyhow::Error {
    anyhow!("{} ({})", err.user_message(locale), err.code())
}

fn parse_fields(pairs: &[String]) -> Result<ProfileFields> {
    let mut fields = ProfileFields::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Expected KEY=VALUE, got `{pair}`"))?;
        let key = key.trim();
        if key.is_empty() {
            bail!("Empty field name in `{pair}`");
        }
        fields.insert(key.to_string(), Value::from(value.trim()));
    }
    Ok(fields)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging_with_exclusions(
        &config.observability.log_level,
        &config.observability.log_format,
        &config.observability.excluded_targets,
    );

    let locale = config.locale;

    match cli.command {
        Commands::Accounts => {
            let auth = AuthService::from_config(&config.auth).map_err(|e| auth_failure(e, locale))?;
            print_json(&auth.directory().list().await)
        }

        Commands::SignIn { email, password } => {
            let auth = AuthService::from_config(&config.auth).map_err(|e| auth_failure(e, locale))?;
            let identity = auth
                .sign_in(&email, &password)
                .await
                .map_err(|e| auth_failure(e, locale))?;
            let profile = auth.current_profile().await;
            print_json(&serde_json::json!({ "user": identity, "profile": profile }))
        }

        Commands::SignUp {
            email,
            password,
            name,
            role,
            fields,
        } => {
            let mut form = parse_fields(&fields)?;
            if let Some(name) = name {
                form.insert("fullName".into(), Value::from(name));
            }
            if let Some(role) = role {
                form.insert("role".into(), Value::from(role));
            }

            let auth = AuthService::from_config(&config.auth).map_err(|e| auth_failure(e, locale))?;
            let identity = auth
                .sign_up(&email, &password, form)
                .await
                .map_err(|e| auth_failure(e, locale))?;
            print_json(&identity)
        }

        Commands::Chat {
            role,
            name,
            message,
        } => {
            let assistant = MockAssistant::new(config.assistant.clone());
            if message.is_empty() {
                return chat_loop(&assistant, &role, name.as_deref()).await;
            }
            let context = ChatContext {
                user_name: name
                    .as_deref()
                    .and_then(|n| n.split_whitespace().next())
                    .map(str::to_string),
            };
            let reply = assistant
                .respond(&message.join(" "), &role, &context)
                .await
                .map_err(|e| anyhow!(e.user_message(locale)))?;
            print_json(&reply)
        }

        Commands::Generate {
            kind,
            topic,
            duration,
            audience,
            difficulty,
        } => {
            let assistant = MockAssistant::new(config.assistant.clone());
            let params = GenerationParams {
                duration,
                audience,
                difficulty,
            };
            let generated = assistant
                .generate_content(&kind, &topic, &params)
                .await
                .map_err(|e| anyhow!(e.user_message(locale)))?;
            print_json(&generated)
        }

        Commands::Status => {
            let assistant = MockAssistant::new(config.assistant.clone());
            let status = assistant
                .check_connection()
                .await
                .map_err(|e| anyhow!(e.user_message(locale)))?;
            print_json(&status)
        }
    }
}

/// Read messages from stdin until EOF, printing each reply.
async fn chat_loop(assistant: &MockAssistant, role: &str, name: Option<&str>) -> Result<()> {
    let role = Role::parse_or_default(role);
    let mut conversation = Conversation::new(role, name);
    let mut stdout = io::stdout();

    if let Some(welcome) = conversation.last() {
        writeln!(stdout, "{}\n", welcome.content)?;
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        if let Some(reply) = conversation.send(assistant, &line).await {
            writeln!(stdout, "{}\n", reply.content)?;
            stdout.flush()?;
        }
    }

    tracing::debug!(messages = conversation.messages().len(), "Chat ended");
    Ok(())
}
