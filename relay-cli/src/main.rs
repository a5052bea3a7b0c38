//! relay-cli: smoke-test client for the relay server
//!
//! Builds the same row-insert notification the database trigger would send
//! and posts it to a running relay, so the whole path to the external endpoint
//! can be exercised from a terminal.
//!
//! # Subcommands
//! - `send --conversation <id> --content <text> [--role <role>] [--json]`: post a notification
//! - `status`: show server health

use clap::{Parser, Subcommand};
use relay_core::{InboundNotification, MessageRecord, ASSISTANT_ROLE};

const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "relay-cli",
    version,
    about = "Send synthetic message-insert notifications to a running relay"
)]
struct Cli {
    /// Relay HTTP server URL (overrides RELAY_HTTP_URL env var)
    #[arg(long, env = "RELAY_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Post a row-insert notification for a new message
    Send {
        /// Conversation the message belongs to
        #[arg(long)]
        conversation: String,

        /// Message content forwarded as user_input
        #[arg(long)]
        content: String,

        /// Author role; only "assistant" is forwarded
        #[arg(long, default_value = ASSISTANT_ROLE)]
        role: String,

        /// Message id (random UUID when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Print the raw JSON response body
        #[arg(long)]
        json: bool,
    },

    /// Show relay server status
    Status,
}

// ============================================================================
// Notification construction
// ============================================================================

/// Build a notification shaped like the one the messages trigger emits.
pub fn build_notification(
    id: String,
    conversation_id: String,
    role: String,
    content: String,
    created_at: String,
) -> InboundNotification {
    InboundNotification {
        record: MessageRecord {
            id,
            conversation_id,
            role,
            content,
            created_at,
        },
        kind: Some("INSERT".to_string()),
        table: Some("messages".to_string()),
        schema: Some("public".to_string()),
        old_record: None,
    }
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

fn do_send(server: &str, notification: &InboundNotification, json_output: bool) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(120))
        .build()?;

    let url = format!("{}/", server);
    let resp = match client.post(&url).json(notification).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("relay-cli: connection failed to {}: {}", url, e);
            std::process::exit(1);
        }
    };

    let status = resp.status();
    let body = resp.text().unwrap_or_default();

    if json_output {
        println!("{}", body);
    } else {
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
        println!("HTTP {}", status.as_u16());
        if let Some(message) = parsed["message"].as_str() {
            println!("Message: {}", message);
        }
        if let Some(result) = parsed["gcfResult"].as_str() {
            println!("Result:  {}", result);
        }
        if let Some(error) = parsed["error"].as_str() {
            println!("Error:   {}", error);
        }
    }

    if !status.is_success() {
        std::process::exit(1);
    }

    Ok(())
}

/// Show the server status by calling GET /health.
fn do_status(server: &str) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    let url = format!("{}/health", server);

    match client.get(&url).send() {
        Ok(r) if r.status().is_success() => {
            let body: serde_json::Value = r.json().unwrap_or_default();
            println!("Relay server: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:      {}", body["version"].as_str().unwrap_or("?"));
            let configured = body["endpoint_configured"].as_bool().unwrap_or(false);
            println!("Endpoint:     {}", if configured { "configured" } else { "MISSING" });
        }
        Ok(r) => {
            eprintln!("relay-cli: server unhealthy (HTTP {})", r.status());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("relay-cli: cannot reach {}: {}", url, e);
            std::process::exit(1);
        }
    }

    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match cli.command {
        Commands::Send {
            conversation,
            content,
            role,
            id,
            json,
        } => {
            let notification = build_notification(
                id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                conversation,
                role,
                content,
                chrono::Utc::now().to_rfc3339(),
            );
            do_send(&server, &notification, json)
        }
        Commands::Status => do_status(&server),
    };

    if let Err(e) = result {
        eprintln!("relay-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
