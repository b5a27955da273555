mod server;

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use dialoguer::{Input, theme::ColorfulTheme};
use snapsave_config::{
    SnapConfig, get_config_value, load_config, open_in_editor, resolve_host, resolve_port,
    resolve_pretty_output, resolve_timeout_secs, resolve_user_agent, set_config_value,
};
use snapsave_core::{ResolverOutcome, SnapError, SnapResult};
use snapsave_resolve::{DEFAULT_USER_AGENT, HttpSettings, Resolver};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the resolver over HTTP
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Open config file in editor
    Edit,
}

#[derive(Debug, Parser)]
#[command(name = "snapsave")]
#[command(version, about = "Resolve Facebook, Instagram, TikTok and X media links", long_about = None)]
struct Cli {
    /// Read URLs from a file, one per line
    #[arg(long)]
    input: Option<String>,
    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
    /// Print only the media URLs
    #[arg(long)]
    simple: bool,
    #[arg(value_name = "URL")]
    urls: Vec<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Some(Commands::Config { action }) = &cli.command {
        if let Err(err) = handle_config_command(action) {
            fail(err);
        }
        return;
    }

    let config = load_config().unwrap_or_else(|err| fail(err));
    let resolver = Resolver::with_settings(&http_settings(&config)).unwrap_or_else(|err| fail(err));

    if let Some(Commands::Serve { host, port }) = &cli.command {
        let host = host.clone().unwrap_or_else(|| resolve_host(&config));
        let port = port.unwrap_or_else(|| resolve_port(&config));
        if let Err(err) = server::serve(resolver, &host, port).await {
            fail(err);
        }
        return;
    }

    let urls = gather_inputs(&cli).unwrap_or_else(|err| fail(err));
    if urls.is_empty() {
        fail(SnapError::InvalidUrl("no input URLs provided".to_string()));
    }

    let pretty = cli.pretty || resolve_pretty_output(&config).unwrap_or(false);
    let mut success = 0usize;
    let mut failed = 0usize;

    for url in &urls {
        let outcome = resolver.resolve(url).await;
        if outcome.is_success() {
            success += 1;
        } else {
            failed += 1;
        }
        print_outcome(url, &outcome, cli.simple, pretty);
    }

    print_summary(success + failed, success, failed);
    if failed > 0 {
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn fail(err: SnapError) -> ! {
    eprintln!("{} {err}", style("Error:").red());
    std::process::exit(1);
}

fn http_settings(config: &SnapConfig) -> HttpSettings {
    let defaults = HttpSettings::default();
    HttpSettings {
        user_agent: resolve_user_agent(config).unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        timeout: resolve_timeout_secs(config)
            .map(Duration::from_secs)
            .or(defaults.timeout),
    }
}

fn gather_inputs(cli: &Cli) -> SnapResult<Vec<String>> {
    let mut urls = cli.urls.clone();

    if let Some(path) = &cli.input {
        let content = fs::read_to_string(path)
            .map_err(|err| SnapError::Config(format!("failed to read input file: {err}")))?;
        urls.extend(parse_lines(&content));
    }

    if urls.is_empty() {
        if io::stdin().is_terminal() {
            let input: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Post URL")
                .interact_text()
                .map_err(|err| SnapError::InvalidUrl(format!("prompt failed: {err}")))?;
            urls.extend(parse_lines(&input));
        } else {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|err| SnapError::InvalidUrl(format!("failed to read stdin: {err}")))?;
            urls.extend(parse_lines(&buffer));
        }
    }

    Ok(urls)
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.to_string())
        .collect()
}

fn handle_config_command(action: &ConfigAction) -> SnapResult<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = load_config()?;
            match get_config_value(&config, key) {
                Some(v) => println!("{} = {}", key, v),
                None => println!("{} = <null>", key),
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            set_config_value(key, value)?;
            println!("{} Set {} = {}", style("✓").green(), key, value);
            Ok(())
        }
        ConfigAction::List => {
            let config = load_config()?;
            let show = |key: &str| get_config_value(&config, key).unwrap_or_else(|| "<null>".to_string());
            println!("Current configuration:");
            println!("\n[http]");
            println!("user_agent = {}", show("http.user_agent"));
            println!("timeout_secs = {}", show("http.timeout_secs"));
            println!("\n[server]");
            println!("host = {}", show("server.host"));
            println!("port = {}", show("server.port"));
            println!("\n[output]");
            println!("pretty = {}", show("output.pretty"));
            Ok(())
        }
        ConfigAction::Edit => open_in_editor(),
    }
}

fn print_outcome(url: &str, outcome: &ResolverOutcome, simple: bool, pretty: bool) {
    if simple {
        match outcome.data() {
            Some(data) => data.media.iter().for_each(|media| println!("{}", media.url)),
            None => eprintln!(
                "{} {url}: {}",
                style("Failed").red(),
                outcome.message().unwrap_or_default()
            ),
        }
        return;
    }

    let rendered = if pretty {
        serde_json::to_string_pretty(outcome)
    } else {
        serde_json::to_string(outcome)
    };
    match rendered {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("{} {url}: {err}", style("Failed").red()),
    }
}

fn print_summary(total: usize, success: usize, failed: usize) {
    eprintln!(
        "{} Total: {} | Success: {} | Failed: {}",
        style("Summary:").bold(),
        total,
        success,
        failed
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lines_skips_blanks_and_comments() {
        let lines = parse_lines("  https://x.com/a/status/1 \n\n# later\nhttps://vm.tiktok.com/Z/\n");
        assert_eq!(
            lines,
            vec![
                "https://x.com/a/status/1".to_string(),
                "https://vm.tiktok.com/Z/".to_string()
            ]
        );
    }

    #[test]
    fn http_settings_follow_config() {
        let mut config = SnapConfig::default();
        config.http.user_agent = Some("custom-agent".to_string());
        config.http.timeout_secs = Some(7);
        let settings = http_settings(&config);
        // Environment overrides win when set; the file values apply otherwise.
        if std::env::var("SNAPSAVE_USER_AGENT").is_err() {
            assert_eq!(settings.user_agent, "custom-agent");
        }
        if std::env::var("SNAPSAVE_TIMEOUT_SECS").is_err() {
            assert_eq!(settings.timeout, Some(Duration::from_secs(7)));
        }
    }

    #[test]
    fn cli_parses_serve_command() {
        let cli = Cli::try_parse_from(["snapsave", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Some(Commands::Serve { host, port }) => {
                assert_eq!(host, None);
                assert_eq!(port, Some(8080));
            }
            other => panic!("expected serve command, got {other:?}"),
        }
    }

    #[test]
    fn cli_parses_urls_and_flags() {
        let cli = Cli::try_parse_from(["snapsave", "--simple", "https://fb.watch/abc"]).unwrap();
        assert!(cli.simple);
        assert_eq!(cli.urls, vec!["https://fb.watch/abc".to_string()]);
        assert!(cli.command.is_none());
    }
}
