// Legend for various fix-this comments:
//   * "TODO" - bug or missing crucial feature.
//   * "Improvement potential" - missing nice-to-have feature or an opportunity
//       to make code better or faster.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod network;
pub mod tui;

mod client_main;
mod decode_main;

use anyhow::Context;
use clap::{Command, arg};
use connect_four_client::config::ClientConfig;
use connect_four_client::session::SessionParams;


fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        // Stdout is taken by the board.
        .target(env_logger::Target::Stderr)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Connect Four")
        .version(clap::crate_version!())
        .about("Connect Four console client")
        .subcommand_required(true)
        .subcommand(
            Command::new("client")
                .about("Connect to a game server and play")
                .arg(arg!(
                    [server_url] "Websocket URL of the game server, e.g. ws://localhost:8001/"
                ))
                .arg(arg!(
                    -c --config <config_file>
                    "Path to the configuration file: yaml-serialized ClientConfig."
                ))
                .arg(arg!(-j --join <join> "Game to join: either a join ID or a full join link")),
        )
        .subcommand(
            Command::new("decode").about(concat!(
                "Reads server messages from stdin, one per line, ",
                "and prints how they decode."
            )),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("client", sub_matches)) => {
            let mut config = match sub_matches.get_one::<String>("config") {
                Some(filename) => read_config_file(filename)?,
                None => ClientConfig::default(),
            };
            if let Some(server_url) = sub_matches.get_one::<String>("server_url") {
                config.server_url = server_url.clone();
            }
            let session = match sub_matches.get_one::<String>("join") {
                Some(join) => session_from_join_arg(join),
                None => SessionParams::default(),
            };
            client_main::run(config, session)
        }
        Some(("decode", _)) => decode_main::run(),
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}

fn read_config_file(filename: &str) -> anyhow::Result<ClientConfig> {
    let contents = std::fs::read_to_string(filename)
        .with_context(|| format!("Cannot read config file {filename}"))?;
    serde_yaml::from_str(&contents).with_context(|| format!("Cannot parse config file {filename}"))
}

// Join links are shared without a scheme ("host:port/?join=..."), so both forms are accepted
// alongside a bare ID.
fn session_from_join_arg(join: &str) -> SessionParams {
    if !join.contains('?') {
        return SessionParams::new(Some(join.to_owned()));
    }
    if join.contains("://") {
        SessionParams::from_page_url(join)
    } else {
        SessionParams::from_page_url(&format!("http://{join}"))
    }
}
