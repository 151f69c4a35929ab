//! Decodes MessagePack-RPC requests and prints them.
//!
//! With a file argument, the file must hold exactly one request envelope. Otherwise stdin is read as
//! a stream of back-to-back envelopes and each request is printed as soon as it is complete.

use anyhow::{Context, Result};
use clap::{crate_version, App, Arg};
use futures_util::TryStreamExt;
use log::*;
use tokio::fs;
use tokio::io;
use tokio_util::codec::FramedRead;

use rpc_envelope::{decode_request, Decoder, DEFAULT_MAX_MESSAGE_SIZE};

static LOG_CONFIG: &str = "config/log.yaml";

static ABOUT: &str = r"
Decodes MessagePack-RPC request envelopes ([kind, id, method, params]) and prints them. Reads a
single envelope from FILE, or a stream of envelopes from stdin.

Supported methods:

    Profile.LoginWithPassword(username: String, password: String, bytes: Bytes)
    Profile.LoginWithToken(token: String)
";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    log_panics::init();

    let matches = App::new("rpc-envelope")
        .version(crate_version!())
        .about(ABOUT)
        .arg(
            Arg::with_name("log-config")
                .long("log-config")
                .value_name("path")
                .help("A log4rs configuration file. Defaults to config/log.yaml.")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("max-message-size")
                .long("max-message-size")
                .value_name("bytes")
                .help(
                    "The most bytes buffered for a single envelope read from stdin before \
                   giving up on it.",
                )
                .takes_value(true),
        )
        .arg(
            Arg::with_name("file")
                .value_name("FILE")
                .help("A file holding exactly one request envelope. Reads stdin when omitted."),
        )
        .get_matches();

    let log_config = matches.value_of("log-config").unwrap_or(LOG_CONFIG);
    if let Err(e) = log4rs::init_file(log_config, Default::default()) {
        eprintln!("logging disabled: unable to load {}: {}", log_config, e);
    }

    if let Some(path) = matches.value_of("file") {
        let buf = fs::read(path)
            .await
            .with_context(|| format!("unable to read {}", path))?;
        let request =
            decode_request(&buf).with_context(|| format!("unable to decode {}", path))?;

        info!("decoded request {} ({}) from {}", request.id(), request.method(), path);
        println!("{:#?}", request);
        return Ok(());
    }

    let max_message_size = match matches.value_of("max-message-size") {
        Some(size) => size
            .parse::<usize>()
            .with_context(|| format!("invalid --max-message-size {:?}", size))?,
        None => DEFAULT_MAX_MESSAGE_SIZE,
    };

    let stdin = io::stdin();
    let mut requests = FramedRead::new(stdin, Decoder::with_max_message_size(max_message_size));

    while let Some(request) = requests
        .try_next()
        .await
        .context("unable to decode request from stdin")?
    {
        info!("decoded request {} ({})", request.id(), request.method());
        println!("{:#?}", request);
    }

    Ok(())
}
