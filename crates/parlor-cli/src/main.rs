//! Parlor replay binary.
//!
//! # Usage
//!
//! ```bash
//! # Member list and timeline of a recorded room
//! parlor room.json
//!
//! # Only the member list, with engine logs
//! parlor room.json --members --log-level debug
//!
//! # Queue a reply and show the request body
//! parlor room.json --send "on my way"
//! ```

use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::Parser;
use parlor_cli::{Dump, Session, render};
use parlor_core::MemoryTransport;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Parlor room dump replay
#[derive(Parser, Debug)]
#[command(name = "parlor")]
#[command(about = "Replay a recorded room and print what a client would show")]
#[command(version)]
struct Args {
    /// Path to the room dump (JSON)
    dump: PathBuf,

    /// Room id to replay the dump into
    #[arg(long, default_value = "!local:parlor")]
    room_id: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Print the member list
    #[arg(short, long)]
    members: bool,

    /// Print the timeline
    #[arg(short, long)]
    timeline: bool,

    /// Send a text message after replaying and print its request body
    #[arg(long, value_name = "BODY")]
    send: Option<String>,
}

impl Args {
    /// Neither section flag means both.
    fn sections(&self) -> (bool, bool) {
        if self.members || self.timeline { (self.members, self.timeline) } else { (true, true) }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let dump = Dump::load(&args.dump)?;
    let mut session = Session::new();
    session.open(&args.room_id)?;
    let view = session.replay(&args.room_id, dump)?;

    let (show_members, show_timeline) = args.sections();
    let mut out = io::stdout().lock();

    render::header(&mut out, view)?;
    if show_members {
        writeln!(out)?;
        render::members(&mut out, view)?;
    }
    if show_timeline {
        writeln!(out)?;
        render::timeline(&mut out, view)?;
    }

    if let Some(body) = &args.send {
        let mut transport = MemoryTransport::new();
        let txn_id = session.send(&args.room_id, body, &mut transport)?;
        for message in transport.take_sent() {
            writeln!(out)?;
            writeln!(out, "PUT /rooms/{}/send/m.room.message/{txn_id}", message.room_id)?;
            writeln!(out, "{}", message.body_json()?)?;
        }
    }

    Ok(())
}
