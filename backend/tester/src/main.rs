//! Fires concurrent votes from many sessions at a running server and checks that none were lost.
use anyhow::{Context, bail};
use catalog::{
    payloads::{PerkView, VoteResponse},
    perks::PerkId,
    votes::VoteState,
};
use clap::Parser;
use reqwest::{Client, StatusCode};
use tokio::task::JoinSet;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Perk to vote on
    #[arg(long)]
    perk: PerkId,

    /// Number of independent sessions
    #[arg(long, default_value_t = 100)]
    sessions: usize,

    /// Vote a second time from every session, which should take every vote back
    #[arg(long)]
    toggle: bool,

    #[arg(long, default_value = "http://127.0.0.1:1111")]
    server: String,
}

async fn score(client: &Client, server: &str, perk: PerkId) -> anyhow::Result<i64> {
    let view: PerkView = client
        .get(format!("{server}/api/perks/{perk}"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(view.votes)
}

async fn upvote(client: &Client, server: &str, perk: PerkId) -> anyhow::Result<VoteResponse> {
    let response = client
        .post(format!("{server}/api/perks/{perk}/upvote"))
        .send()
        .await?
        .error_for_status()?;

    if response.status() == StatusCode::NO_CONTENT {
        bail!("Perk {perk} does not exist");
    }

    Ok(response.json().await?)
}

async fn session(server: String, perk: PerkId, toggle: bool) -> anyhow::Result<VoteState> {
    let client = Client::builder().cookie_store(true).build()?;

    let mut state = upvote(&client, &server, perk).await?.state;
    if toggle {
        state = upvote(&client, &server, perk).await?.state;
    }

    Ok(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let observer = Client::new();
    let before = score(&observer, &args.server, args.perk)
        .await
        .context("Failed to read starting score")?;
    println!("Starting score: {before}");

    let mut sessions = JoinSet::new();
    for _ in 0..args.sessions {
        sessions.spawn(session(args.server.clone(), args.perk, args.toggle));
    }

    let expected_state = if args.toggle {
        VoteState::NoVote
    } else {
        VoteState::Upvoted
    };

    let mut wrong_states = 0;
    while let Some(result) = sessions.join_next().await {
        if result?? != expected_state {
            wrong_states += 1;
        }
    }

    let after = score(&observer, &args.server, args.perk).await?;
    let expected = before + if args.toggle { 0 } else { args.sessions as i64 };

    println!("Final score: {after} (expected {expected})");
    println!("Sessions not ending {expected_state}: {wrong_states}");

    if after != expected || wrong_states > 0 {
        bail!("Votes were lost");
    }

    Ok(())
}
