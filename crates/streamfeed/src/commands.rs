// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand execution.

use serde_json::{Map, Value};
use streamfeed_auth::{Action, Resource, TokenSigner};
use streamfeed_client::{StreamClient, resolve_credentials};
use streamfeed_config::StreamConfig;
use streamfeed_core::{Activity, FeedRef, MarkRead, PaginationQuery, SignedToken, StreamError};
use tracing::debug;

use crate::{ActionArg, Commands, TokenCommand};

impl From<ActionArg> for Action {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Read => Action::Read,
            ActionArg::Write => Action::Write,
            ActionArg::Delete => Action::Delete,
            ActionArg::All => Action::All,
        }
    }
}

pub async fn run(command: Commands, config: &StreamConfig) -> Result<(), StreamError> {
    match command {
        Commands::Token { kind } => {
            let token = sign(kind, config)?;
            println!("{}", token.as_str());
        }
        Commands::RedirectUrl { target, events } => {
            let events: Vec<Map<String, Value>> = serde_json::from_str(&events)?;
            let client = StreamClient::from_config(config)?;
            println!("{}", client.create_redirect_url(&target, &events)?);
        }
        Commands::Activities {
            feed,
            limit,
            offset,
            id_lt,
            id_gt,
            ranking,
            mark_read,
        } => {
            let query = PaginationQuery {
                offset,
                limit,
                id_lt,
                id_gt,
                ranking,
                mark_read: mark_read.then_some(MarkRead::All),
                ..PaginationQuery::default()
            };
            let client = StreamClient::from_config(config)?;
            let response = client
                .feed_ref(FeedRef::parse(&feed)?)
                .get_activities(&query)
                .await?;
            print_json(&response.body)?;
        }
        Commands::Add { feed, activity } => {
            let activity: Activity = serde_json::from_str(&activity)?;
            let client = StreamClient::from_config(config)?;
            let response = client
                .feed_ref(FeedRef::parse(&feed)?)
                .add_activity(&activity)
                .await?;
            print_json(&response.body)?;
        }
    }
    Ok(())
}

fn sign(kind: TokenCommand, config: &StreamConfig) -> Result<SignedToken, StreamError> {
    let (_key, secret) = resolve_credentials(config)?;
    let signer = TokenSigner::new(&secret);
    debug!(command = ?kind, "signing token");
    match kind {
        TokenCommand::Readonly { feed } => signer.readonly_token(&FeedRef::parse(&feed)?),
        TokenCommand::Feed {
            feed,
            action,
            resource: None,
        } => signer.feed_token(&FeedRef::parse(&feed)?, action.into()),
        TokenCommand::Feed {
            feed,
            action,
            resource: Some(resource),
        } => signer.feed_resource_token(
            &FeedRef::parse(&feed)?,
            Resource::parse(&resource)?,
            action.into(),
        ),
        TokenCommand::Resource { resource, action } => {
            signer.resource_token(Resource::parse(&resource)?, action.into())
        }
        TokenCommand::App => signer.application_token(),
    }
}

fn print_json(value: &Value) -> Result<(), StreamError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
