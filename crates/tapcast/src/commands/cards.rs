//! `tapcast cards`: list and remove mappings.

use serde::Serialize;
use tabled::Tabled;

use tapcast_config::{CardEntry, save_config};

use crate::cli::{CardsArgs, CardsCommand, GlobalOpts};
use crate::commands::util;
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Listing ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct CardListing<'a> {
    uid: &'a str,
    #[serde(flatten)]
    entry: &'a CardEntry,
}

#[derive(Tabled)]
struct CardRow {
    #[tabled(rename = "UID")]
    uid: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Library")]
    library: String,
    #[tabled(rename = "Mode")]
    mode: String,
}

fn to_row(c: &CardListing<'_>) -> CardRow {
    CardRow {
        uid: c.uid.to_owned(),
        kind: c.entry.kind.to_string(),
        title: c.entry.title.clone(),
        library: c.entry.to_target().library_section,
        mode: c.entry.mode.map(|m| m.to_string()).unwrap_or_default(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: CardsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load(global)?;

    match args.command {
        CardsCommand::List => {
            let listing: Vec<CardListing<'_>> = cfg
                .cards
                .iter()
                .map(|(uid, entry)| CardListing { uid, entry })
                .collect();
            let out = output::render_list(&global.output, &listing, to_row, |c| {
                c.uid.to_owned()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CardsCommand::Remove { uid } => {
            let card = util::parse_card(&uid)?;
            let Some(entry) = cfg.card(&card) else {
                return Err(CliError::NotFound {
                    resource_type: "card".into(),
                    identifier: uid,
                    hint: "List mapped cards with: tapcast cards list".into(),
                });
            };
            let prompt = format!("Remove {card} ({})?", entry.title);
            if !util::confirm(&prompt, global.yes, "cards remove")? {
                return Ok(());
            }
            cfg.remove_card(&card);
            save_config(&cfg, &config::path(global))?;
            output::print_output(&format!("Removed {card}"), global.quiet);
            Ok(())
        }
    }
}
