use anyhow::Context;
use clap::ArgMatches;
use hn_client::{Config, Error, HnClient, Item, Mode, Payload, Updates, User};
use log::{debug, warn};
use serde::Serialize;
use std::io::Write;

fn mode(sub: &ArgMatches) -> Mode {
    if sub.get_flag("raw") {
        Mode::Raw
    } else {
        Mode::Typed
    }
}

fn config(matches: &ArgMatches) -> anyhow::Result<Config> {
    let mut cfg = Config::from_env()?;
    if let Some(url) = matches.get_one::<String>("base-url") {
        cfg = cfg.with_api_url(url)?;
    }
    if let Some(ms) = matches.get_one::<u64>("interval-ms") {
        cfg = cfg.with_min_interval_ms(*ms);
    }
    Ok(cfg)
}

pub fn run(matches: &ArgMatches, out: &mut impl Write) -> anyhow::Result<()> {
    let Some((name, sub)) = matches.subcommand() else {
        crate::cli::build_cli().write_help(out)?;
        return Ok(());
    };
    let cfg = config(matches)?;
    let client = HnClient::new(&cfg).context("building HTTP client")?;
    debug!("dispatching {}", name);

    match name {
        "item" => {
            let id = sub.get_one::<String>("id").map(String::as_str).unwrap_or_default();
            let payload = client.get_item(id, mode(sub))?;
            print_payload(out, &payload, write_item)
        }
        "user" => {
            let name = sub
                .get_one::<String>("name")
                .map(String::as_str)
                .unwrap_or_default();
            let payload = client.get_user(name, mode(sub))?;
            print_payload(out, &payload, write_user)
        }
        "top" => {
            let ids = client.get_top_stories()?;
            let limit = sub.get_one::<usize>("limit").copied().unwrap_or(ids.len());
            for id in ids.iter().take(limit) {
                writeln!(out, "{}", id)?;
            }
            Ok(())
        }
        "max-item" => {
            writeln!(out, "{}", client.get_max_item()?)?;
            Ok(())
        }
        "updates" => {
            let payload = client.get_recent_updates(mode(sub))?;
            print_payload(out, &payload, write_updates)
        }
        "top-stories" => top_stories(&client, sub.get_one::<usize>("limit").copied(), out),
        other => anyhow::bail!("unknown command: {}", other),
    }
}

fn print_payload<T, W, F>(out: &mut W, payload: &Payload<T>, summary: F) -> anyhow::Result<()>
where
    T: Serialize,
    W: Write,
    F: FnOnce(&mut W, &T) -> std::io::Result<()>,
{
    match payload {
        Payload::Typed(v) => summary(out, v)?,
        Payload::Raw(_) => {
            let json = serde_json::to_string_pretty(&payload.to_value()?)?;
            writeln!(out, "{}", json)?
        }
    }
    Ok(())
}

fn or_dash(v: Option<&str>) -> &str {
    v.unwrap_or("-")
}

fn write_item<W: Write>(out: &mut W, item: &Item) -> std::io::Result<()> {
    writeln!(out, "Title: {}", or_dash(item.title.as_deref()))?;
    writeln!(out, "Submitted by: {}", or_dash(item.by.as_deref()))?;
    writeln!(out, "Url: {}", or_dash(item.url.as_deref()))?;
    match item.id {
        Some(id) => writeln!(out, "Id: {}", id),
        None => writeln!(out, "Id: -"),
    }
}

fn write_user<W: Write>(out: &mut W, user: &User) -> std::io::Result<()> {
    writeln!(out, "Id: {}", or_dash(user.id.as_deref()))?;
    if let Some(karma) = user.karma {
        writeln!(out, "Karma: {}", karma)?;
    }
    if let Some(created) = user.created_at() {
        writeln!(out, "Created: {}", created.to_rfc3339())?;
    }
    Ok(())
}

fn write_updates<W: Write>(out: &mut W, updates: &Updates) -> std::io::Result<()> {
    let items = updates.items.as_deref().unwrap_or_default();
    let profiles = updates.profiles.as_deref().unwrap_or_default();
    writeln!(out, "Items ({}):", items.len())?;
    for id in items {
        writeln!(out, "  {}", id)?;
    }
    writeln!(out, "Profiles ({}):", profiles.len())?;
    for name in profiles {
        writeln!(out, "  {}", name)?;
    }
    Ok(())
}

fn top_stories(
    client: &HnClient,
    limit: Option<usize>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let rule = "-".repeat(40);
    writeln!(out, "{}", rule)?;
    writeln!(out, "\tHacker News Top Stories")?;
    writeln!(out, "{}", rule)?;
    writeln!(out)?;
    let ids = client.get_top_stories()?;
    let limit = limit.unwrap_or(ids.len());
    for id in ids.into_iter().take(limit) {
        match client.item(id) {
            Ok(story) => write_item(out, &story)?,
            // Stories can vanish between listing and fetching
            Err(Error::NotFound { .. }) => warn!("top story {} disappeared; skipping", id),
            Err(e) => return Err(e.into()),
        }
    }
    writeln!(out, "{}", rule)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_summary_uses_dashes_for_missing_fields() {
        let item = Item {
            id: Some(8863),
            title: Some("My YC app: Dropbox".into()),
            ..Item::default()
        };
        let mut buf = Vec::new();
        write_item(&mut buf, &item).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Title: My YC app: Dropbox\nSubmitted by: -\nUrl: -\nId: 8863\n"
        );
    }

    #[test]
    fn updates_summary_counts() {
        let updates = Updates {
            items: Some(vec![1, 2]),
            profiles: None,
            ..Updates::default()
        };
        let mut buf = Vec::new();
        write_updates(&mut buf, &updates).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Items (2):\n  1\n  2\n"));
        assert!(text.ends_with("Profiles (0):\n"));
    }
}
