//! Handlers for `list`, `show`, `create`, `rename` and `delete`.

use dialoguer::{theme::ColorfulTheme, Confirm};
use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::output;
use crate::application::editor::EditSession;
use crate::domain::{Event, EventDraft, EventId};
use crate::error::{Error, Result};
use crate::port::outbound::store::EventStore;

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Dialogs")]
    dialogs: usize,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id().to_string(),
            name: event.name().to_string(),
            dialogs: event.dialogs().len(),
            updated: event.updated_at().format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute `list`.
pub async fn execute_list(store: &dyn EventStore) -> Result<()> {
    let spinner = output::spinner("Loading events");
    let events = store.list().await;
    output::spinner_clear(&spinner);
    let events = events?;

    if output::is_json() {
        output::json_output(json!({
            "command": "list",
            "events": events,
        }));
        return Ok(());
    }

    if events.is_empty() {
        output::note("No events yet.");
        output::hint(&format!(
            "run {} to add one",
            output::highlight("sceneboard create --name <NAME>")
        ));
        return Ok(());
    }

    let rows: Vec<EventRow> = events.iter().map(EventRow::from).collect();
    output::lines(&Table::new(rows).to_string());
    Ok(())
}

/// Execute `show`.
pub async fn execute_show(store: &dyn EventStore, id: &str) -> Result<()> {
    let event = fetch(store, id).await?;
    print_event(&event);
    Ok(())
}

/// Execute `create`.
pub async fn execute_create(store: &dyn EventStore, name: Option<String>) -> Result<()> {
    let draft = EventDraft {
        name,
        ..EventDraft::default()
    };
    let event = store.create(draft).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "create",
            "event": event,
        }));
        return Ok(());
    }

    output::action_done("Created", &format!("{} ({})", event.name(), event.id()));
    output::hint(&format!(
        "run {} to add dialogs",
        output::highlight(format!("sceneboard edit {}", event.id()))
    ));
    Ok(())
}

/// Execute `rename` through an edit session.
pub async fn execute_rename(store: &dyn EventStore, id: &str, name: &str) -> Result<()> {
    let mut session = EditSession::open(store, &EventId::new(id)).await?;
    session.rename(name);
    let event = session.save(store).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "rename",
            "event": event,
        }));
        return Ok(());
    }

    output::action_done("Renamed", &format!("{} to {}", event.id(), event.name()));
    Ok(())
}

/// Execute `delete`, asking first unless `yes` is set.
pub async fn execute_delete(store: &dyn EventStore, id: &str, yes: bool) -> Result<()> {
    let id = EventId::new(id);

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete event {id}?"))
            .default(false)
            .interact()?;
        if !confirmed {
            output::note("Cancelled.");
            return Ok(());
        }
    }

    if !store.delete(&id).await? {
        return Err(Error::NotFound { id });
    }

    if output::is_json() {
        output::json_output(json!({
            "command": "delete",
            "id": id,
            "deleted": true,
        }));
        return Ok(());
    }

    output::action_done("Deleted", id.as_str());
    Ok(())
}

/// Load one event or fail with `NotFound`.
pub(crate) async fn fetch(store: &dyn EventStore, id: &str) -> Result<Event> {
    let id = EventId::new(id);
    let event = store.get(&id).await?;
    event.ok_or(Error::NotFound { id })
}

/// Print an event header and its numbered dialogs.
pub(crate) fn print_event(event: &Event) {
    if output::is_json() {
        output::json_output(json!({
            "command": "show",
            "event": event,
        }));
        return;
    }

    output::section(event.name());
    output::field("Id", event.id());
    if !event.thumbnail().is_empty() {
        output::field("Thumbnail", event.thumbnail());
    }
    output::field("Created", event.created_at().to_rfc3339());
    output::field("Updated", event.updated_at().to_rfc3339());

    output::section("Dialogs");
    for (i, dialog) in event.dialogs().iter().enumerate() {
        let image = if dialog.has_image() {
            format!("  {}", output::muted(&dialog.image_path))
        } else {
            String::new()
        };
        output::lines(&format!(
            "{:>3}. {} {}{}",
            i + 1,
            output::highlight(format!("{:<5}", dialog.speaker.as_str())),
            dialog.text,
            image
        ));
    }
}
