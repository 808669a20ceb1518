//! Handlers for `export` and `import`.

use std::path::Path;

use serde_json::json;
use tabled::{Table, Tabled};
use tokio::io::AsyncReadExt;

use crate::adapter::inbound::cli::output;
use crate::application::transfer::{export_dialogs, import_dialogs, ImportReport};
use crate::error::Result;
use crate::port::outbound::store::EventStore;

#[derive(Tabled)]
struct ImportRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Stored as")]
    id: String,
    #[tabled(rename = "Dialogs")]
    dialogs: usize,
}

/// Execute `export`, writing to `output` or stdout.
pub async fn execute_export(store: &dyn EventStore, output_path: Option<&Path>) -> Result<()> {
    let spinner = output::spinner("Exporting dialogs");
    let module = export_dialogs(store).await;
    output::spinner_clear(&spinner);
    let module = module?;

    match output_path {
        Some(path) => {
            tokio::fs::write(path, &module).await?;
            if output::is_json() {
                output::json_output(json!({
                    "command": "export",
                    "path": path.display().to_string(),
                    "bytes": module.len(),
                }));
            } else {
                output::action_done("Exported", &path.display().to_string());
            }
        }
        None => output::raw(&module),
    }
    Ok(())
}

/// Execute `import` from a file, or stdin when the path is `-`.
pub async fn execute_import(store: &dyn EventStore, file: &Path) -> Result<()> {
    let source = if file == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(file).await?
    };

    let report = import_dialogs(store, &source).await?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &ImportReport) {
    if output::is_json() {
        let imported: Vec<_> = report
            .imported
            .iter()
            .map(|e| {
                json!({
                    "key": e.key,
                    "id": e.id,
                    "dialogs": e.dialogs,
                })
            })
            .collect();
        output::json_output(json!({
            "command": "import",
            "imported": imported,
        }));
        return;
    }

    if report.is_empty() {
        output::note("Nothing to import.");
        return;
    }

    let rows: Vec<ImportRow> = report
        .imported
        .iter()
        .map(|e| ImportRow {
            key: e.key.clone(),
            id: e.id.to_string(),
            dialogs: e.dialogs,
        })
        .collect();
    output::lines(&Table::new(rows).to_string());

    let renamed = report.imported.iter().filter(|e| e.renamed()).count();
    if renamed > 0 {
        output::note(&format!("{renamed} key(s) already existed and got a new id"));
    }
    output::action_done("Imported", &format!("{} event(s)", report.len()));
}
