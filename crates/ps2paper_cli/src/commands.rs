//! Subcommand implementations.

use anyhow::{bail, Context};
use log::info;
use ps2paper_core::{
    CommandLauncher, DisplayIndex, DisplayUnits, FileStatus, ListLine, PaperDefinition,
    PaperService, PaperWrite, Settings,
};
use serde_json::json;
use std::rc::Rc;

fn open_service(settings: &Settings) -> anyhow::Result<PaperService<CommandLauncher>> {
    let mut service = PaperService::new(
        settings.registry(),
        settings.snippet_store(),
        settings.launcher(),
    );
    service
        .reload()
        .context("failed to load paper definitions")?;
    Ok(service)
}

pub fn list(settings: &Settings, units: DisplayUnits, as_json: bool) -> anyhow::Result<()> {
    let index = Rc::new(DisplayIndex::new());
    let mut service = PaperService::new(
        settings.registry(),
        settings.snippet_store(),
        settings.launcher(),
    );
    service.subscribe(index.clone());
    service
        .reload()
        .context("failed to load paper definitions")?;

    if as_json {
        let rows: Vec<_> = index
            .paper_indexes()
            .into_iter()
            .map(|i| {
                let paper = &service.registry().definitions()[i];
                json!({
                    "index": i,
                    "name": paper.name,
                    "source": paper.source,
                    "width": paper.width,
                    "height": paper.height,
                    "units": units,
                    "display_width": units.format(paper.width),
                    "display_height": units.format(paper.height),
                    "size_status": paper.size_status,
                    "snippet_key": paper.snippet_key,
                    "file_status": paper.file_status,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let definitions = service.registry().definitions();
    for line in index.lines().iter() {
        match *line {
            ListLine::Separator(source) => println!("{source}"),
            ListLine::Paper(i) => println!("{}", format_row(i, &definitions[i], units)),
        }
    }
    Ok(())
}

fn format_row(index: usize, paper: &PaperDefinition, units: DisplayUnits) -> String {
    format!(
        "{index:>4}  {:<32} {:>9} {:>9}  {:<9}  {:<16} {}",
        paper.name,
        units.format(paper.width),
        units.format(paper.height),
        paper.size_status,
        paper.snippet_key,
        paper.file_status,
    )
}

pub fn write(
    settings: &Settings,
    selectors: &[String],
    all: bool,
    force: bool,
) -> anyhow::Result<()> {
    let mut service = open_service(settings)?;

    let selected: Vec<usize> = service
        .registry()
        .iter()
        .enumerate()
        .filter(|(_, paper)| {
            if all {
                paper.has_snippet_file() && paper.file_status != FileStatus::Correct
            } else {
                selectors.iter().any(|selector| matches_selector(paper, selector))
            }
        })
        .map(|(i, _)| i)
        .collect();

    if selected.is_empty() {
        bail!("no paper definitions matched");
    }
    info!(
        "event=cli_write module=cli status=start selected={} force={}",
        selected.len(),
        force
    );

    let report = service
        .write_selected(&selected, |_| force)
        .context("failed to write snippet files")?;

    for entry in &report.entries {
        match &entry.result {
            Ok(PaperWrite::Written(path)) => println!("wrote    {}", path.display()),
            Ok(PaperWrite::AlreadyCorrect) => println!("ok       {}", entry.name),
            Ok(PaperWrite::Declined) => {
                println!("skipped  {} (not created by ps2paper; use --force)", entry.name)
            }
            Err(err) => eprintln!("failed   {}: {err}", entry.name),
        }
    }

    if report.failed() > 0 {
        bail!("{} of {} snippet files failed", report.failed(), selected.len());
    }
    Ok(())
}

fn matches_selector(paper: &PaperDefinition, selector: &str) -> bool {
    paper.name.eq_ignore_ascii_case(selector) || paper.snippet_key == selector.to_lowercase()
}

pub fn launch(settings: &Settings, index: usize) -> anyhow::Result<()> {
    let service = open_service(settings)?;
    match service.launch(index)? {
        Some(path) => println!("opened   {}", path.display()),
        None => println!("no snippet file for definition {index}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{format_row, matches_selector};
    use ps2paper_core::{DisplayUnits, PaperDefinition, PaperSource};

    #[test]
    fn selectors_match_name_or_key() {
        let paper = PaperDefinition::new("A4 Rotated", 841_890, 595_276, PaperSource::Master);
        assert!(matches_selector(&paper, "a4 rotated"));
        assert!(matches_selector(&paper, "A4"));
        assert!(!matches_selector(&paper, "A3"));
    }

    #[test]
    fn row_shows_display_units_and_statuses() {
        let paper = PaperDefinition::new("A4", 595_276, 841_890, PaperSource::Master);
        let row = format_row(7, &paper, DisplayUnits::Millimetres);
        assert!(row.starts_with("   7  A4"));
        assert!(row.contains("210.0"));
        assert!(row.contains("297.0"));
        assert!(row.ends_with("Missing"));
    }
}
