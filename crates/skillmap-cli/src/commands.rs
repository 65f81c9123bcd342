use crate::editor::WorkerEditor;
use crate::seed::load_seed_file;
use crate::service::SkillService;
use anyhow::{bail, Context, Result};
use clap::Subcommand;
use serde::Serialize;
use skillmap_analysis::pie_fractions;
use skillmap_types::{SkillLevel, WorkerRecord};
use std::path::PathBuf;
use tracing::warn;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every worker with their skill levels
    List,

    /// Show one worker, level by level and group by group
    Show { name: String },

    /// Add a worker
    Add {
        name: String,
        /// Comma separated levels in category order; missing ones default to 1
        #[arg(long, value_delimiter = ',')]
        levels: Vec<SkillLevel>,
    },

    /// Rename a worker or change their levels
    Update {
        name: String,
        #[arg(long)]
        rename: Option<String>,
        /// Replace the whole vector (comma separated, category order)
        #[arg(long, value_delimiter = ',')]
        levels: Option<Vec<SkillLevel>>,
        /// Set a single category, e.g. --set "Water Spider=4" (repeatable)
        #[arg(long = "set", value_parser = parse_assignment)]
        assignments: Vec<(String, SkillLevel)>,
    },

    /// Delete a worker
    Delete { name: String },

    /// Totals and averages per category across all workers
    Overall,

    /// Side-by-side levels of the named workers
    Compare {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Print the category taxonomy
    Categories,

    /// Write a spreadsheet or PDF report to the output directory
    Export {
        #[command(subcommand)]
        format: ExportFormat,
    },

    /// Copy the database to a new file
    Backup { destination: PathBuf },

    /// Load workers from a JSON file into an empty database
    Seed { file: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum ExportFormat {
    /// Worker x category matrix (.xlsx)
    Xlsx {
        /// Only include the categories of this group
        #[arg(long)]
        group: Option<String>,
    },
    /// Radar chart per worker, eight to a page (.pdf)
    Pdf,
}

/// Parse `CATEGORY=LEVEL`; the category may contain spaces
pub fn parse_assignment(value: &str) -> Result<(String, SkillLevel), String> {
    let (category, level) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected CATEGORY=LEVEL, got '{}'", value))?;
    let category = category.trim();
    if category.is_empty() {
        return Err(format!("missing category in '{}'", value));
    }
    let level = level
        .trim()
        .parse::<SkillLevel>()
        .map_err(|e| format!("invalid level in '{}': {}", value, e))?;
    Ok((category.to_string(), level))
}

pub async fn run(service: &SkillService, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::List => {
            let workers = service.get_all_workers().await?;
            if json {
                return print_json(&workers);
            }
            if workers.is_empty() {
                println!("No workers yet");
            }
            for worker in &workers {
                println!("{:<24} {}", worker.name, join_levels(&worker.skill_levels));
            }
        }

        Commands::Show { name } => {
            let worker = require_worker(service, &name).await?;
            let groups = service
                .tab_view(&name)
                .await?
                .with_context(|| format!("No worker named '{}'", name))?;
            if json {
                return print_json(&groups);
            }

            // Everything that can fail happens before the first line is printed
            let distribution = pie_fractions(&worker.skill_levels)?
                .into_iter()
                .map(|(label, fraction)| format!("{} {:.0}%", label, fraction * 100.0))
                .collect::<Vec<_>>()
                .join(", ");

            println!("{}", worker.name);
            for group in &groups {
                println!("  {}", group.group);
                for (category, level) in group.categories.iter().zip(&group.levels) {
                    println!("    {:<20} {}", category, level);
                }
            }
            println!("  Distribution: {}", distribution);
        }

        Commands::Add { name, levels } => {
            let mut editor = WorkerEditor::new(service.taxonomy().clone());
            editor.new_worker();
            editor.set_name(name);
            editor.set_levels(&levels)?;
            editor.save(service).await?;
            println!("Added worker '{}'", editor.draft().name);
        }

        Commands::Update {
            name,
            rename,
            levels,
            assignments,
        } => {
            let worker = require_worker(service, &name).await?;
            let mut editor = WorkerEditor::new(service.taxonomy().clone());
            editor.select(&worker);

            if let Some(new_name) = rename {
                editor.set_name(new_name);
            }
            if let Some(levels) = levels {
                editor.set_levels(&levels)?;
            }
            for (category, level) in &assignments {
                editor.set_category(category, *level)?;
            }

            if !editor.is_dirty() {
                println!("Nothing to update for '{}'", name);
                return Ok(());
            }
            editor.save(service).await?;
            println!(
                "Updated worker '{}': {}",
                editor.draft().name,
                join_levels(&editor.draft().skill_levels)
            );
        }

        Commands::Delete { name } => {
            if service.delete_worker(&name).await? {
                println!("Deleted worker '{}'", name);
            } else {
                println!("No worker named '{}'", name);
            }
        }

        Commands::Overall => {
            let summary = service.overall().await?;
            if json {
                return print_json(&summary);
            }
            println!("{} workers", summary.worker_count);
            println!("{:<20} {:>6} {:>8}", "category", "total", "average");
            for ((category, total), average) in summary
                .categories
                .iter()
                .zip(&summary.totals)
                .zip(&summary.averages)
            {
                println!("{:<20} {:>6} {:>8.2}", category, total, average);
            }
        }

        Commands::Compare { names } => {
            let workers = service.compare(&names).await?;
            if json {
                return print_json(&workers);
            }
            if workers.len() < names.len() {
                warn!(
                    "{} of {} requested workers not found",
                    names.len() - workers.len(),
                    names.len()
                );
            }
            print_comparison(service, &workers);
        }

        Commands::Categories => {
            let taxonomy = service.taxonomy();
            if json {
                return print_json(taxonomy);
            }
            let mut index = 0;
            for group in taxonomy.groups() {
                println!("{}", group.name);
                for category in &group.categories {
                    println!("  {:>2}  {}", index, category);
                    index += 1;
                }
            }
        }

        Commands::Export { format } => match format {
            ExportFormat::Xlsx { group } => {
                let entries = service.report_entries(group.as_deref()).await?;
                let path = service.spreadsheet_path();
                match service.export_to_spreadsheet(&entries, &path) {
                    Some(path) => println!("Wrote {}", path.display()),
                    None => bail!("Spreadsheet export failed, see the log for details"),
                }
            }
            ExportFormat::Pdf => {
                let entries = service.report_entries(None).await?;
                let path = service.pdf_path();
                let report = service
                    .export_to_pdf(&entries, &path)
                    .context("PDF export failed, see the log for details")?;
                if json {
                    return print_json(&report);
                }
                println!(
                    "Wrote {} ({} pages, {} workers)",
                    report.path.display(),
                    report.summary.pages,
                    report.summary.drawn.len()
                );
                for skipped in &report.summary.skipped {
                    println!("Skipped '{}': {}", skipped.name, skipped.reason);
                }
            }
        },

        Commands::Backup { destination } => {
            service.backup(&destination).await?;
            println!("Backed up to {}", destination.display());
        }

        Commands::Seed { file } => {
            let records = load_seed_file(&file)?;
            let inserted = service.seed(&records).await?;
            if inserted == 0 {
                println!("Database already has workers, seed file ignored");
            } else {
                println!("Seeded {} workers from {}", inserted, file.display());
            }
        }
    }

    Ok(())
}

async fn require_worker(service: &SkillService, name: &str) -> Result<WorkerRecord> {
    service
        .get_worker_by_name(name)
        .await?
        .with_context(|| format!("No worker named '{}'", name))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn join_levels(levels: &[SkillLevel]) -> String {
    levels
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_comparison(service: &SkillService, workers: &[WorkerRecord]) {
    let width = workers
        .iter()
        .map(|worker| worker.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(5);

    print!("{:<20}", "category");
    for worker in workers {
        print!(" {:>width$}", worker.name, width = width);
    }
    println!();

    for (index, category) in service.taxonomy().flattened().iter().enumerate() {
        print!("{:<20}", category);
        for worker in workers {
            let level = worker.skill_levels.get(index).copied().unwrap_or_default();
            print!(" {:>width$}", level, width = width);
        }
        println!();
    }
}
