use std::{io::Write, path::PathBuf};

use assistant::Idea;
use clap::{Args, Parser, Subcommand};
use engine::{
    BudgetSummary, Catalog, MoneyCents, Part, PartLookup, Project, ProjectItem, Projects,
    Quantity, compute_budget, sale_by_category,
};

mod error;
mod report;
mod settings;

use crate::error::Result;
use crate::settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "marcena")]
#[command(about = "Catalog, budgets and design ideas for a joinery workshop")]
struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the directory holding catalog and project files.
    #[arg(long)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the parts price list.
    Catalog(CatalogCmd),
    /// Budget, save and export furniture projects.
    Project(ProjectCmd),
    /// Totals across every saved project.
    Overview,
    /// Ask the design assistant for project ideas.
    Ideas(IdeasCmd),
}

#[derive(Args, Debug)]
struct CatalogCmd {
    #[command(subcommand)]
    command: CatalogCommand,
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// List parts with their prices and per-unit margin.
    List(CatalogListArgs),
    /// Add a part to the price list.
    Add(CatalogAddArgs),
    /// Remove a part. Saved projects keep the line; it stops counting.
    Remove(CatalogRemoveArgs),
}

#[derive(Args, Debug)]
struct CatalogListArgs {
    /// Show only parts whose name or category contains the term.
    #[arg(long)]
    filter: Option<String>,
}

#[derive(Args, Debug)]
struct CatalogAddArgs {
    #[arg(long)]
    name: String,
    /// Purchase price per unit, e.g. "45.00" or "45,00".
    #[arg(long)]
    purchase: String,
    /// Sale price per unit.
    #[arg(long)]
    price: String,
    #[arg(long, default_value = "Madeira")]
    category: String,
    #[arg(long, default_value = "un")]
    unit: String,
    /// Reference photo for the part.
    #[arg(long)]
    image_url: Option<String>,
}

#[derive(Args, Debug)]
struct CatalogRemoveArgs {
    id: String,
}

#[derive(Args, Debug)]
struct ProjectCmd {
    #[command(subcommand)]
    command: ProjectCommand,
}

#[derive(Subcommand, Debug)]
enum ProjectCommand {
    /// Price a bill of materials and keep it.
    Save(ProjectSaveArgs),
    /// Price a bill of materials without saving anything.
    Preview(ProjectPreviewArgs),
    /// List saved projects, newest first.
    List,
    /// Show one project with its budget.
    Show(ProjectShowArgs),
    /// Delete a saved project.
    Delete(ProjectDeleteArgs),
    /// Write the project report as a `;`-separated CSV.
    Export(ProjectExportArgs),
}

#[derive(Args, Debug)]
struct ProjectSaveArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: Option<String>,
    /// Project line as `PART-ID=QTY`; repeat per part.
    #[arg(long = "item", value_name = "PART=QTY")]
    items: Vec<String>,
}

#[derive(Args, Debug)]
struct ProjectPreviewArgs {
    /// Project line as `PART-ID=QTY`; repeat per part.
    #[arg(long = "item", value_name = "PART=QTY")]
    items: Vec<String>,
}

#[derive(Args, Debug)]
struct ProjectShowArgs {
    id: String,
}

#[derive(Args, Debug)]
struct ProjectDeleteArgs {
    id: String,
    /// Skip the confirmation question.
    #[arg(long)]
    yes: bool,
}

#[derive(Args, Debug)]
struct ProjectExportArgs {
    id: String,
    /// Write the report here instead of `Orcamento_<name>.csv`.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct IdeasCmd {
    #[command(subcommand)]
    command: IdeasCommand,
}

#[derive(Subcommand, Debug)]
enum IdeasCommand {
    /// Suggest furniture projects built from chosen parts.
    Suggest(IdeasSuggestArgs),
}

#[derive(Args, Debug)]
struct IdeasSuggestArgs {
    /// Catalog part put at the model's disposal; repeat per part.
    #[arg(long = "part", value_name = "ID")]
    parts: Vec<String>,
    /// Save idea number N as a project.
    #[arg(long, value_name = "N")]
    save: Option<usize>,
    /// Render idea number N as a 16:9 photo.
    #[arg(long, value_name = "N")]
    visual: Option<usize>,
    /// Where to write the rendered photo.
    #[arg(long)]
    image_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = settings::load(cli.config.as_deref(), cli.data_dir)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "marcena={level},engine={level},assistant={level}",
            level = settings.level
        ))
        .init();

    match cli.command {
        Command::Catalog(CatalogCmd { command }) => run_catalog(command, &settings),
        Command::Project(ProjectCmd { command }) => run_project(command, &settings),
        Command::Overview => run_overview(&settings),
        Command::Ideas(IdeasCmd { command }) => run_ideas(command, &settings).await,
    }
}

fn run_catalog(command: CatalogCommand, settings: &Settings) -> Result<()> {
    let path = settings.catalog_path();
    let mut catalog = Catalog::load(&path)?;

    match command {
        CatalogCommand::List(args) => {
            let filter = args.filter.map(|term| term.to_lowercase());
            let mut shown = 0;
            for part in catalog.parts() {
                if let Some(term) = &filter
                    && !part.name.to_lowercase().contains(term)
                    && !part.category.to_lowercase().contains(term)
                {
                    continue;
                }
                println!(
                    "{}  {:<30} {:<12} {:>10} {:>10} {:>6.1}%  {}",
                    part.id,
                    part.name,
                    part.category,
                    part.purchase_price.to_string(),
                    part.price.to_string(),
                    part.unit_margin_percent(),
                    part.unit,
                );
                shown += 1;
            }
            if shown == 0 {
                println!("no parts matched");
            }
        }
        CatalogCommand::Add(args) => {
            let name = args.name.trim();
            if name.is_empty() {
                eprintln!("part name must not be empty");
                std::process::exit(1);
            }
            let purchase = match args.purchase.parse::<MoneyCents>() {
                Ok(value) => value,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };
            let price = match args.price.parse::<MoneyCents>() {
                Ok(value) => value,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };
            if !price.is_positive() {
                eprintln!("sale price must be positive");
                std::process::exit(1);
            }
            if !engine::CATEGORIES.contains(&args.category.as_str()) {
                tracing::info!("new category: {}", args.category);
            }

            let part = Part::new(
                name.to_string(),
                purchase,
                price,
                args.category,
                args.unit,
                args.image_url,
            );
            let id = part.id.clone();
            catalog.add(part)?;
            catalog.save(&path)?;
            println!("added part: {id}");
        }
        CatalogCommand::Remove(args) => match catalog.remove(&args.id) {
            Ok(part) => {
                catalog.save(&path)?;
                println!("removed part: {} ({})", part.id, part.name);
            }
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn run_project(command: ProjectCommand, settings: &Settings) -> Result<()> {
    let catalog = Catalog::load(&settings.catalog_path())?;
    let path = settings.projects_path();
    let mut projects = Projects::load(&path)?;

    match command {
        ProjectCommand::Save(args) => {
            let name = args.name.trim();
            if name.is_empty() {
                eprintln!("project name must not be empty");
                std::process::exit(1);
            }
            let items = parse_items(&args.items);
            if items.is_empty() {
                eprintln!("a project needs at least one --item");
                std::process::exit(1);
            }
            for item in &items {
                if catalog.part(&item.part_id).is_none() {
                    tracing::warn!("part not in catalog: {}", item.part_id);
                }
            }

            let project = Project::new(
                name.to_string(),
                args.description.unwrap_or_default(),
                items,
            );
            print_budget(&project.items, &catalog);
            let id = project.id.clone();
            projects.add(project)?;
            projects.save(&path)?;
            println!("saved project: {id}");
        }
        ProjectCommand::Preview(args) => {
            let items = parse_items(&args.items);
            print_budget(&items, &catalog);
        }
        ProjectCommand::List => {
            if projects.is_empty() {
                println!("no projects saved");
                return Ok(());
            }
            let all: Vec<&Project> = projects.projects().collect();
            for project in all.iter().rev() {
                let summary = compute_budget(&project.items, &catalog);
                println!(
                    "{}  {}  {:<30} sale {:>10}  profit {:>10}",
                    project.id,
                    project.created_at.format("%d/%m/%Y"),
                    project.name,
                    summary.total_sale.to_string(),
                    summary.profit().to_string(),
                );
            }
        }
        ProjectCommand::Show(args) => {
            let Some(project) = projects.get(&args.id) else {
                eprintln!("project not found: {}", args.id);
                std::process::exit(1);
            };
            println!(
                "{}  (created {})",
                project.name,
                project.created_at.format("%d/%m/%Y")
            );
            if !project.description.is_empty() {
                println!("{}", project.description);
            }
            for item in &project.items {
                match catalog.part(&item.part_id) {
                    Some(part) => {
                        let subtotal = part.price.times(item.quantity);
                        println!(
                            "  {} {} x {} @ {} = {}",
                            item.quantity, part.unit, part.name, part.price, subtotal
                        );
                    }
                    None => {
                        println!("  {} x {} (not in catalog)", item.quantity, item.part_id);
                    }
                }
            }
            print_budget(&project.items, &catalog);
        }
        ProjectCommand::Delete(args) => {
            let Some(project) = projects.get(&args.id) else {
                eprintln!("project not found: {}", args.id);
                std::process::exit(1);
            };
            if !args.yes && !confirm(&format!("delete project \"{}\"?", project.name))? {
                println!("aborted");
                return Ok(());
            }
            projects.remove(&args.id)?;
            projects.save(&path)?;
            println!("deleted project: {}", args.id);
        }
        ProjectCommand::Export(args) => {
            let Some(project) = projects.get(&args.id) else {
                eprintln!("project not found: {}", args.id);
                std::process::exit(1);
            };
            let data = report::render_csv(project, &catalog)?;
            let out = args
                .out
                .unwrap_or_else(|| PathBuf::from(report::report_filename(project)));
            std::fs::write(&out, data)?;
            println!("wrote report: {}", out.display());
        }
    }

    Ok(())
}

fn run_overview(settings: &Settings) -> Result<()> {
    let catalog = Catalog::load(&settings.catalog_path())?;
    let projects = Projects::load(&settings.projects_path())?;

    let total: BudgetSummary = projects
        .projects()
        .map(|project| compute_budget(&project.items, &catalog))
        .sum();

    println!("parts in catalog: {}", catalog.len());
    println!("saved projects:   {}", projects.len());
    println!("total quoted:     {}", total.total_sale);
    println!("estimated profit: {}", total.profit());

    Ok(())
}

async fn run_ideas(command: IdeasCommand, settings: &Settings) -> Result<()> {
    let IdeasCommand::Suggest(args) = command;

    let catalog = Catalog::load(&settings.catalog_path())?;
    if args.parts.is_empty() {
        eprintln!("pick at least one --part from the catalog");
        std::process::exit(1);
    }
    let mut selected = Vec::with_capacity(args.parts.len());
    for id in &args.parts {
        let Some(part) = catalog.part(id) else {
            eprintln!("part not in catalog: {id}");
            std::process::exit(1);
        };
        selected.push(part);
    }
    if settings.api_key.is_empty() {
        eprintln!("no api key configured; set MARCENA_API_KEY or api_key in the config file");
        std::process::exit(1);
    }

    let client = assistant::Client::new(&settings.base_url, &settings.api_key)?;

    let ideas = match client.suggest_ideas(&settings.ideas_model, &selected).await {
        Ok(ideas) => ideas,
        Err(err) => {
            tracing::error!("idea generation failed: {err}");
            Vec::new()
        }
    };
    if ideas.is_empty() {
        println!("no usable ideas this time, try again");
        return Ok(());
    }

    for (index, idea) in ideas.iter().enumerate() {
        let summary = compute_budget(idea.lines(), &catalog);
        println!("{}. {}", index + 1, idea.title);
        println!("   {}", idea.summary);
        for suggested in &idea.items {
            let name = catalog
                .part(&suggested.item.part_id)
                .map_or(suggested.item.part_id.as_str(), |part| part.name.as_str());
            println!(
                "   - {} x {}: {}",
                suggested.item.quantity, name, suggested.usage
            );
        }
        println!(
            "   cost {}  sale {}  margin {:.1}%",
            summary.total_cost,
            summary.total_sale,
            summary.margin_percent()
        );
    }

    if let Some(chosen) = args.save {
        let idea = pick_idea(&ideas, chosen);
        let path = settings.projects_path();
        let mut projects = Projects::load(&path)?;
        let project = idea.clone().into_project();
        let id = project.id.clone();
        projects.add(project)?;
        projects.save(&path)?;
        println!("saved idea {chosen} as project: {id}");
    }

    if let Some(chosen) = args.visual {
        let idea = pick_idea(&ideas, chosen);
        match client
            .render_visual(&settings.image_model, idea, &selected)
            .await
        {
            Ok(image) => {
                let out = args.image_out.clone().unwrap_or_else(|| {
                    PathBuf::from(format!("idea_{chosen}.{}", image.extension()))
                });
                std::fs::write(&out, &image.bytes)?;
                println!("wrote visual: {}", out.display());
            }
            Err(err) => tracing::error!("visual generation failed: {err}"),
        }
    }

    Ok(())
}

fn pick_idea(ideas: &[Idea], number: usize) -> &Idea {
    if number == 0 || number > ideas.len() {
        eprintln!("ideas are numbered 1 to {}", ideas.len());
        std::process::exit(1);
    }
    &ideas[number - 1]
}

fn print_budget(items: &[ProjectItem], catalog: &Catalog) {
    let summary = compute_budget(items, catalog);
    println!("materials cost: {:>10}", summary.total_cost.to_string());
    println!("quoted price:   {:>10}", summary.total_sale.to_string());
    println!("gross profit:   {:>10}", summary.profit().to_string());
    println!("margin:         {:>9.1}%", summary.margin_percent());

    let breakdown = sale_by_category(items, catalog);
    if !breakdown.is_empty() {
        println!("sale by category:");
        for (category, value) in &breakdown {
            println!("  {:<12} {:>10}", category, value.to_string());
        }
    }
}

fn parse_items(raw: &[String]) -> Vec<ProjectItem> {
    let mut items = Vec::with_capacity(raw.len());
    for entry in raw {
        match parse_item(entry) {
            Ok(item) => items.push(item),
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(2);
            }
        }
    }
    items
}

fn parse_item(raw: &str) -> std::result::Result<ProjectItem, String> {
    let Some((part_id, quantity)) = raw.split_once('=') else {
        return Err(format!("malformed item \"{raw}\": want PART=QTY"));
    };
    let part_id = part_id.trim();
    if part_id.is_empty() {
        return Err(format!("malformed item \"{raw}\": empty part id"));
    }
    let quantity = quantity
        .trim()
        .parse::<Quantity>()
        .map_err(|err| format!("malformed item \"{raw}\": {err}"))?;

    Ok(ProjectItem::new(part_id, quantity))
}

fn confirm(question: &str) -> Result<bool> {
    eprint!("{question} [y/N] ");
    std::io::stderr().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();

    Ok(answer == "y" || answer == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_parse_from_part_and_quantity() {
        let item = parse_item("7=2,5").unwrap();
        assert_eq!(item.part_id, "7");
        assert_eq!(item.quantity, Quantity::from_hundredths(250));

        let item = parse_item(" 1 = 3 ").unwrap();
        assert_eq!(item.part_id, "1");
        assert_eq!(item.quantity, Quantity::from_hundredths(300));
    }

    #[test]
    fn malformed_items_are_refused() {
        assert!(parse_item("7").is_err());
        assert!(parse_item("=2").is_err());
        assert!(parse_item("7=abc").is_err());
        assert!(parse_item("7=1.234").is_err());
    }
}
