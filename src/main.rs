use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::env;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

use element_kernel::attributes::{Element, EntityId};
use element_kernel::commands::room_export::is_room;
use element_kernel::commands::room_numbering::{requests_from, taken_from};
use element_kernel::commands::room_tags::tagged_rooms;
use element_kernel::{
    assign_room_numbers, export_rooms, load_elements, material_quantities, model_statistics,
    plan_color_splash, plan_room_tags, IdentifierAllocator, KernelConfig, KernelError, LevelInfo,
    Report, TakenSet,
};

const USAGE: &str = "\
usage: element-kernel [--config <file>] <command> <elements.csv> [options]

commands:
  number     renumber rooms so every number is unique
  next       print the next free room number
  splash     group elements by a parameter and color each group  [parameter]
  materials  roll up material areas and volumes
  stats      count elements by category, type and level
  rooms      export room records                                  [--all]
  tags       plan tags for untagged rooms                         [--only id,id]";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let config = match args.iter().position(|a| a == "--config") {
        Some(i) => {
            let path = args
                .get(i + 1)
                .cloned()
                .context("--config needs a file path")?;
            args.drain(i..=i + 1);
            KernelConfig::from_file(&path)?
        }
        None => KernelConfig::default(),
    };

    if args.len() < 2 {
        eprintln!("{}", USAGE);
        std::process::exit(1);
    }

    let command = args[0].as_str();
    let elements = load_elements(Path::new(&args[1]))?;
    let options = &args[2..];

    run(command, &elements, options, &config)
}

fn run(command: &str, elements: &[Element], options: &[String], config: &KernelConfig) -> Result<()> {
    let allocator = IdentifierAllocator::with_policy(config.allocation.clone());
    let rooms: Vec<&Element> = elements.iter().filter(|e| is_room(*e)).collect();

    match command {
        "number" => {
            let others: Vec<&Element> = elements.iter().filter(|e| !is_room(*e)).collect();
            let mut taken = taken_from(&others);
            let assignments = assign_room_numbers(&requests_from(&rooms), &mut taken, &allocator);

            let renumbered = assignments.iter().filter(|a| a.renumbered).count();
            info!(rooms = assignments.len(), renumbered, "room numbers assigned");
            emit(command, assignments)
        }
        "next" => {
            let taken: TakenSet = taken_from(&rooms);
            let next = allocator.next_available(&taken);
            emit(command, serde_json::json!({ "taken": taken.len(), "next": next }))
        }
        "splash" => {
            let parameter = options
                .first()
                .map(String::as_str)
                .unwrap_or(&config.splash_parameter);
            let plan = plan_color_splash(elements, parameter, &config.color);

            info!(parameter, groups = plan.groups.len(), "color splash planned");
            emit(command, plan)
        }
        "materials" => {
            let report = material_quantities(
                elements,
                |e: &Element| e.layers().to_vec(),
                config.material_categories.as_deref(),
            );
            emit(command, report)
        }
        "stats" => {
            let levels = LevelInfo::from_entities(elements);
            emit(command, model_statistics(elements, &levels))
        }
        "rooms" => {
            let include_unplaced =
                config.include_unplaced_rooms || options.iter().any(|o| o == "--all");
            let export = export_rooms(&rooms, include_unplaced);

            info!(
                exported = export.rooms.len(),
                skipped = export.skipped_unplaced,
                "rooms exported"
            );
            emit(command, export)
        }
        "tags" => {
            let selection = parse_selection(options)?;
            let mut tagged = tagged_rooms(elements);
            let plan = plan_room_tags(&rooms, &mut tagged, selection.as_ref());

            info!(
                to_tag = plan.to_tag.len(),
                already_tagged = plan.already_tagged.len(),
                "room tags planned"
            );
            emit(command, plan)
        }
        other => Err(KernelError::UnknownCommand(other.to_string()).into()),
    }
}

/// `--only 3,7,12` limits tagging to those room ids
fn parse_selection(options: &[String]) -> Result<Option<HashSet<EntityId>>> {
    let Some(i) = options.iter().position(|o| o == "--only") else {
        return Ok(None);
    };
    let Some(list) = options.get(i + 1) else {
        bail!("--only needs a comma-separated id list");
    };

    let ids = list
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<EntityId>())
        .collect::<Result<HashSet<_>, _>>()?;
    Ok(Some(ids))
}

fn emit<T: Serialize>(command: &str, data: T) -> Result<()> {
    let report = Report::new(command, data);
    println!("{}", report.to_json_pretty()?);
    Ok(())
}
