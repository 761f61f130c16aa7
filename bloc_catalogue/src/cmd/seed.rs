use anyhow::Result;
use bloc_catalogue_libs::store::model::{Bloc, Hold, HoldKind};
use bloc_catalogue_libs::store::Catalogue;
use clap::Args;
use itertools::Itertools;
use std::{env, ffi::OsString, path::PathBuf};

#[derive(Debug, Args)]
pub struct SeedArgs {
    path: Option<OsString>,
}

/// Seeds a demo catalogue so a fresh install has something to climb.
/// Refuses to touch a store that already has blocs.
pub async fn run(args: SeedArgs) -> Result<()> {
    let data_dir: PathBuf = match args.path {
        Some(path) => PathBuf::from(path),
        None => match env::var("DATA_DIR") {
            Ok(path) => PathBuf::from(path),
            Err(e) => anyhow::bail!(e.to_string()),
        },
    };

    let catalogue = Catalogue::new(&data_dir);
    catalogue.ensure_data_dir().await?;

    let existing = catalogue.blocs.load().await?;
    if !existing.is_empty() {
        anyhow::bail!(
            "refusing to seed: blocs collection already holds {} documents",
            existing.len()
        );
    }

    let blocs = sample_blocs();
    tracing::info!(
        "Seeding {} blocs into {}: {}",
        blocs.len(),
        data_dir.display(),
        blocs.iter().map(|b| b.name.as_str()).join(", ")
    );
    catalogue.blocs.save(&blocs).await?;

    Ok(())
}

fn wall_line(count: u32) -> Vec<Hold> {
    (1..=count)
        .map(|number| {
            let kind = if number == 1 {
                HoldKind::Start
            } else if number == count {
                HoldKind::Finish
            } else {
                HoldKind::Middle
            };
            Hold { number, kind }
        })
        .collect()
}

fn sample_blocs() -> Vec<Bloc> {
    vec![
        Bloc::new(
            String::from("Yellow traverse"),
            String::from("Long endurance line along the bottom rail"),
            wall_line(12),
            String::from("5"),
        ),
        Bloc::new(
            String::from("Orange arete"),
            String::from("Slopey top-out, commit on the last move"),
            wall_line(6),
            String::from("6B"),
        ),
        Bloc::new(
            String::from("Black roof"),
            String::from("Heel hooks through the overhang"),
            wall_line(8),
            String::from("7A+"),
        ),
        Bloc::new(
            String::from("White dyno"),
            String::new(),
            wall_line(4),
            String::from("6C"),
        ),
        Bloc::new(
            String::from("Unset project"),
            String::from("Holds are on the wall, grade pending"),
            wall_line(5),
            String::new(),
        ),
    ]
}
