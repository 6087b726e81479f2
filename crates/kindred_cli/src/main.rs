//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `kindred_core` linkage.
//! - Print the sample family grouping from a throwaway in-memory store.

use kindred_core::db::open_db_in_memory;
use kindred_core::{FamilyService, OwnerScope, SqliteMemberRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("kindred_core ping={}", kindred_core::ping());
    println!("kindred_core version={}", kindred_core::core_version());

    match print_sample_family() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("kindred_core sample=error {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_sample_family() -> Result<(), String> {
    let conn = open_db_in_memory().map_err(|err| err.to_string())?;
    let repo = SqliteMemberRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let service = FamilyService::new(repo);

    let seeded = service.ensure_sample_family().map_err(|err| err.to_string())?;
    let snapshot = service
        .load_snapshot(&OwnerScope::Sample)
        .map_err(|err| err.to_string())?;
    let projection = snapshot.projection();

    println!(
        "sample members={} heads={} couples={} families={} unaffiliated={}",
        seeded,
        projection.heads.len(),
        projection.couples.len(),
        projection.families.len(),
        projection.unaffiliated.len()
    );
    for head in &projection.heads {
        println!("head: {}", head.name);
    }
    for couple in &projection.couples {
        println!("couple: {} & {}", couple.first.name, couple.second.name);
    }
    for family in &projection.families {
        let children = family
            .children
            .iter()
            .map(|child| child.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        println!("family: {} -> {}", family.parent.name, children);
    }
    Ok(())
}
