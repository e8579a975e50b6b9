use anyhow::Result;
use redist_build::{AffixTable, Affixes, Platform};

pub fn run() -> Result<()> {
    let shared = AffixTable::shared();
    let archives = AffixTable::static_archives();

    println!("Known platforms:\n");
    println!(
        "  {:<12} {:<10} {:<24} STATIC ARCHIVES",
        "PLATFORM", "FAMILY", "SHARED"
    );
    println!("  {}", "-".repeat(70));

    for p in Platform::all() {
        println!(
            "  {:<12} {:<10} {:<24} {}",
            p.as_str(),
            p.family(),
            describe(shared.get(*p)),
            describe(archives.get(*p)),
        );
    }

    println!();
    Ok(())
}

fn describe(affixes: Option<&Affixes>) -> String {
    match affixes {
        Some(a) => match a.dll_file_name("*") {
            Some(dll) => format!("{} {}", a.library_file_name("*"), dll),
            None => a.library_file_name("*"),
        },
        None => "-".to_string(),
    }
}
