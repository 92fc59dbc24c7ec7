//! Resident command implementations

use anyhow::Result;
use careledger_core::db::Database;
use careledger_core::models::NewResident;

pub fn cmd_residents_list(db: &Database, facility: Option<i64>) -> Result<()> {
    let residents = db.list_residents(facility)?;

    if residents.is_empty() {
        println!("No residents found. Add one with:");
        println!("  careledger residents add Jane Doe --facility 1 --income-types \"SSI\"");
        return Ok(());
    }

    println!();
    println!("🧑 Residents");
    println!("   ─────────────────────────────────────────────────────────────");

    for resident in residents {
        let facility = resident
            .nursing_home_id
            .map(|id| format!("facility {}", id))
            .unwrap_or_else(|| "unassigned".to_string());
        let income = if resident.income_types.is_empty() {
            "-".to_string()
        } else {
            resident.income_types.join(", ")
        };
        println!(
            "   [{}] {} │ {} │ expects: {}",
            resident.id,
            resident.full_name(),
            facility,
            income
        );
    }

    Ok(())
}

pub fn cmd_residents_add(
    db: &Database,
    first_name: &str,
    last_name: &str,
    facility: Option<i64>,
    income_types: Option<&str>,
) -> Result<()> {
    let income_types: Vec<String> = income_types
        .map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let id = db.insert_resident(&NewResident {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        nursing_home_id: facility,
        income_types,
    })?;

    println!("✅ Added resident [{}] {} {}", id, first_name, last_name);
    Ok(())
}

pub fn cmd_residents_delete(db: &Database, id: i64) -> Result<()> {
    let resident = db.get_resident(id)?;
    db.delete_resident(id)?;
    println!("✅ Deleted resident [{}] {}", id, resident.full_name());
    Ok(())
}
