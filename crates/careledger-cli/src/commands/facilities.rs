//! Facility command implementations

use anyhow::Result;
use careledger_core::db::Database;
use careledger_core::models::NewNursingHome;

pub fn cmd_facilities_list(db: &Database) -> Result<()> {
    let homes = db.list_nursing_homes()?;

    if homes.is_empty() {
        println!("No facilities found. Add one with:");
        println!("  careledger facilities add \"Oak Manor\" --city Springfield --state IL");
        return Ok(());
    }

    println!();
    println!("🏠 Facilities");
    println!("   ─────────────────────────────────────────────────────────────");

    for home in homes {
        println!(
            "   [{}] {} │ {}, {} │ {} beds",
            home.id, home.name, home.city, home.state, home.capacity
        );
    }

    Ok(())
}

pub fn cmd_facilities_add(
    db: &Database,
    name: &str,
    city: &str,
    state: &str,
    capacity: i64,
) -> Result<()> {
    let id = db.insert_nursing_home(&NewNursingHome {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        capacity,
    })?;

    println!("✅ Added facility [{}] {}", id, name);
    Ok(())
}

pub fn cmd_facilities_delete(db: &Database, id: i64) -> Result<()> {
    let home = db.get_nursing_home(id)?;
    db.delete_nursing_home(id)?;
    println!("✅ Deleted facility [{}] {}", id, home.name);
    Ok(())
}
