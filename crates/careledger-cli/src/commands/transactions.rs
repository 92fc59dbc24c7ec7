//! Transaction command implementations

use anyhow::Result;
use careledger_core::db::Database;
use careledger_core::models::{NewFinancialTransaction, TransactionType};

use super::{parse_date, truncate};

pub fn cmd_transactions_list(db: &Database, facility: Option<i64>, limit: i64) -> Result<()> {
    let transactions = db.list_transactions(facility, limit, 0)?;

    if transactions.is_empty() {
        println!("No transactions found. Add one with:");
        println!("  careledger transactions add --type income --category SSI --amount 500 --date 2024-01-15");
        return Ok(());
    }

    println!();
    println!("📝 Recent Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let amount_str = match tx.transaction_type {
            TransactionType::Expense => format!("\x1b[31m${:.2}\x1b[0m", tx.amount), // Red for expenses
            TransactionType::Income => format!("\x1b[32m+${:.2}\x1b[0m", tx.amount), // Green for income
        };

        println!(
            "   [{}] {} │ {:>10} │ {:<9} │ {}",
            tx.id,
            tx.transaction_date,
            amount_str,
            tx.status,
            truncate(&tx.category, 30)
        );
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_transactions_add(
    db: &Database,
    transaction_type: &str,
    category: &str,
    amount: f64,
    date: &str,
    status: &str,
    facility: Option<i64>,
    resident: Option<i64>,
    description: Option<&str>,
    payment_method: Option<&str>,
    reference: Option<&str>,
) -> Result<()> {
    let transaction_type = transaction_type
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let status = status.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let transaction_date = parse_date(date)?;

    let id = db.insert_transaction(&NewFinancialTransaction {
        transaction_type,
        category: category.to_string(),
        amount,
        transaction_date,
        status,
        nursing_home_id: facility,
        resident_id: resident,
        description: description.map(str::to_string),
        payment_method: payment_method.map(str::to_string),
        reference_number: reference.map(str::to_string),
    })?;

    println!("✅ Added transaction [{}] {} ${:.2}", id, category, amount);
    Ok(())
}

pub fn cmd_transactions_delete(db: &Database, id: i64) -> Result<()> {
    let tx = db.get_transaction(id)?;
    db.delete_transaction(id)?;
    println!(
        "✅ Deleted transaction [{}] {} ${:.2}",
        id, tx.category, tx.amount
    );
    Ok(())
}
