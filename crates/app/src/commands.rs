use anyhow::{bail, Context, Result};
use finsift_core::{classify, learn, Amount, CategoryEdit, Direction, Record};
use finsift_import::parse_file;
use std::collections::BTreeMap;
use std::path::Path;

use crate::session::Session;

pub fn list_categories(session: &Session) -> Result<()> {
    let ruleset = session.ruleset()?;
    for (name, keywords) in ruleset.iter() {
        if keywords.is_empty() {
            println!("{name}");
        } else {
            println!("{name}: {}", keywords.join(", "));
        }
    }
    Ok(())
}

pub fn add_category(session: &Session, name: &str) -> Result<()> {
    let mut ruleset = session.ruleset()?;
    if let Err(e) = ruleset.create_category(name) {
        bail!("cannot add category: {e}");
    }
    session.save_ruleset(&ruleset)?;
    println!("Added category '{}'", name.trim());
    Ok(())
}

pub fn import(session: &Session, file: &Path) -> Result<()> {
    let dataset = load_classified(session, file)?;
    render(&dataset);
    Ok(())
}

pub fn apply_edits(session: &Session, file: &Path, edits_file: &Path) -> Result<()> {
    let dataset = load_classified(session, file)?;
    let edits = read_edits(edits_file)?;

    // Edits address rows of the debit table, as displayed by `import`.
    let debits: Vec<Record> = dataset
        .iter()
        .filter(|r| r.direction == Direction::Debit)
        .cloned()
        .collect();

    let mut ruleset = session.ruleset()?;
    let updated = learn::apply_edits(debits, &edits, &mut ruleset);

    session.save_ruleset(&ruleset)?;
    session.set_snapshot(&updated)?;

    println!("Applied {} edit(s); snapshot updated", edits.len());
    render(&updated);
    Ok(())
}

pub fn clear_snapshot(session: &Session) -> Result<()> {
    session.clear_snapshot()?;
    println!("Snapshot cleared");
    Ok(())
}

fn load_classified(session: &Session, file: &Path) -> Result<Vec<Record>> {
    let dataset =
        parse_file(file).with_context(|| format!("importing {}", file.display()))?;
    let ruleset = session.ruleset()?;
    let snapshot = session.snapshot()?;
    match &snapshot {
        Some(snapshot) => {
            tracing::info!(rows = dataset.len(), "reconciling against session snapshot");
            Ok(classify(dataset, &ruleset, Some(snapshot)))
        }
        None => {
            tracing::info!(rows = dataset.len(), "classifying with keyword rules");
            Ok(classify(dataset, &ruleset, None))
        }
    }
}

/// Edit list format: CSV with `Row,Category` columns. `Row` is a 0-based
/// index into the debit table.
fn read_edits(path: &Path) -> Result<Vec<CategoryEdit>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("reading edits from {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let find = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .with_context(|| format!("edits file is missing a '{name}' column"))
    };
    let row_col = find("Row")?;
    let category_col = find("Category")?;

    let mut edits = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: usize = record
            .get(row_col)
            .unwrap_or_default()
            .trim()
            .parse()
            .with_context(|| format!("bad row number in {}", path.display()))?;
        let category = record.get(category_col).unwrap_or_default().trim().to_string();
        edits.push(CategoryEdit { row, category });
    }
    Ok(edits)
}

fn render(dataset: &[Record]) {
    println!(
        "{:<4}  {:<10}  {:>12}  {:<6}  {:<18}  {}",
        "Row", "Date", "Amount", "Dir", "Category", "Details"
    );
    let mut debit_row = 0;
    for record in dataset {
        let row = if record.direction == Direction::Debit {
            let label = debit_row.to_string();
            debit_row += 1;
            label
        } else {
            String::new()
        };
        println!(
            "{:<4}  {:<10}  {:>12}  {:<6}  {:<18}  {}",
            row,
            record.date.format("%d/%m/%Y"),
            record.amount.to_string(),
            record.direction.to_string(),
            record.category,
            record.details
        );
    }

    let mut expense_totals: BTreeMap<&str, Amount> = BTreeMap::new();
    let mut expenses = Amount::zero();
    let mut payments = Amount::zero();
    for record in dataset {
        match record.direction {
            Direction::Debit => {
                let total = expense_totals
                    .entry(record.category.as_str())
                    .or_insert_with(Amount::zero);
                *total = *total + record.amount;
                expenses = expenses + record.amount;
            }
            Direction::Credit => payments = payments + record.amount,
        }
    }

    if !expense_totals.is_empty() {
        println!();
        println!("Expenses by category:");
        for (category, total) in &expense_totals {
            println!("  {category:<18}  {:>12}", total.to_string());
        }
    }
    println!();
    println!("Total expenses: {expenses}");
    println!("Total payments: {payments}");
}
