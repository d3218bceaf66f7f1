use anyhow::{Result, bail};
use comfy_table::Cell;

use super::ui;
use crate::currency::CurrencyService;

pub async fn list(service: &CurrencyService) -> Result<()> {
    let records = service.list().await?;
    if records.is_empty() {
        println!(
            "{}",
            ui::style_text("No currencies configured yet.", ui::StyleType::Subtle)
        );
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Chinese Name"),
    ]);
    for record in &records {
        table.add_row(vec![
            Cell::new(&record.code),
            Cell::new(&record.chinese_name),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn get(service: &CurrencyService, code: &str) -> Result<()> {
    match service.get(code).await? {
        Some(record) => {
            println!("{}  {}", record.code, record.chinese_name);
            Ok(())
        }
        None => bail!("currency '{code}' was not found"),
    }
}

pub async fn add(service: &CurrencyService, code: &str, name: &str) -> Result<()> {
    let record = service.create(code, name).await?;
    println!(
        "{}",
        ui::style_text(
            &format!("Added currency {} ({}).", record.code, record.chinese_name),
            ui::StyleType::Success
        )
    );
    Ok(())
}

pub async fn update(service: &CurrencyService, code: &str, name: &str) -> Result<()> {
    service.update(code, name).await?;
    println!(
        "{}",
        ui::style_text(&format!("Updated currency {code}."), ui::StyleType::Success)
    );
    Ok(())
}

pub async fn remove(service: &CurrencyService, code: &str) -> Result<()> {
    service.delete(code).await?;
    println!(
        "{}",
        ui::style_text(&format!("Removed currency {code}."), ui::StyleType::Success)
    );
    Ok(())
}
