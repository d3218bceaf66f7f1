use anyhow::Result;
use comfy_table::Cell;

use super::ui;
use crate::aggregator::PriceAggregator;

/// Prints the feed-shaped snapshot (live, or the fallback dataset) as JSON.
pub async fn show_raw(aggregator: &PriceAggregator) -> Result<()> {
    let snapshot = aggregator.current_price().await;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Prints the transformed price board, as a table or as JSON.
pub async fn show_board(aggregator: &PriceAggregator, json: bool) -> Result<()> {
    let board = aggregator.price_board().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&board)?);
        return Ok(());
    }

    println!(
        "Updated: {}\n",
        ui::style_text(&board.updated_time, ui::StyleType::Title)
    );

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Chinese Name"),
        ui::header_cell("Rate"),
    ]);
    for entry in &board.currencies {
        table.add_row(vec![
            Cell::new(&entry.code),
            Cell::new(&entry.chinese_name),
            ui::rate_cell(&entry.rate.to_string()),
        ]);
    }
    println!("{table}");
    Ok(())
}
