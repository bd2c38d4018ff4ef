use super::ui;
use crate::core::RateTable;
use crate::core::format::format_rate_map;
use comfy_table::Cell;

impl RateTable {
    /// Renders the full rate table as a single boxed list.
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell(&format!(
            "Exchange rates for {}",
            self.base
        ))]);
        table.add_row(vec![Cell::new(format_rate_map(&self.rates))]);

        let mut output = table.to_string();
        if let Some(updated) = self.last_updated {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(
                    &format!("Last updated: {}", updated.format("%Y-%m-%d %H:%M UTC")),
                    ui::StyleType::Subtle,
                )
            ));
        }
        output
    }
}

pub fn display_rate_table(table: &RateTable) {
    println!("{}", table.display_as_table());
}
