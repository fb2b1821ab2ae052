use colored::Colorize;
use stockdaily::api;
use tabled::settings::{Color, object::Columns};

#[derive(clap::Args)]
pub struct ListCommand;

impl ListCommand {
    pub async fn exec(&self) {
        match api::stocks().await {
            Ok(stocks) => {
                if stocks.is_empty() {
                    println!("[!] {}", "No stock in the registry".yellow());
                } else {
                    let table_data: Vec<Vec<String>> = stocks
                        .into_iter()
                        .map(|stock| vec![stock.code, stock.name])
                        .collect();

                    let mut table = tabled::builder::Builder::from_iter(&table_data).build();
                    table.modify(Columns::first(), Color::FG_CYAN);
                    println!("{table}");
                }
            }
            Err(err) => {
                println!("[!] {}", err.to_string().red());
            }
        }
    }
}
