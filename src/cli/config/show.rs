use colored::Colorize;
use stockdaily::api;
use tabled::settings::{Color, object::Columns};

#[derive(clap::Args)]
pub struct ConfigShowCommand;

impl ConfigShowCommand {
    pub async fn exec(&self) {
        match api::get_config().await {
            Ok(config) => {
                let table_data: Vec<Vec<String>> = config
                    .entries()
                    .into_iter()
                    .map(|(key, value)| vec![key, value])
                    .collect();

                let mut table = tabled::builder::Builder::from_iter(&table_data).build();
                table.modify(Columns::first(), Color::FG_CYAN);
                println!("{table}");
            }
            Err(err) => {
                println!("[!] {}", err.to_string().red());
            }
        }
    }
}
