use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use stockdaily::api;
use tabled::settings::{
    Color,
    object::{Columns, Object, Rows},
};
use tokio::time::Duration;

#[derive(clap::Args)]
pub struct CheckCommand;

impl CheckCommand {
    pub async fn exec(&self) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("Checking {spinner:.cyan}").unwrap());
        spinner.enable_steady_tick(Duration::from_millis(100));

        match api::check().await {
            Ok(status) => {
                spinner.finish_and_clear();

                let failures = status.iter().filter(|(_, err)| err.is_some()).count();
                let table_data: Vec<Vec<String>> = status
                    .iter()
                    .map(|(target, optional_error)| match optional_error {
                        Some(err) => vec![target.to_string(), err.to_string()],
                        None => vec![target.to_string(), "✔".to_string()],
                    })
                    .collect();

                let mut table = tabled::builder::Builder::from_iter(&table_data).build();
                table.modify(Columns::first(), Color::FG_CYAN);
                for (i, (_, optional_error)) in status.iter().enumerate() {
                    let color = if optional_error.is_some() {
                        Color::FG_RED
                    } else {
                        Color::FG_GREEN
                    };
                    table.modify(Rows::new(i..i + 1).not(Columns::first()), color);
                }
                println!("{table}");

                if failures > 0 {
                    println!("[!] {}", format!("{failures} check(s) failed").yellow());
                }
            }
            Err(err) => {
                spinner.finish_with_message(format!("{}", err.to_string().red()));
            }
        }
    }
}
