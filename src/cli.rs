use std::{process, time::Instant};

use clap::Subcommand;
use colored::Colorize;
use indicatif::ProgressBar;
use stockdaily::{
    api::{CrawlEvent, CrawlStream, CrawlSummary},
    error::SdResult,
    utils::datetime::secs_to_human_str,
};
use tabled::settings::{Alignment, Color, object::Rows};

mod backfill;
mod check;
mod config;
mod list;
mod poll;
mod run;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Crawl every history page of every registered stock")]
    #[clap(visible_aliases = &["bf"])]
    Backfill(Box<backfill::BackfillCommand>),

    #[command(about = "Check the registry, schema, source and store")]
    Check(Box<check::CheckCommand>),

    #[command(subcommand, about = "Show or set configurations")]
    Config(config::ConfigCommand),

    #[command(about = "List all registered stocks")]
    #[clap(visible_aliases = &["ls"])]
    List(Box<list::ListCommand>),

    #[command(about = "Ingest today's record of every stock once a day")]
    Poll(Box<poll::PollCommand>),

    #[command(about = "Backfill, then keep polling daily")]
    Run(Box<run::RunCommand>),
}

/// Prints crawl events until the stream ends; exits the process if the crawl cannot start.
async fn follow(spinner: &ProgressBar, stream: SdResult<CrawlStream>) {
    let mut stream = match stream {
        Ok(stream) => stream,
        Err(err) => {
            spinner.finish_with_message(format!("{}", err.to_string().red()));
            process::exit(1);
        }
    };

    let started = Instant::now();
    while let Some(event) = stream.next().await {
        match event {
            CrawlEvent::Info(s) => {
                spinner.println(format!("[i] {}", s.bright_black()));
            }
            CrawlEvent::Warn(s) => {
                spinner.println(format!("[!] {}", s.yellow()));
            }
            CrawlEvent::Page {
                stock,
                page,
                last_page,
                records,
            } => {
                spinner.set_message(format!("{stock} {page}/{last_page} (+{records})"));
            }
            CrawlEvent::Record(stock, record) => {
                spinner.println(format!("[{}][+] {record}", stock.code.cyan()));
            }
            CrawlEvent::Summary(summary) => {
                spinner.println(format!(
                    "[✔] Done in {}",
                    secs_to_human_str(started.elapsed().as_secs())
                ));
                spinner.println(summary_table(&summary));
            }
        }
    }

    spinner.finish_with_message(format!("{}", "✔".to_string().green()));
}

fn summary_table(summary: &CrawlSummary) -> String {
    let table_data: Vec<Vec<String>> = vec![
        vec![
            "Stocks".to_string(),
            "Pages".to_string(),
            "Records".to_string(),
            "Failed Pages".to_string(),
            "Failed Records".to_string(),
        ],
        vec![
            summary.stocks.to_string(),
            summary.pages.to_string(),
            summary.records.to_string(),
            summary.failed_pages.to_string(),
            summary.failed_records.to_string(),
        ],
    ];

    let mut table = tabled::builder::Builder::from_iter(&table_data).build();
    table.modify(Rows::first(), Color::FG_BRIGHT_BLACK);
    table.modify(Rows::new(1..), Alignment::right());
    table.to_string()
}
