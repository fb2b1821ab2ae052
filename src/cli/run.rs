use indicatif::{ProgressBar, ProgressStyle};
use stockdaily::api;
use tokio::time::Duration;

use crate::cli::follow;

#[derive(clap::Args)]
pub struct RunCommand;

impl RunCommand {
    pub async fn exec(&self) {
        let spinner = ProgressBar::new_spinner();
        spinner
            .set_style(ProgressStyle::with_template("[{elapsed}] {msg} {spinner:.cyan}").unwrap());
        spinner.enable_steady_tick(Duration::from_millis(100));

        follow(&spinner, api::run().await).await;
    }
}
