use colored::Colorize;
use stockdaily::api;

#[derive(clap::Args)]
pub struct ConfigSetCommand {
    #[arg(help = "Config key, see `config show` for the full list")]
    key: String,

    #[arg(help = "New value")]
    value: String,
}

impl ConfigSetCommand {
    pub async fn exec(&self) {
        if let Err(err) = api::set_config(&self.key, &self.value).await {
            println!("[!] {}", err.to_string().red());
            return;
        }

        match api::get_config().await {
            Ok(config) => {
                for (key, value) in config.entries() {
                    if key.eq_ignore_ascii_case(self.key.trim()) {
                        println!("{} = {}", key.cyan(), value);
                    }
                }
            }
            Err(err) => {
                println!("[!] {}", err.to_string().red());
            }
        }
    }
}
