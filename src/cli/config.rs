use clap::Subcommand;

mod set;
mod show;

#[derive(Subcommand)]
pub enum ConfigCommand {
    #[command(about = "Set a configuration, e.g. config set poll_hour 18")]
    Set(Box<set::ConfigSetCommand>),

    #[command(about = "Show all configurations")]
    #[clap(visible_aliases = &["ls"])]
    Show(Box<show::ConfigShowCommand>),
}

impl ConfigCommand {
    pub async fn exec(&self) {
        match self {
            Self::Set(cmd) => cmd.exec().await,
            Self::Show(cmd) => cmd.exec().await,
        }
    }
}
