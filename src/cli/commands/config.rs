use chainbot::config::{ChatbotConfig, ConfigManager};
use chainbot::error::{ChatbotError, ChatbotResult};

use crate::cli::ConfigAction;

pub async fn handle_config(
    manager: &ConfigManager,
    config: &ChatbotConfig,
    action: ConfigAction,
) -> ChatbotResult<()> {
    match action {
        ConfigAction::Show => {
            match manager.path() {
                Some(path) => println!("# {}", path.display()),
                None => println!("# no config file"),
            }
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Init { force } => {
            if let Some(path) = manager.path() {
                if !force && tokio::fs::try_exists(path).await? {
                    return Err(ChatbotError::config(format!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    )));
                }
            }
            let path = manager.save_config(&ChatbotConfig::default()).await?;
            println!("✅ Wrote {}", path.display());
        }
    }

    Ok(())
}
