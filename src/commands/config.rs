use crate::config::KeycloakLocalConfig;
use crate::error::Result;
use crate::paths::home;

pub struct ConfigCommand<'a> {
    config: &'a KeycloakLocalConfig,
}

impl<'a> ConfigCommand<'a> {
    pub fn new(config: &'a KeycloakLocalConfig) -> Result<Self> {
        Ok(Self { config })
    }

    /// Print the effective configuration as TOML.
    pub fn execute(&self) -> Result<()> {
        println!(
            "# home: {}\n# config file: {}\n# cache: {}",
            self.config.home().display(),
            home::config_file(self.config.home()).display(),
            self.config.cache_root().display()
        );
        print!("{}", self.config.to_toml()?);
        Ok(())
    }
}
