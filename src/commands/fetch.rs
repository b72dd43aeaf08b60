use crate::config::KeycloakLocalConfig;
use crate::distribution::DistributionAcquirer;
use crate::error::Result;

pub struct FetchCommand<'a> {
    config: &'a KeycloakLocalConfig,
}

impl<'a> FetchCommand<'a> {
    pub fn new(config: &'a KeycloakLocalConfig) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn execute(&self, version: &str) -> Result<()> {
        let cache_root = self.config.cache_root();
        let distribution = DistributionAcquirer::new(self.config).acquire(version, &cache_root)?;

        println!("{}", distribution.root().display());
        Ok(())
    }
}
