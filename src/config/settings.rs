use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub friendica: FriendicaConfig,
    #[serde(default)]
    pub pumpio: PumpIoConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Path template mapping a lexicon key to its word-list file; `{}` is
    /// replaced by the key name.
    #[serde(default = "default_path_template")]
    pub path_template: String,
    /// File of post templates to draw random posts from
    #[serde(default = "default_posts_file")]
    pub default_posts_file: String,
    /// File of pre-authored `CLIENT,username,password,message` lines
    #[serde(default = "default_client_posts_file")]
    pub client_posts_file: String,
    /// Total posts per run (client posts plus generated filler)
    #[serde(default = "default_max_posts")]
    pub max_posts: usize,
}

fn default_path_template() -> String {
    "lists/default_{}s.txt".to_string()
}

fn default_posts_file() -> String {
    "lists/default_posts.txt".to_string()
}

fn default_client_posts_file() -> String {
    "lists/client_posts.txt".to_string()
}

fn default_max_posts() -> usize {
    20
}

#[derive(Debug, Clone, Deserialize)]
pub struct FriendicaConfig {
    /// Host or host:port of the Friendica server
    #[serde(default = "default_friendica_server")]
    pub server: String,
    #[serde(default)]
    pub use_https: bool,
    /// File of `username,password` lines to pick posting accounts from
    #[serde(default = "default_friendica_accounts")]
    pub accounts_file: String,
}

fn default_friendica_server() -> String {
    "127.0.0.1".to_string()
}

fn default_friendica_accounts() -> String {
    "settings/friendica_accounts.txt".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PumpIoConfig {
    /// File of usernames to pick posting accounts from
    #[serde(default = "default_pumpio_accounts")]
    pub accounts_file: String,
    /// Directory holding the pump-post-note helper
    #[serde(default = "default_pumpio_bin_dir")]
    pub bin_dir: String,
}

fn default_pumpio_accounts() -> String {
    "settings/pumpio_accounts.txt".to_string()
}

fn default_pumpio_bin_dir() -> String {
    "/srv/pump.io/bin".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("generator.path_template", default_path_template())?
            .set_default("generator.default_posts_file", default_posts_file())?
            .set_default("generator.client_posts_file", default_client_posts_file())?
            .set_default("generator.max_posts", default_max_posts() as i64)?
            .set_default("friendica.server", default_friendica_server())?
            .set_default("friendica.use_https", false)?
            .set_default("friendica.accounts_file", default_friendica_accounts())?
            .set_default("pumpio.accounts_file", default_pumpio_accounts())?
            .set_default("pumpio.bin_dir", default_pumpio_bin_dir())?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // GENERATOR_MAX_POSTS, FRIENDICA_SERVER, PUMPIO_BIN_DIR, etc.
            .add_source(
                Environment::default()
                    .separator("_")
                    .try_parsing(true)
                    .list_separator(","),
            );

        builder.build()?.try_deserialize()
    }

    /// Base URL for the Friendica API.
    pub fn friendica_base_url(&self) -> String {
        let scheme = if self.friendica.use_https {
            "https"
        } else {
            "http"
        };
        format!("{}://{}", scheme, self.friendica.server)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            path_template: default_path_template(),
            default_posts_file: default_posts_file(),
            client_posts_file: default_client_posts_file(),
            max_posts: default_max_posts(),
        }
    }
}

impl Default for FriendicaConfig {
    fn default() -> Self {
        Self {
            server: default_friendica_server(),
            use_https: false,
            accounts_file: default_friendica_accounts(),
        }
    }
}

impl Default for PumpIoConfig {
    fn default() -> Self {
        Self {
            accounts_file: default_pumpio_accounts(),
            bin_dir: default_pumpio_bin_dir(),
        }
    }
}
