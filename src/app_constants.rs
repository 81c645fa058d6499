pub(crate) const GAME_URL: &str = "https://krunker.io/";

pub(crate) const SWAP_SCHEME: &str = "idkr-swap";
pub(crate) const CONFIG_STORE_FILE: &str = "config.json";
pub(crate) const DISCORD_CLIENT_ID: &str = "770954802443059220";

pub(crate) const WEB_WINDOW_WIDTH: f64 = 1600.0;
pub(crate) const WEB_WINDOW_HEIGHT: f64 = 900.0;
pub(crate) const SPLASH_WINDOW_WIDTH: f64 = 600.0;
pub(crate) const SPLASH_WINDOW_HEIGHT: f64 = 300.0;
pub(crate) const PROMPT_WINDOW_WIDTH: f64 = 480.0;
pub(crate) const PROMPT_WINDOW_HEIGHT: f64 = 240.0;

/// How long the splash window lingers after the game window launches.
pub(crate) const SPLASH_LINGER_MS: u64 = 2000;

pub(crate) const RPC_STOP_EVENT: &str = "rpc-stop";
pub(crate) const UPDATE_MESSAGE_EVENT: &str = "update-message";
pub(crate) const PROMPT_DATA_EVENT: &str = "prompt-data";

pub(crate) const SPLASH_PAGE: &str = "splash.html";
pub(crate) const PROMPT_PAGE: &str = "prompt.html";
