use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub(crate) fn init(debug: bool) {
    let max_level = if debug || cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(max_level).finish();
    // A second init (e.g. from tests) is fine to ignore.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
