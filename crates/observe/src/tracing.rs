use {
    crate::Config,
    std::{io::IsTerminal, panic::PanicHookInfo, sync::Once},
    time::macros::format_description,
    tracing_subscriber::{
        EnvFilter,
        Layer,
        fmt::time::UtcTime,
        prelude::*,
        util::SubscriberInitExt,
    },
};

/// Initializes the tracing setup shared by the binaries of this workspace.
/// All events are written to stderr, stdout is left to the program's output.
///
/// # Panics
///
/// Panics if a global subscriber was already installed.
pub fn initialize(config: &Config) {
    set_tracing_subscriber(config);
    std::panic::set_hook(Box::new(tracing_panic_hook));
}

/// Like [`initialize`], but can be called multiple times in a row. Later calls
/// are ignored.
///
/// Useful for tests.
pub fn initialize_reentrant(env_filter: &str) {
    // The tracing subscriber below is global object so initializing it again in the
    // same process by a different thread would fail.
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        set_tracing_subscriber(&Config::default().with_env_filter(env_filter));
        std::panic::set_hook(Box::new(tracing_panic_hook));
    });
}

fn set_tracing_subscriber(config: &Config) {
    // The json and the text formatter are different types, so the shared
    // part of the layer is spelled out once here and used in both branches.
    macro_rules! fmt_layer {
        () => {{
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_timer(UtcTime::new(format_description!(
                    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
                )))
                .with_ansi(std::io::stderr().is_terminal())
        }};
    }

    let env_filter = EnvFilter::new(&config.env_filter);
    if config.use_json_format {
        tracing_subscriber::registry()
            .with(fmt_layer!().json().with_filter(env_filter))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt_layer!().with_filter(env_filter))
            .init();
    }
    tracing::debug!(
        filter = %config.env_filter,
        json = config.use_json_format,
        "logging initialized"
    );
}

/// Panic hook that prints roughly the same message as the default panic hook
/// but uses tracing:error instead of stderr.
fn tracing_panic_hook(panic: &PanicHookInfo) {
    let thread = std::thread::current();
    let name = thread.name().unwrap_or("<unnamed>");
    let backtrace = std::backtrace::Backtrace::force_capture();
    tracing::error!("thread '{name}' {panic}\nstack backtrace:\n{backtrace}");
}
