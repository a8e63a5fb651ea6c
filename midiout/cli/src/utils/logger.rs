use std::sync::{
    atomic::{AtomicBool, Ordering},
    Once,
};

static INIT: Once = Once::new();
static IS_INITIALIZED: AtomicBool = AtomicBool::new(false);

pub fn is_active() -> bool {
    IS_INITIALIZED.load(Ordering::SeqCst)
}

/// Route library diagnostics to stderr.
///
/// Failures are always shown; `verbose` raises the level filter so that
/// successful open/close events show up as well, for every connection in
/// the process.
pub fn start(id: &str, verbose: bool) -> anyhow::Result<()> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    if is_active() {
        anyhow::bail!("attempted to setup logger more than once");
    }

    let id = id.to_owned();

    fern::Dispatch::new()
        .format(move |out, msg, record| {
            let time = humantime::format_rfc3339_seconds(std::time::SystemTime::now());
            out.finish(format_args!(
                "[ {id} ] : [ {time} ] : [ {} ] : {msg}",
                record.level()
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;

    INIT.call_once(|| IS_INITIALIZED.store(true, Ordering::SeqCst));
    Ok(())
}
