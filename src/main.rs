//! venbluez: probe a Bluetooth headset, pair with it and record its microphone.

mod address;
mod app;
mod audio;
mod bluetooth;
mod commands;
mod config;
mod error;
mod interrupt;
mod logging;
mod preflight;
mod setup;
#[cfg(test)]
mod test_support;
mod ui;

#[tokio::main]
async fn main() {
    if let Err(e) = app::run().await {
        tracing::error!("{e:#}");
        ui::report::alert(format!("{e:#}"));
        std::process::exit(1);
    }
}
