mod app;
mod client;
mod event;
mod gateway;
mod mentor;
mod profile;
mod theme;
mod tools;

use app::MorshedApp;
use client::GatewayClient;
use eframe::egui;
use gateway::HttpGateway;
use std::sync::mpsc;
use std::sync::Arc;
use theme::Theme;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("morshed=info")),
        )
        .init();

    let profile = profile::load();
    tracing::info!(gateway = %profile.gateway_url(), "starting morshed");

    let (tx, rx) = mpsc::channel();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("morshed-runtime")
        .build()?;

    let gateway = Arc::new(HttpGateway::new(profile.gateway_url()));
    let client = GatewayClient::new(gateway, tx, runtime.handle().clone());

    let app = MorshedApp::new(rx, client, &profile);
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([1024.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "مرشد",
        native_options,
        Box::new(move |creation_context| {
            Theme::default().apply_visuals(&creation_context.egui_ctx);
            Ok(Box::new(app))
        }),
    )?;

    Ok(())
}
