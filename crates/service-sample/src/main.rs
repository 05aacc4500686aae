//! # Service Sample
//!
//! Talks to a font API described by `config/services.json`.
//!
//! The entry point demonstrates:
//! 1. Building the [`ApiSystem`] from the environment.
//! 2. Observing request outcomes on the bus.
//! 3. Creating, listing, updating and deleting a [`Font`](service_sample::model::Font).
//!
//! ```bash
//! API_URL=http://localhost API_PORT=8080 RUST_LOG=debug cargo run -p service-sample
//! ```

use serde_json::json;
use service_framework::tracing::setup_tracing;
use service_framework::{Bus, Handler, Query};
use service_sample::lifecycle::ApiSystem;
use service_sample::model::{FontCreate, FontUpdate};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    info!("Starting font sample");

    let system = ApiSystem::from_env()?;

    system.bus.on(
        "font.store.success",
        Handler::new(|payload| info!(?payload, "Font stored")),
    );

    let span = tracing::info_span!("font_creation");
    let created = async {
        info!("Creating font");
        system
            .fonts
            .create(FontCreate::new("Inter", "sans-serif"))
            .await
    }
    .instrument(span)
    .await;

    let font = match created {
        Ok(font) => font,
        Err(e) => {
            error!(error = %e, "Font creation failed");
            return Err(e.into());
        }
    };
    info!(font_id = %font.id, "Font created");

    let fonts = system
        .fonts
        .list(Query::new().with("include", vec!["styles"]))
        .instrument(tracing::info_span!("font_listing"))
        .await?;
    info!(count = fonts.len(), "Fonts listed");

    let update = FontUpdate {
        styles: Some(vec!["regular".to_string(), "bold".to_string()]),
        ..Default::default()
    };
    let font = system.fonts.update(&font.id, update).await?;
    info!(font_id = %font.id, styles = ?font.styles, "Font updated");

    system.fonts.delete(&font.id).await?;
    system.fonts.service().emit("cleanup", json!({ "font": font.id }));

    info!("Application completed successfully");
    Ok(())
}
