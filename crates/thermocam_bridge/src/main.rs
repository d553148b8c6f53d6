//! # Thermocam Bridge
//!
//! Escuta os broadcasts UDP do sensor PIR/térmico e da câmera IoT. Ao
//! receber uma leitura do sensor, busca um JPEG da câmera via HTTP e grava
//! com nome conforme a temperatura, além de uma linha no log CSV.
//!
//! ## Uso
//! ```bash
//! thermocam_bridge                 # config.toml ao lado do executável
//! thermocam_bridge minha.toml      # outro arquivo de configuração
//! ```

mod camera;
mod correlator;
mod listener;

use camera::CameraClient;
use correlator::Correlator;
use listener::Listener;
use std::path::PathBuf;
use thermocam_core::config::AppConfig;
use tracing::{error, info, warn};

fn main() {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Carregar config ──
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(AppConfig::default_path);
    let config = AppConfig::load(&config_path);

    // Salva config padrão se não existir
    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível salvar config padrão: {e}");
        }
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("Configuração inválida: {e}");
        }
        std::process::exit(2);
    }

    let bridge = &config.bridge;

    // ── Diretório de fotos ──
    let save_dir = bridge.save_dir();
    if let Err(e) = std::fs::create_dir_all(&save_dir) {
        error!("Falha ao criar {}: {e}", save_dir.display());
        std::process::exit(1);
    }

    // ── Cliente HTTP da câmera ──
    let camera = match CameraClient::new(&config.camera) {
        Ok(camera) => camera,
        Err(e) => {
            error!("Falha ao criar cliente HTTP: {e}");
            std::process::exit(1);
        }
    };

    // ── Socket UDP ──
    let mut listener = match Listener::bind(bridge.port) {
        Ok(listener) => listener,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    // ── Banner ──
    println!();
    println!("══════════════════════════════════════════════");
    println!("   📷 THERMOCAM BRIDGE – ATIVO (Rust)");
    println!("══════════════════════════════════════════════");
    match listener.local_addr() {
        Ok(addr) => println!("  Escutando: {addr}"),
        Err(_) => println!("  Porta UDP: {}", bridge.port),
    }
    println!("  Câmera:    {}", bridge.camera_device);
    println!("  Sensor:    {}", bridge.sensor_device);
    println!("  Fotos:     {}", save_dir.display());
    println!("  Log CSV:   {}", bridge.log_path().display());
    println!("══════════════════════════════════════════════");
    println!();

    // ── Loop principal ──
    let mut correlator = Correlator::new(&config, camera);
    correlator.run(&mut listener);

    match correlator.registry().camera_ip() {
        Some(ip) => info!("Câmera associada: {ip}"),
        None => info!("Nenhuma câmera foi descoberta"),
    }
    if let Some(m) = correlator.last_measurement() {
        info!("Última leitura: pir={} temperatura={}", m.pir, m.temperature);
    }
    info!("Socket UDP encerrado, saindo");
}
