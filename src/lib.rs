pub mod config;
pub mod display;
pub mod entities;
pub mod scenario;
pub mod telemetry;
pub mod world;

pub use config::{AppConfig, ConfigError, DisplayConfig};
pub use display::{create_display, DisplayError, DisplayHealth, DisplayItem, DisplayType};
pub use entities::entity::{EntityKind, EntityRef};
pub use entities::item::ItemStack;
pub use entities::shop::{Shop, ShopView};
pub use world::access::{EntitySnapshot, WorldAccess, WorldError};

use display::classifier;
use display::watcher::DisplayWatcher;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] telemetry::logging::LoggingError),

    #[error(transparent)]
    Scenario(#[from] scenario::ScenarioError),
}

/// Offline audit: load a world snapshot, spawn every shop's display, run
/// one repair pass and print what changed.
pub fn run(args: &[String]) -> Result<(), AppError> {
    let config = AppConfig::from_args(args)?;
    telemetry::logging::init(&config.log_dir)?;
    let scenario = scenario::Scenario::load(&config.scenario)?;
    let mut world = scenario.build_world(&config.display)?;
    let entities_before = world.len();

    let mut displays: Vec<Box<dyn DisplayItem>> = scenario
        .shops
        .iter()
        .cloned()
        .map(|shop| create_display(shop, &config.display))
        .collect();
    let mut spawn_failures = 0;
    for display in displays.iter_mut() {
        if let Err(err) = display.spawn(&mut world) {
            let location = display.display_location();
            warn!(?location, "display spawn failed: {err}");
            spawn_failures += 1;
        }
    }

    // The first pass always includes a duplicate scan.
    let mut watcher = DisplayWatcher::new(config.display.dedup_interval);
    let report = watcher.run_pass(&mut world, &mut displays);

    let foreign_markers = world
        .entities()
        .into_iter()
        .filter_map(|snapshot| snapshot.item)
        .filter(|item| classifier::is_guard_marker(Some(item)))
        .filter(|item| {
            !scenario
                .shops
                .iter()
                .any(|shop| classifier::belongs_to(item, shop))
        })
        .count();

    println!("shop_display: audit");
    println!("- scenario: {}", config.scenario.display());
    println!("- display type: {:?}", config.display.display_type());
    println!("- shops: {}", scenario.shops.len());
    println!("- entities before: {}", entities_before);
    println!("- entities after: {}", world.len());
    println!("- spawn failures: {}", spawn_failures);
    println!(
        "- watch pass: checked={}, regenerated={}, moved_back={}, deduplicated={}, failures={}",
        report.checked, report.regenerated, report.moved_back, report.deduplicated, report.failures
    );
    println!("- foreign markers: {}", foreign_markers);
    for display in &displays {
        println!(
            "- display {:?}: {:?}",
            display.display_location(),
            display.health(&world)
        );
    }
    Ok(())
}
