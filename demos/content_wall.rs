//! Content Wall
//!
//! This example drives a wall through a short playlist.
//!
//! Key concepts:
//! - Modules that are ready at once, load late, or never load
//! - A newer request preempting one still in flight
//! - A preparation timeout forcing the switch at its deadline
//! - Monitoring observations written as JSON lines to stdout
//!
//! Run with: cargo run --example content_wall

use chrono::{Duration, Utc};
use std::error::Error;
use wallswitch::config::SwitchConfig;
use wallswitch::env::{
    ActiveModules, FixedGeometry, Geometry, JsonLinesSink, ModuleDefinition, ModuleHandle,
    ModuleRuntime, RunningModule, Signal, StaticRegistry,
};
use wallswitch::{ModuleSwitcher, Timestamp};

// A slide that narrates its lifecycle
struct Slide {
    name: String,
}

impl RunningModule for Slide {
    fn will_be_shown_soon(&self, deadline: Timestamp) -> Signal {
        println!("  [{}] will be shown at {}", self.name, deadline.format("%T%.3f"));
        Signal::ready()
    }

    fn will_be_hidden_soon(&self, deadline: Timestamp) {
        println!("  [{}] will be hidden at {}", self.name, deadline.format("%T%.3f"));
    }

    fn dispose(&self) {
        println!("  [{}] disposed", self.name);
    }
}

struct SlideRuntime;

impl ModuleRuntime for SlideRuntime {
    fn instantiate(
        &mut self,
        definition: &ModuleDefinition,
        geometry: &Geometry,
        _deadline: Timestamp,
    ) -> ModuleHandle {
        println!(
            "  [{}] instantiated at {}x{}",
            definition.name(),
            geometry.width,
            geometry.height
        );
        ModuleHandle::new(
            definition.name(),
            Slide {
                name: definition.name().to_string(),
            },
        )
    }
}

fn report(step: &str, switcher: &ModuleSwitcher, active: &ActiveModules) {
    println!(
        "{step}: phase={} on_screen={} active={:?}",
        switcher.phase(),
        switcher.on_screen().name(),
        active.names()
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== Content Wall ===\n");

    let photos_loaded = Signal::pending();
    let registry = StaticRegistry::new()
        .with(ModuleDefinition::new("clock"))
        .with(ModuleDefinition::new("weather"))
        .with(ModuleDefinition::with_load_signal("photos", photos_loaded.clone()))
        .with(ModuleDefinition::with_load_signal("news", Signal::pending()));

    let config = SwitchConfig::from_json(r#"{ "transition_window_ms": 2000, "monitoring": true }"#)?;
    let start = Utc::now();
    let active = ActiveModules::new();

    let mut switcher = ModuleSwitcher::builder()
        .registry(registry)
        .runtime(SlideRuntime)
        .ticker(active.clone())
        .geometry(FixedGeometry(Geometry::new(0, 0, 3840, 2160)))
        .monitor(JsonLinesSink::new(std::io::stdout()))
        .config(config)
        .start_at(start)
        .build()?;

    println!("1. Clock, ready immediately");
    let mut clock = switcher.request_switch("clock", start + Duration::seconds(1))?;
    switcher.advance_by(Duration::seconds(3));
    report("   after 3s", &switcher, &active);
    println!("   clock: {:?}\n", clock.status());

    println!("2. Weather preempted by photos before anything loads");
    let now = switcher.now();
    let mut weather = switcher.request_switch("weather", now + Duration::seconds(2))?;
    let mut photos = switcher.request_switch("photos", now + Duration::seconds(2))?;
    switcher.advance_by(Duration::seconds(1));
    report("   photos still loading", &switcher, &active);
    photos_loaded.fire();
    switcher.run_pending();
    switcher.advance_by(Duration::seconds(3));
    report("   after load", &switcher, &active);
    println!("   weather (superseded): {:?}, photos: {:?}\n", weather.status(), photos.status());

    println!("3. News never loads and is forced at its deadline");
    let now = switcher.now();
    let mut news = switcher.request_switch("news", now + Duration::seconds(1))?;
    switcher.advance_by(Duration::seconds(3));
    report("   after timeout", &switcher, &active);
    println!("   news: {:?}\n", news.status());

    println!("4. Unknown modules are rejected");
    match switcher.request_switch("stocks", switcher.now()) {
        Ok(_) => println!("   unexpected success"),
        Err(e) => println!("   rejected: {e}"),
    }

    println!("\nPhase path: {:?}", switcher.history().get_path());
    Ok(())
}
