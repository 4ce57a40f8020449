use pokemon_builder::hit_points::calculate_creature_hp;
use pokemon_builder::{
    BuilderConfig, Catalog, GenerationOptions, GenerationRequest, Generator, HpMethod,
    ReferenceDataProvider,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;
use std::error::Error;
use std::path::Path;
use tracing_subscriber::EnvFilter;

const CONFIG_FILE: &str = "builder.ron";

/// Usage: `pokemon-builder [pokemon_id] [level]`
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = BuilderConfig::load(Some(Path::new(CONFIG_FILE)))?;
    let catalog = Catalog::load(&config.data_dir)?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut args = env::args().skip(1);
    let creature_id = args.next();
    let level = match args.next() {
        Some(raw) => Some(raw.parse::<i64>().map_err(|e| format!("invalid level '{}': {}", raw, e))?),
        None => None,
    };

    let generator = Generator::with_options(&catalog, GenerationOptions::from(&config));
    let request = GenerationRequest { creature_id, level };
    let generated = generator.generate(&request, &mut rng)?;

    println!("{}", generated);
    println!();

    let creature = catalog.creature_by_id(&generated.id)?;
    for method in [HpMethod::Average, HpMethod::Roll] {
        let hp = calculate_creature_hp(creature, generated.level, method, &mut rng);
        println!("--- HP ({}) ---", method);
        println!("{}", hp);
    }

    Ok(())
}
