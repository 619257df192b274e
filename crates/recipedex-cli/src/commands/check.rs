use super::{colorize_count, finish};
use recipedex_core::{IndexConfig, Outcome, RegistryBuilder};

/// Run the full pipeline without writing the index.
pub fn run(config: IndexConfig, json: bool) -> Result<u8, String> {
    let builder = RegistryBuilder::new(config).map_err(|e| e.to_string())?;
    let report = builder.build().map_err(|e| e.to_string())?;

    let (outcome, code) = finish(&report, None, json)?;
    if let Outcome::Validated { recipes } = outcome {
        if !json {
            println!("{} recipes valid", colorize_count(recipes));
        }
    }
    Ok(code)
}
