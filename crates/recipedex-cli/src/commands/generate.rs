use super::{colorize_count, finish};
use recipedex_core::{IndexConfig, Outcome, RegistryBuilder};

pub fn run(config: IndexConfig, json: bool) -> Result<u8, String> {
    let output = config.output.clone();
    let builder = RegistryBuilder::new(config).map_err(|e| e.to_string())?;
    let report = builder.build().map_err(|e| e.to_string())?;

    let (outcome, code) = finish(&report, Some(&output), json)?;
    if let Outcome::Written { path, recipes } = &outcome {
        if !json {
            println!(
                "Generated {} with {} recipes",
                path.display(),
                colorize_count(*recipes)
            );
        }
    }
    Ok(code)
}
