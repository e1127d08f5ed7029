//! The `veil options` command: list content types and intensities.

use serde::Serialize;
use veil_core::config::BlurConfig;
use veil_core::redact::BlurProfile;
use veil_core::{ContentType, Intensity};

#[derive(Debug, Serialize)]
struct ContentOption {
    id: ContentType,
    label: &'static str,
    description: &'static str,
}

#[derive(Debug, Serialize)]
struct IntensityOption {
    id: Intensity,
    label: &'static str,
    description: &'static str,
    kernel_size: u32,
}

#[derive(Debug, Serialize)]
struct OptionsCatalog {
    content_types: Vec<ContentOption>,
    intensities: Vec<IntensityOption>,
}

fn catalog(blur: &BlurConfig) -> OptionsCatalog {
    let profile = BlurProfile::from_config(blur);
    OptionsCatalog {
        content_types: ContentType::ALL
            .iter()
            .map(|&id| ContentOption {
                id,
                label: id.label(),
                description: id.description(),
            })
            .collect(),
        intensities: Intensity::ALL
            .iter()
            .map(|&id| IntensityOption {
                id,
                label: id.label(),
                description: id.description(),
                kernel_size: profile.base(id).get(),
            })
            .collect(),
    }
}

/// Execute the options command.
pub async fn execute(config: veil_core::Config) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&catalog(&config.blur))?);
    Ok(())
}
